//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::apps::AppService;
use crate::auth::AuthService;
use crate::clicks::ClickService;
use crate::profile::ProfileService;
use crate::rewards::RewardService;
use crate::submissions::SubmissionService;
use crate::upi::UpiRateLimiter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub app_service: Arc<AppService>,
    pub click_service: Arc<ClickService>,
    pub reward_service: Arc<RewardService>,
    pub profile_service: Arc<ProfileService>,
    pub submission_service: Arc<SubmissionService>,
    pub auth_service: Arc<AuthService>,
    pub upi_rate_limiter: UpiRateLimiter,
    /// Anonymous visitor cookie lifetime in days
    pub anon_cookie_ttl_days: i64,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        app_service: Arc<AppService>,
        click_service: Arc<ClickService>,
        reward_service: Arc<RewardService>,
        profile_service: Arc<ProfileService>,
        submission_service: Arc<SubmissionService>,
        auth_service: Arc<AuthService>,
        upi_rate_limiter: UpiRateLimiter,
        anon_cookie_ttl_days: i64,
    ) -> Self {
        Self {
            app_service,
            click_service,
            reward_service,
            profile_service,
            submission_service,
            auth_service,
            upi_rate_limiter,
            anon_cookie_ttl_days,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<AppService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.app_service.clone()
    }
}

impl FromRef<AppState> for Arc<ClickService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.click_service.clone()
    }
}

impl FromRef<AppState> for Arc<RewardService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.reward_service.clone()
    }
}

impl FromRef<AppState> for Arc<ProfileService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.profile_service.clone()
    }
}

impl FromRef<AppState> for Arc<SubmissionService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.submission_service.clone()
    }
}

impl FromRef<AppState> for UpiRateLimiter {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.upi_rate_limiter.clone()
    }
}
