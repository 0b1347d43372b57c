//! UPI payout-destination validation and per-user throttling
//!
//! Format validation is strict; the known-provider list is advisory only.
//! The rate limiter is an injected, process-local component: counters are
//! best-effort and reset on restart by design.

use regex::Regex;
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// username@provider; alphanumeric plus dots, underscores, hyphens
static UPI_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]{3,}@[A-Za-z]{3,}$").expect("valid regex"));

/// Common Indian UPI providers. Unknown suffixes are logged, never rejected.
const KNOWN_PROVIDERS: &[&str] = &[
    "paytm",
    "googlepay",
    "phonepe",
    "ybl",
    "okaxis",
    "okhdfcbank",
    "okicici",
    "oksbi",
    "ibl",
    "axl",
];

/// Validate a user-supplied UPI id
pub fn validate_upi_id(upi_id: &str) -> Result<(), String> {
    if upi_id.len() < 3 || upi_id.len() > 50 {
        return Err("UPI ID must be 3-50 characters".to_string());
    }

    if !UPI_FORMAT.is_match(upi_id) {
        return Err("Invalid UPI ID format. Use: username@provider".to_string());
    }

    if let Some(provider) = upi_id.split('@').nth(1) {
        if !KNOWN_PROVIDERS.contains(&provider.to_lowercase().as_str()) {
            tracing::warn!(provider = %provider, "Unknown UPI provider");
        }
    }

    Ok(())
}

#[derive(Debug)]
struct WindowCounter {
    count: u32,
    window_start: Instant,
}

/// Fixed-window attempt counter keyed by user id
///
/// Allows `max_attempts` per window; further attempts fail until the window
/// rolls over. Counters live in process memory only.
#[derive(Clone)]
pub struct UpiRateLimiter {
    windows: Arc<RwLock<HashMap<Uuid, WindowCounter>>>,
    max_attempts: u32,
    window: Duration,
}

impl UpiRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// Record an attempt; returns false once the window budget is spent
    pub async fn check(&self, user_id: Uuid) -> bool {
        let mut windows = self.windows.write().await;
        let now = Instant::now();

        match windows.get_mut(&user_id) {
            Some(counter) if now.duration_since(counter.window_start) < self.window => {
                if counter.count >= self.max_attempts {
                    return false;
                }
                counter.count += 1;
                true
            }
            _ => {
                windows.insert(
                    user_id,
                    WindowCounter {
                        count: 1,
                        window_start: now,
                    },
                );
                true
            }
        }
    }

    /// Drop stale windows to keep the map bounded
    pub async fn cleanup(&self, max_age: Duration) {
        let mut windows = self.windows.write().await;
        let now = Instant::now();
        windows.retain(|_, counter| now.duration_since(counter.window_start) < max_age);
    }
}

impl Default for UpiRateLimiter {
    fn default() -> Self {
        // 5 update attempts per user per minute
        Self::new(5, Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_upi_ids() {
        assert!(validate_upi_id("valid_name@paytm").is_ok());
        assert!(validate_upi_id("user.name-01@ybl").is_ok());
        assert!(validate_upi_id("abc@okhdfcbank").is_ok());
    }

    #[test]
    fn test_provider_too_short() {
        assert!(validate_upi_id("ab@x").is_err());
        assert!(validate_upi_id("someone@ab").is_err());
    }

    #[test]
    fn test_username_too_short() {
        assert!(validate_upi_id("ab@paytm").is_err());
    }

    #[test]
    fn test_length_bounds() {
        assert!(validate_upi_id("a@b").is_err());
        let long = format!("{}@paytm", "a".repeat(50));
        assert!(long.len() > 50);
        assert!(validate_upi_id(&long).is_err());
    }

    #[test]
    fn test_bad_characters_rejected() {
        assert!(validate_upi_id("user name@paytm").is_err());
        assert!(validate_upi_id("user@pay tm").is_err());
        assert!(validate_upi_id("user@paytm1").is_err());
        assert!(validate_upi_id("user@@paytm").is_err());
    }

    #[test]
    fn test_unknown_provider_accepted() {
        // Advisory check only; logged but not rejected
        assert!(validate_upi_id("someone@obscurebank").is_ok());
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_five_then_denies() {
        let limiter = UpiRateLimiter::new(5, Duration::from_secs(60));
        let user = Uuid::new_v4();

        for _ in 0..5 {
            assert!(limiter.check(user).await);
        }
        assert!(!limiter.check(user).await);
        assert!(!limiter.check(user).await);
    }

    #[tokio::test]
    async fn test_rate_limiter_users_independent() {
        let limiter = UpiRateLimiter::new(1, Duration::from_secs(60));
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();

        assert!(limiter.check(user_a).await);
        assert!(limiter.check(user_b).await);
        assert!(!limiter.check(user_a).await);
    }

    #[tokio::test]
    async fn test_rate_limiter_window_rolls_over() {
        let limiter = UpiRateLimiter::new(1, Duration::from_millis(30));
        let user = Uuid::new_v4();

        assert!(limiter.check(user).await);
        assert!(!limiter.check(user).await);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(limiter.check(user).await);
    }

    #[tokio::test]
    async fn test_cleanup_drops_stale_windows() {
        let limiter = UpiRateLimiter::new(5, Duration::from_millis(10));
        let user = Uuid::new_v4();

        assert!(limiter.check(user).await);
        tokio::time::sleep(Duration::from_millis(20)).await;
        limiter.cleanup(Duration::from_millis(10)).await;

        assert!(limiter.windows.read().await.is_empty());
    }
}
