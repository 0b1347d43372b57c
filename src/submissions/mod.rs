//! User-proposed referral apps
//!
//! Authenticated users can suggest apps for the catalog. Suggestions land
//! as pending rows for admins to review; they never enter the catalog
//! automatically.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::{AppCategory, ReferralSubmission, SubmissionStatus};

/// Request to propose a referral app
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReferralRequest {
    #[validate(length(min = 1, max = 100))]
    pub app_name: String,
    pub category: AppCategory,
    #[validate(url)]
    pub referral_link: String,
    #[validate(range(min = 1))]
    pub bonus_amount: i64,
    pub description: Option<String>,
}

/// Submission intake and review-queue service
pub struct SubmissionService {
    db_pool: PgPool,
}

impl SubmissionService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Record a user's proposal as a pending submission
    pub async fn create_submission(
        &self,
        user_id: Uuid,
        request: SubmitReferralRequest,
    ) -> Result<ReferralSubmission> {
        let submission: ReferralSubmission = sqlx::query_as(
            r#"
            INSERT INTO referral_submissions (
                id, user_id, app_name, category, referral_link,
                bonus_amount, description, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&request.app_name)
        .bind(request.category)
        .bind(&request.referral_link)
        .bind(request.bonus_amount)
        .bind(&request.description)
        .bind(SubmissionStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to insert submission")?;

        tracing::info!(
            submission_id = %submission.id,
            user_id = %user_id,
            app_name = %submission.app_name,
            "Referral submission recorded"
        );

        Ok(submission)
    }

    /// Recent submissions for the admin review queue, newest first
    pub async fn list_recent(
        &self,
        status: Option<SubmissionStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<ReferralSubmission>> {
        let limit = limit.unwrap_or(20).clamp(1, 100);

        let mut builder: sqlx::QueryBuilder<sqlx::Postgres> =
            sqlx::QueryBuilder::new("SELECT * FROM referral_submissions WHERE 1=1");

        if let Some(status) = status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }

        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(limit);

        let submissions = builder
            .build_query_as::<ReferralSubmission>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SubmitReferralRequest {
        SubmitReferralRequest {
            app_name: "PhonePe".to_string(),
            category: AppCategory::Payments,
            referral_link: "https://phon.pe/ref123".to_string(),
            bonus_amount: 150,
            description: Some("Scan and pay app".to_string()),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut request = valid_request();
        request.app_name = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_non_url_link_rejected() {
        let mut request = valid_request();
        request.referral_link = "not-a-link".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_zero_bonus_rejected() {
        let mut request = valid_request();
        request.bonus_amount = 0;
        assert!(request.validate().is_err());
    }
}
