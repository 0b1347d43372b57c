//! Click ledger
//!
//! Records one immutable click event per referral action and serves the
//! dashboard and admin review listings. Status mutations belong to the
//! reward lifecycle service, not here.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::attribution::Attribution;
use crate::models::{Click, ClickStatus, ClickWithApp};

/// Maximum page size for listings
const MAX_PAGE_SIZE: i64 = 100;
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Click ledger service
pub struct ClickService {
    db_pool: PgPool,
}

impl ClickService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Insert a new pending click with the resolved attribution
    pub async fn record_click(&self, app_id: Uuid, attribution: &Attribution) -> Result<Click> {
        let click: Click = sqlx::query_as(
            r#"
            INSERT INTO clicks (
                id, app_id, user_id, anonymous_id,
                utm_source, utm_medium, utm_campaign,
                is_my_referral, status, clicked_at, confirmed_at, commission_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NULL, NULL)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(app_id)
        .bind(attribution.user_id)
        .bind(&attribution.anonymous_id)
        .bind(&attribution.utm_source)
        .bind(&attribution.utm_medium)
        .bind(&attribution.utm_campaign)
        .bind(attribution.is_my_referral)
        .bind(ClickStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to insert click")?;

        tracing::info!(
            click_id = %click.id,
            app_id = %app_id,
            source = %attribution.utm_source,
            "Click recorded"
        );

        Ok(click)
    }

    /// Recent clicks for a user's dashboard, newest first
    pub async fn list_for_user(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<Click>> {
        let limit = clamp_limit(limit);

        let clicks = sqlx::query_as::<_, Click>(
            "SELECT * FROM clicks WHERE user_id = $1 ORDER BY clicked_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(clicks)
    }

    /// Recent clicks for an anonymous visitor, newest first
    pub async fn list_for_anonymous(
        &self,
        anonymous_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Click>> {
        let limit = clamp_limit(limit);

        let clicks = sqlx::query_as::<_, Click>(
            "SELECT * FROM clicks WHERE anonymous_id = $1 ORDER BY clicked_at DESC LIMIT $2",
        )
        .bind(anonymous_id)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(clicks)
    }

    /// Recent clicks across all actors for admin review, joined with app
    /// details, newest first and bounded
    pub async fn list_recent(&self, limit: Option<i64>) -> Result<Vec<ClickWithApp>> {
        let limit = clamp_limit(limit);

        let clicks = sqlx::query_as::<_, ClickWithApp>(
            r#"
            SELECT
                c.*,
                a.name AS app_name,
                a.bonus_amount,
                a.commission_rate,
                a.my_commission_rate
            FROM clicks c
            JOIN apps a ON c.app_id = a.id
            ORDER BY c.clicked_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(clicks)
    }
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_defaults_and_bounds() {
        assert_eq!(clamp_limit(None), 20);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(1000)), 100);
    }
}
