//! Profile and balance service
//!
//! Balances are aggregated live from the clicks and payouts tables on every
//! read. No denormalized counters exist, so there is nothing to get out of
//! sync when a click is re-reviewed.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{EarningsSummary, Profile};
use crate::rewards::commission::{DEFAULT_COMMISSION_RATE, DEFAULT_MY_COMMISSION_RATE};

/// Profile service
pub struct ProfileService {
    db_pool: PgPool,
}

impl ProfileService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Fetch a profile row
    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(profile)
    }

    /// Aggregate the user's click and payout history into dashboard numbers
    ///
    /// Pending clicks have no stored commission yet, so their earnings are
    /// estimated from the app's current rates.
    pub async fn earnings_summary(&self, user_id: Uuid) -> Result<EarningsSummary> {
        let (total_clicks, pending_estimate, confirmed_sum): (i64, f64, f64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(
                    CASE WHEN c.status = 'pending' THEN
                        a.bonus_amount * CASE WHEN c.is_my_referral
                            THEN COALESCE(a.my_commission_rate, $2)
                            ELSE COALESCE(a.commission_rate, $3)
                        END
                    END), 0),
                COALESCE(SUM(
                    CASE WHEN c.status = 'confirmed' THEN c.commission_amount END), 0)
            FROM clicks c
            JOIN apps a ON c.app_id = a.id
            WHERE c.user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(DEFAULT_MY_COMMISSION_RATE)
        .bind(DEFAULT_COMMISSION_RATE)
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to aggregate click earnings")?;

        let paid_out: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payouts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to aggregate payouts")?;

        Ok(EarningsSummary {
            total_clicks,
            pending_earnings: round2(pending_estimate),
            confirmed_earnings: round2(confirmed_sum - paid_out),
            total_earnings: round2(confirmed_sum),
            paid_out: round2(paid_out),
        })
    }

    /// Persist a validated payout destination; returns false when no profile
    /// row exists for the user
    pub async fn set_upi_id(&self, user_id: Uuid, upi_id: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE profiles SET upi_id = $2, updated_at = $3 WHERE id = $1")
            .bind(user_id)
            .bind(upi_id)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await
            .context("Failed to update payout destination")?;

        Ok(result.rows_affected() > 0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(49.617), 49.62);
        assert_eq!(round2(60.0), 60.0);
        assert_eq!(round2(0.125), 0.13);
    }
}
