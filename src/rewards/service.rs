//! Reward lifecycle service
//!
//! The state machine governing a click's review status, commission accrual
//! on confirmation, and payout issuance once the confirmed balance clears
//! the threshold.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{App, Click, ClickStatus, Payout, PayoutStatus};
use crate::rewards::commission::commission_for_app;

/// Result of an admin review action
#[derive(Debug)]
pub struct ReviewOutcome {
    pub click: Click,
    /// Set when the confirmation pushed the actor over the payout threshold
    pub payout_id: Option<Uuid>,
}

/// Reward lifecycle and payout issuance
pub struct RewardService {
    db_pool: PgPool,
    payout_threshold: f64,
}

impl RewardService {
    pub fn new(db_pool: PgPool, payout_threshold: f64) -> Self {
        Self {
            db_pool,
            payout_threshold,
        }
    }

    /// Apply an admin review decision to a click
    ///
    /// Returns `Ok(None)` for an unknown click id. Admin capability is
    /// enforced at the handler boundary; this service takes the closed
    /// status enum, so invalid statuses never reach it.
    ///
    /// Balances are derived from click rows, so re-confirming an
    /// already-confirmed click recomputes the same stored amount and cannot
    /// double-credit.
    pub async fn review_click(
        &self,
        click_id: Uuid,
        new_status: ClickStatus,
    ) -> Result<Option<ReviewOutcome>> {
        let Some(click) = self.get_click(click_id).await? else {
            return Ok(None);
        };

        // Only a first confirmation needs a fresh commission calculation
        let fresh_amount = match (new_status, click.commission_amount) {
            (ClickStatus::Confirmed, None) => Some(self.commission_for(&click).await?),
            _ => None,
        };
        let (confirmed_at, commission_amount) =
            review_transition(&click, new_status, fresh_amount, Utc::now());

        let updated: Click = sqlx::query_as(
            r#"
            UPDATE clicks
            SET status = $1, confirmed_at = $2, commission_amount = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(new_status)
        .bind(confirmed_at)
        .bind(commission_amount)
        .bind(click_id)
        .fetch_one(&self.db_pool)
        .await
        .context("Failed to update click status")?;

        tracing::info!(
            click_id = %click_id,
            status = %new_status.as_str(),
            "Click review applied"
        );

        let payout_id = match (new_status, updated.user_id) {
            (ClickStatus::Confirmed, Some(user_id)) => {
                // The status change is already persisted; a payout hiccup is
                // logged rather than failing the review.
                match self.evaluate_payout_eligibility(user_id).await {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::error!(user_id = %user_id, error = %e, "Payout eligibility check failed");
                        None
                    }
                }
            }
            _ => None,
        };

        Ok(Some(ReviewOutcome {
            click: updated,
            payout_id,
        }))
    }

    /// Check whether the user's available confirmed earnings clear the
    /// threshold, and issue a payout request if so
    ///
    /// "Available" subtracts amounts already snapshotted into earlier
    /// payouts, so repeated confirmations cannot re-issue a payout for the
    /// same balance. The check and the insert run in one transaction that
    /// locks the profile row, serializing issuance per user: concurrent
    /// confirmations wait on the lock and the loser recomputes against the
    /// already-committed snapshot.
    pub async fn evaluate_payout_eligibility(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        let mut tx = self
            .db_pool
            .begin()
            .await
            .context("Failed to start payout transaction")?;

        let upi_id: Option<String> =
            sqlx::query_scalar("SELECT upi_id FROM profiles WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to load profile for payout check")?
                .flatten();

        let Some(upi_id) = upi_id else {
            tracing::debug!(user_id = %user_id, "No payout destination on file");
            return Ok(None);
        };

        let available: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE((SELECT SUM(commission_amount) FROM clicks
                             WHERE user_id = $1 AND status = 'confirmed'), 0)
                 - COALESCE((SELECT SUM(amount) FROM payouts
                             WHERE user_id = $1), 0)
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to aggregate available earnings")?;

        if !is_payout_eligible(available, self.payout_threshold) {
            return Ok(None);
        }

        let payout: Payout = sqlx::query_as(
            r#"
            INSERT INTO payouts (id, user_id, amount, upi_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(available)
        .bind(&upi_id)
        .bind(PayoutStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to create payout record")?;

        tx.commit()
            .await
            .context("Failed to commit payout transaction")?;

        tracing::info!(
            user_id = %user_id,
            payout_id = %payout.id,
            amount = %payout.amount,
            "Payout created"
        );

        Ok(Some(payout.id))
    }

    /// Fetch a click by id
    pub async fn get_click(&self, id: Uuid) -> Result<Option<Click>> {
        let click = sqlx::query_as::<_, Click>("SELECT * FROM clicks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(click)
    }

    async fn commission_for(&self, click: &Click) -> Result<f64> {
        let app: App = sqlx::query_as("SELECT * FROM apps WHERE id = $1")
            .bind(click.app_id)
            .fetch_one(&self.db_pool)
            .await
            .context("App for click not found")?;

        Ok(commission_for_app(&app, click.is_my_referral))
    }
}

/// Review fields for a status transition
///
/// Confirmed: keep a previously stored amount and the original
/// confirmation timestamp (idempotent re-confirm); otherwise take the
/// freshly computed amount and stamp `now`. Rejected and re-opened clicks
/// clear the timestamp; any recorded amount stays on the row for audit and
/// is excluded from aggregation by the status filter.
pub fn review_transition(
    click: &Click,
    new_status: ClickStatus,
    fresh_amount: Option<f64>,
    now: DateTime<Utc>,
) -> (Option<DateTime<Utc>>, Option<f64>) {
    match new_status {
        ClickStatus::Confirmed => {
            let amount = click.commission_amount.or(fresh_amount);
            let at = if click.status == ClickStatus::Confirmed {
                click.confirmed_at
            } else {
                Some(now)
            };
            (at, amount)
        }
        ClickStatus::Rejected | ClickStatus::Pending => (None, click.commission_amount),
    }
}

/// Eligibility rule, kept pure for testability: balance at or above the
/// threshold (destination presence is checked by the caller)
pub fn is_payout_eligible(available: f64, threshold: f64) -> bool {
    available >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_click() -> Click {
        Click {
            id: Uuid::new_v4(),
            app_id: Uuid::new_v4(),
            user_id: Some(Uuid::new_v4()),
            anonymous_id: None,
            utm_source: "organic".to_string(),
            utm_medium: "web".to_string(),
            utm_campaign: "referral".to_string(),
            is_my_referral: false,
            status: ClickStatus::Pending,
            clicked_at: Utc::now(),
            confirmed_at: None,
            commission_amount: None,
        }
    }

    fn confirmed_click(amount: f64) -> Click {
        let mut click = pending_click();
        click.status = ClickStatus::Confirmed;
        click.confirmed_at = Some(Utc::now() - chrono::Duration::hours(2));
        click.commission_amount = Some(amount);
        click
    }

    #[test]
    fn test_first_confirmation_stamps_now_and_takes_fresh_amount() {
        let click = pending_click();
        let now = Utc::now();

        let (at, amount) = review_transition(&click, ClickStatus::Confirmed, Some(60.0), now);
        assert_eq!(at, Some(now));
        assert_eq!(amount, Some(60.0));
    }

    #[test]
    fn test_reconfirm_keeps_stored_amount_and_timestamp() {
        let click = confirmed_click(500.0);
        let original_at = click.confirmed_at;

        // A fresh amount is never computed for a re-confirm; even if one
        // were passed, the stored amount wins.
        let (at, amount) = review_transition(&click, ClickStatus::Confirmed, Some(999.0), Utc::now());
        assert_eq!(at, original_at);
        assert_eq!(amount, Some(500.0));
    }

    #[test]
    fn test_reject_clears_timestamp_keeps_amount_for_audit() {
        let click = confirmed_click(500.0);

        let (at, amount) = review_transition(&click, ClickStatus::Rejected, None, Utc::now());
        assert_eq!(at, None);
        assert_eq!(amount, Some(500.0));
    }

    #[test]
    fn test_reopen_clears_timestamp_keeps_amount() {
        let click = confirmed_click(500.0);

        let (at, amount) = review_transition(&click, ClickStatus::Pending, None, Utc::now());
        assert_eq!(at, None);
        assert_eq!(amount, Some(500.0));
    }

    #[test]
    fn test_confirmed_at_present_iff_confirmed() {
        let now = Utc::now();
        for status in [
            ClickStatus::Pending,
            ClickStatus::Confirmed,
            ClickStatus::Rejected,
        ] {
            let (at, _) = review_transition(&pending_click(), status, Some(10.0), now);
            assert_eq!(at.is_some(), status == ClickStatus::Confirmed);
        }
    }

    #[test]
    fn test_eligible_at_threshold() {
        assert!(is_payout_eligible(100.0, 100.0));
        assert!(is_payout_eligible(110.0, 100.0));
    }

    #[test]
    fn test_not_eligible_below_threshold() {
        assert!(!is_payout_eligible(99.99, 100.0));
        assert!(!is_payout_eligible(0.0, 100.0));
    }

    #[test]
    fn test_paid_out_balance_not_re_eligible() {
        // Confirmed 150, already paid 150: nothing available
        let available = 150.0 - 150.0;
        assert!(!is_payout_eligible(available, 100.0));

        // Further confirmations accrue from zero again
        let available = (150.0 + 70.0) - 150.0;
        assert!(!is_payout_eligible(available, 100.0));
        let available = (150.0 + 70.0 + 40.0) - 150.0;
        assert!(is_payout_eligible(available, 100.0));
    }
}
