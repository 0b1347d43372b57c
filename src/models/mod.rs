//! Data models for the referral rewards backend

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Review status of a tracked referral click
///
/// `Pending` is the sole initial state. Admin review moves a click to
/// `Confirmed` or `Rejected`; re-opening back to `Pending` is allowed and
/// clears the confirmation timestamp.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "click_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClickStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl ClickStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickStatus::Pending => "pending",
            ClickStatus::Confirmed => "confirmed",
            ClickStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ClickStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClickStatus::Pending),
            "confirmed" => Ok(ClickStatus::Confirmed),
            "rejected" => Ok(ClickStatus::Rejected),
            other => Err(format!(
                "Invalid status '{}'. Must be: pending, confirmed, or rejected",
                other
            )),
        }
    }
}

/// One referral-link activation
///
/// Exactly one of `user_id`/`anonymous_id` is set at creation time.
/// `confirmed_at` is non-null iff `status == confirmed`. The row itself is
/// immutable except for the review fields (status, confirmed_at,
/// commission_amount).
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Click {
    pub id: Uuid,
    pub app_id: Uuid,
    pub user_id: Option<Uuid>,
    pub anonymous_id: Option<String>,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub is_my_referral: bool,
    pub status: ClickStatus,
    pub clicked_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub commission_amount: Option<f64>,
}

/// Click joined with app details for the admin review listing
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct ClickWithApp {
    pub id: Uuid,
    pub app_id: Uuid,
    pub user_id: Option<Uuid>,
    pub anonymous_id: Option<String>,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub is_my_referral: bool,
    pub status: ClickStatus,
    pub clicked_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub commission_amount: Option<f64>,
    pub app_name: String,
    pub bonus_amount: i64,
    pub commission_rate: Option<f64>,
    pub my_commission_rate: Option<f64>,
}

/// App catalog category
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "app_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppCategory {
    Payments,
    Gaming,
    Shopping,
    Other,
}

/// Catalog entry for a referred product
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct App {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: AppCategory,
    /// Signup bonus in rupees
    pub bonus_amount: i64,
    /// Default-channel commission rate in [0, 1]; 0.30 when unset
    pub commission_rate: Option<f64>,
    /// Privileged ("my referral") channel rate in [0, 1]; 0.50 when unset
    pub my_commission_rate: Option<f64>,
    pub payout_time: Option<String>,
    pub task_description: Option<String>,
    pub referral_link: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User profile; the id matches the identity provider's user id
///
/// Earnings are not stored here. They are derived live from the clicks and
/// payouts tables, which removes the double-credit hazard on repeated
/// confirmations.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub upi_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payout request status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "payout_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Paid,
    Failed,
}

/// A request to pay out a user's confirmed balance
///
/// Amount and UPI destination are immutable snapshots taken at creation.
/// Actual money movement happens outside this system.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Payout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub upi_id: String,
    pub status: PayoutStatus,
    pub created_at: DateTime<Utc>,
}

/// Review status of a user-proposed referral app
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "submission_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

/// A referral app proposed by a user, pending admin review
///
/// Approval is a manual catalog decision; approving a submission does not
/// create an `App` row automatically.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ReferralSubmission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub app_name: String,
    pub category: AppCategory,
    pub referral_link: String,
    pub bonus_amount: i64,
    pub description: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

/// Live earnings aggregation for a user's dashboard
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EarningsSummary {
    pub total_clicks: i64,
    /// Estimated commission for clicks still awaiting review
    pub pending_earnings: f64,
    /// Confirmed commission not yet snapshotted into a payout
    pub confirmed_earnings: f64,
    /// Lifetime confirmed commission
    pub total_earnings: f64,
    /// Sum of payout snapshots issued so far
    pub paid_out: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_click_status_round_trip() {
        for status in [
            ClickStatus::Pending,
            ClickStatus::Confirmed,
            ClickStatus::Rejected,
        ] {
            assert_eq!(ClickStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_click_status_rejects_unknown() {
        assert!(ClickStatus::from_str("approved").is_err());
        assert!(ClickStatus::from_str("").is_err());
        assert!(ClickStatus::from_str("Confirmed").is_err());
    }

    #[test]
    fn test_click_status_serde_is_lowercase() {
        let json = serde_json::to_string(&ClickStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        let status: ClickStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(status, ClickStatus::Rejected);
    }
}
