//! Reward flow tests
//!
//! These exercise the pure parts of the reward pipeline: attribution,
//! commission calculation, status parsing, and payout eligibility
//! arithmetic. Storage-backed paths are covered by their service layers.

use std::str::FromStr;

use earnlink_server::attribution::{self, UtmQuery};
use earnlink_server::models::ClickStatus;
use earnlink_server::rewards::{compute_commission, is_payout_eligible};
use uuid::Uuid;

// ============================================================================
// Attribution
// ============================================================================

#[test]
fn test_anonymous_click_gets_anonymous_id_and_defaults() {
    let resolved = attribution::resolve(None, &UtmQuery::default(), None);
    let attr = &resolved.attribution;

    assert!(attr.user_id.is_none());
    assert!(attr.anonymous_id.is_some());
    assert_eq!(attr.utm_source, "organic");
    assert_eq!(attr.utm_medium, "web");
    assert_eq!(attr.utm_campaign, "referral");
}

#[test]
fn test_authenticated_click_never_carries_anonymous_id() {
    let user_id = Uuid::new_v4();
    let resolved = attribution::resolve(Some(user_id), &UtmQuery::default(), Some("anon_left"));
    let attr = &resolved.attribution;

    assert_eq!(attr.user_id, Some(user_id));
    assert!(attr.anonymous_id.is_none());
}

#[test]
fn test_repeat_visit_reuses_anonymous_id() {
    let first = attribution::resolve(None, &UtmQuery::default(), None);
    let anon = first.attribution.anonymous_id.unwrap();

    let second = attribution::resolve(None, &UtmQuery::default(), Some(&anon));
    assert_eq!(second.attribution.anonymous_id, Some(anon));
    assert!(second.new_anonymous_id.is_none());
}

// ============================================================================
// Commission
// ============================================================================

#[test]
fn test_my_referral_commission() {
    // bonus 1000, my_commission_rate 0.5 -> 500
    assert_eq!(compute_commission(1000, None, Some(0.5), true), 500.0);
}

#[test]
fn test_default_rate_commission() {
    // bonus 200, default rates, not my referral -> 60 (0.30 rate)
    assert_eq!(compute_commission(200, None, None, false), 60.0);
}

#[test]
fn test_commission_is_deterministic() {
    for _ in 0..3 {
        assert_eq!(compute_commission(350, Some(0.2), Some(0.4), false), 70.0);
        assert_eq!(compute_commission(350, Some(0.2), Some(0.4), true), 140.0);
    }
}

// ============================================================================
// Review status boundary
// ============================================================================

#[test]
fn test_review_accepts_only_known_statuses() {
    assert!(ClickStatus::from_str("pending").is_ok());
    assert!(ClickStatus::from_str("confirmed").is_ok());
    assert!(ClickStatus::from_str("rejected").is_ok());

    assert!(ClickStatus::from_str("approved").is_err());
    assert!(ClickStatus::from_str("CONFIRMED").is_err());
    assert!(ClickStatus::from_str("").is_err());
}

// ============================================================================
// Payout eligibility
// ============================================================================

#[test]
fn test_below_threshold_not_eligible() {
    assert!(!is_payout_eligible(40.0, 100.0));
    assert!(!is_payout_eligible(99.99, 100.0));
}

#[test]
fn test_threshold_crossing_after_confirmation() {
    // confirmed_earnings = 40, then a click adding 70 is confirmed
    let confirmed = 40.0 + 70.0;
    assert!(is_payout_eligible(confirmed, 100.0));
}

#[test]
fn test_prior_payouts_reduce_available_balance() {
    // 110 confirmed, 110 already snapshotted into a payout: not eligible
    // again until new confirmations accrue past the threshold.
    let available = 110.0 - 110.0;
    assert!(!is_payout_eligible(available, 100.0));

    let available = (110.0 + 60.0) - 110.0;
    assert!(!is_payout_eligible(available, 100.0));

    let available = (110.0 + 60.0 + 45.0) - 110.0;
    assert!(is_payout_eligible(available, 100.0));
}
