//! Commission calculation
//!
//! Pure and deterministic. Malformed rates or bonus values are a
//! data-integrity concern upstream, not handled here.

use crate::models::App;

/// Default-channel rate when an app has none configured
pub const DEFAULT_COMMISSION_RATE: f64 = 0.30;
/// Privileged ("my referral") channel rate when unconfigured
pub const DEFAULT_MY_COMMISSION_RATE: f64 = 0.50;

/// Compute the reward amount for a click, rounded to 2 decimal places
pub fn compute_commission(
    bonus_amount: i64,
    commission_rate: Option<f64>,
    my_commission_rate: Option<f64>,
    is_my_referral: bool,
) -> f64 {
    let rate = if is_my_referral {
        my_commission_rate.unwrap_or(DEFAULT_MY_COMMISSION_RATE)
    } else {
        commission_rate.unwrap_or(DEFAULT_COMMISSION_RATE)
    };

    (bonus_amount as f64 * rate * 100.0).round() / 100.0
}

/// Commission for a click against a catalog entry
pub fn commission_for_app(app: &App, is_my_referral: bool) -> f64 {
    compute_commission(
        app.bonus_amount,
        app.commission_rate,
        app.my_commission_rate,
        is_my_referral,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privileged_channel_rate() {
        // bonus 1000, my rate 0.5 -> 500
        assert_eq!(compute_commission(1000, Some(0.3), Some(0.5), true), 500.0);
    }

    #[test]
    fn test_default_channel_rate() {
        // bonus 200, default 0.30 -> 60
        assert_eq!(compute_commission(200, None, None, false), 60.0);
    }

    #[test]
    fn test_default_privileged_rate() {
        // bonus 200, default my rate 0.50 -> 100
        assert_eq!(compute_commission(200, None, None, true), 100.0);
    }

    #[test]
    fn test_configured_rate_overrides_default() {
        assert_eq!(compute_commission(200, Some(0.25), None, false), 50.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        // 149 * 0.333 = 49.617 -> 49.62
        assert_eq!(compute_commission(149, Some(0.333), None, false), 49.62);
        // 1 * 0.125 = 0.125 -> 0.13
        assert_eq!(compute_commission(1, Some(0.125), None, false), 0.13);
    }

    #[test]
    fn test_deterministic() {
        let a = compute_commission(777, Some(0.42), Some(0.63), true);
        let b = compute_commission(777, Some(0.42), Some(0.63), true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_rate_and_zero_bonus() {
        assert_eq!(compute_commission(500, Some(0.0), None, false), 0.0);
        assert_eq!(compute_commission(0, None, None, true), 0.0);
    }
}
