//! Reward lifecycle: commission calculation, review state machine, payouts

pub mod commission;
mod service;

pub use commission::{commission_for_app, compute_commission};
pub use service::{is_payout_eligible, review_transition, ReviewOutcome, RewardService};
