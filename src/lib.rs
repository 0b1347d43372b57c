//! Referral rewards backend library
//!
//! Exports the core modules for the earnlink backend server: the click
//! ledger, attribution resolver, reward lifecycle, payout issuance, and the
//! HTTP surface around them.

pub mod apps;
pub mod attribution;
pub mod auth;
pub mod clicks;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod profile;
pub mod rewards;
pub mod routes;
pub mod state;
pub mod submissions;
pub mod upi;
