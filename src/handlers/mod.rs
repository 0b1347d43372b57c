//! API handlers

pub mod apps;
pub mod clicks;
pub mod profile;
pub mod rewards;
pub mod submissions;
