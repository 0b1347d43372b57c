//! Route definitions for the API

mod admin;
mod apps;
mod clicks;
mod profile;
mod submissions;

pub use admin::admin_routes;
pub use apps::app_routes;
pub use clicks::click_routes;
pub use profile::profile_routes;
pub use submissions::submission_routes;
