//! Forecast-response handling.
//!
//! - wire types for the external forecaster's response (`response`)
//! - trend / confidence / next-period derivation (`metrics`)
//! - per-product views combining both (`view`)

pub mod metrics;
pub mod response;
pub mod view;

pub use metrics::*;
pub use response::*;
pub use view::*;
