//! Plain-text terminal reports.
//!
//! Formatting lives in one place so the analytics modules stay free of
//! presentation concerns and output changes stay localized.

pub mod format;

pub use format::*;
