//! Monthly time-series aggregation and alignment.
//!
//! Actual and forecast records arrive at arbitrary granularity from the
//! forecaster. This module buckets each into calendar-month sums and projects
//! both onto a shared month axis so they can be charted or exported side by
//! side.

pub mod month;
pub mod monthly;

pub use month::*;
pub use monthly::*;
