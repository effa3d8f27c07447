//! Dataset quality profiling.
//!
//! - per-cell classification and per-column majority vote (`infer`)
//! - the aggregate quality report handed back to the uploader (`report`)

pub mod infer;
pub mod report;

pub use infer::*;
pub use report::*;
