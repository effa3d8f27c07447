//! Input/output helpers.
//!
//! - CSV / JSON dataset ingest (`ingest`)
//! - JSON report writing and forecast-response reading (`json`)
//! - CSV exports of series and reorder tables (`export`)

pub mod export;
pub mod ingest;
pub mod json;

pub use export::*;
pub use ingest::*;
pub use json::*;
