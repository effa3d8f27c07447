//! Domain types shared across the pipeline.
//!
//! This module defines:
//!
//! - the tabular dataset model (`Row`, `Dataset`, `DatasetId`)
//! - the semantic column types produced by type inference (`SemanticType`)
//! - the fixed upstream column names (`columns`)

pub mod types;

pub use types::*;
