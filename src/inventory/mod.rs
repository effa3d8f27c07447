//! Inventory analytics: per-product demand statistics and reorder points.

pub mod rop;

pub use rop::*;
