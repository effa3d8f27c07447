//! `demand-desk` library crate.
//!
//! The binary (`demand`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the analytics (`quality`, `inventory`, `series`, `forecast`) stay free of
//!   CLI and file-format concerns
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod inventory;
pub mod io;
pub mod policy;
pub mod quality;
pub mod report;
pub mod series;
