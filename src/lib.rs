//! # sizr
//!
//! Report how much disk space each dependency of a Node.js project takes.
//!
//! `sizr` reads the `dependencies` and `devDependencies` of `package.json`,
//! measures the matching directories under `node_modules/` and prints a
//! size-colored table with a grand total.
//!
//! ## Embedding
//!
//! [`run_report`] runs the report exactly like the binary invoked without
//! arguments. [`Reporter`] accepts [`ReportOptions`] for anything else, and
//! [`Reporter::run_with`] writes to arbitrary streams.
//!
//! ## Main Parts
//!
//! - [`utils::size`] - Directory walking and size formatting
//! - [`manifest`] - Loading and merging the manifest's dependency sections
//! - [`package`] - Measured packages and their size tiers
//! - [`report`] - The report orchestration
//! - [`output`] - JSON rendering of a report

pub mod config;
pub mod manifest;
pub mod output;
pub mod package;
pub mod report;
pub mod utils;

pub use config::{OutputMode, ReportOptions};
pub use report::{ReportSummary, Reporter, run_report};
