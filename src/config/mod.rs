//! Runtime configuration of a report.
//!
//! The tool reads no configuration file; options come from the command line
//! or from an embedding program and fall back to [`ReportOptions::default`].

pub mod report;

pub use report::{MODULES_DIR, OutputMode, ReportOptions};
