//! Structured JSON output for scripting and piping.
//!
//! When the `--json` flag is passed, these structures are serialized to
//! stdout as a single JSON object, replacing the colored table.
//! Diagnostics keep going to stderr.

use serde::Serialize;

use crate::{
    package::{Package, SeverityTier},
    report::ReportSummary,
    utils::format_size,
};

/// Top-level JSON output emitted when `--json` is active.
#[derive(Serialize, Debug)]
pub struct JsonReport {
    /// Measured packages, in report order.
    pub packages: Vec<JsonPackageEntry>,

    /// Aggregated totals.
    pub summary: JsonSummary,
}

/// A single package entry in the JSON output.
#[derive(Serialize, Debug)]
pub struct JsonPackageEntry {
    /// Package name.
    pub name: String,

    /// Declared version constraint.
    pub version: String,

    /// Install directory that was measured.
    pub path: String,

    /// Size in bytes.
    pub size: u64,

    /// Human-readable size (e.g. `"2.00 KB"`).
    pub size_formatted: String,

    /// Size tier (`"small"`, `"medium"` or `"large"`).
    pub tier: SeverityTier,
}

/// Totals across all reported packages.
#[derive(Serialize, Debug)]
pub struct JsonSummary {
    /// Number of packages reported.
    pub total_packages: usize,

    /// Total size in bytes.
    pub total_size: u64,

    /// Human-readable total size.
    pub total_size_formatted: String,

    /// Number of dependencies skipped because of an error.
    pub failed: usize,
}

impl JsonReport {
    /// Build the JSON report from a finished run.
    #[must_use]
    pub fn from_summary(summary: &ReportSummary) -> Self {
        Self {
            packages: summary
                .packages
                .as_slice()
                .iter()
                .map(JsonPackageEntry::from_package)
                .collect(),
            summary: JsonSummary {
                total_packages: summary.packages.len(),
                total_size: summary.total_size,
                total_size_formatted: format_size(summary.total_size),
                failed: summary.failed,
            },
        }
    }
}

impl JsonPackageEntry {
    /// Convert a `Package` into a `JsonPackageEntry`.
    #[must_use]
    pub fn from_package(package: &Package) -> Self {
        Self {
            name: package.name.clone(),
            version: package.version.clone(),
            path: package.path.display().to_string(),
            size: package.size,
            size_formatted: package.formatted_size(),
            tier: package.tier(),
        }
    }
}
