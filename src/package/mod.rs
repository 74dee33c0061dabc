//! Measured dependencies and their display classification.
//!
//! ## Main Parts
//!
//! - [`Package`] - A declared dependency with the measured size of its install directory
//! - [`Packages`] - An ordered collection of packages, measured in parallel
//! - [`SeverityTier`] - Small / Medium / Large size buckets used for coloring
//! - [`PackageError`] - Per-dependency failures that skip one line of the report

#[allow(clippy::module_inception)]
// This is acceptable as it is the main module for package handling
pub mod package;
pub mod packages;
pub mod tier;

pub use package::{NAME_WIDTH, Package, PackageError, SIZE_WIDTH, install_path};
pub use packages::Packages;
pub use tier::SeverityTier;
