//! Collection of measured packages.
//!
//! Measuring is the only expensive step of a report, and every dependency is
//! independent of the others, so it runs on the rayon pool. Results keep the
//! order of the input list.

use std::path::Path;

use rayon::prelude::*;

use crate::manifest::DependencySpec;

use super::{Package, PackageError};

/// An ordered collection of measured packages.
#[derive(Debug, Default)]
pub struct Packages(Vec<Package>);

impl From<Vec<Package>> for Packages {
    fn from(packages: Vec<Package>) -> Self {
        Self(packages)
    }
}

impl Packages {
    /// Measure every dependency in parallel.
    ///
    /// The returned vector has exactly one entry per spec, in the same order
    /// as `specs`, so callers can report in a deterministic sequence no
    /// matter how the work was scheduled.
    #[must_use]
    pub fn measure_all(
        specs: Vec<DependencySpec>,
        modules_dir: &Path,
    ) -> Vec<Result<Package, PackageError>> {
        specs
            .into_par_iter()
            .map(|spec| Package::measure(spec, modules_dir))
            .collect()
    }

    /// Append a package to the collection.
    pub fn push(&mut self, package: Package) {
        self.0.push(package);
    }

    /// Sum of the sizes of all packages in the collection.
    #[must_use]
    pub fn get_total_size(&self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |total, package| total.saturating_add(package.size))
    }

    /// Number of packages in the collection.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The packages as a slice, in report order.
    #[must_use]
    pub fn as_slice(&self) -> &[Package] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_measure_all_keeps_order() {
        let tmp = TempDir::new().unwrap();
        let names = ["zeta", "alpha", "../escape", "mid", "missing"];
        for (i, name) in ["zeta", "alpha", "mid"].iter().enumerate() {
            let dir = tmp.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("index.js"), vec![b'x'; (i + 1) * 100]).unwrap();
        }

        let specs = names
            .iter()
            .map(|name| DependencySpec::new(*name, "1.0.0"))
            .collect();
        let results = Packages::measure_all(specs, tmp.path());

        assert_eq!(results.len(), names.len());
        assert_eq!(results[0].as_ref().unwrap().size, 100);
        assert_eq!(results[1].as_ref().unwrap().size, 200);
        assert_eq!(results[2].as_ref().unwrap_err().package_name(), "../escape");
        assert_eq!(results[3].as_ref().unwrap().size, 300);
        assert_eq!(results[4].as_ref().unwrap().size, 0);
    }

    #[test]
    fn test_total_size() {
        let tmp = TempDir::new().unwrap();
        let mut packages = Packages::default();
        assert!(packages.is_empty());

        for spec in [DependencySpec::new("a", "1"), DependencySpec::new("b", "1")] {
            let dir = tmp.path().join(&spec.name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("f"), vec![b'x'; 512]).unwrap();
            packages.push(Package::measure(spec, tmp.path()).unwrap());
        }

        assert_eq!(packages.len(), 2);
        assert_eq!(packages.get_total_size(), 1024);
        assert_eq!(packages.as_slice()[1].name, "b");
    }
}
