//! A single measured dependency.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

use thiserror::Error;

use crate::{
    manifest::DependencySpec,
    utils::{WalkIssue, format_size, measure_dir},
};

use super::SeverityTier;

/// Width of the package name column in a report line.
pub const NAME_WIDTH: usize = 30;

/// Width of the right-aligned size column in a report line.
pub const SIZE_WIDTH: usize = 10;

/// Failure while handling one dependency. Never aborts the whole report.
#[derive(Error, Debug)]
pub enum PackageError {
    /// The name cannot be joined onto the modules directory safely.
    #[error("{reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The report line could not be written.
    #[error("failed to write report line: {source}")]
    Output {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl PackageError {
    /// Name of the dependency the failure belongs to.
    #[must_use]
    pub fn package_name(&self) -> &str {
        match self {
            Self::InvalidName { name, .. } | Self::Output { name, .. } => name,
        }
    }
}

/// A dependency together with the measured size of its install directory.
#[derive(Clone, Debug)]
pub struct Package {
    /// Package name as declared in the manifest.
    pub name: String,

    /// Version constraint as declared in the manifest. Not used for display.
    pub version: String,

    /// Directory the package is expected to be installed in.
    pub path: PathBuf,

    /// Total size of `path` in bytes. Zero if it could not be read.
    pub size: u64,

    /// Read failures met while measuring `path`.
    pub issues: Vec<WalkIssue>,
}

impl Package {
    /// Resolve the install directory of `spec` under `modules_dir` and measure it.
    ///
    /// A missing install directory is not an error here: it measures as zero
    /// and leaves a [`WalkIssue`] behind.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::InvalidName`] if the name would resolve
    /// outside of `modules_dir`.
    pub fn measure(spec: DependencySpec, modules_dir: &Path) -> Result<Self, PackageError> {
        let path = install_path(modules_dir, &spec.name)?;
        let measurement = measure_dir(&path);

        Ok(Self {
            name: spec.name,
            version: spec.version,
            path,
            size: measurement.size,
            issues: measurement.issues,
        })
    }

    /// Size tier of this package.
    #[must_use]
    pub const fn tier(&self) -> SeverityTier {
        SeverityTier::from_size(self.size)
    }

    /// Human-readable size, e.g. `"2.00 KB"`.
    #[must_use]
    pub fn formatted_size(&self) -> String {
        format_size(self.size)
    }

    /// The uncolored report line: name padded to [`NAME_WIDTH`], a space,
    /// then the size right-aligned in [`SIZE_WIDTH`] columns.
    ///
    /// Longer names are not cut; they push the size column to the right.
    #[must_use]
    pub fn report_line(&self) -> String {
        format!(
            "{:<NAME_WIDTH$} {:>SIZE_WIDTH$}",
            self.name,
            self.formatted_size()
        )
    }
}

/// Join a package name onto the modules directory.
///
/// Scoped names such as `@types/node` are fine. Empty names, absolute
/// paths and anything containing `..` are rejected.
///
/// # Errors
///
/// Returns [`PackageError::InvalidName`] describing why the name was refused.
pub fn install_path(modules_dir: &Path, name: &str) -> Result<PathBuf, PackageError> {
    let invalid = |reason| PackageError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("package name is empty"));
    }

    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => {}
            Component::CurDir => return Err(invalid("package name contains '.'")),
            Component::ParentDir => return Err(invalid("package name contains '..'")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("package name is an absolute path"));
            }
        }
    }

    Ok(modules_dir.join(name))
}
