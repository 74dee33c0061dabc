//! Options that control a single report run.

use std::path::PathBuf;

use crate::manifest::MANIFEST_FILE;

/// Directory, relative to the project root, that packages are installed into.
pub const MODULES_DIR: &str = "node_modules";

/// How the report is rendered on the output stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Table tinted by size tier. `NO_COLOR` is still honored.
    #[default]
    Colored,

    /// Same table without any escape sequences.
    Plain,

    /// A single JSON document.
    Json,
}

/// Configuration for a report run.
///
/// [`ReportOptions::default`] reproduces the plain invocation: `package.json`
/// and `node_modules/` in the current directory, colored output and one
/// worker per CPU core.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    /// Project directory. Empty means the current working directory.
    pub root: PathBuf,

    /// Manifest file name, relative to `root`.
    pub manifest: PathBuf,

    /// Install directory, relative to `root`.
    pub modules_dir: PathBuf,

    /// Output rendering.
    pub output: OutputMode,

    /// Number of threads used to measure packages (0 = default)
    pub threads: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            manifest: PathBuf::from(MANIFEST_FILE),
            modules_dir: PathBuf::from(MODULES_DIR),
            output: OutputMode::default(),
            threads: 0,
        }
    }
}

impl ReportOptions {
    /// Full path of the manifest file.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    /// Full path of the install directory.
    #[must_use]
    pub fn modules_path(&self) -> PathBuf {
        self.root.join(&self.modules_dir)
    }
}
