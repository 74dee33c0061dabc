//! Directory size measurement and human-readable size formatting.
//!
//! The walker here never fails at the type level: anything it cannot read is
//! reported through a callback and simply contributes nothing to the total.

use std::{
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

/// Unit labels used by [`format_size`], in ascending order of magnitude.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Step between two consecutive units.
const UNIT_STEP: f64 = 1024.0;

/// A filesystem entry that could not be read while measuring a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkIssue {
    /// The path the failure was reported for.
    pub path: PathBuf,

    /// The underlying error message.
    pub message: String,
}

impl WalkIssue {
    /// Build an issue from a `walkdir` error, falling back to `root` when the
    /// error carries no path of its own.
    fn from_walkdir(err: &walkdir::Error, root: &Path) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        let message = err
            .io_error()
            .map_or_else(|| err.to_string(), ToString::to_string);

        Self { path, message }
    }
}

impl Display for WalkIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// The outcome of measuring one directory tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirMeasurement {
    /// Total size of all regular files found, in bytes.
    pub size: u64,

    /// Entries that could not be read, in the order they were met.
    pub issues: Vec<WalkIssue>,
}

/// Calculate the total size of a directory and all its contents, in bytes.
///
/// Regular files contribute their length, directories are descended into and
/// every other kind of entry (sockets, fifos) is skipped. Symlinks are
/// followed: a link to a file counts the target's size and a link to a
/// directory is walked. A dangling link or a link loop is reported as an
/// issue instead.
///
/// Every entry that cannot be listed or stat-ed is handed to `on_error` and
/// the walk carries on with the remaining entries. An unreadable directory
/// therefore only drops its own subtree from the total. A missing `path`
/// yields `0` and a single issue.
pub fn calculate_dir_size_with<F>(path: &Path, mut on_error: F) -> u64
where
    F: FnMut(WalkIssue),
{
    let mut total = 0u64;

    for entry in WalkDir::new(path).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => match entry.metadata() {
                Ok(metadata) => total = total.saturating_add(metadata.len()),
                Err(err) => on_error(WalkIssue::from_walkdir(&err, path)),
            },
            Ok(_) => {}
            Err(err) => on_error(WalkIssue::from_walkdir(&err, path)),
        }
    }

    total
}

/// Calculate the total size of a directory, discarding any read failures.
///
/// See [`calculate_dir_size_with`] for the traversal rules.
#[must_use]
pub fn calculate_dir_size(path: &Path) -> u64 {
    calculate_dir_size_with(path, |_| {})
}

/// Measure a directory and keep the read failures alongside the size.
///
/// Useful when the measurement runs on a worker thread and the diagnostics
/// have to be reported later, in a deterministic order.
#[must_use]
pub fn measure_dir(path: &Path) -> DirMeasurement {
    let mut issues = Vec::new();
    let size = calculate_dir_size_with(path, |issue| issues.push(issue));

    DirMeasurement { size, issues }
}

/// Format a byte count as a human-readable string using binary steps.
///
/// The value is divided by 1024 until it drops below 1024 or the largest
/// unit (TB) is reached, then printed with exactly two decimals followed by
/// the unit label.
///
/// # Examples
///
/// ```
/// # use sizr::utils::format_size;
/// assert_eq!(format_size(512), "512.00 B");
/// assert_eq!(format_size(3_407_872), "3.25 MB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= UNIT_STEP && unit_index < UNITS.len() - 1 {
        size /= UNIT_STEP;
        unit_index += 1;
    }

    format!("{size:.2} {}", UNITS[unit_index])
}
