//! Reading the dependency manifest (`package.json`).
//!
//! Only two top-level fields matter: `dependencies` and `devDependencies`.
//! Both are optional objects mapping a package name to a version string.
//! Everything else in the file is ignored. Shapes are checked here, at the
//! parse boundary, so that a malformed manifest surfaces as a
//! [`ManifestError`] instead of odd values further down the pipeline.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the manifest file looked up in the project directory.
pub const MANIFEST_FILE: &str = "package.json";

const DEPENDENCIES_FIELD: &str = "dependencies";
const DEV_DEPENDENCIES_FIELD: &str = "devDependencies";

/// Errors raised while loading a manifest. All of them are fatal for a report.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file does not exist.
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// The manifest file exists but could not be read.
    #[error("failed to read manifest file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid JSON.
    #[error("failed to parse JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The manifest is valid JSON but a field has the wrong shape.
    #[error("invalid field '{field}' in {path}: {message}")]
    InvalidField {
        path: PathBuf,
        field: String,
        message: String,
    },
}

impl ManifestError {
    fn invalid_field(path: &Path, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            path: path.to_path_buf(),
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A declared dependency: a package name and its (unparsed) version constraint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencySpec {
    /// Package name, also the directory name under `node_modules/`.
    pub name: String,

    /// Version constraint exactly as written in the manifest.
    pub version: String,
}

impl DependencySpec {
    /// Create a new dependency spec.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// The parts of a `package.json` this tool cares about.
///
/// Both lists keep the order in which the entries appear in the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Entries of the `dependencies` object.
    pub dependencies: Vec<DependencySpec>,

    /// Entries of the `devDependencies` object.
    pub dev_dependencies: Vec<DependencySpec>,
}

impl Manifest {
    /// Load and validate the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NotFound`] if the file is missing,
    /// [`ManifestError::Read`] on any other I/O failure and the parse errors
    /// described in [`Manifest::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::from_json_str(&content, path)
    }

    /// Parse manifest content. `path` is only used in error messages.
    ///
    /// A missing or `null` dependency section counts as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] if `content` is not JSON and
    /// [`ManifestError::InvalidField`] if the root is not an object, a
    /// dependency section is not an object or a version is not a string.
    pub fn from_json_str(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let root: Value = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let Value::Object(root) = root else {
            return Err(ManifestError::invalid_field(
                path,
                "<root>",
                "expected a JSON object",
            ));
        };

        Ok(Self {
            dependencies: read_section(&root, DEPENDENCIES_FIELD, path)?,
            dev_dependencies: read_section(&root, DEV_DEPENDENCIES_FIELD, path)?,
        })
    }

    /// All declared dependencies, direct and development, merged into one list.
    ///
    /// See [`merge_dependencies`] for the precedence and ordering rules.
    #[must_use]
    pub fn merged_dependencies(&self) -> Vec<DependencySpec> {
        merge_dependencies(&self.dependencies, &self.dev_dependencies)
    }
}

/// Merge direct and development dependencies into one list.
///
/// Direct entries come first in their own order, followed by development
/// entries whose name was not seen yet. When a name is declared in both,
/// it keeps its direct position but takes the development version.
#[must_use]
pub fn merge_dependencies(
    direct: &[DependencySpec],
    dev: &[DependencySpec],
) -> Vec<DependencySpec> {
    let mut merged = direct.to_vec();

    for spec in dev {
        match merged.iter_mut().find(|existing| existing.name == spec.name) {
            Some(existing) => existing.version.clone_from(&spec.version),
            None => merged.push(spec.clone()),
        }
    }

    merged
}

/// Read one `name -> version` section of the manifest root.
fn read_section(
    root: &Map<String, Value>,
    field: &str,
    path: &Path,
) -> Result<Vec<DependencySpec>, ManifestError> {
    match root.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(name, version)| match version {
                Value::String(version) => Ok(DependencySpec::new(name, version)),
                other => Err(ManifestError::invalid_field(
                    path,
                    format!("{field}.{name}"),
                    format!("expected a version string, found {}", json_type_name(other)),
                )),
            })
            .collect(),
        Some(other) => Err(ManifestError::invalid_field(
            path,
            field,
            format!("expected an object, found {}", json_type_name(other)),
        )),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
