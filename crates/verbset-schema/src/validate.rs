//! # Schema Validation
//!
//! Runtime validation of data records against JSON Schema definitions
//! (Draft 2020-12).
//!
//! ## Schema Resolution
//!
//! Schemas may reference each other with `$ref`, either by their `$id` or by
//! a bare or relative filename. [`LocalSchemaRetriever`] resolves all of
//! these against the documents loaded from `schemas/`. Internal references
//! of the form `#/$defs/<name>` are resolved by the jsonschema crate.
//!
//! ## Determinism
//!
//! The jsonschema crate yields violations in evaluation order, which
//! depends on keyword ordering inside the schema. Violations are therefore
//! sorted by their rendered text before they become issues.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use verbset_core::{DataFile, DatasetLayout, Issue, Location};

/// Suffix identifying schema documents in the schema directory.
const SCHEMA_SUFFIX: &str = ".schema.json";

/// Resolves `$ref` URIs to schemas loaded in memory.
///
/// Prevents the jsonschema crate from making network requests for
/// cross-schema references.
struct LocalSchemaRetriever {
    /// Map from URI or filename to schema value.
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Relative refs arrive resolved against the default base URI; the
        // last path segment is the filename we registered.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        tracing::debug!(uri = uri_str, "unresolved $ref, substituting permissive schema");
        Ok(serde_json::json!({}))
    }
}

/// Error while loading or compiling the schema contracts.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// One or more required schema files do not exist.
    #[error("{} required schema file(s) not found", paths.len())]
    Missing {
        /// Paths of every missing schema, in [`DataFile::ALL`] order.
        paths: Vec<PathBuf>,
    },

    /// A schema file could not be read.
    #[error("cannot read schema '{}': {source}", path.display())]
    Unreadable {
        /// Path of the schema file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// A schema file is not valid JSON.
    #[error("schema '{}' is not valid JSON: {source}", path.display())]
    InvalidJson {
        /// Path of the schema file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },

    /// A schema parsed as JSON but is not a valid Draft 2020-12 schema.
    #[error("schema '{schema_name}' failed to compile: {reason}")]
    Build {
        /// Schema filename.
        schema_name: String,
        /// Compiler message.
        reason: String,
    },

    /// IO error listing the schema directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    /// Paths of missing schemas, if this is a [`SchemaError::Missing`].
    pub fn missing_paths(&self) -> Option<&[PathBuf]> {
        match self {
            Self::Missing { paths } => Some(paths),
            _ => None,
        }
    }

    /// One ERROR issue per missing schema file.
    ///
    /// Returns an empty vector for every other variant.
    pub fn missing_issues(&self) -> Vec<Issue> {
        self.missing_paths()
            .unwrap_or_default()
            .iter()
            .map(|path| Issue::error(Location::file(path), "Schema file not found."))
            .collect()
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    /// JSON Pointer to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer to the keyword in the schema that failed.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Compiled validator for one data file.
pub struct SchemaChecker {
    file: DataFile,
    validator: Validator,
}

impl fmt::Debug for SchemaChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaChecker").field("file", &self.file).finish()
    }
}

impl SchemaChecker {
    /// Compile `schema` as the contract for `file`.
    ///
    /// `resources` maps URIs and filenames to the other schema documents so
    /// that cross-schema `$ref`s resolve locally.
    fn compile(
        file: DataFile,
        schema: &Value,
        resources: HashMap<String, Value>,
    ) -> Result<Self, SchemaError> {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        opts.with_retriever(LocalSchemaRetriever {
            schemas_by_uri: resources,
        });

        let validator = opts.build(schema).map_err(|e| SchemaError::Build {
            schema_name: file.schema_file_name().to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { file, validator })
    }

    /// The data file this checker validates.
    pub fn file(&self) -> DataFile {
        self.file
    }

    /// Returns true if `instance` satisfies the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Every violation in `instance`, sorted by rendered text.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        violations.sort_by_cached_key(|v| v.to_string());
        violations
    }

    /// Check `instance` and return one ERROR issue per violation, all
    /// located at `location`.
    pub fn check(&self, instance: &Value, location: &Location) -> Vec<Issue> {
        if self.is_valid(instance) {
            return Vec::new();
        }
        self.violations(instance)
            .into_iter()
            .map(|v| Issue::error(location.clone(), v.to_string()))
            .collect()
    }
}

/// The four compiled schema contracts of a dataset.
#[derive(Debug)]
pub struct SchemaRegistry {
    schema_dir: PathBuf,
    checkers: BTreeMap<DataFile, SchemaChecker>,
}

impl SchemaRegistry {
    /// Load and compile the contracts for every [`DataFile`].
    ///
    /// All four schema paths are checked first; if any is missing the
    /// registry is not built and [`SchemaError::Missing`] lists every
    /// missing path. Other `*.schema.json` files in the directory are loaded
    /// too, so the contracts may `$ref` shared definitions.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Missing`] if a contract is absent,
    /// [`SchemaError::Unreadable`] or [`SchemaError::InvalidJson`] if a schema
    /// document cannot be parsed, and [`SchemaError::Build`] if a contract is
    /// not a valid schema.
    pub fn load(layout: &DatasetLayout) -> Result<Self, SchemaError> {
        let missing: Vec<PathBuf> = DataFile::ALL
            .iter()
            .map(|file| layout.schema_path(*file))
            .filter(|path| !path.is_file())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::Missing { paths: missing });
        }

        let schema_dir = layout.schemas_dir();
        let documents = load_schema_documents(&schema_dir)?;
        let resources = resource_map(&documents);

        let mut checkers = BTreeMap::new();
        for file in DataFile::ALL {
            let name = file.schema_file_name();
            let schema = match documents.get(name) {
                Some(schema) => schema.clone(),
                // Listed above as present; re-read in case the directory
                // scan skipped it (e.g. a symlink).
                None => read_schema(&layout.schema_path(file))?,
            };
            let checker = SchemaChecker::compile(file, &schema, resources.clone())?;
            tracing::debug!(schema = name, "compiled schema contract");
            checkers.insert(file, checker);
        }

        tracing::info!(
            schema_dir = %schema_dir.display(),
            documents = documents.len(),
            "loaded schema registry"
        );

        Ok(Self {
            schema_dir,
            checkers,
        })
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// The compiled checker for `file`.
    ///
    /// Always present once the registry is loaded.
    pub fn checker(&self, file: DataFile) -> Option<&SchemaChecker> {
        self.checkers.get(&file)
    }

    /// Check `instance` against the contract for `file`.
    pub fn check(&self, file: DataFile, instance: &Value, location: &Location) -> Vec<Issue> {
        self.checker(file)
            .map(|checker| checker.check(instance, location))
            .unwrap_or_default()
    }
}

/// Parse one schema file.
fn read_schema(path: &Path) -> Result<Value, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SchemaError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every `*.schema.json` file directly under `dir`, keyed by filename.
fn load_schema_documents(dir: &Path) -> Result<BTreeMap<String, Value>, SchemaError> {
    let mut documents = BTreeMap::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(SCHEMA_SUFFIX) && path.is_file() {
            documents.insert(name.to_string(), read_schema(&path)?);
        }
    }
    Ok(documents)
}

/// Register each schema by bare filename and by its own `$id`.
fn resource_map(documents: &BTreeMap<String, Value>) -> HashMap<String, Value> {
    let mut by_uri = HashMap::new();
    for (filename, value) in documents {
        by_uri.insert(filename.clone(), value.clone());
        if let Some(id) = value.get("$id").and_then(Value::as_str) {
            by_uri.insert(id.to_string(), value.clone());
        }
    }
    by_uri
}
