//! # Dataset Layout
//!
//! A project root holds a `schemas/` directory with one schema per data
//! file and a `data/` directory with the four data files. [`DataFile`]
//! enumerates those files; [`DatasetLayout`] resolves them against a root.

use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the schema directory under the project root.
pub const SCHEMAS_DIR: &str = "schemas";

/// Name of the data directory under the project root.
pub const DATA_DIR: &str = "data";

/// One of the four validated data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataFile {
    /// Verb records, one JSON object per line.
    Verbs,
    /// Conjugation templates, a JSON array.
    ConjugationTemplates,
    /// Verb exception lists, a JSON object.
    Exceptions,
    /// Example sentences, a JSON object.
    ExampleSentences,
}

impl DataFile {
    /// All data files, in validation order.
    pub const ALL: [DataFile; 4] = [
        DataFile::Verbs,
        DataFile::ConjugationTemplates,
        DataFile::Exceptions,
        DataFile::ExampleSentences,
    ];

    /// File name of the schema governing this data file.
    pub fn schema_file_name(&self) -> &'static str {
        match self {
            Self::Verbs => "verbs.schema.json",
            Self::ConjugationTemplates => "conjugation_templates.schema.json",
            Self::Exceptions => "exceptions.schema.json",
            Self::ExampleSentences => "example_sentences.schema.json",
        }
    }

    /// Path of the data file relative to the data directory.
    pub fn data_relative_path(&self) -> &'static str {
        match self {
            Self::Verbs => "verbs/verbs.v2.jsonl",
            Self::ConjugationTemplates => "conjugations/conjugation_templates.v2.json",
            Self::Exceptions => "exceptions/verb_exceptions.v1.json",
            Self::ExampleSentences => "ui_text/example_sentences.v3.json",
        }
    }

    /// Returns true for newline-delimited files.
    pub fn is_line_delimited(&self) -> bool {
        matches!(self, Self::Verbs)
    }

    /// Short name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verbs => "verbs",
            Self::ConjugationTemplates => "conjugation_templates",
            Self::Exceptions => "exceptions",
            Self::ExampleSentences => "example_sentences",
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves schema and data paths against a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the schema directory.
    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join(SCHEMAS_DIR)
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// Path of the schema for `file`.
    pub fn schema_path(&self, file: DataFile) -> PathBuf {
        self.schemas_dir().join(file.schema_file_name())
    }

    /// Path of the data file `file`.
    pub fn data_path(&self, file: DataFile) -> PathBuf {
        self.data_dir().join(file.data_relative_path())
    }

    /// Returns true if the root holds both `schemas/` and `data/`.
    pub fn is_project_root(path: &Path) -> bool {
        path.join(SCHEMAS_DIR).is_dir() && path.join(DATA_DIR).is_dir()
    }
}
