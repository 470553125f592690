//! # Record Loader
//!
//! Reads the data files into memory. JSON documents are parsed whole;
//! newline-delimited files are parsed line by line.
//!
//! Loading never fails. A missing or unreadable file becomes one ERROR
//! issue and an empty result. A malformed line becomes one ERROR issue at
//! `file:line` and is skipped; the remaining lines still load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use verbset_core::{DatasetError, Issue, Location};

/// One parsed line of a newline-delimited file.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    /// 1-based line number in the source file.
    pub line: usize,
    /// Parsed JSON value.
    pub value: Value,
}

/// Result of loading a file: the data that could be read plus the issues
/// found while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    /// Parsed content.
    pub data: T,
    /// Syntax and IO findings, in file order.
    pub issues: Vec<Issue>,
}

fn open(path: &Path) -> Result<File, DatasetError> {
    File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DatasetError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DatasetError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn read_document(path: &Path) -> Result<Value, DatasetError> {
    let file = open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            DatasetError::Unreadable {
                path: path.to_path_buf(),
                source: source.into(),
            }
        } else {
            DatasetError::InvalidJson {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Load a single JSON document.
///
/// Returns `None` as data when the file is missing, unreadable, or not
/// valid JSON; the reason is the single issue in the result.
pub fn load_document(path: &Path) -> Loaded<Option<Value>> {
    match read_document(path) {
        Ok(value) => {
            tracing::debug!(path = %path.display(), "loaded document");
            Loaded {
                data: Some(value),
                issues: Vec::new(),
            }
        }
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "document not loaded");
            Loaded {
                data: None,
                issues: vec![Issue::error(Location::file(path), err.to_string())],
            }
        }
    }
}

/// Load a newline-delimited JSON file.
///
/// Blank lines are ignored. Each remaining line must hold one JSON value.
pub fn load_records(path: &Path) -> Loaded<Vec<LineRecord>> {
    let mut records = Vec::new();
    let mut issues = Vec::new();

    let file = match open(path) {
        Ok(file) => file,
        Err(err) => {
            issues.push(Issue::error(Location::file(path), err.to_string()));
            return Loaded {
                data: records,
                issues,
            };
        }
    };

    for (index, chunk) in BufReader::new(file).split(b'\n').enumerate() {
        let line = index + 1;
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(source) => {
                let err = DatasetError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                };
                issues.push(Issue::error(Location::line(path, line), err.to_string()));
                break;
            }
        };

        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text.trim(),
            Err(source) => {
                let err = DatasetError::InvalidUtf8 {
                    path: path.to_path_buf(),
                    source,
                };
                issues.push(Issue::error(Location::line(path, line), err.to_string()));
                continue;
            }
        };
        if text.is_empty() {
            continue;
        }

        match serde_json::from_str(text) {
            Ok(value) => records.push(LineRecord { line, value }),
            Err(source) => {
                let err = DatasetError::InvalidJson {
                    path: path.to_path_buf(),
                    source,
                };
                issues.push(Issue::error(Location::line(path, line), err.to_string()));
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        records = records.len(),
        malformed = issues.len(),
        "loaded line-delimited records"
    );

    Loaded {
        data: records,
        issues,
    }
}
