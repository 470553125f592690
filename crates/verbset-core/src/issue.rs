//! # Issue Model
//!
//! An [`Issue`] is one finding about the dataset: a severity, a locator and
//! a message. Issues are produced by every stage of a run and collected in
//! an append-only [`IssueLog`]; nothing ever edits or removes an issue once
//! it has been recorded.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Classification of a finding.
///
/// `Error` means the data is invalid and the run must fail. `Warn` means the
/// data is suspicious but usable; warnings never affect the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Invalid data.
    Error,
    /// Suspicious but usable data.
    Warn,
}

impl Severity {
    /// Upper-case label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so that width specifiers like `{:<5}` apply.
        f.pad(self.as_str())
    }
}

/// Where a finding was made: a file, optionally narrowed to a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Location {
    /// File path as displayed to the user.
    pub file: String,
    /// 1-based line number, for newline-delimited files.
    pub line: Option<usize>,
}

impl Location {
    /// Locate a finding at file granularity.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            file: path.as_ref().display().to_string(),
            line: None,
        }
    }

    /// Locate a finding at a specific line of a file.
    pub fn line(path: impl AsRef<Path>, line: usize) -> Self {
        Self {
            file: path.as_ref().display().to_string(),
            line: Some(line),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => f.write_str(&self.file),
        }
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.to_string()
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Error or warning.
    pub severity: Severity,
    /// File (and line) the finding refers to.
    #[serde(rename = "where")]
    pub location: Location,
    /// Human-readable description.
    pub message: String,
}

impl Issue {
    /// Build an ERROR issue.
    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location,
            message: message.into(),
        }
    }

    /// Build a WARN issue.
    pub fn warn(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            location,
            message: message.into(),
        }
    }

    /// Returns true for ERROR issues.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:<5}] {} - {}", self.severity, self.location, self.message)
    }
}

/// Append-only, ordered collection of issues.
#[derive(Debug, Clone, Default)]
pub struct IssueLog {
    issues: Vec<Issue>,
}

impl IssueLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue.
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Record an ERROR issue.
    pub fn error(&mut self, location: Location, message: impl Into<String>) {
        self.push(Issue::error(location, message));
    }

    /// Record a WARN issue.
    pub fn warn(&mut self, location: Location, message: impl Into<String>) {
        self.push(Issue::warn(location, message));
    }

    /// Returns the number of recorded issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if at least one ERROR has been recorded.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }

    /// Returns all issues in recording order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Issue> {
        self.issues
    }
}

impl Extend<Issue> for IssueLog {
    fn extend<T: IntoIterator<Item = Issue>>(&mut self, iter: T) {
        self.issues.extend(iter);
    }
}
