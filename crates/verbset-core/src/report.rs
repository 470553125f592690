//! # Validation Report
//!
//! Partitions the issues of a run by severity, renders the textual report
//! and derives the process exit status.
//!
//! Rendering is deterministic: counts first, then every ERROR, then every
//! WARN, each group in the order the issues were recorded. Two runs over the
//! same input therefore print byte-identical reports.

use std::fmt;

use serde::Serialize;

use crate::issue::{Issue, Severity};

/// Exit status when no ERROR issues were recorded.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status when at least one ERROR issue was recorded.
pub const EXIT_FAILURE: u8 = 1;

/// Final outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    verbs_loaded: Option<usize>,
    issues: Vec<Issue>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    verbs_loaded: Option<usize>,
    error_count: usize,
    warning_count: usize,
    issues: Vec<&'a Issue>,
}

impl ValidationReport {
    /// Build a report.
    ///
    /// `verbs_loaded` is `None` when the run stopped before the verb file
    /// was read.
    pub fn new(issues: Vec<Issue>, verbs_loaded: Option<usize>) -> Self {
        Self {
            verbs_loaded,
            issues,
        }
    }

    /// Number of verb records loaded, if the run got that far.
    pub fn verbs_loaded(&self) -> Option<usize> {
        self.verbs_loaded
    }

    /// All issues in recording order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// ERROR issues in recording order.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.by_severity(Severity::Error)
    }

    /// WARN issues in recording order.
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.by_severity(Severity::Warn)
    }

    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// Number of ERROR issues.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of WARN issues.
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Returns true if no ERROR issue was recorded.
    pub fn is_success(&self) -> bool {
        self.error_count() == 0
    }

    /// Process exit status: failure iff at least one ERROR exists.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let report = JsonReport {
            verbs_loaded: self.verbs_loaded,
            error_count: self.error_count(),
            warning_count: self.warning_count(),
            issues: self.errors().chain(self.warnings()).collect(),
        };
        serde_json::to_string_pretty(&report)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "=== DATA VALIDATION REPORT ===")?;
        if let Some(count) = self.verbs_loaded {
            writeln!(f, "Verbs loaded: {count}")?;
        }
        writeln!(f, "Errors: {}", self.error_count())?;
        writeln!(f, "Warnings: {}", self.warning_count())?;
        writeln!(f)?;

        for issue in self.errors().chain(self.warnings()) {
            writeln!(f, "{issue}")?;
        }

        if self.issues.is_empty() {
            writeln!(f, "All checks passed.")?;
        }
        Ok(())
    }
}
