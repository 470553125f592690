//! # verbset-core — Foundational Types for verbset
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace: what a finding looks like, how findings are classified, where
//! the dataset lives on disk, and what counts as a well-formed kana string.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Findings are values, not errors.** Every data problem becomes an
//!    [`Issue`] appended to an [`IssueLog`]. Rust errors ([`DatasetError`])
//!    are reserved for I/O failures, and callers convert them into issues.
//!
//! 2. **Two severities, one exit rule.** [`Severity::Error`] fails the run,
//!    [`Severity::Warn`] never does. [`ValidationReport::exit_code`] is the
//!    single place that rule lives.
//!
//! 3. **Typed dataset layout.** The four data files are the variants of
//!    [`DataFile`]; paths are derived from the variant, never spelled inline.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `verbset-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod issue;
pub mod kana;
pub mod layout;
pub mod report;

// Re-export primary types for ergonomic imports.
pub use error::DatasetError;
pub use issue::{Issue, IssueLog, Location, Severity};
pub use kana::is_hiragana;
pub use layout::{DataFile, DatasetLayout};
pub use report::ValidationReport;
