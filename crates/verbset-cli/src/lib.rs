//! # verbset-cli — Command-Line Interface
//!
//! Provides the `verbset` binary:
//!
//! ```bash
//! verbset                      # validate the project containing the CWD
//! verbset --root path/to/app   # validate another project
//! verbset --format json        # machine-readable report
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing and root discovery live here; validation logic lives
//!   in `verbset-integrity`.
//! - The report goes to stdout, logs go to stderr.
//! - Exit status is 0 when the report has no ERROR issues, 1 otherwise.

pub mod validate;

use std::path::{Path, PathBuf};

use verbset_core::DatasetLayout;

/// How many parent directories root discovery inspects.
pub const MAX_ROOT_SEARCH_DEPTH: usize = 10;

/// Walk up from `start` to the nearest directory holding both `schemas/`
/// and `data/`.
///
/// Falls back to `start` itself (canonicalized when possible) if no such
/// directory is found within [`MAX_ROOT_SEARCH_DEPTH`] levels.
pub fn find_project_root(start: &Path) -> PathBuf {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    let mut dir = start.as_path();
    for _ in 0..MAX_ROOT_SEARCH_DEPTH {
        if DatasetLayout::is_project_root(dir) {
            return dir.to_path_buf();
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    start
}
