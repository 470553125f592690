//! # verbset-schema — Schema Checking
//!
//! Every data file has a declarative JSON Schema contract under `schemas/`.
//! This crate treats those documents as opaque input: it loads them,
//! compiles one validator per data file (Draft 2020-12) and reports every
//! violation in a record as an ERROR issue.
//!
//! ## Behaviour
//!
//! - [`SchemaRegistry::load`] fails fast if any of the four contracts is
//!   missing. A run cannot proceed without them.
//! - Cross-schema `$ref`s resolve against the files in `schemas/`; nothing is
//!   ever fetched over the network.
//! - [`SchemaChecker::check`] is pure. It never mutates the document, never
//!   stops at the first violation, and sorts violations by their rendered
//!   text so repeated runs produce identical output.
//!
//! ## Crate Policy
//!
//! - Depends only on `verbset-core` internally.
//! - Schema documents are never generated or rewritten here.

pub mod validate;

pub use validate::{SchemaChecker, SchemaError, SchemaRegistry, Violation};
