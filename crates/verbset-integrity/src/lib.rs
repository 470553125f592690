//! # verbset-integrity — Dataset Integrity
//!
//! Schemas check one record at a time. This crate checks what no schema can
//! express: identity and references across the four data files.
//!
//! - **Loader** (`loader.rs`): reads JSON documents and newline-delimited
//!   records, turning malformed input into issues instead of failures.
//!
//! - **Verb index** (`verbs.rs`): primary-key (`id`) and natural-key
//!   (`kana`) lookups over the verb records, with duplicate-id and
//!   disambiguation checks.
//!
//! - **Exceptions** (`exceptions.rs`): `irregular_verbs`, `ambiguous_kana`
//!   and `special_cases` must point at real verbs.
//!
//! - **Coverage** (`coverage.rs`): every active conjugation template must
//!   have example sentences.
//!
//! - **Examples** (`examples.rs`): placeholder tokens, character ids and
//!   override verb ids inside the example-sentence document.
//!
//! - **Validation** (`validation.rs`): the end-to-end run producing a
//!   [`ValidationReport`](verbset_core::ValidationReport).
//!
//! ## Crate Policy
//!
//! - Depends on `verbset-core` and `verbset-schema` internally.
//! - Loaded data is never modified; checks only append issues.

pub mod coverage;
pub mod examples;
pub mod exceptions;
pub mod loader;
mod value;
pub mod validation;
pub mod verbs;

pub use coverage::TemplateCatalog;
pub use examples::{placeholders, ExampleSentenceValidator, VERB_SLOT};
pub use exceptions::ExceptionsValidator;
pub use loader::{load_document, load_records, LineRecord, Loaded};
pub use validation::{cross_check, load_dataset, validate_dataset, Dataset};
pub use verbs::{VerbIndex, VerbRecord};
