//! # Dataset Validation
//!
//! Runs the whole pipeline over one project root:
//!
//! ```text
//! schemas ─► load ─► schema check ─► verb index ─► cross-checks ─► report
//! ```
//!
//! Everything up to the verb index is file-local. The cross-checks need all
//! four files loaded, so they run only after every file has been read.
//!
//! Only two conditions stop a run early: a missing schema contract (the
//! report then lists the missing schemas and nothing else) and a schema that
//! cannot be parsed or compiled (returned as [`SchemaError`]). Every other
//! problem is an issue in the report.

use serde_json::Value;
use verbset_core::{DataFile, DatasetLayout, IssueLog, Location, ValidationReport};
use verbset_schema::{SchemaError, SchemaRegistry};

use crate::coverage::TemplateCatalog;
use crate::exceptions::ExceptionsValidator;
use crate::examples::ExampleSentenceValidator;
use crate::loader::{load_document, load_records};
use crate::verbs::VerbIndex;

/// All four data files after loading and per-file checks.
#[derive(Debug)]
pub struct Dataset {
    /// Indexed verb records.
    pub verbs: VerbIndex,
    /// Conjugation template document, if it parsed.
    pub templates: Option<Value>,
    /// Exceptions document, if it parsed.
    pub exceptions: Option<Value>,
    /// Example-sentence document, if it parsed.
    pub example_sentences: Option<Value>,
}

/// Validate the dataset under `layout`.
///
/// # Errors
///
/// Returns [`SchemaError`] if a schema exists but cannot be parsed or
/// compiled. Missing schemas are not an error: they produce a report with
/// one ERROR per missing file.
pub fn validate_dataset(layout: &DatasetLayout) -> Result<ValidationReport, SchemaError> {
    let registry = match SchemaRegistry::load(layout) {
        Ok(registry) => registry,
        Err(err) if err.missing_paths().is_some() => {
            tracing::warn!(error = %err, "schema contracts missing, skipping data checks");
            return Ok(ValidationReport::new(err.missing_issues(), None));
        }
        Err(err) => return Err(err),
    };

    tracing::debug!(schema_dir = %registry.schema_dir().display(), "schema contracts ready");

    let mut log = IssueLog::new();
    let dataset = load_dataset(&registry, layout, &mut log);
    cross_check(&dataset, layout, &mut log);

    let report = ValidationReport::new(log.into_inner(), Some(dataset.verbs.len()));
    tracing::info!(
        verbs = dataset.verbs.len(),
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation finished"
    );
    Ok(report)
}

/// Load every data file, schema-check it, and index the verbs.
pub fn load_dataset(registry: &SchemaRegistry, layout: &DatasetLayout, log: &mut IssueLog) -> Dataset {
    let verbs = load_verbs(registry, layout, log);
    let templates = load_checked(registry, layout, DataFile::ConjugationTemplates, log);
    let exceptions = load_checked(registry, layout, DataFile::Exceptions, log);
    let example_sentences = load_checked(registry, layout, DataFile::ExampleSentences, log);

    Dataset {
        verbs,
        templates,
        exceptions,
        example_sentences,
    }
}

/// Schema-check and index each verb line in file order, then run the
/// disambiguation pass.
fn load_verbs(registry: &SchemaRegistry, layout: &DatasetLayout, log: &mut IssueLog) -> VerbIndex {
    let path = layout.data_path(DataFile::Verbs);
    let loaded = load_records(&path);
    log.extend(loaded.issues);

    let index = VerbIndex::build(&path, &loaded.data, log, |record, log| {
        let location = Location::line(&path, record.line);
        log.extend(registry.check(DataFile::Verbs, &record.value, &location));
    });

    tracing::debug!(path = %index.source().display(), records = index.len(), "indexed verbs");
    index
}

fn load_checked(
    registry: &SchemaRegistry,
    layout: &DatasetLayout,
    file: DataFile,
    log: &mut IssueLog,
) -> Option<Value> {
    let path = layout.data_path(file);
    let loaded = load_document(&path);
    log.extend(loaded.issues);

    let document = loaded.data?;
    log.extend(registry.check(file, &document, &Location::file(&path)));
    Some(document)
}

/// Run the cross-file checks that need the whole dataset.
pub fn cross_check(dataset: &Dataset, layout: &DatasetLayout, log: &mut IssueLog) {
    match dataset.exceptions.as_ref().and_then(Value::as_object) {
        Some(exceptions) if !dataset.verbs.is_empty() => {
            let location = Location::file(layout.data_path(DataFile::Exceptions));
            ExceptionsValidator::new(&dataset.verbs, location).validate(exceptions, log);
        }
        _ => tracing::debug!("exceptions cross-check skipped"),
    }

    let templates = dataset.templates.as_ref().and_then(Value::as_array);
    let examples = dataset.example_sentences.as_ref().and_then(Value::as_object);
    match (templates, examples) {
        (Some(templates), Some(examples)) => {
            let catalog = TemplateCatalog::from_templates(templates);
            let location = Location::file(layout.data_path(DataFile::ExampleSentences));
            ExampleSentenceValidator::new(&dataset.verbs, &catalog, location).validate(examples, log);
        }
        _ => tracing::debug!("example-sentence cross-check skipped"),
    }
}
