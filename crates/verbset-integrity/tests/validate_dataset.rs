//! Integration tests: run `validate_dataset` over throwaway project roots.
//!
//! Each test writes a `schemas/` and `data/` tree into a temp directory,
//! validates it, and asserts on the resulting report.

use std::path::Path;

use serde_json::{json, Value};
use verbset_core::{DataFile, DatasetLayout, Severity, ValidationReport};
use verbset_integrity::validate_dataset;

fn write_json(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn write_lines(path: &Path, lines: &[Value]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let body: Vec<String> = lines.iter().map(|v| v.to_string()).collect();
    std::fs::write(path, body.join("\n") + "\n").unwrap();
}

fn schemas() -> Vec<(DataFile, Value)> {
    vec![
        (
            DataFile::Verbs,
            json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "type": "object",
                "required": ["id", "kana", "gloss_en"],
                "properties": {
                    "id": { "type": "string" },
                    "kana": { "type": "string" },
                    "gloss_en": { "type": "array", "items": { "type": "string" } },
                    "disambiguation": { "type": ["string", "null"] }
                }
            }),
        ),
        (
            DataFile::ConjugationTemplates,
            json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["id", "active"],
                    "properties": { "id": { "type": "string" }, "active": { "type": "boolean" } }
                }
            }),
        ),
        (
            DataFile::Exceptions,
            json!({ "$schema": "https://json-schema.org/draft/2020-12/schema", "type": "object" }),
        ),
        (
            DataFile::ExampleSentences,
            json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "type": "object",
                "required": ["templates"]
            }),
        ),
    ]
}

/// Build the minimal dataset: one verb, one active template, and example
/// sentences covering `templates`.
fn project(templates: Value) -> (tempfile::TempDir, DatasetLayout) {
    let dir = tempfile::tempdir().unwrap();
    let layout = DatasetLayout::new(dir.path());
    for (file, schema) in schemas() {
        write_json(&layout.schema_path(file), &schema);
    }
    write_lines(
        &layout.data_path(DataFile::Verbs),
        &[json!({ "id": "v1", "kana": "たべる", "gloss_en": ["to eat"] })],
    );
    write_json(
        &layout.data_path(DataFile::ConjugationTemplates),
        &json!([{ "id": "t1", "active": true }]),
    );
    write_json(
        &layout.data_path(DataFile::Exceptions),
        &json!({ "irregular_verbs": [], "ambiguous_kana": {}, "special_cases": {} }),
    );
    write_json(
        &layout.data_path(DataFile::ExampleSentences),
        &json!({ "characters": [], "lexicon": {}, "templates": templates }),
    );
    (dir, layout)
}

fn error_messages(report: &ValidationReport) -> Vec<&str> {
    report.errors().map(|i| i.message.as_str()).collect()
}

#[test]
fn uncovered_active_template_fails() {
    let (_dir, layout) = project(json!({}));
    let report = validate_dataset(&layout).unwrap();

    assert_eq!(
        error_messages(&report),
        vec!["Missing example sentences for active template_id: 't1'"]
    );
    assert_eq!(report.warning_count(), 0);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.verbs_loaded(), Some(1));
}

#[test]
fn covered_active_template_passes() {
    let (_dir, layout) = project(json!({ "t1": { "by_verb_class": {} } }));
    let report = validate_dataset(&layout).unwrap();

    assert_eq!(report.error_count(), 0, "{:?}", report.issues());
    assert_eq!(report.exit_code(), 0);
    assert!(report.to_string().contains("All checks passed."));
}

#[test]
fn repeated_runs_render_identically() {
    let (_dir, layout) = project(json!({ "t1": {}, "zz": { "by_verb_class": [] } }));
    write_lines(
        &layout.data_path(DataFile::Verbs),
        &[
            json!({ "id": "v1", "kana": "かえる", "gloss_en": ["to return"] }),
            json!({ "id": "v1", "kana": "かえる", "gloss_en": [] }),
            json!({ "id": "v3", "kana": "カエル", "gloss_en": ["frog"], "extra": 1 }),
        ],
    );
    let first = validate_dataset(&layout).unwrap();
    let second = validate_dataset(&layout).unwrap();

    assert!(first.error_count() > 0);
    assert!(first.warning_count() > 0);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn missing_schema_aborts_with_one_error_per_schema() {
    let (_dir, layout) = project(json!({ "t1": {} }));
    std::fs::remove_file(layout.schema_path(DataFile::Exceptions)).unwrap();
    std::fs::remove_file(layout.schema_path(DataFile::ExampleSentences)).unwrap();

    let report = validate_dataset(&layout).unwrap();
    assert_eq!(report.verbs_loaded(), None);
    assert_eq!(report.error_count(), 2);
    assert!(report.errors().all(|i| i.message == "Schema file not found."));
    assert!(!report.to_string().contains("Verbs loaded"));
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn broken_schema_is_an_operational_error() {
    let (_dir, layout) = project(json!({ "t1": {} }));
    std::fs::write(layout.schema_path(DataFile::Verbs), "not json").unwrap();
    assert!(validate_dataset(&layout).is_err());
}

#[test]
fn missing_data_files_are_reported_and_run_continues() {
    let (_dir, layout) = project(json!({ "t1": {} }));
    std::fs::remove_file(layout.data_path(DataFile::Verbs)).unwrap();
    std::fs::remove_file(layout.data_path(DataFile::ConjugationTemplates)).unwrap();

    let report = validate_dataset(&layout).unwrap();
    assert_eq!(report.verbs_loaded(), Some(0));
    assert_eq!(
        error_messages(&report),
        vec!["File not found.", "File not found."]
    );
    let wheres: Vec<String> = report.errors().map(|i| i.location.to_string()).collect();
    assert!(wheres[0].ends_with("verbs.v2.jsonl"));
    assert!(wheres[1].ends_with("conjugation_templates.v2.json"));
}

#[test]
fn malformed_verb_line_is_skipped() {
    let (_dir, layout) = project(json!({ "t1": {} }));
    let path = layout.data_path(DataFile::Verbs);
    std::fs::write(
        &path,
        "{\"id\": \"v1\", \"kana\": \"たべる\", \"gloss_en\": [\"to eat\"]}\n{broken\n",
    )
    .unwrap();

    let report = validate_dataset(&layout).unwrap();
    assert_eq!(report.verbs_loaded(), Some(1));
    assert_eq!(report.error_count(), 1);
    let issue = report.errors().next().unwrap();
    assert_eq!(issue.location.line, Some(2));
    assert!(issue.message.starts_with("Invalid JSON: "));
}

#[test]
fn schema_violations_are_errors_at_line() {
    let (_dir, layout) = project(json!({ "t1": {} }));
    write_lines(
        &layout.data_path(DataFile::Verbs),
        &[json!({ "id": "v1", "kana": "たべる", "gloss_en": ["to eat"], "disambiguation": 3 })],
    );
    let report = validate_dataset(&layout).unwrap();
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].location.line, Some(1));
    assert!(errors[0].message.starts_with("/disambiguation: "));
}

#[test]
fn exceptions_and_examples_cross_reference_verbs() {
    let (_dir, layout) = project(json!({
        "t1": {
            "by_verb_class": {
                "ichidan": [{ "text": "{FOOD}を{V}", "character_ids": ["ghost"] }]
            },
            "overrides": [{ "verb_ids": ["v1", "v9"] }]
        }
    }));
    write_json(
        &layout.data_path(DataFile::Exceptions),
        &json!({
            "irregular_verbs": ["する"],
            "ambiguous_kana": { "たべる": ["v1", "v2"] },
            "special_cases": { "te": { "いく": "いって" } }
        }),
    );

    let report = validate_dataset(&layout).unwrap();
    let errors = error_messages(&report);
    assert_eq!(
        errors,
        vec![
            "ambiguous_kana['たべる'] references missing id: 'v2'",
            "Unknown placeholder {FOOD} in templates['t1'].by_verb_class['ichidan'][0].text",
            "templates['t1'].by_verb_class['ichidan'][0] references unknown character_id: 'ghost'",
            "templates['t1'].overrides[0] references missing verb id: 'v9'",
        ]
    );
    let warns: Vec<_> = report.warnings().map(|i| i.severity).collect();
    assert_eq!(warns, vec![Severity::Warn, Severity::Warn]);
}

#[test]
fn exceptions_skipped_when_no_verbs_loaded() {
    let (_dir, layout) = project(json!({ "t1": {} }));
    std::fs::write(layout.data_path(DataFile::Verbs), "").unwrap();
    write_json(
        &layout.data_path(DataFile::Exceptions),
        &json!({ "ambiguous_kana": { "たべる": ["v1"] } }),
    );
    let report = validate_dataset(&layout).unwrap();
    assert_eq!(report.verbs_loaded(), Some(0));
    assert_eq!(report.error_count(), 0, "{:?}", report.issues());
}

#[test]
fn null_templates_section_fails_the_run() {
    let (_dir, layout) = project(Value::Null);
    let report = validate_dataset(&layout).unwrap();
    assert_eq!(error_messages(&report), vec!["templates must be an object."]);
    assert_eq!(report.exit_code(), 1);
}
