//! # Verb Identity Index
//!
//! Builds the lookup tables every cross-file check resolves against:
//!
//! - **primary key**: `id` → record, unique across the collection;
//! - **natural key**: `kana` → all records sharing that spelling.
//!
//! Records live in a single arena (`Vec<VerbRecord>`); both indexes hold
//! arena positions, never references, so the index owns everything it
//! describes.
//!
//! Indexing happens in two passes. [`VerbIndex::insert`] checks each record
//! as it arrives and flags a repeated id at the repeating record's line
//! (the first occurrence keeps the id). [`VerbIndex::check_disambiguation`]
//! runs after the last insert, because whether a kana is shared depends on
//! the final count.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde_json::Value;
use verbset_core::{is_hiragana, IssueLog, Location};

use crate::loader::LineRecord;
use crate::value::{is_truthy, non_empty_str, quote};

/// The fields of a verb line that other checks rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbRecord {
    /// Line the record was read from.
    pub line: usize,
    /// Primary key, when present as a non-empty string.
    pub id: Option<String>,
    /// Natural key, when present as a string.
    pub kana: Option<String>,
    /// Whether a non-empty `disambiguation` marker is present.
    pub disambiguated: bool,
}

impl VerbRecord {
    /// Extract the indexed fields from a parsed line.
    pub fn from_line(record: &LineRecord) -> Self {
        let object = record.value.as_object();
        Self {
            line: record.line,
            id: object
                .and_then(|o| non_empty_str(o, "id"))
                .map(str::to_string),
            kana: object
                .and_then(|o| o.get("kana"))
                .and_then(Value::as_str)
                .map(str::to_string),
            disambiguated: object
                .and_then(|o| o.get("disambiguation"))
                .is_some_and(is_truthy),
        }
    }
}

/// Primary-key and natural-key indexes over the verb collection.
#[derive(Debug, Clone)]
pub struct VerbIndex {
    source: PathBuf,
    records: Vec<VerbRecord>,
    by_id: HashMap<String, usize>,
    by_kana: BTreeMap<String, Vec<usize>>,
}

impl VerbIndex {
    /// Create an empty index for records read from `source`.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            records: Vec::new(),
            by_id: HashMap::new(),
            by_kana: BTreeMap::new(),
        }
    }

    /// Index every record, then run the disambiguation pass.
    ///
    /// `precheck` sees each record just before it is indexed, so whatever
    /// it logs stays interleaved with the record checks in file order.
    pub fn build<F>(
        source: impl Into<PathBuf>,
        records: &[LineRecord],
        log: &mut IssueLog,
        mut precheck: F,
    ) -> Self
    where
        F: FnMut(&LineRecord, &mut IssueLog),
    {
        let mut index = Self::new(source);
        for record in records {
            precheck(record, log);
            index.insert(record, log);
        }
        index.check_disambiguation(log);
        index
    }

    /// Path of the verb file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Check one record's required fields and add it to the indexes.
    ///
    /// Every parsed record is kept in the arena, valid or not, so the
    /// natural-key index and the loaded count reflect the whole file.
    pub fn insert(&mut self, record: &LineRecord, log: &mut IssueLog) {
        let location = Location::line(&self.source, record.line);
        let object = record.value.as_object();

        match object.and_then(|o| o.get("kana")).and_then(Value::as_str) {
            Some(kana) if !kana.is_empty() => {
                if !is_hiragana(kana) {
                    log.error(
                        location.clone(),
                        format!("'kana' must be hiragana-only. Got: {}", quote(kana)),
                    );
                }
            }
            _ => log.error(location.clone(), "Missing or invalid 'kana'."),
        }

        let gloss_ok = object
            .and_then(|o| o.get("gloss_en"))
            .and_then(Value::as_array)
            .is_some_and(|glosses| {
                !glosses.is_empty()
                    && glosses
                        .iter()
                        .all(|g| g.as_str().is_some_and(|s| !s.trim().is_empty()))
            });
        if !gloss_ok {
            log.error(
                location.clone(),
                "'gloss_en' must be a non-empty array of strings.",
            );
        }

        let verb = VerbRecord::from_line(record);
        let slot = self.records.len();
        match &verb.id {
            None => log.error(location, "Missing or invalid 'id'."),
            Some(id) if self.by_id.contains_key(id) => {
                log.error(location, format!("Duplicate id: {}", quote(id)));
            }
            Some(id) => {
                self.by_id.insert(id.clone(), slot);
            }
        }
        if let Some(kana) = &verb.kana {
            self.by_kana.entry(kana.clone()).or_default().push(slot);
        }
        self.records.push(verb);
    }

    /// Warn about every record whose kana is shared but that carries no
    /// disambiguation marker. One warning per offending record, in file
    /// order, located at the verb file.
    pub fn check_disambiguation(&self, log: &mut IssueLog) {
        for record in self.records() {
            let Some(kana) = &record.kana else {
                continue;
            };
            let shared = self.with_kana(kana).nth(1).is_some();
            if shared && !record.disambiguated {
                let id = record.id.as_deref().unwrap_or("None");
                log.warn(
                    Location::file(self.source()),
                    format!(
                        "kana {} appears multiple times but an entry has null/empty disambiguation (id={id}).",
                        quote(kana)
                    ),
                );
            }
        }
    }

    /// Number of records loaded, including invalid ones.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in file order.
    pub fn records(&self) -> &[VerbRecord] {
        &self.records
    }

    /// Look up a record by primary key.
    pub fn get(&self, id: &str) -> Option<&VerbRecord> {
        self.by_id.get(id).map(|&slot| &self.records[slot])
    }

    /// Returns true if `id` is a known primary key.
    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns true if a JSON value is a string naming a known primary key.
    pub fn contains_id_value(&self, id: &Value) -> bool {
        id.as_str().is_some_and(|id| self.contains_id(id))
    }

    /// Returns true if any record is spelled `kana`.
    pub fn contains_kana(&self, kana: &str) -> bool {
        self.by_kana.contains_key(kana)
    }

    /// All records spelled `kana`, in file order.
    pub fn with_kana(&self, kana: &str) -> impl Iterator<Item = &VerbRecord> {
        self.by_kana
            .get(kana)
            .into_iter()
            .flatten()
            .map(|&slot| &self.records[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use verbset_core::Severity;

    fn lines(values: Vec<Value>) -> Vec<LineRecord> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| LineRecord { line: i + 1, value })
            .collect()
    }

    fn verb(id: &str, kana: &str) -> Value {
        json!({ "id": id, "kana": kana, "gloss_en": ["to do"] })
    }

    #[test]
    fn clean_collection_has_no_issues() {
        let mut log = IssueLog::new();
        let index = VerbIndex::build(
            "verbs.jsonl",
            &lines(vec![verb("v1", "たべる"), verb("v2", "のむ")]),
            &mut log,
            |_, _| {},
        );
        assert!(log.is_empty(), "{:?}", log.issues());
        assert_eq!(index.len(), 2);
        assert!(index.contains_id("v2"));
        assert!(index.contains_kana("たべる"));
        assert_eq!(index.get("v1").unwrap().line, 1);
    }

    #[test]
    fn duplicate_id_flagged_at_later_line_first_wins() {
        let mut log = IssueLog::new();
        let index = VerbIndex::build(
            "verbs.jsonl",
            &lines(vec![verb("v1", "たべる"), verb("v1", "のむ")]),
            &mut log,
            |_, _| {},
        );
        assert_eq!(log.len(), 1);
        let issue = &log.issues()[0];
        assert_eq!(issue.message, "Duplicate id: 'v1'");
        assert_eq!(issue.location, Location::line("verbs.jsonl", 2));
        assert_eq!(index.get("v1").unwrap().kana.as_deref(), Some("たべる"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn required_field_errors() {
        let mut log = IssueLog::new();
        VerbIndex::build(
            "verbs.jsonl",
            &lines(vec![
                json!({ "id": "", "kana": "", "gloss_en": [] }),
                json!({ "id": "v2", "kana": "タベル", "gloss_en": ["eat", "  "] }),
                json!("not an object"),
            ]),
            &mut log,
            |_, _| {},
        );
        let messages: Vec<(Option<usize>, &str)> = log
            .issues()
            .iter()
            .map(|i| (i.location.line, i.message.as_str()))
            .collect();
        assert_eq!(
            messages,
            vec![
                (Some(1), "Missing or invalid 'kana'."),
                (Some(1), "'gloss_en' must be a non-empty array of strings."),
                (Some(1), "Missing or invalid 'id'."),
                (Some(2), "'kana' must be hiragana-only. Got: 'タベル'"),
                (Some(2), "'gloss_en' must be a non-empty array of strings."),
                (Some(3), "Missing or invalid 'kana'."),
                (Some(3), "'gloss_en' must be a non-empty array of strings."),
                (Some(3), "Missing or invalid 'id'."),
            ]
        );
    }

    #[test]
    fn shared_kana_warns_only_for_undisambiguated_entries() {
        let mut log = IssueLog::new();
        let index = VerbIndex::build(
            "verbs.jsonl",
            &lines(vec![
                json!({ "id": "kaeru_return", "kana": "かえる", "gloss_en": ["to return"], "disambiguation": "return" }),
                json!({ "id": "kaeru_change", "kana": "かえる", "gloss_en": ["to change"], "disambiguation": "" }),
                json!({ "id": "kaeru_frog", "kana": "かえる", "gloss_en": ["to hatch"] }),
                verb("v4", "のむ"),
            ]),
            &mut log,
            |_, _| {},
        );
        let warns: Vec<&str> = log.issues().iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            warns,
            vec![
                "kana 'かえる' appears multiple times but an entry has null/empty disambiguation (id=kaeru_change).",
                "kana 'かえる' appears multiple times but an entry has null/empty disambiguation (id=kaeru_frog).",
            ]
        );
        assert!(log.issues().iter().all(|i| i.severity == Severity::Warn));
        assert!(log.issues().iter().all(|i| i.location == Location::file("verbs.jsonl")));
        assert_eq!(index.with_kana("かえる").count(), 3);
        assert_eq!(index.with_kana("ない").count(), 0);
    }

    #[test]
    fn shared_kana_without_id_is_named_none() {
        let mut log = IssueLog::new();
        VerbIndex::build(
            "verbs.jsonl",
            &lines(vec![
                verb("kiru_cut", "きる"),
                json!({ "kana": "きる", "gloss_en": ["to wear"], "disambiguation": "wear" }),
                json!({ "id": 5, "kana": "きる", "gloss_en": ["to wear"] }),
            ]),
            &mut log,
            |_, _| {},
        );
        let warns: Vec<&str> = log
            .issues()
            .iter()
            .filter(|i| i.severity == Severity::Warn)
            .map(|i| i.message.as_str())
            .collect();
        assert_eq!(
            warns,
            vec![
                "kana 'きる' appears multiple times but an entry has null/empty disambiguation (id=kiru_cut).",
                "kana 'きる' appears multiple times but an entry has null/empty disambiguation (id=None).",
            ]
        );
    }

    #[test]
    fn precheck_runs_before_each_insert() {
        let mut log = IssueLog::new();
        let index = VerbIndex::build(
            "verbs.jsonl",
            &lines(vec![verb("v1", "たべる"), verb("v1", "のむ")]),
            &mut log,
            |record, log| log.warn(Location::line("verbs.jsonl", record.line), "seen"),
        );
        let trail: Vec<(Option<usize>, &str)> = log
            .issues()
            .iter()
            .map(|i| (i.location.line, i.message.as_str()))
            .collect();
        assert_eq!(
            trail,
            vec![(Some(1), "seen"), (Some(2), "seen"), (Some(2), "Duplicate id: 'v1'")]
        );
        assert_eq!(index.source(), Path::new("verbs.jsonl"));
        assert_eq!(index.records().len(), 2);
    }

    #[test]
    fn unique_kana_needs_no_disambiguation() {
        let mut log = IssueLog::new();
        VerbIndex::build("v.jsonl", &lines(vec![verb("a", "あう"), verb("b", "いう")]), &mut log, |_, _| {});
        assert!(log.is_empty());
    }

    proptest! {
        /// One duplicate-id ERROR per repeated occurrence beyond the first.
        #[test]
        fn duplicate_errors_match_repeats(ids in prop::collection::vec(0u8..6, 0..30)) {
            let values: Vec<Value> = ids
                .iter()
                .enumerate()
                .map(|(i, n)| json!({
                    "id": format!("v{n}"),
                    "kana": "する",
                    "gloss_en": ["to do"],
                    "disambiguation": format!("d{i}"),
                }))
                .collect();
            let mut log = IssueLog::new();
            VerbIndex::build("v.jsonl", &lines(values), &mut log, |_, _| {});

            let mut distinct = ids.clone();
            distinct.sort_unstable();
            distinct.dedup();
            let duplicates = log.issues().iter().filter(|i| i.message.starts_with("Duplicate id")).count();
            prop_assert_eq!(duplicates, ids.len() - distinct.len());
        }

        /// Exactly one WARN per record lacking disambiguation on a shared kana.
        #[test]
        fn disambiguation_warnings_match(marks in prop::collection::vec(any::<bool>(), 0..20)) {
            let values: Vec<Value> = marks
                .iter()
                .enumerate()
                .map(|(i, marked)| {
                    let mut v = json!({ "id": format!("v{i}"), "kana": "かく", "gloss_en": ["to write"] });
                    if *marked {
                        v["disambiguation"] = json!("marked");
                    }
                    v
                })
                .collect();
            let mut log = IssueLog::new();
            VerbIndex::build("v.jsonl", &lines(values), &mut log, |_, _| {});

            let expected = if marks.len() > 1 { marks.iter().filter(|m| !**m).count() } else { 0 };
            prop_assert_eq!(log.len(), expected);
        }
    }
}
