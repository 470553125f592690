//! # Exception List Cross-Checks
//!
//! The exceptions document never defines verbs; it only points at them.
//!
//! | Field | Points at | Unresolved |
//! |---|---|---|
//! | `irregular_verbs[]` | natural key (kana) | WARN |
//! | `ambiguous_kana{kana: [id]}` | primary key (id) | ERROR |
//! | `special_cases{category: {kana: text}}` | natural key (kana) | WARN |
//!
//! A malformed entry (an `ambiguous_kana` value that is not a list, a
//! `special_cases` category that is not a mapping) is one structural ERROR
//! and is skipped; sibling entries are still checked.

use serde_json::{Map, Value};
use verbset_core::{IssueLog, Location};

use crate::value::{field, quote, quoted};
use crate::verbs::VerbIndex;

/// Resolves the references of an exceptions document against the verbs.
pub struct ExceptionsValidator<'a> {
    verbs: &'a VerbIndex,
    location: Location,
}

impl<'a> ExceptionsValidator<'a> {
    /// Create a validator reporting at `location`.
    pub fn new(verbs: &'a VerbIndex, location: Location) -> Self {
        Self { verbs, location }
    }

    /// Run all three checks in order.
    pub fn validate(&self, exceptions: &Map<String, Value>, log: &mut IssueLog) {
        self.check_irregular_verbs(exceptions, log);
        self.check_ambiguous_kana(exceptions, log);
        self.check_special_cases(exceptions, log);
    }

    fn check_irregular_verbs(&self, exceptions: &Map<String, Value>, log: &mut IssueLog) {
        let Some(irregular) = exceptions.get("irregular_verbs") else {
            return;
        };
        let Some(kanas) = irregular.as_array() else {
            log.error(self.location.clone(), "irregular_verbs must be an array of kana.");
            return;
        };
        for kana in kanas {
            if !kana.as_str().is_some_and(|k| self.verbs.contains_kana(k)) {
                let shown = quoted(kana);
                log.warn(
                    self.location.clone(),
                    format!("irregular_verbs includes {shown} but no verb record with kana={shown} exists."),
                );
            }
        }
    }

    fn check_ambiguous_kana(&self, exceptions: &Map<String, Value>, log: &mut IssueLog) {
        let Some(ambiguous) = field(exceptions, "ambiguous_kana") else {
            return;
        };
        let Some(entries) = ambiguous.as_object() else {
            log.error(self.location.clone(), "ambiguous_kana must be an object.");
            return;
        };
        for (kana, ids) in entries {
            let Some(ids) = ids.as_array() else {
                log.error(
                    self.location.clone(),
                    format!("ambiguous_kana[{}] must be an array of ids.", quote(kana)),
                );
                continue;
            };
            for id in ids {
                if !self.verbs.contains_id_value(id) {
                    log.error(
                        self.location.clone(),
                        format!("ambiguous_kana[{}] references missing id: {}", quote(kana), quoted(id)),
                    );
                }
            }
        }
    }

    fn check_special_cases(&self, exceptions: &Map<String, Value>, log: &mut IssueLog) {
        let Some(special) = field(exceptions, "special_cases") else {
            return;
        };
        let Some(categories) = special.as_object() else {
            log.error(self.location.clone(), "special_cases must be an object.");
            return;
        };
        for (category, mapping) in categories {
            let Some(mapping) = mapping.as_object() else {
                log.error(
                    self.location.clone(),
                    format!("special_cases.{category} must be an object of kana->string."),
                );
                continue;
            };
            for kana in mapping.keys() {
                if !self.verbs.contains_kana(kana) {
                    log.warn(
                        self.location.clone(),
                        format!(
                            "special_cases.{category} includes {k} but no verb record with kana={k} exists.",
                            k = quote(kana)
                        ),
                    );
                }
            }
        }
    }
}
