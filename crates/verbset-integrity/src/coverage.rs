//! # Template Coverage
//!
//! The conjugation template list is the canonical set of template ids.
//! Every template marked `active: true` must have example sentences; every
//! template that has example sentences should exist in the canonical list.

use std::collections::BTreeSet;

use serde_json::Value;
use verbset_core::{IssueLog, Location};

use crate::value::quote;

/// Template ids from the conjugation template document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    known: BTreeSet<String>,
    active: BTreeSet<String>,
}

impl TemplateCatalog {
    /// Collect ids from a template array.
    ///
    /// Entries without a string `id` are ignored (the schema reports them).
    /// Only `active` set to the boolean `true` counts as active.
    pub fn from_templates(templates: &[Value]) -> Self {
        let mut catalog = Self::default();
        for template in templates {
            let Some(id) = template.get("id").and_then(Value::as_str) else {
                continue;
            };
            catalog.known.insert(id.to_string());
            if template.get("active") == Some(&Value::Bool(true)) {
                catalog.active.insert(id.to_string());
            }
        }
        catalog
    }

    /// Every template id, sorted.
    pub fn known(&self) -> &BTreeSet<String> {
        &self.known
    }

    /// Active template ids, sorted.
    pub fn active(&self) -> &BTreeSet<String> {
        &self.active
    }

    /// Compare against the template ids that have example sentences.
    ///
    /// Active ids without examples are ERRORs; example ids unknown to the
    /// catalog are WARNs. Both lists are reported in sorted order.
    pub fn check_coverage(
        &self,
        example_ids: &BTreeSet<String>,
        location: &Location,
        log: &mut IssueLog,
    ) {
        for id in self.active.difference(example_ids) {
            log.error(
                location.clone(),
                format!("Missing example sentences for active template_id: {}", quote(id)),
            );
        }
        for id in example_ids.difference(&self.known) {
            log.warn(
                location.clone(),
                format!(
                    "example_sentences has unknown template_id (not in templates file): {}",
                    quote(id)
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use verbset_core::Severity;

    fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn catalog_reads_only_boolean_true_as_active() {
        let templates = json!([
            { "id": "a", "active": true },
            { "id": "b", "active": "true" },
            { "id": "c" },
            { "active": true },
            "junk"
        ]);
        let catalog = TemplateCatalog::from_templates(templates.as_array().unwrap());
        assert_eq!(catalog.known(), &ids(&["a", "b", "c"]));
        assert_eq!(catalog.active(), &ids(&["a"]));
    }

    #[test]
    fn missing_active_template_is_one_error() {
        let templates = json!([{ "id": "A", "active": true }, { "id": "B", "active": true }]);
        let catalog = TemplateCatalog::from_templates(templates.as_array().unwrap());
        let mut log = IssueLog::new();
        catalog.check_coverage(&ids(&["A"]), &Location::file("ex.json"), &mut log);

        assert_eq!(log.len(), 1);
        assert_eq!(log.issues()[0].severity, Severity::Error);
        assert_eq!(
            log.issues()[0].message,
            "Missing example sentences for active template_id: 'B'"
        );
    }

    #[test]
    fn unknown_example_template_warns() {
        let templates = json!([{ "id": "A", "active": false }]);
        let catalog = TemplateCatalog::from_templates(templates.as_array().unwrap());
        let mut log = IssueLog::new();
        catalog.check_coverage(&ids(&["A", "Z"]), &Location::file("ex.json"), &mut log);

        assert_eq!(log.len(), 1);
        assert_eq!(log.issues()[0].severity, Severity::Warn);
        assert!(log.issues()[0].message.ends_with("'Z'"));
    }

    #[test]
    fn inactive_templates_need_no_examples() {
        let templates = json!([{ "id": "A", "active": false }]);
        let catalog = TemplateCatalog::from_templates(templates.as_array().unwrap());
        let mut log = IssueLog::new();
        catalog.check_coverage(&BTreeSet::new(), &Location::file("ex.json"), &mut log);
        assert!(log.is_empty());
    }
}
