//! # Example-Sentence Cross-Checks
//!
//! The example-sentence document carries its own small universe: a cast of
//! `characters`, a `lexicon` of placeholder fills, and `templates` keyed by
//! template id. Each template holds example buckets per verb class plus
//! optional per-verb overrides.
//!
//! Checks, in order:
//!
//! 1. character ids are present and unique;
//! 2. `templates` is a mapping, and covers every active template
//!    ([`TemplateCatalog::check_coverage`]);
//! 3. per template, every example's `{token}` placeholders resolve in the
//!    lexicon (`{V}`, the verb slot, always resolves) and every
//!    `character_ids` entry resolves in the cast;
//! 4. per template, override `verb_ids` resolve against the verb index and
//!    no verb id is overridden twice. Examples under a disabled override must
//!    still be an array but their content is not checked.
//!
//! A structural failure stops only the subtree it occurs in.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use verbset_core::{IssueLog, Location};

use crate::coverage::TemplateCatalog;
use crate::value::{field, quote, quoted};
use crate::verbs::VerbIndex;

/// Token reserved for the conjugated verb itself.
pub const VERB_SLOT: &str = "V";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid")
});

/// Placeholder tokens in `text`, in order of appearance, repeats included.
pub fn placeholders(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// What an example may refer to.
struct ExampleScope<'a> {
    lexicon: Option<&'a Map<String, Value>>,
    characters: &'a HashSet<String>,
}

impl ExampleScope<'_> {
    fn knows_token(&self, token: &str) -> bool {
        token == VERB_SLOT || self.lexicon.is_some_and(|l| l.contains_key(token))
    }

    fn knows_character(&self, id: &Value) -> bool {
        id.as_str().is_some_and(|id| self.characters.contains(id))
    }
}

/// Cross-checks an example-sentence document.
pub struct ExampleSentenceValidator<'a> {
    verbs: &'a VerbIndex,
    catalog: &'a TemplateCatalog,
    location: Location,
}

impl<'a> ExampleSentenceValidator<'a> {
    /// Create a validator reporting at `location`.
    pub fn new(verbs: &'a VerbIndex, catalog: &'a TemplateCatalog, location: Location) -> Self {
        Self {
            verbs,
            catalog,
            location,
        }
    }

    /// Run every check over `document`.
    pub fn validate(&self, document: &Map<String, Value>, log: &mut IssueLog) {
        let characters = self.collect_characters(document, log);

        let empty = Map::new();
        let templates = match document.get("templates") {
            None => &empty,
            Some(Value::Object(templates)) => templates,
            Some(_) => {
                log.error(self.location.clone(), "templates must be an object.");
                return;
            }
        };

        let example_ids: BTreeSet<String> = templates.keys().cloned().collect();
        self.catalog.check_coverage(&example_ids, &self.location, log);

        let lexicon = match field(document, "lexicon") {
            None => None,
            Some(Value::Object(lexicon)) => Some(lexicon),
            Some(_) => {
                log.error(self.location.clone(), "lexicon must be an object if present.");
                None
            }
        };

        let scope = ExampleScope {
            lexicon,
            characters: &characters,
        };
        for (template_id, template) in templates {
            self.check_template(template_id, template, &scope, log);
        }
    }

    fn collect_characters(&self, document: &Map<String, Value>, log: &mut IssueLog) -> HashSet<String> {
        let mut ids = HashSet::new();
        let Some(characters) = document.get("characters") else {
            return ids;
        };
        let Some(characters) = characters.as_array() else {
            log.error(self.location.clone(), "characters must be an array.");
            return ids;
        };
        for (idx, character) in characters.iter().enumerate() {
            let Some(character) = character.as_object() else {
                log.error(self.location.clone(), format!("characters[{idx}] must be an object."));
                continue;
            };
            let Some(id) = character.get("id").and_then(Value::as_str).filter(|s| !s.is_empty()) else {
                log.error(
                    self.location.clone(),
                    format!("characters[{idx}].id must be a non-empty string."),
                );
                continue;
            };
            if !ids.insert(id.to_string()) {
                log.error(self.location.clone(), format!("Duplicate character id: {}", quote(id)));
            }
        }
        ids
    }

    fn check_template(&self, template_id: &str, template: &Value, scope: &ExampleScope<'_>, log: &mut IssueLog) {
        let path = format!("templates[{}]", quote(template_id));
        let Some(template) = template.as_object() else {
            log.error(self.location.clone(), format!("{path} must be an object."));
            return;
        };

        match template.get("by_verb_class") {
            None => {}
            Some(Value::Object(classes)) => {
                for (verb_class, examples) in classes {
                    let bucket = format!("{path}.by_verb_class[{}]", quote(verb_class));
                    let Some(examples) = examples.as_array() else {
                        log.error(self.location.clone(), format!("{bucket} must be an array."));
                        continue;
                    };
                    for (i, example) in examples.iter().enumerate() {
                        self.check_example(&format!("{bucket}[{i}]"), example, scope, log);
                    }
                }
            }
            Some(_) => {
                log.error(self.location.clone(), format!("{path}.by_verb_class must be an object."));
                return;
            }
        }

        self.check_overrides(&path, template, scope, log);
    }

    fn check_overrides(
        &self,
        path: &str,
        template: &Map<String, Value>,
        scope: &ExampleScope<'_>,
        log: &mut IssueLog,
    ) {
        let overrides = match field(template, "overrides") {
            None => return,
            Some(Value::Array(overrides)) if overrides.is_empty() => return,
            Some(Value::Array(overrides)) => overrides,
            Some(_) => {
                log.error(self.location.clone(), format!("{path}.overrides must be an array."));
                return;
            }
        };

        let mut overridden: HashSet<String> = HashSet::new();
        for (j, entry) in overrides.iter().enumerate() {
            let at = format!("{path}.overrides[{j}]");
            let Some(entry) = entry.as_object() else {
                log.error(self.location.clone(), format!("{at} must be an object."));
                continue;
            };

            let verb_ids = match entry.get("verb_ids") {
                Some(Value::Array(ids)) if !ids.is_empty() => ids,
                _ => {
                    log.error(self.location.clone(), format!("{at}.verb_ids must be a non-empty array."));
                    continue;
                }
            };
            for verb_id in verb_ids {
                if !self.verbs.contains_id_value(verb_id) {
                    log.error(
                        self.location.clone(),
                        format!("{at} references missing verb id: {}", quoted(verb_id)),
                    );
                }
                if !overridden.insert(verb_id.to_string()) {
                    log.error(
                        self.location.clone(),
                        format!("{path} has duplicate override for verb id: {}", quoted(verb_id)),
                    );
                }
            }

            let examples = match entry.get("examples") {
                None | Some(Value::Null) => continue,
                Some(Value::Array(examples)) => examples,
                Some(_) => {
                    log.error(self.location.clone(), format!("{at}.examples must be an array."));
                    continue;
                }
            };
            // Disabled overrides keep their shape checks but not content checks.
            if entry.get("disabled") == Some(&Value::Bool(true)) {
                continue;
            }
            for (k, example) in examples.iter().enumerate() {
                self.check_example(&format!("{at}.examples[{k}]"), example, scope, log);
            }
        }
    }

    fn check_example(&self, at: &str, example: &Value, scope: &ExampleScope<'_>, log: &mut IssueLog) {
        let Some(example) = example.as_object() else {
            log.error(self.location.clone(), format!("{at} must be an object."));
            return;
        };

        if let Some(text) = example.get("text").and_then(Value::as_str) {
            for token in placeholders(text).filter(|t| !scope.knows_token(t)) {
                log.error(
                    self.location.clone(),
                    format!("Unknown placeholder {{{token}}} in {at}.text"),
                );
            }
        }

        let character_ids = match example.get("character_ids") {
            None => return,
            Some(Value::Array(ids)) => ids,
            Some(_) => {
                log.error(self.location.clone(), format!("{at}.character_ids must be an array."));
                return;
            }
        };
        for id in character_ids.iter().filter(|id| !scope.knows_character(id)) {
            log.error(
                self.location.clone(),
                format!("{at} references unknown character_id: {}", quoted(id)),
            );
        }
    }
}
