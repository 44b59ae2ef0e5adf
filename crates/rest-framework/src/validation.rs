//! # Validation Findings
//!
//! Findings are produced by the binding collaborator and by a resource's custom
//! validation. The REST interceptor only reads and classifies them.
//!
//! [`ValidationErrors`] is keyed by field name, with [`GLOBAL_KEY`] reserved for
//! findings about the request as a whole. It stays mutable until the pipeline freezes
//! it after custom validation.

use serde_json::Value;
use tracing::warn;

/// Reserved key under which global findings are grouped.
pub const GLOBAL_KEY: &str = "__global__";

/// Whether a finding concerns the whole request or a single input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingScope {
    Global,
    Field(String),
}

/// Classification of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FindingKind {
    /// An ordinary validation failure.
    #[default]
    Invalid,
    /// The request referenced something that does not exist (e.g. an id that could not
    /// be converted into an entity). Surfaces as a 404.
    NotFound,
}

/// One reason why a field, or the request as a whole, failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFinding {
    pub scope: FindingScope,
    pub message: String,
    pub kind: FindingKind,
    pub field_value: Option<Value>,
}

impl ValidationFinding {
    pub fn global(message: impl Into<String>) -> Self {
        Self {
            scope: FindingScope::Global,
            message: message.into(),
            kind: FindingKind::Invalid,
            field_value: None,
        }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: FindingScope::Field(field.into()),
            message: message.into(),
            kind: FindingKind::Invalid,
            field_value: None,
        }
    }

    /// Attaches the offending value, reported as `fieldValue` in error envelopes.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.field_value = Some(value.into());
        self
    }

    /// Marks the finding as a "not found" condition.
    pub fn not_found(mut self) -> Self {
        self.kind = FindingKind::NotFound;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FindingKind::NotFound
    }

    pub fn field_name(&self) -> Option<&str> {
        match &self.scope {
            FindingScope::Global => None,
            FindingScope::Field(name) => Some(name),
        }
    }

    /// The collection key this finding is grouped under.
    pub fn key(&self) -> &str {
        self.field_name().unwrap_or(GLOBAL_KEY)
    }
}

/// The accumulated findings for one request, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    findings: Vec<ValidationFinding>,
    frozen: bool,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finding. Returns `false` (and drops the finding) once frozen.
    pub fn add(&mut self, finding: ValidationFinding) -> bool {
        if self.frozen {
            warn!(key = finding.key(), message = %finding.message, "Finding rejected after freeze");
            return false;
        }
        self.findings.push(finding);
        true
    }

    pub fn add_global(&mut self, message: impl Into<String>) -> bool {
        self.add(ValidationFinding::global(message))
    }

    pub fn add_field(&mut self, field: impl Into<String>, message: impl Into<String>) -> bool {
        self.add(ValidationFinding::field(field, message))
    }

    /// Stops accepting new findings.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter()
    }

    pub fn has_field_errors(&self) -> bool {
        self.findings.iter().any(|f| f.field_name().is_some())
    }

    pub fn global(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.scope == FindingScope::Global)
    }

    /// The first finding carrying the not-found marker, if any.
    pub fn not_found(&self) -> Option<&ValidationFinding> {
        self.findings.iter().find(|f| f.is_not_found())
    }

    /// Distinct keys in order of first appearance, [`GLOBAL_KEY`] included.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for finding in &self.findings {
            let key = finding.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// All findings stored under `key`, in insertion order.
    pub fn get(&self, key: &str) -> Vec<&ValidationFinding> {
        self.findings.iter().filter(|f| f.key() == key).collect()
    }

    /// Field findings grouped by field name, groups ordered by first appearance.
    pub fn field_groups(&self) -> Vec<(&str, Vec<&ValidationFinding>)> {
        self.keys()
            .into_iter()
            .filter(|key| *key != GLOBAL_KEY)
            .map(|key| (key, self.get(key)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_fields_by_first_appearance() {
        let mut errors = ValidationErrors::new();
        errors.add_field("b", "b1");
        errors.add_global("g1");
        errors.add_field("a", "a1");
        errors.add_field("b", "b2");

        let groups = errors.field_groups();
        let names: Vec<_> = groups.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["b", "a"]);
        let b: Vec<_> = groups[0].1.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(b, vec!["b1", "b2"]);
        assert_eq!(errors.keys(), vec!["b", GLOBAL_KEY, "a"]);
    }

    #[test]
    fn rejects_additions_after_freeze() {
        let mut errors = ValidationErrors::new();
        assert!(errors.add_global("before"));
        errors.freeze();
        assert!(!errors.add_global("after"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn finds_not_found_marker() {
        let mut errors = ValidationErrors::new();
        errors.add_field("name", "too short");
        errors.add(ValidationFinding::field("id", "Widget 9 does not exist").not_found());
        assert_eq!(
            errors.not_found().map(|f| f.message.as_str()),
            Some("Widget 9 does not exist")
        );
        assert!(errors.has_field_errors());
    }
}
