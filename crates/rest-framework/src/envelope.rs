//! # Error Envelope
//!
//! The one JSON shape every REST failure body with a 400 or 500 status takes:
//!
//! ```json
//! {
//!   "globalErrors": ["..."],
//!   "fieldErrors": [
//!     { "fieldName": "id", "fieldValue": "abc", "errorMessages": ["..."] }
//!   ]
//! }
//! ```
//!
//! `globalErrors` is always present. `fieldErrors` only appears when at least one
//! field-scoped finding exists, and in that case global findings are left out.

use crate::validation::ValidationErrors;
use serde::Serialize;
use serde_json::Value;

/// Prefix of the single global error reported for an uncaught execution failure.
pub const UNEXPECTED_ERROR_PREFIX: &str = "Unexpected error occurred executing this API call: ";

/// Output mode for envelope and JSON resolution bodies. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonMode {
    #[default]
    Compact,
    Pretty,
}

impl JsonMode {
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            JsonMode::Pretty
        } else {
            JsonMode::Compact
        }
    }

    /// Serializes any value with this mode.
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        match self {
            JsonMode::Compact => serde_json::to_string(value),
            JsonMode::Pretty => serde_json::to_string_pretty(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub field_name: String,
    pub field_value: Value,
    pub error_messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub global_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldErrors>>,
}

impl ErrorEnvelope {
    /// Builds the envelope for a set of validation findings.
    ///
    /// Global messages are collected only when no field finding exists. Field findings
    /// are grouped per field in order of first appearance; the group's `fieldValue` is
    /// the value attached to its first finding (`null` if none).
    pub fn from_findings(errors: &ValidationErrors) -> Self {
        if !errors.has_field_errors() {
            return Self {
                global_errors: errors.global().map(|f| f.message.clone()).collect(),
                field_errors: None,
            };
        }

        let field_errors = errors
            .field_groups()
            .into_iter()
            .map(|(name, findings)| FieldErrors {
                field_name: name.to_string(),
                field_value: findings
                    .first()
                    .and_then(|f| f.field_value.clone())
                    .unwrap_or(Value::Null),
                error_messages: findings.iter().map(|f| f.message.clone()).collect(),
            })
            .collect();

        Self {
            global_errors: Vec::new(),
            field_errors: Some(field_errors),
        }
    }

    /// The envelope reported when an event fails in a way nothing else handled.
    pub fn unexpected(cause: &str) -> Self {
        Self {
            global_errors: vec![format!("{UNEXPECTED_ERROR_PREFIX}{cause}")],
            field_errors: None,
        }
    }

    pub fn to_json(&self, mode: JsonMode) -> Result<String, serde_json::Error> {
        mode.render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationFinding;

    #[test]
    fn global_only_envelope_has_no_field_errors_key() {
        let mut errors = ValidationErrors::new();
        errors.add_global("invalid for custom reason");

        let json = ErrorEnvelope::from_findings(&errors)
            .to_json(JsonMode::Compact)
            .unwrap();
        assert_eq!(json, r#"{"globalErrors":["invalid for custom reason"]}"#);
    }

    #[test]
    fn field_findings_suppress_global_findings() {
        let mut errors = ValidationErrors::new();
        errors.add_global("dropped");
        errors.add(ValidationFinding::field("qty", "not a number").with_value("x"));
        errors.add(ValidationFinding::field("qty", "must be positive").with_value("y"));
        errors.add_field("name", "Name is a required field");

        let envelope = ErrorEnvelope::from_findings(&errors);
        assert!(envelope.global_errors.is_empty());

        let json = envelope.to_json(JsonMode::Compact).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"globalErrors":[],"fieldErrors":["#,
                r#"{"fieldName":"qty","fieldValue":"x","errorMessages":["not a number","must be positive"]},"#,
                r#"{"fieldName":"name","fieldValue":null,"errorMessages":["Name is a required field"]}]}"#
            )
        );
    }

    #[test]
    fn construction_is_idempotent() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationFinding::field("a", "one").with_value(1));
        errors.add_field("b", "two");

        for mode in [JsonMode::Compact, JsonMode::Pretty] {
            let first = ErrorEnvelope::from_findings(&errors).to_json(mode).unwrap();
            let second = ErrorEnvelope::from_findings(&errors).to_json(mode).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn unexpected_wraps_cause() {
        let json = ErrorEnvelope::unexpected("boom")
            .to_json(JsonMode::Compact)
            .unwrap();
        assert_eq!(
            json,
            r#"{"globalErrors":["Unexpected error occurred executing this API call: boom"]}"#
        );
    }
}
