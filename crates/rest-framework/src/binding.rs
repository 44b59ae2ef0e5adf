//! # Binding
//!
//! The default binding collaborator. It copies declared request parameters into a
//! resource, coercing each to the field's declared kind, and records a finding for
//! every value that cannot be converted, every value the resource itself rejects, and
//! every required field that is missing for the current event.
//!
//! A resource signals that a bound value points at something that does not exist by
//! returning [`BindFailure::NotFound`]; the finding it produces carries the not-found
//! marker the REST interceptor answers with a 404.

use crate::request::Request;
use crate::resource::Resource;
use crate::validation::{ValidationErrors, ValidationFinding};
use std::fmt::{self, Display};
use tracing::debug;

/// The type a declared field is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Boolean,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "number",
            FieldKind::Decimal => "decimal number",
            FieldKind::Boolean => "boolean",
        })
    }
}

/// A coerced field value handed to [`Resource::bind`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Decimal(n) => Some(*n),
            FieldValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn coerce(kind: FieldKind, raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match kind {
            FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
            FieldKind::Integer => trimmed.parse().ok().map(FieldValue::Integer),
            FieldKind::Decimal => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Decimal),
            FieldKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => Some(FieldValue::Boolean(true)),
                "false" | "off" | "no" | "0" => Some(FieldValue::Boolean(false)),
                _ => None,
            },
        }
    }
}

/// Why a resource refused a coerced value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindFailure {
    #[error("{0}")]
    Invalid(String),
    /// The value refers to something that does not exist.
    #[error("{0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Required {
    #[default]
    Never,
    Always,
    /// Required only when one of these events runs.
    On(Vec<String>),
}

/// A declared input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    pub kind: FieldKind,
    pub required: Required,
}

impl FieldRule {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: Required::Never,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = Required::Always;
        self
    }

    pub fn required_on<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Required::On(events.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_required_for(&self, event: &str) -> bool {
        match &self.required {
            Required::Never => false,
            Required::Always => true,
            Required::On(events) => events.iter().any(|e| e == event),
        }
    }

    /// Human readable name used in messages (`unit_price` -> `Unit price`).
    pub fn label(&self) -> String {
        let spaced = self.name.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Populates a resource from the request and records binding findings.
pub trait Binder: Send + Sync {
    fn bind(
        &self,
        resource: &mut dyn Resource,
        fields: &[FieldRule],
        request: &Request,
        event: &str,
        errors: &mut ValidationErrors,
    );
}

/// Binds request parameters by exact field name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterBinder;

impl Binder for ParameterBinder {
    fn bind(
        &self,
        resource: &mut dyn Resource,
        fields: &[FieldRule],
        request: &Request,
        event: &str,
        errors: &mut ValidationErrors,
    ) {
        for rule in fields {
            let raw = match request.param(&rule.name) {
                Some(raw) if !raw.trim().is_empty() => raw,
                _ => {
                    if rule.is_required_for(event) {
                        errors.add(ValidationFinding::field(
                            &rule.name,
                            format!("{} is a required field", rule.label()),
                        ));
                    }
                    continue;
                }
            };

            let Some(value) = FieldValue::coerce(rule.kind, raw) else {
                errors.add(
                    ValidationFinding::field(
                        &rule.name,
                        format!(
                            "The value ({raw}) entered in field {} must be a valid {}",
                            rule.label(),
                            rule.kind
                        ),
                    )
                    .with_value(raw),
                );
                continue;
            };

            debug!(field = %rule.name, ?value, "Binding field");
            match resource.bind(&rule.name, value) {
                Ok(()) => {}
                Err(BindFailure::Invalid(message)) => {
                    errors.add(ValidationFinding::field(&rule.name, message).with_value(raw));
                }
                Err(BindFailure::NotFound(message)) => {
                    errors.add(
                        ValidationFinding::field(&rule.name, message)
                            .with_value(raw)
                            .not_found(),
                    );
                }
            }
        }
    }
}
