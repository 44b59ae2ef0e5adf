//! # Capability Tables
//!
//! A [`CapabilityTable`] is the static declaration of which events a resource type
//! exposes and which HTTP methods each event accepts. It is built once, when the
//! resource type is registered, and shared read-only by every request afterwards.

use crate::method::HttpMethod;
use std::collections::BTreeSet;

/// Mapping from event name to the set of HTTP methods it accepts.
///
/// Events keep their declaration order. An event with an empty method set still
/// exists: it can be reached when the lowercase method name equals the event name,
/// but never through an explicitly requested event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityTable {
    events: Vec<(String, BTreeSet<HttpMethod>)>,
    default_event: Option<String>,
}

impl CapabilityTable {
    pub fn builder() -> CapabilityTableBuilder {
        CapabilityTableBuilder::default()
    }

    /// Returns `true` if the resource declares an event with this exact name.
    pub fn contains(&self, event: &str) -> bool {
        self.methods(event).is_some()
    }

    /// The methods declared for `event`, or `None` if no such event exists.
    pub fn methods(&self, event: &str) -> Option<&BTreeSet<HttpMethod>> {
        self.events
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, methods)| methods)
    }

    /// Returns `true` if `event` exists and is tagged with `method`.
    pub fn supports(&self, event: &str, method: HttpMethod) -> bool {
        self.methods(event)
            .is_some_and(|methods| methods.contains(&method))
    }

    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|(name, _)| name.as_str())
    }

    pub fn default_event(&self) -> Option<&str> {
        self.default_event.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Builder for [`CapabilityTable`].
///
/// ```rust
/// use rest_framework::{CapabilityTable, HttpMethod};
///
/// let table = CapabilityTable::builder()
///     .event("get", [HttpMethod::Get])
///     .event("head", [])
///     .default_event("get")
///     .build();
///
/// assert!(table.supports("get", HttpMethod::Get));
/// assert!(table.contains("head"));
/// assert!(!table.supports("head", HttpMethod::Head));
/// ```
#[derive(Debug, Default)]
pub struct CapabilityTableBuilder {
    table: CapabilityTable,
}

impl CapabilityTableBuilder {
    /// Declares an event and the methods it accepts. Declaring the same event twice
    /// merges the method sets.
    pub fn event(
        mut self,
        name: impl Into<String>,
        methods: impl IntoIterator<Item = HttpMethod>,
    ) -> Self {
        let name = name.into();
        match self.table.events.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(methods),
            None => self.table.events.push((name, methods.into_iter().collect())),
        }
        self
    }

    /// Sets the event the framework falls back to when nothing else selects one.
    pub fn default_event(mut self, name: impl Into<String>) -> Self {
        self.table.default_event = Some(name.into());
        self
    }

    pub fn build(self) -> CapabilityTable {
        self.table
    }
}
