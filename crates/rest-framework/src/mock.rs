//! # Mock Resources & Testing Guide
//!
//! [`MockResource`] is a resource type whose behavior is scripted by the test: each
//! event it is asked to run pops the next expectation and answers with a canned
//! resolution, an error, or a panic. It lets you drive the pipeline and its
//! interceptors through every outcome without writing a resource per scenario.
//!
//! ## When to use Mocks vs Real Resources
//!
//! | Feature | MockResource | Real Resource |
//! |---------|--------------|---------------|
//! | **Setup** | A capability table and expectations | A full `Resource` impl |
//! | **Failures** | Easy (`return_err`, `panic_with`) | Requires real failing inputs |
//! | **Inspection** | Records bound values and handled events | Whatever the resource exposes |
//! | **Use Case** | Testing the pipeline and interceptors | Testing the resource itself or the full system |
//!
//! ## Example
//!
//! ```rust
//! use rest_framework::mock::MockResource;
//! use rest_framework::{CapabilityTable, HttpMethod, Pipeline, Request, Resolution, ResourceRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockResource::new(
//!         CapabilityTable::builder().event("post", [HttpMethod::Post]).build(),
//!     );
//!     mock.expect_event("post").return_err("disk full");
//!
//!     let mut registry = ResourceRegistry::new();
//!     mock.register(&mut registry, "/uploads");
//!     let pipeline = Pipeline::builder(registry).with_rest().build();
//!
//!     let response = pipeline.handle(Request::new("POST", "/uploads")).await;
//!     assert_eq!(response.status.as_u16(), 500);
//!
//!     mock.verify();
//! }
//! ```

use crate::binding::{BindFailure, FieldRule, FieldValue};
use crate::capability::CapabilityTable;
use crate::error::BoxError;
use crate::registry::ResourceRegistry;
use crate::resource::Resource;
use crate::response::Resolution;
use crate::validation::{ValidationErrors, ValidationFinding};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Outcome {
    Ok(Resolution),
    Err(String),
    Panic(String),
}

struct Expectation {
    event: String,
    outcome: Outcome,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    findings: Vec<ValidationFinding>,
    rejections: Vec<(String, BindFailure)>,
    bound: Vec<(String, FieldValue)>,
    handled: Vec<String>,
    mismatches: Vec<String>,
}

/// A scripted resource type.
///
/// Clones share the same script, so a test can keep one handle for verification
/// while the registry instantiates fresh resources from another.
#[derive(Clone)]
pub struct MockResource {
    capabilities: CapabilityTable,
    fields: Vec<FieldRule>,
    state: Arc<Mutex<MockState>>,
}

impl MockResource {
    pub fn new(capabilities: CapabilityTable) -> Self {
        Self {
            capabilities,
            fields: Vec::new(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Declares an input field for the binder.
    pub fn with_field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Expects `event` to run next.
    pub fn expect_event(&self, event: impl Into<String>) -> EventExpectationBuilder {
        EventExpectationBuilder {
            event: event.into(),
            state: self.state.clone(),
        }
    }

    /// Adds `finding` during custom validation of every request.
    pub fn fail_validation(&self, finding: ValidationFinding) {
        self.state.lock().unwrap().findings.push(finding);
    }

    /// Makes binding of `field` fail with `failure`.
    pub fn reject_binding(&self, field: impl Into<String>, failure: BindFailure) {
        self.state
            .lock()
            .unwrap()
            .rejections
            .push((field.into(), failure));
    }

    /// Registers this mock as a REST resource at `path`.
    pub fn register(&self, registry: &mut ResourceRegistry, path: &str) {
        self.register_with(registry, path, true);
    }

    /// Registers this mock as a resource the REST interceptor leaves alone.
    pub fn register_plain(&self, registry: &mut ResourceRegistry, path: &str) {
        self.register_with(registry, path, false);
    }

    fn register_with(&self, registry: &mut ResourceRegistry, path: &str, rest: bool) {
        let state = self.state.clone();
        registry.register_type(
            path,
            rest,
            "MockResource",
            self.capabilities.clone(),
            self.fields.clone(),
            move || {
                Box::new(MockInstance {
                    state: state.clone(),
                }) as Box<dyn Resource>
            },
        );
    }

    /// Events run so far, in order.
    pub fn handled(&self) -> Vec<String> {
        self.state.lock().unwrap().handled.clone()
    }

    /// Values the binder delivered so far, in order.
    pub fn bound(&self) -> Vec<(String, FieldValue)> {
        self.state.lock().unwrap().bound.clone()
    }

    /// Verifies that all expectations were met and no unexpected event ran.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.mismatches.is_empty() {
            panic!("Unexpected events: {:?}", state.mismatches);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

/// Builder for event expectations.
pub struct EventExpectationBuilder {
    event: String,
    state: Arc<Mutex<MockState>>,
}

impl EventExpectationBuilder {
    /// The event resolves successfully to `resolution`.
    pub fn return_ok(self, resolution: Resolution) {
        self.push(Outcome::Ok(resolution));
    }

    /// The event fails with an error carrying `message`.
    pub fn return_err(self, message: impl Into<String>) {
        self.push(Outcome::Err(message.into()));
    }

    /// The event panics with `message`.
    pub fn panic_with(self, message: impl Into<String>) {
        self.push(Outcome::Panic(message.into()));
    }

    fn push(self, outcome: Outcome) {
        self.state.lock().unwrap().expectations.push_back(Expectation {
            event: self.event,
            outcome,
        });
    }
}

struct MockInstance {
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl Resource for MockInstance {
    fn capabilities() -> CapabilityTable {
        CapabilityTable::default()
    }

    fn bind(&mut self, field: &str, value: FieldValue) -> Result<(), BindFailure> {
        let mut state = self.state.lock().unwrap();
        if let Some((_, failure)) = state.rejections.iter().find(|(name, _)| name == field) {
            return Err(failure.clone());
        }
        state.bound.push((field.to_string(), value));
        Ok(())
    }

    async fn validate(&self, _event: &str, errors: &mut ValidationErrors) {
        let findings = self.state.lock().unwrap().findings.clone();
        for finding in findings {
            errors.add(finding);
        }
    }

    async fn handle(&mut self, event: &str) -> Result<Resolution, BoxError> {
        let outcome = {
            let mut state = self.state.lock().unwrap();
            state.handled.push(event.to_string());
            match state.expectations.pop_front() {
                Some(expectation) if expectation.event == event => expectation.outcome,
                Some(expectation) => {
                    state
                        .mismatches
                        .push(format!("{event} (expected {})", expectation.event));
                    Outcome::Err(format!("unexpected event {event}"))
                }
                None => {
                    state.mismatches.push(event.to_string());
                    Outcome::Err(format!("unexpected event {event}"))
                }
            }
        };

        match outcome {
            Outcome::Ok(resolution) => Ok(resolution),
            Outcome::Err(message) => Err(message.into()),
            Outcome::Panic(message) => panic!("{message}"),
        }
    }
}
