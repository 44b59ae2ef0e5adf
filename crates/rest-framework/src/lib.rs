//! # REST Framework
//!
//! This crate layers REST semantics over an action-oriented request pipeline. Resources
//! expose named **events**; the pipeline resolves which event a request runs, binds
//! request parameters into the resource, runs the resource's own validation and then
//! executes the event. The [`RestInterceptor`] retrofits two behaviors onto that
//! lifecycle without changing the pipeline itself:
//!
//! 1. **Verb dispatch** ([`dispatch`]): the HTTP method picks the event. A `GET` runs the
//!    event named `get`; an event named explicitly must be tagged with the inbound
//!    method. Anything else is answered with `405 Method Not Allowed`.
//! 2. **Error normalization** ([`normalizer`]): a not-found binding finding becomes a
//!    `404`, validation findings become a `400` carrying a JSON [`ErrorEnvelope`], and an
//!    uncaught execution failure becomes a `500` carrying the same envelope shape.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Resource Layer** ([`Resource`]) - your events, fields and validation
//! 2. **Pipeline Layer** ([`Pipeline`], [`Interceptor`]) - the four-stage lifecycle and
//!    the interceptor chains around each stage
//! 3. **Host Layer** ([`RequestController`], [`RestClient`]) - the async front door
//!
//! ```text
//! RestClient ──mpsc──▶ RequestController ──spawn──▶ Pipeline::handle
//!                                                      │
//!       Resolution ─▶ Binding ─▶ CustomValidation ─▶ Execution
//!          (RestInterceptor wraps every stage for REST resources)
//! ```
//!
//! ## Defining a Resource
//!
//! ```rust
//! use async_trait::async_trait;
//! use rest_framework::{
//!     BindFailure, BoxError, CapabilityTable, FieldKind, FieldRule, FieldValue, HttpMethod,
//!     Pipeline, Request, Resolution, Resource, ResourceRegistry,
//! };
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Greeting {
//!     name: Option<String>,
//! }
//!
//! #[async_trait]
//! impl Resource for Greeting {
//!     fn capabilities() -> CapabilityTable {
//!         CapabilityTable::builder()
//!             .event("get", [HttpMethod::Get])
//!             .build()
//!     }
//!
//!     fn fields() -> Vec<FieldRule> {
//!         vec![FieldRule::new("name", FieldKind::Text).required()]
//!     }
//!
//!     fn bind(&mut self, _field: &str, value: FieldValue) -> Result<(), BindFailure> {
//!         self.name = value.as_str().map(str::to_string);
//!         Ok(())
//!     }
//!
//!     async fn handle(&mut self, _event: &str) -> Result<Resolution, BoxError> {
//!         Ok(Resolution::json(&json!({ "hello": self.name }))?)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut registry = ResourceRegistry::new();
//!     registry.register::<Greeting>("/greeting");
//!     let pipeline = Pipeline::builder(registry).with_rest().build();
//!
//!     let ok = pipeline.handle(Request::from_uri("GET", "/greeting?name=Ada")).await;
//!     assert_eq!(ok.json().unwrap(), json!({ "hello": "Ada" }));
//!
//!     let missing = pipeline.handle(Request::new("GET", "/greeting")).await;
//!     assert_eq!(missing.status.as_u16(), 400);
//!
//!     let wrong_verb = pipeline.handle(Request::new("DELETE", "/greeting")).await;
//!     assert_eq!(wrong_verb.status.as_u16(), 405);
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Every request gets a fresh resource instance and its own execution context
//! - Capability tables and field rules are captured once at registration and shared
//!   read-only
//! - The [`RequestController`] runs each request on its own task, so requests proceed
//!   in parallel with no shared mutable state
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockResource`](mock::MockResource), a scripted resource
//! for driving the pipeline through successes, errors and panics. See the module for the
//! full API and usage patterns.

pub mod binding;
pub mod capability;
pub mod client;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod interceptor;
pub mod logging;
pub mod message;
pub mod method;
pub mod mock;
pub mod normalizer;
pub mod pipeline;
pub mod registry;
pub mod request;
pub mod resource;
pub mod response;
pub mod stage;
pub mod validation;

// Re-export core types for convenience
pub use binding::{BindFailure, Binder, FieldKind, FieldRule, FieldValue, ParameterBinder};
pub use capability::CapabilityTable;
pub use client::RestClient;
pub use config::InterceptorConfig;
pub use controller::RequestController;
pub use envelope::{ErrorEnvelope, FieldErrors, JsonMode};
pub use error::{BoxError, DispatchError, RestError, StageFailure, TransportError};
pub use interceptor::RestInterceptor;
pub use message::ControllerRequest;
pub use method::HttpMethod;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use registry::{ResourceRegistry, ResourceType, Resolver};
pub use request::Request;
pub use resource::Resource;
pub use response::{Resolution, Response};
pub use stage::{ExecutionContext, Flow, Interceptor, LifecycleStage, Next, StageResult};
pub use validation::{ValidationErrors, ValidationFinding};
