//! # Resource Trait
//!
//! The `Resource` trait is the contract every request handler unit implements. A
//! resource exposes named events, declares which HTTP methods each event accepts, and
//! declares the input fields the binder populates before validation runs.
//!
//! # Static Declarations
//! [`Resource::capabilities`] and [`Resource::fields`] are associated functions: they
//! describe the resource *type*, not an instance, and are called exactly once when the
//! type is registered with a [`ResourceRegistry`](crate::ResourceRegistry). Requests
//! only ever consult the captured tables.
//!
//! # Lifecycle
//! A fresh instance is created for every request, populated by the binder, validated,
//! asked to handle exactly one event, and dropped once the response is rendered.

use crate::binding::{BindFailure, FieldRule, FieldValue};
use crate::capability::CapabilityTable;
use crate::error::BoxError;
use crate::response::Resolution;
use crate::validation::ValidationErrors;
use async_trait::async_trait;

/// A request handler exposing named events.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use rest_framework::{BoxError, CapabilityTable, HttpMethod, Resolution, Resource};
///
/// #[derive(Default)]
/// struct Ping;
///
/// #[async_trait]
/// impl Resource for Ping {
///     fn capabilities() -> CapabilityTable {
///         CapabilityTable::builder().event("get", [HttpMethod::Get]).build()
///     }
///
///     async fn handle(&mut self, _event: &str) -> Result<Resolution, BoxError> {
///         Ok(Resolution::raw_json(r#""pong""#))
///     }
/// }
/// ```
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// The events this resource type exposes and the methods each accepts.
    fn capabilities() -> CapabilityTable
    where
        Self: Sized;

    /// The input fields the binder populates.
    fn fields() -> Vec<FieldRule>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Receives one coerced field value from the binder.
    fn bind(&mut self, _field: &str, _value: FieldValue) -> Result<(), BindFailure> {
        Ok(())
    }

    /// Custom validation for `event`, run after binding.
    async fn validate(&self, _event: &str, _errors: &mut ValidationErrors) {}

    /// Runs `event` and produces the resolution to answer with.
    async fn handle(&mut self, event: &str) -> Result<Resolution, BoxError>;
}
