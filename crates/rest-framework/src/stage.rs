//! # Lifecycle Stages & Interception
//!
//! Every request passes through four ordered stages. For each stage the pipeline
//! builds a chain: the registered [`Interceptor`]s that observe the stage, wrapped
//! around the framework's own action for it. An interceptor receives the request's
//! [`ExecutionContext`] and a [`Next`] continuation; it may work before calling
//! [`Next::proceed`], inspect or replace what comes back, or halt without proceeding.
//!
//! ```text
//! Resolution ─▶ Binding ─▶ CustomValidation ─▶ Execution
//!     │            │               │                │
//!  [interceptor chain ─▶ stage action] for each stage
//! ```

use crate::error::StageFailure;
use crate::registry::ResourceType;
use crate::request::Request;
use crate::resource::Resource;
use crate::response::Resolution;
use crate::validation::ValidationErrors;
use async_trait::async_trait;
use std::fmt::{self, Display};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    /// Choose the event to run.
    Resolution,
    /// Populate the resource from the request.
    Binding,
    /// Run the resource's own validation.
    CustomValidation,
    /// Run the event.
    Execution,
}

impl LifecycleStage {
    /// All stages in the order a request passes through them.
    pub const ORDER: [LifecycleStage; 4] = [
        LifecycleStage::Resolution,
        LifecycleStage::Binding,
        LifecycleStage::CustomValidation,
        LifecycleStage::Execution,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleStage::Resolution => "Resolution",
            LifecycleStage::Binding => "Binding",
            LifecycleStage::CustomValidation => "CustomValidation",
            LifecycleStage::Execution => "Execution",
        }
    }
}

impl Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a stage decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Move on to the next stage.
    Continue,
    /// Stop and answer with this resolution.
    Halt(Resolution),
}

pub type StageResult = Result<Flow, StageFailure>;

/// Request-scoped state shared by all stages of one request.
///
/// Nothing in here outlives the request; concurrent requests never share a context.
pub struct ExecutionContext {
    pub(crate) stage: LifecycleStage,
    pub(crate) request: Request,
    pub(crate) resource: Box<dyn Resource>,
    pub(crate) resource_type: Arc<ResourceType>,
    pub(crate) explicit_event: Option<String>,
    pub(crate) event: Option<String>,
    pub(crate) errors: ValidationErrors,
}

impl ExecutionContext {
    pub fn new(
        request: Request,
        resource: Box<dyn Resource>,
        resource_type: Arc<ResourceType>,
        explicit_event: Option<String>,
    ) -> Self {
        Self {
            stage: LifecycleStage::Resolution,
            request,
            resource,
            resource_type,
            explicit_event,
            event: None,
            errors: ValidationErrors::new(),
        }
    }

    pub fn stage(&self) -> LifecycleStage {
        self.stage
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    pub fn resource_name(&self) -> &str {
        self.resource_type.name()
    }

    pub fn is_rest(&self) -> bool {
        self.resource_type.is_rest()
    }

    /// The event the request named explicitly, if any.
    pub fn explicit_event(&self) -> Option<&str> {
        self.explicit_event.as_deref()
    }

    /// The event chosen so far.
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    /// Chooses the event to run, overriding any earlier choice.
    pub fn set_event(&mut self, event: impl Into<String>) {
        self.event = Some(event.into());
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ValidationErrors {
        &mut self.errors
    }
}

/// Observes one or more lifecycle stages.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        "interceptor"
    }

    /// Whether this interceptor takes part in `stage`.
    fn intercepts(&self, stage: LifecycleStage) -> bool;

    /// Wraps the rest of the chain for the current stage.
    async fn intercept(&self, ctx: &mut ExecutionContext, next: Next<'_>) -> StageResult;
}

/// The framework's own work for a stage, at the end of every chain.
#[async_trait]
pub trait StageAction: Send + Sync {
    async fn run(&self, ctx: &mut ExecutionContext) -> StageResult;
}

/// The remainder of a stage's chain.
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    action: &'a dyn StageAction,
}

impl<'a> Next<'a> {
    pub fn new(interceptors: &'a [Arc<dyn Interceptor>], action: &'a dyn StageAction) -> Self {
        Self {
            interceptors,
            action,
        }
    }

    /// Runs the next interceptor observing the current stage, or the stage action
    /// once none remain.
    pub async fn proceed(self, ctx: &mut ExecutionContext) -> StageResult {
        let mut remaining = self.interceptors;
        while let Some((first, rest)) = remaining.split_first() {
            if first.intercepts(ctx.stage) {
                return first.intercept(ctx, Next::new(rest, self.action)).await;
            }
            remaining = rest;
        }
        self.action.run(ctx).await
    }
}
