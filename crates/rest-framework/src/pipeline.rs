//! # Request Pipeline
//!
//! The framework's request lifecycle. A [`Pipeline`] resolves the resource a request
//! targets, then drives the four [`LifecycleStage`]s in order, running each stage's
//! interceptor chain around the framework's own action for that stage.
//!
//! ## Stage Actions
//!
//! * **Resolution**: keeps an event an interceptor already chose; otherwise uses the
//!   request's explicit event, then the resource's default event.
//! * **Binding**: hands the resource, its field rules and the request to the binder.
//! * **CustomValidation**: runs [`Resource::validate`](crate::Resource::validate) when
//!   binding left no findings (or always, if configured), then freezes the findings.
//! * **Execution**: runs the event and halts with whatever it resolves to.
//!
//! Exactly one [`Response`] is produced per request: the first halt wins. A failure or
//! panic no interceptor handled ends the request with a plain 500.

use crate::binding::{Binder, ParameterBinder};
use crate::config::InterceptorConfig;
use crate::error::StageFailure;
use crate::interceptor::RestInterceptor;
use crate::normalizer;
use crate::registry::Resolver;
use crate::request::Request;
use crate::response::{Resolution, Response, TEXT_PLAIN};
use crate::stage::{ExecutionContext, Flow, Interceptor, LifecycleStage, Next, StageAction, StageResult};
use async_trait::async_trait;
use http::StatusCode;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct Pipeline {
    resolver: Arc<dyn Resolver>,
    binder: Arc<dyn Binder>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    config: InterceptorConfig,
}

impl Pipeline {
    pub fn builder(resolver: impl Resolver + 'static) -> PipelineBuilder {
        PipelineBuilder {
            resolver: Arc::new(resolver),
            binder: Arc::new(ParameterBinder),
            interceptors: Vec::new(),
            config: InterceptorConfig::default(),
            rest: false,
        }
    }

    pub fn config(&self) -> &InterceptorConfig {
        &self.config
    }

    /// Runs one request through the lifecycle and renders its response.
    pub async fn handle(&self, request: Request) -> Response {
        let mode = self.config.json_mode();
        let Some(resolved) = self.resolver.resolve(&request, &self.config.event_parameter) else {
            warn!(method = request.method(), path = request.path(), "No resource bound");
            return Response::text(
                StatusCode::NOT_FOUND,
                format!("No resource is bound to {}", request.path()),
            );
        };

        let mut ctx = ExecutionContext::new(
            request,
            resolved.resource,
            resolved.resource_type,
            resolved.explicit_event,
        );
        let response = self.run_stages(&mut ctx).await.render(mode);
        info!(
            resource = ctx.resource_name(),
            method = ctx.request().method(),
            event = ?ctx.event(),
            status = response.status.as_u16(),
            "Request complete"
        );
        response
    }

    async fn run_stages(&self, ctx: &mut ExecutionContext) -> Resolution {
        let actions = StageActions { pipeline: self };

        for stage in LifecycleStage::ORDER {
            ctx.stage = stage;
            debug!(resource = ctx.resource_name(), %stage, "Entering stage");

            let chain = Next::new(&self.interceptors, &actions).proceed(ctx);
            match normalizer::contain(chain).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Halt(resolution)) => {
                    debug!(resource = ctx.resource_name(), %stage, status = resolution.status().as_u16(), "Halted");
                    return resolution;
                }
                Err(failure) => {
                    error!(resource = ctx.resource_name(), %stage, error = %failure, "Unhandled stage failure");
                    return Resolution::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
                }
            }

            if stage == LifecycleStage::CustomValidation && !ctx.errors.is_empty() {
                let messages: Vec<&str> = ctx.errors.iter().map(|f| f.message.as_str()).collect();
                return Resolution::error(StatusCode::BAD_REQUEST, messages.join("\n"));
            }
        }

        Resolution::Stream {
            status: StatusCode::NO_CONTENT,
            content_type: TEXT_PLAIN.to_string(),
            body: Vec::new(),
        }
    }
}

pub struct PipelineBuilder {
    resolver: Arc<dyn Resolver>,
    binder: Arc<dyn Binder>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    config: InterceptorConfig,
    rest: bool,
}

impl PipelineBuilder {
    pub fn config(mut self, config: InterceptorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn binder(mut self, binder: impl Binder + 'static) -> Self {
        self.binder = Arc::new(binder);
        self
    }

    /// Adds an interceptor. Interceptors run in the order they are added.
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Installs the [`RestInterceptor`] as the outermost interceptor.
    pub fn with_rest(mut self) -> Self {
        self.rest = true;
        self
    }

    pub fn build(mut self) -> Pipeline {
        if self.rest {
            self.interceptors
                .insert(0, Arc::new(RestInterceptor::new(&self.config)));
        }
        Pipeline {
            resolver: self.resolver,
            binder: self.binder,
            interceptors: self.interceptors,
            config: self.config,
        }
    }
}

struct StageActions<'p> {
    pipeline: &'p Pipeline,
}

impl StageActions<'_> {
    fn resolve_event(&self, ctx: &mut ExecutionContext) -> StageResult {
        let capabilities = ctx.resource_type.capabilities();
        let event = ctx
            .event
            .clone()
            .or_else(|| ctx.explicit_event.clone())
            .or_else(|| capabilities.default_event().map(str::to_string));

        match event {
            Some(event) if capabilities.contains(&event) => {
                ctx.event = Some(event);
                Ok(Flow::Continue)
            }
            Some(event) => {
                warn!(resource = ctx.resource_name(), %event, "No handler for event");
                Ok(Flow::Halt(Resolution::error(
                    StatusCode::NOT_FOUND,
                    format!("No handler for event {event}"),
                )))
            }
            None => {
                warn!(resource = ctx.resource_name(), "No default event");
                Ok(Flow::Halt(Resolution::error(
                    StatusCode::NOT_FOUND,
                    format!("No default handler for {}", ctx.resource_name()),
                )))
            }
        }
    }
}

#[async_trait]
impl<'p> StageAction for StageActions<'p> {
    async fn run(&self, ctx: &mut ExecutionContext) -> StageResult {
        match ctx.stage {
            LifecycleStage::Resolution => self.resolve_event(ctx),
            LifecycleStage::Binding => {
                let event = ctx.event.clone().unwrap_or_default();
                self.pipeline.binder.bind(
                    ctx.resource.as_mut(),
                    ctx.resource_type.fields(),
                    &ctx.request,
                    &event,
                    &mut ctx.errors,
                );
                Ok(Flow::Continue)
            }
            LifecycleStage::CustomValidation => {
                if ctx.errors.is_empty() || self.pipeline.config.always_invoke_validation {
                    let event = ctx.event.clone().unwrap_or_default();
                    ctx.resource.validate(&event, &mut ctx.errors).await;
                }
                ctx.errors.freeze();
                Ok(Flow::Continue)
            }
            LifecycleStage::Execution => {
                let event = ctx.event.clone().unwrap_or_default();
                debug!(resource = ctx.resource_name(), %event, "Executing event");
                match ctx.resource.handle(&event).await {
                    Ok(resolution) => Ok(Flow::Halt(resolution)),
                    Err(source) => Err(StageFailure::Handler { event, source }),
                }
            }
        }
    }
}
