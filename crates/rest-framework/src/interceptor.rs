//! # REST Interceptor
//!
//! Retrofits REST semantics onto the stage pipeline. It observes all four stages but
//! only acts for resource types registered as REST resources; everything else passes
//! straight through.
//!
//! | Stage | Before proceeding | After proceeding |
//! |-------|-------------------|------------------|
//! | Resolution | pick the event from the HTTP method, or halt with 405 | |
//! | Binding | | halt with 404 on a not-found finding |
//! | CustomValidation | | halt with 400 and the error envelope on any finding |
//! | Execution | | halt with 500 and the error envelope on an uncaught failure |

use crate::config::InterceptorConfig;
use crate::dispatch;
use crate::envelope::JsonMode;
use crate::error::RestError;
use crate::normalizer;
use crate::stage::{ExecutionContext, Flow, Interceptor, LifecycleStage, Next, StageResult};
use async_trait::async_trait;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct RestInterceptor {
    mode: JsonMode,
}

impl RestInterceptor {
    pub fn new(config: &InterceptorConfig) -> Self {
        Self {
            mode: config.json_mode(),
        }
    }

    fn halt(&self, error: RestError) -> StageResult {
        Ok(Flow::Halt(error.into_resolution(self.mode)))
    }

    async fn resolve(&self, ctx: &mut ExecutionContext, next: Next<'_>) -> StageResult {
        let method = ctx.request().method().to_string();
        debug!(resource = ctx.resource_name(), %method, explicit_event = ?ctx.explicit_event(), "Dispatching");

        match dispatch::decide(
            ctx.resource_name(),
            &method,
            ctx.explicit_event(),
            ctx.resource_type().capabilities(),
        ) {
            Ok(decision) => {
                debug!(
                    resource = ctx.resource_name(),
                    event = %decision.event,
                    matched = decision.matched,
                    "Event selected"
                );
                ctx.set_event(decision.event);
                next.proceed(ctx).await
            }
            Err(e) => {
                warn!(resource = ctx.resource_name(), method = e.method(), error = ?e, "Method not supported");
                self.halt(e.into())
            }
        }
    }

    async fn bind(&self, ctx: &mut ExecutionContext, next: Next<'_>) -> StageResult {
        let flow = next.proceed(ctx).await?;
        debug!(resource = ctx.resource_name(), "Checking for not-found findings");
        match normalizer::not_found(ctx.errors()) {
            Some(e) => {
                warn!(resource = ctx.resource_name(), error = %e, "Resource not found");
                self.halt(e)
            }
            None => Ok(flow),
        }
    }

    async fn validate(&self, ctx: &mut ExecutionContext, next: Next<'_>) -> StageResult {
        let flow = next.proceed(ctx).await?;
        debug!(resource = ctx.resource_name(), "Checking for validation findings");
        match normalizer::validation_failure(ctx.errors()) {
            Some(e) => {
                warn!(
                    resource = ctx.resource_name(),
                    findings = ctx.errors().len(),
                    field_errors = ctx.errors().has_field_errors(),
                    "Validation failed"
                );
                self.halt(e)
            }
            None => Ok(flow),
        }
    }

    async fn execute(&self, ctx: &mut ExecutionContext, next: Next<'_>) -> StageResult {
        match normalizer::contain(next.proceed(ctx)).await {
            Ok(flow) => Ok(flow),
            Err(failure) => {
                error!(
                    resource = ctx.resource_name(),
                    event = ?ctx.event(),
                    error = %failure,
                    "Unhandled failure executing event"
                );
                self.halt(normalizer::execution_failure(&failure))
            }
        }
    }
}

#[async_trait]
impl Interceptor for RestInterceptor {
    fn name(&self) -> &str {
        "rest"
    }

    fn intercepts(&self, _stage: LifecycleStage) -> bool {
        true
    }

    async fn intercept(&self, ctx: &mut ExecutionContext, next: Next<'_>) -> StageResult {
        if !ctx.is_rest() {
            return next.proceed(ctx).await;
        }
        debug!(resource = ctx.resource_name(), stage = %ctx.stage(), "REST resource");

        match ctx.stage() {
            LifecycleStage::Resolution => self.resolve(ctx, next).await,
            LifecycleStage::Binding => self.bind(ctx, next).await,
            LifecycleStage::CustomValidation => self.validate(ctx, next).await,
            LifecycleStage::Execution => self.execute(ctx, next).await,
        }
    }
}
