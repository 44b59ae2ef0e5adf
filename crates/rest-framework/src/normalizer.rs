//! # Error Normalizer
//!
//! Classifies what binding, validation and execution left behind and turns failures
//! into [`RestError`]s:
//!
//! | Stage | Looks at | Produces |
//! |-------|----------|----------|
//! | Binding | findings with the not-found marker | [`RestError::NotFound`] (404) |
//! | CustomValidation | the full finding set | [`RestError::Validation`] (400) |
//! | Execution | errors and panics escaping the event | [`RestError::Execution`] (500) |

use crate::envelope::ErrorEnvelope;
use crate::error::{RestError, StageFailure};
use crate::stage::StageResult;
use crate::validation::ValidationErrors;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// The first not-found finding, as a 404 error.
pub fn not_found(errors: &ValidationErrors) -> Option<RestError> {
    errors
        .not_found()
        .map(|finding| RestError::NotFound(finding.message.clone()))
}

/// Any remaining findings, as a 400 error carrying the envelope.
pub fn validation_failure(errors: &ValidationErrors) -> Option<RestError> {
    if errors.is_empty() {
        return None;
    }
    Some(RestError::Validation(ErrorEnvelope::from_findings(errors)))
}

/// An uncaught execution failure, keeping only its message.
pub fn execution_failure(failure: &StageFailure) -> RestError {
    RestError::Execution {
        cause: failure.to_string(),
    }
}

/// Runs `stage`, turning a panic into [`StageFailure::Panicked`].
pub async fn contain<F>(stage: F) -> StageResult
where
    F: Future<Output = StageResult>,
{
    match AssertUnwindSafe(stage).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(StageFailure::Panicked {
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Flow;
    use crate::validation::ValidationFinding;

    #[test]
    fn not_found_wins_over_other_findings() {
        let mut errors = ValidationErrors::new();
        errors.add_global("something else");
        errors.add(ValidationFinding::field("id", "Widget 4 does not exist").not_found());
        match not_found(&errors) {
            Some(RestError::NotFound(message)) => assert_eq!(message, "Widget 4 does not exist"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_findings_are_not_a_failure() {
        assert!(validation_failure(&ValidationErrors::new()).is_none());
        assert!(not_found(&ValidationErrors::new()).is_none());
    }

    #[test]
    fn execution_failure_keeps_message_only() {
        let failure = StageFailure::Handler {
            event: "post".into(),
            source: "boom".into(),
        };
        match execution_failure(&failure) {
            RestError::Execution { cause } => assert_eq!(cause, "boom"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn contain_passes_results_through() {
        let result = contain(async { Ok::<_, StageFailure>(Flow::Continue) }).await;
        assert!(matches!(result, Ok(Flow::Continue)));
    }

    async fn explode() -> StageResult {
        panic!("kaboom")
    }

    async fn explode_with(code: u32) -> StageResult {
        panic!("code {code}")
    }

    #[tokio::test]
    async fn contain_catches_panics() {
        match contain(explode()).await {
            Err(StageFailure::Panicked { message }) => assert_eq!(message, "kaboom"),
            other => panic!("unexpected: {other:?}"),
        }
        match contain(explode_with(7)).await {
            Err(StageFailure::Panicked { message }) => assert_eq!(message, "code 7"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
