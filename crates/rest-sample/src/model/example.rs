use async_trait::async_trait;
use rest_framework::{
    BindFailure, BoxError, CapabilityTable, FieldKind, FieldRule, FieldValue, HttpMethod,
    Resolution, Resource, ValidationErrors,
};
use serde_json::json;

pub const HEAD_REJECTION: &str = "The head request was not valid for whatever custom reason.";
pub const UNHANDLED_FAILURE: &str = "This is a completely unhandled exception.";

/// Serves `/stripes-rest`.
///
/// | Event | Reached by | Outcome |
/// |-------|------------|---------|
/// | `get` | `GET` | 200 with a fixed JSON document |
/// | `head` | `HEAD` (no tag needed) | 400: `id` is required and custom validation always fails |
/// | `runtime_error_post` | `POST` naming the event | 500: the event always fails |
///
/// Any other method is answered with a 405.
#[derive(Debug, Default)]
pub struct ExampleResource {
    id: Option<String>,
}

impl ExampleResource {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[async_trait]
impl Resource for ExampleResource {
    fn capabilities() -> CapabilityTable {
        CapabilityTable::builder()
            .event("get", [HttpMethod::Get])
            .event("head", [])
            .event("runtime_error_post", [HttpMethod::Post])
            .default_event("get")
            .build()
    }

    fn fields() -> Vec<FieldRule> {
        vec![FieldRule::new("id", FieldKind::Text).required_on(["head"])]
    }

    fn bind(&mut self, field: &str, value: FieldValue) -> Result<(), BindFailure> {
        if field == "id" {
            self.id = value.as_str().map(str::to_string);
        }
        Ok(())
    }

    async fn validate(&self, event: &str, errors: &mut ValidationErrors) {
        if event == "head" {
            errors.add_global(HEAD_REJECTION);
        }
    }

    async fn handle(&mut self, event: &str) -> Result<Resolution, BoxError> {
        match event {
            "get" => Ok(Resolution::json(&json!({
                "foo": "bar",
                "hello": "world",
                "numbers": { "one": 1, "two": 2 }
            }))?),
            "head" => Ok(Resolution::json("Successful head!")?),
            "runtime_error_post" => Err(UNHANDLED_FAILURE.into()),
            other => Err(format!("unknown event {other}").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_fixed_document() {
        let mut resource = ExampleResource::default();
        let resolution = resource.handle("get").await.unwrap();
        assert_eq!(
            resolution,
            Resolution::Json(json!({
                "foo": "bar",
                "hello": "world",
                "numbers": { "one": 1, "two": 2 }
            }))
        );
    }

    #[tokio::test]
    async fn head_validation_always_fails() {
        let resource = ExampleResource::default();
        let mut errors = ValidationErrors::new();
        resource.validate("head", &mut errors).await;
        assert_eq!(errors.len(), 1);

        let mut errors = ValidationErrors::new();
        resource.validate("get", &mut errors).await;
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn runtime_error_post_fails_with_message() {
        let mut resource = ExampleResource::default();
        let err = resource.handle("runtime_error_post").await.unwrap_err();
        assert_eq!(err.to_string(), UNHANDLED_FAILURE);
    }

    #[test]
    fn binds_id() {
        let mut resource = ExampleResource::default();
        resource
            .bind("id", FieldValue::Text("SOME_ID".into()))
            .unwrap();
        assert_eq!(resource.id(), Some("SOME_ID"));
    }
}
