use async_trait::async_trait;
use http::StatusCode;
use rest_framework::mock::MockResource;
use rest_framework::{
    BindFailure, BoxError, CapabilityTable, FieldKind, FieldRule, FieldValue, HttpMethod,
    InterceptorConfig, Pipeline, Request, RequestController, Resolution, Resource,
    ResourceRegistry, ValidationErrors, ValidationFinding,
};
use serde_json::json;

fn table() -> CapabilityTable {
    CapabilityTable::builder()
        .event("get", [HttpMethod::Get])
        .event("head", [])
        .event("post", [HttpMethod::Post])
        .event("archive", [HttpMethod::Post, HttpMethod::Put])
        .build()
}

fn pipeline_for(mock: &MockResource) -> Pipeline {
    let mut registry = ResourceRegistry::new();
    mock.register(&mut registry, "/items");
    Pipeline::builder(registry).with_rest().build()
}

#[tokio::test]
async fn test_unsupported_method_is_405_text() {
    let mock = MockResource::new(table());
    let pipeline = pipeline_for(&mock);

    for method in ["PATCH", "DELETE", "OPTIONS", "PROPFIND"] {
        let response = pipeline.handle(Request::new(method, "/items")).await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(!response.is_json());
        assert_eq!(
            response.body_text(),
            format!("This resource does not support the HTTP method : {method}")
        );
    }

    // No event ever ran.
    assert!(mock.handled().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_method_named_event_runs_without_tag() {
    let mock = MockResource::new(table());
    mock.expect_event("head").return_ok(Resolution::raw_json("{}"));
    let pipeline = pipeline_for(&mock);

    let response = pipeline.handle(Request::new("HEAD", "/items")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(mock.handled(), vec!["head"]);
    mock.verify();
}

#[tokio::test]
async fn test_explicit_event_requires_matching_tag() {
    let mock = MockResource::new(table());
    mock.expect_event("archive").return_ok(Resolution::raw_json("true"));
    let pipeline = pipeline_for(&mock);

    let ok = pipeline
        .handle(Request::from_uri("PUT", "/items?_eventName=archive"))
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    let rejected = pipeline
        .handle(Request::from_uri("GET", "/items?archive"))
        .await;
    assert_eq!(rejected.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        rejected.body_text(),
        "This resource does not support the HTTP method : GET"
    );

    // Untagged events cannot be reached by naming them.
    let rejected = pipeline
        .handle(Request::from_uri("HEAD", "/items?_eventName=head"))
        .await;
    assert_eq!(rejected.status, StatusCode::METHOD_NOT_ALLOWED);

    mock.verify();
}

#[tokio::test]
async fn test_explicit_unknown_event_is_405() {
    let mock = MockResource::new(table());
    let pipeline = pipeline_for(&mock);

    let response = pipeline
        .handle(Request::from_uri("POST", "/items?_eventName=explode"))
        .await;
    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.body_text(),
        "This resource does not support the HTTP method : POST"
    );
}

#[tokio::test]
async fn test_global_validation_findings_are_400_envelope() {
    let mock = MockResource::new(table());
    mock.fail_validation(ValidationFinding::global("first problem"));
    mock.fail_validation(ValidationFinding::global("second problem"));
    let pipeline = pipeline_for(&mock);

    let response = pipeline.handle(Request::new("GET", "/items")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.is_json());
    assert_eq!(
        response.json().unwrap(),
        json!({ "globalErrors": ["first problem", "second problem"] })
    );
    assert!(mock.handled().is_empty());
}

#[tokio::test]
async fn test_field_findings_suppress_global_errors() {
    let mock = MockResource::new(table())
        .with_field(FieldRule::new("count", FieldKind::Integer))
        .with_field(FieldRule::new("label", FieldKind::Text).required_on(["post"]));
    let pipeline = pipeline_for(&mock);

    let response = pipeline
        .handle(Request::from_uri("POST", "/items?count=abc"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json().unwrap(),
        json!({
            "globalErrors": [],
            "fieldErrors": [
                {
                    "fieldName": "count",
                    "fieldValue": "abc",
                    "errorMessages": ["The value (abc) entered in field Count must be a valid number"]
                },
                {
                    "fieldName": "label",
                    "fieldValue": null,
                    "errorMessages": ["Label is a required field"]
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_custom_validation_skipped_after_binding_findings() {
    let mock = MockResource::new(table())
        .with_field(FieldRule::new("count", FieldKind::Integer).required());
    mock.fail_validation(ValidationFinding::global("custom"));
    let pipeline = pipeline_for(&mock);

    let response = pipeline.handle(Request::new("GET", "/items")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json().unwrap();
    assert_eq!(body["globalErrors"], json!([]));
    assert_eq!(body["fieldErrors"][0]["fieldName"], "count");
}

#[tokio::test]
async fn test_custom_validation_can_always_run() {
    let mock = MockResource::new(table())
        .with_field(FieldRule::new("count", FieldKind::Integer).required());
    mock.fail_validation(ValidationFinding::field("count", "custom says no"));

    let mut registry = ResourceRegistry::new();
    mock.register(&mut registry, "/items");
    let config = InterceptorConfig {
        always_invoke_validation: true,
        ..InterceptorConfig::default()
    };
    let pipeline = Pipeline::builder(registry).config(config).with_rest().build();

    let response = pipeline.handle(Request::new("GET", "/items")).await;
    let body = response.json().unwrap();
    assert_eq!(
        body["fieldErrors"][0]["errorMessages"],
        json!(["Count is a required field", "custom says no"])
    );
}

#[tokio::test]
async fn test_not_found_binding_is_404_text() {
    let mock = MockResource::new(table()).with_field(FieldRule::new("id", FieldKind::Integer));
    mock.reject_binding("id", BindFailure::NotFound("Item 42 does not exist".into()));
    let pipeline = pipeline_for(&mock);

    let response = pipeline
        .handle(Request::from_uri("GET", "/items?id=42"))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!response.is_json());
    assert_eq!(response.body_text(), "Item 42 does not exist");
    assert!(mock.handled().is_empty());
}

#[tokio::test]
async fn test_execution_error_is_500_envelope() {
    let mock = MockResource::new(table());
    mock.expect_event("post").return_err("database unavailable");
    let pipeline = pipeline_for(&mock);

    let response = pipeline.handle(Request::new("POST", "/items")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json().unwrap(),
        json!({
            "globalErrors": ["Unexpected error occurred executing this API call: database unavailable"]
        })
    );
    mock.verify();
}

#[tokio::test]
async fn test_execution_panic_is_500_envelope() {
    let mock = MockResource::new(table());
    mock.expect_event("post").panic_with("index out of bounds");
    let pipeline = pipeline_for(&mock);

    let response = pipeline.handle(Request::new("POST", "/items")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json().unwrap()["globalErrors"][0],
        "Unexpected error occurred executing this API call: index out of bounds"
    );
    mock.verify();
}

#[tokio::test]
async fn test_plain_resources_are_untouched() {
    let mock = MockResource::new(
        CapabilityTable::builder()
            .event("show", [])
            .default_event("show")
            .build(),
    );
    mock.expect_event("show").return_ok(Resolution::raw_json("1"));
    mock.expect_event("show").return_err("boom");

    let mut registry = ResourceRegistry::new();
    mock.register_plain(&mut registry, "/plain");
    let pipeline = Pipeline::builder(registry).with_rest().build();

    // Any method reaches the default event.
    let response = pipeline.handle(Request::new("PATCH", "/plain")).await;
    assert_eq!(response.status, StatusCode::OK);

    // Failures keep the framework's plain 500.
    let response = pipeline.handle(Request::new("GET", "/plain")).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.is_json());
    mock.verify();
}

#[tokio::test]
async fn test_pretty_json_mode() {
    let mock = MockResource::new(table());
    mock.expect_event("post").return_err("boom");

    let mut registry = ResourceRegistry::new();
    mock.register(&mut registry, "/items");
    let config = InterceptorConfig {
        pretty_json: true,
        ..InterceptorConfig::default()
    };
    let pipeline = Pipeline::builder(registry).config(config).with_rest().build();

    let response = pipeline.handle(Request::new("POST", "/items")).await;
    assert!(response.body_text().contains("\n  \"globalErrors\""));
}

#[tokio::test]
async fn test_controller_serves_concurrent_requests() {
    let mock = MockResource::new(table());
    for _ in 0..20 {
        mock.expect_event("get").return_ok(Resolution::raw_json("{}"));
    }

    let (controller, client) = RequestController::new(pipeline_for(&mock), 4);
    let handle = tokio::spawn(controller.run());

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                client.get("/items").await
            } else {
                client.delete("/items").await
            }
        }));
    }

    let mut ok = 0;
    let mut rejected = 0;
    for task in tasks {
        let response = task.await.unwrap().unwrap();
        match response.status {
            StatusCode::OK => ok += 1,
            StatusCode::METHOD_NOT_ALLOWED => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 10);
    assert_eq!(rejected, 10);
    assert_eq!(mock.handled().len(), 10);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_client_reports_closed_controller() {
    let mock = MockResource::new(table());
    let (controller, client) = RequestController::new(pipeline_for(&mock), 1);
    drop(controller);

    let result = client.get("/items").await;
    assert_eq!(result.unwrap_err(), rest_framework::TransportError::ControllerClosed);
}

/// Panics while binding `id=0` and while validating `get`.
#[derive(Default)]
struct Volatile;

#[async_trait]
impl Resource for Volatile {
    fn capabilities() -> CapabilityTable {
        CapabilityTable::builder()
            .event("get", [HttpMethod::Get])
            .event("post", [HttpMethod::Post])
            .build()
    }

    fn fields() -> Vec<FieldRule> {
        vec![FieldRule::new("id", FieldKind::Integer)]
    }

    fn bind(&mut self, _field: &str, value: FieldValue) -> Result<(), BindFailure> {
        if value.as_i64() == Some(0) {
            panic!("binder exploded");
        }
        Ok(())
    }

    async fn validate(&self, event: &str, _errors: &mut ValidationErrors) {
        if event == "get" {
            panic!("validator exploded");
        }
    }

    async fn handle(&mut self, _event: &str) -> Result<Resolution, BoxError> {
        Ok(Resolution::raw_json("{}"))
    }
}

#[tokio::test]
async fn test_panics_outside_execution_still_answer() {
    let mut registry = ResourceRegistry::new();
    registry.register::<Volatile>("/volatile");
    let pipeline = Pipeline::builder(registry).with_rest().build();

    let (controller, client) = RequestController::new(pipeline, 4);
    let handle = tokio::spawn(controller.run());

    let response = client.get("/volatile").await.unwrap();
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body_text(), "Internal Server Error");

    let response = client.post("/volatile?id=0").await.unwrap();
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    // The controller keeps serving after a panic.
    let response = client.post("/volatile?id=7").await.unwrap();
    assert_eq!(response.status, StatusCode::OK);

    drop(client);
    handle.await.unwrap();
}
