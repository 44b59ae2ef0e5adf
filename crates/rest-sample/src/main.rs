//! # REST Recipe
//!
//! Runs the sample system and walks through every outcome the REST interceptor can
//! produce, logging each response:
//!
//! 1. `GET /stripes-rest`: 200 with JSON
//! 2. `POST /stripes-rest`: 405, no `post` event
//! 3. `HEAD /stripes-rest?id=SOME_ID`: 400, custom validation fails
//! 4. `POST /stripes-rest?_eventName=runtime_error_post`: 500, the event fails
//! 5. `GET /widgets?id=99`: 404, no such widget
//! 6. `POST /widgets?quantity=abc`: 400, field errors
//! 7. `PUT /widgets?restock&id=1&quantity=5`: 200, explicit event
//! 8. `PATCH /status`: 200, plain resource dispatched by default event
//!
//! Set `RUST_LOG=debug` to follow each request through the lifecycle stages.

use rest_framework::logging::setup_tracing;
use rest_framework::HttpMethod;
use rest_sample::lifecycle::RestSystem;
use tracing::{info, Instrument};

const SCENARIOS: [(HttpMethod, &str); 8] = [
    (HttpMethod::Get, "/stripes-rest"),
    (HttpMethod::Post, "/stripes-rest"),
    (HttpMethod::Head, "/stripes-rest?id=SOME_ID"),
    (HttpMethod::Post, "/stripes-rest?_eventName=runtime_error_post"),
    (HttpMethod::Get, "/widgets?id=99"),
    (HttpMethod::Post, "/widgets?quantity=abc"),
    (HttpMethod::Put, "/widgets?restock&id=1&quantity=5"),
    (HttpMethod::Patch, "/status"),
];

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting REST sample system");
    let system = RestSystem::new();

    for (method, uri) in SCENARIOS {
        let span = tracing::info_span!("scenario", %method, uri);
        let response = async { system.client.call(method, uri).await }
            .instrument(span)
            .await
            .map_err(|e| e.to_string())?;

        info!(
            %method,
            uri,
            status = response.status.as_u16(),
            content_type = %response.content_type,
            body = %response.body_text(),
            "Response"
        );
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
