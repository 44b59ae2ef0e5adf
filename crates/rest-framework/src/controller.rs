//! # Request Controller
//!
//! The server half of the host adapter. A [`RequestController`] owns the receiving
//! end of the request channel and hands each request to the shared [`Pipeline`].
//!
//! Unlike a stateful actor, the controller keeps no per-resource state: every request
//! gets a fresh resource instance and its own execution context. Each request is
//! therefore processed on its own spawned task, so a slow event never holds up the
//! requests queued behind it.
//!
//! ```rust
//! use rest_framework::{
//!     BoxError, CapabilityTable, HttpMethod, Pipeline, RequestController, Resolution,
//!     Resource, ResourceRegistry,
//! };
//! use async_trait::async_trait;
//!
//! #[derive(Default)]
//! struct Ping;
//!
//! #[async_trait]
//! impl Resource for Ping {
//!     fn capabilities() -> CapabilityTable {
//!         CapabilityTable::builder().event("get", [HttpMethod::Get]).build()
//!     }
//!     async fn handle(&mut self, _event: &str) -> Result<Resolution, BoxError> {
//!         Ok(Resolution::raw_json(r#""pong""#))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut registry = ResourceRegistry::new();
//!     registry.register::<Ping>("/ping");
//!     let pipeline = Pipeline::builder(registry).with_rest().build();
//!
//!     let (controller, client) = RequestController::new(pipeline, 8);
//!     let handle = tokio::spawn(controller.run());
//!
//!     let response = client.get("/ping").await.unwrap();
//!     assert_eq!(response.body_text(), "\"pong\"");
//!
//!     drop(client);
//!     handle.await.unwrap();
//! }
//! ```

use crate::client::RestClient;
use crate::message::ControllerRequest;
use crate::pipeline::Pipeline;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub struct RequestController {
    receiver: mpsc::Receiver<ControllerRequest>,
    pipeline: Arc<Pipeline>,
}

impl RequestController {
    /// Creates a controller and the client that feeds it.
    ///
    /// `buffer_size` bounds the request channel; clients wait when it is full.
    pub fn new(pipeline: Pipeline, buffer_size: usize) -> (Self, RestClient) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let controller = Self {
            receiver,
            pipeline: Arc::new(pipeline),
        };
        (controller, RestClient::new(sender))
    }

    /// Serves requests until every client has been dropped, then waits for
    /// in-flight requests to finish.
    pub async fn run(mut self) {
        info!("Controller started");
        let mut in_flight = JoinSet::new();
        let mut served: u64 = 0;

        while let Some(ControllerRequest {
            request,
            respond_to,
        }) = self.receiver.recv().await
        {
            served += 1;
            debug!(method = request.method(), path = request.path(), "Accepted");
            let pipeline = Arc::clone(&self.pipeline);
            in_flight.spawn(async move {
                let response = pipeline.handle(request).await;
                if respond_to.send(response).is_err() {
                    warn!("Client went away before the response was ready");
                }
            });

            // Reap whatever already finished so the set does not grow unbounded.
            while let Some(joined) = in_flight.try_join_next() {
                if let Err(e) = joined {
                    warn!(error = %e, "Request task failed");
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Request task failed");
            }
        }
        info!(served, "Shutdown");
    }
}
