//! # REST Client
//!
//! The cloneable handle used to submit requests to a
//! [`RequestController`](crate::RequestController).

use crate::error::TransportError;
use crate::message::ControllerRequest;
use crate::method::HttpMethod;
use crate::request::Request;
use crate::response::Response;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

/// Holds only a sender, so clones are cheap and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct RestClient {
    sender: mpsc::Sender<ControllerRequest>,
}

impl RestClient {
    pub fn new(sender: mpsc::Sender<ControllerRequest>) -> Self {
        Self { sender }
    }

    /// Sends a request and waits for its response.
    #[instrument(skip_all, fields(method = request.method(), path = request.path()))]
    pub async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ControllerRequest {
                request,
                respond_to,
            })
            .await
            .map_err(|_| TransportError::ControllerClosed)?;
        response.await.map_err(|_| TransportError::ControllerDropped)
    }

    /// Sends `method` to `uri`, which may carry a query string.
    pub async fn call(&self, method: HttpMethod, uri: &str) -> Result<Response, TransportError> {
        self.send(Request::from_uri(method.as_str(), uri)).await
    }

    pub async fn get(&self, uri: &str) -> Result<Response, TransportError> {
        self.call(HttpMethod::Get, uri).await
    }

    pub async fn head(&self, uri: &str) -> Result<Response, TransportError> {
        self.call(HttpMethod::Head, uri).await
    }

    pub async fn post(&self, uri: &str) -> Result<Response, TransportError> {
        self.call(HttpMethod::Post, uri).await
    }

    pub async fn put(&self, uri: &str) -> Result<Response, TransportError> {
        self.call(HttpMethod::Put, uri).await
    }

    pub async fn delete(&self, uri: &str) -> Result<Response, TransportError> {
        self.call(HttpMethod::Delete, uri).await
    }
}
