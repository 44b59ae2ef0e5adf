//! # Controller Messages
//!
//! The single message type carried from a [`RestClient`](crate::RestClient) to the
//! [`RequestController`](crate::RequestController).

use crate::request::Request;
use crate::response::Response;
use tokio::sync::oneshot;

/// One-shot channel the controller answers on.
pub type Responder = oneshot::Sender<Response>;

/// A request awaiting a response.
///
/// Every request is answered exactly once, even when the pipeline fails, so the
/// responder never carries an error: failures arrive as 4xx/5xx [`Response`]s.
#[derive(Debug)]
pub struct ControllerRequest {
    pub request: Request,
    pub respond_to: Responder,
}
