//! # System Lifecycle
//!
//! Wires the sample resources into a running system: a registry, a pipeline with the
//! REST interceptor installed, and a request controller on its own task.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the client**: closes the sending side of the request channel
//! 2. **Controller detects closure**: `recv()` returns `None`
//! 3. **Controller drains**: in-flight requests finish and are answered
//! 4. **Await completion**: the controller task ends
//!
//! Clones of the client handed out with [`RestSystem::client`] keep the controller
//! alive until they are dropped too.

pub mod rest_system;

pub use rest_system::*;
