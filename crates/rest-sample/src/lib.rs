//! # REST Sample Library
//!
//! Sample resources and the system wiring, exposed for integration testing.

pub mod lifecycle;
pub mod model;
