//! # Sample Resources
//!
//! - [`ExampleResource`]: the canonical REST resource, one event per interceptor outcome.
//! - [`WidgetResource`]: typed fields, not-found lookups and an explicit multi-verb event.
//! - [`StatusPage`]: a plain resource the REST interceptor leaves alone.

pub mod example;
pub mod status;
pub mod widget;

pub use example::ExampleResource;
pub use status::StatusPage;
pub use widget::{Widget, WidgetError, WidgetResource};
