use async_trait::async_trait;
use rest_framework::{BoxError, CapabilityTable, Resolution, Resource};
use serde::Serialize;

/// Serves `/status`. Registered as a plain resource, so the framework's own event
/// resolution applies: every method reaches `show` unless another event is named.
#[derive(Debug, Default)]
pub struct StatusPage;

#[derive(Debug, Serialize)]
struct Status {
    status: &'static str,
    version: &'static str,
}

#[async_trait]
impl Resource for StatusPage {
    fn capabilities() -> CapabilityTable {
        CapabilityTable::builder()
            .event("show", [])
            .event("version", [])
            .default_event("show")
            .build()
    }

    async fn handle(&mut self, event: &str) -> Result<Resolution, BoxError> {
        let status = Status {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        };
        match event {
            "version" => Ok(Resolution::json(status.version)?),
            _ => Ok(Resolution::json(&status)?),
        }
    }
}
