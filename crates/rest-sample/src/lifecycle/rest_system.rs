use crate::model::{ExampleResource, StatusPage, WidgetResource};
use rest_framework::{InterceptorConfig, Pipeline, RequestController, ResourceRegistry, RestClient};
use tracing::{error, info};

pub const EXAMPLE_PATH: &str = "/stripes-rest";
pub const WIDGETS_PATH: &str = "/widgets";
pub const STATUS_PATH: &str = "/status";

/// The registry of every sample resource.
pub fn registry() -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();
    registry
        .register::<ExampleResource>(EXAMPLE_PATH)
        .register::<WidgetResource>(WIDGETS_PATH)
        .register_plain::<StatusPage>(STATUS_PATH);
    registry
}

/// The running sample system.
///
/// # Example
///
/// ```ignore
/// let system = RestSystem::new();
/// let response = system.client.get("/stripes-rest").await?;
/// system.shutdown().await?;
/// ```
pub struct RestSystem {
    /// Client for submitting requests to the controller
    pub client: RestClient,

    handle: tokio::task::JoinHandle<()>,
}

impl RestSystem {
    /// Starts the system with configuration taken from the environment.
    pub fn new() -> Self {
        Self::with_config(InterceptorConfig::from_env())
    }

    pub fn with_config(config: InterceptorConfig) -> Self {
        let buffer = config.controller_buffer;
        let pipeline = Pipeline::builder(registry())
            .config(config)
            .with_rest()
            .build();

        let (controller, client) = RequestController::new(pipeline, buffer);
        let handle = tokio::spawn(controller.run());
        info!(buffer, "System started");

        Self { client, handle }
    }

    /// A client that can be moved to another task.
    pub fn client(&self) -> RestClient {
        self.client.clone()
    }

    /// Closes the request channel and waits for the controller to finish.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!(error = %e, "Controller task failed");
            return Err(format!("Controller task failed: {e}"));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

impl Default for RestSystem {
    fn default() -> Self {
        Self::new()
    }
}
