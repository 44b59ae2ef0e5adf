//! # Resource Registry
//!
//! The default resolution collaborator: maps exact request paths to registered
//! resource types and instantiates a fresh resource for every request.
//!
//! Registration is where each type's [`CapabilityTable`] and field rules are captured.
//! Requests share those tables read-only through an `Arc`.

use crate::binding::FieldRule;
use crate::capability::CapabilityTable;
use crate::request::Request;
use crate::resource::Resource;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

type Factory = Arc<dyn Fn() -> Box<dyn Resource> + Send + Sync>;

/// Everything known about a registered resource type.
pub struct ResourceType {
    name: String,
    rest: bool,
    capabilities: CapabilityTable,
    fields: Vec<FieldRule>,
    factory: Factory,
}

impl ResourceType {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the REST interceptor handles requests for this type.
    pub fn is_rest(&self) -> bool {
        self.rest
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    pub fn instantiate(&self) -> Box<dyn Resource> {
        (self.factory)()
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceType")
            .field("name", &self.name)
            .field("rest", &self.rest)
            .field("capabilities", &self.capabilities)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// A resource instance resolved for one request.
pub struct Resolved {
    pub resource: Box<dyn Resource>,
    pub resource_type: Arc<ResourceType>,
    /// The event the request names explicitly, if any.
    pub explicit_event: Option<String>,
}

/// Maps a request to the resource that handles it.
pub trait Resolver: Send + Sync {
    fn resolve(&self, request: &Request, event_parameter: &str) -> Option<Resolved>;
}

/// Path-keyed registry of resource types.
#[derive(Default)]
pub struct ResourceRegistry {
    routes: HashMap<String, Arc<ResourceType>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a REST resource type at `path`.
    pub fn register<R: Resource + Default>(&mut self, path: impl Into<String>) -> &mut Self {
        self.register_type(path, true, short_type_name::<R>(), R::capabilities(), R::fields(), || {
            Box::new(R::default()) as Box<dyn Resource>
        })
    }

    /// Registers a resource type the REST interceptor leaves alone.
    pub fn register_plain<R: Resource + Default>(&mut self, path: impl Into<String>) -> &mut Self {
        self.register_type(path, false, short_type_name::<R>(), R::capabilities(), R::fields(), || {
            Box::new(R::default()) as Box<dyn Resource>
        })
    }

    /// Registers a type with explicitly supplied tables and factory.
    pub fn register_type<F>(
        &mut self,
        path: impl Into<String>,
        rest: bool,
        name: impl Into<String>,
        capabilities: CapabilityTable,
        fields: Vec<FieldRule>,
        factory: F,
    ) -> &mut Self
    where
        F: Fn() -> Box<dyn Resource> + Send + Sync + 'static,
    {
        let path = path.into();
        let resource_type = ResourceType {
            name: name.into(),
            rest,
            capabilities,
            fields,
            factory: Arc::new(factory),
        };
        info!(
            %path,
            resource = resource_type.name(),
            rest,
            events = resource_type.capabilities().events().count(),
            "Registered"
        );
        self.routes.insert(path, Arc::new(resource_type));
        self
    }

    pub fn resource_type(&self, path: &str) -> Option<&Arc<ResourceType>> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Resolver for ResourceRegistry {
    fn resolve(&self, request: &Request, event_parameter: &str) -> Option<Resolved> {
        let resource_type = self.routes.get(request.path())?.clone();
        let explicit_event = explicit_event(request, event_parameter, resource_type.capabilities());
        debug!(
            path = request.path(),
            resource = resource_type.name(),
            ?explicit_event,
            "Resolved"
        );
        Some(Resolved {
            resource: resource_type.instantiate(),
            resource_type,
            explicit_event,
        })
    }
}

/// The event a request names: the event parameter's value, or else the name of the
/// first parameter that matches a declared event.
fn explicit_event(
    request: &Request,
    event_parameter: &str,
    capabilities: &CapabilityTable,
) -> Option<String> {
    if let Some(event) = request.param(event_parameter) {
        let event = event.trim();
        if !event.is_empty() {
            return Some(event.to_string());
        }
    }
    request
        .params()
        .iter()
        .map(|(name, _)| name.as_str())
        .find(|name| capabilities.contains(name))
        .map(str::to_string)
}

fn short_type_name<R>() -> String {
    let full = std::any::type_name::<R>();
    let base = full.split('<').next().unwrap_or(full);
    base.split("::").last().unwrap_or("Unknown").to_string()
}
