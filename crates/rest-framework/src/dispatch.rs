//! # Verb Dispatcher
//!
//! Chooses the event a REST request runs, before the framework's own event
//! resolution, and rejects methods the resource does not support.
//!
//! - **Explicit event**: the event must exist and be tagged with the inbound method.
//! - **No explicit event**: the lowercase method name is the event name, and the
//!   resource must declare an event with exactly that name. No tag is required.
//!
//! Every rejection is a [`DispatchError`], answered with a 405.

use crate::capability::CapabilityTable;
use crate::error::DispatchError;
use crate::method::HttpMethod;

/// The outcome of dispatching one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchDecision {
    pub event: String,
    pub method: HttpMethod,
    /// The event carries a capability tag for the inbound method. Always true for an
    /// explicit event; for a method-named event it records whether the tag is present.
    pub matched: bool,
}

/// Decides which event of `resource` handles a request with `method`.
///
/// ```rust
/// use rest_framework::dispatch::decide;
/// use rest_framework::{CapabilityTable, HttpMethod};
///
/// let table = CapabilityTable::builder()
///     .event("get", [HttpMethod::Get])
///     .event("head", [])
///     .build();
///
/// assert_eq!(decide("Example", "get", None, &table).unwrap().event, "get");
/// assert_eq!(decide("Example", "HEAD", None, &table).unwrap().event, "head");
/// assert!(decide("Example", "POST", None, &table).is_err());
/// ```
pub fn decide(
    resource: &str,
    method: &str,
    explicit_event: Option<&str>,
    table: &CapabilityTable,
) -> Result<DispatchDecision, DispatchError> {
    let wire_method = method.trim().to_uppercase();
    let parsed = wire_method.parse::<HttpMethod>();

    match explicit_event {
        Some(event) => {
            if !table.contains(event) {
                return Err(DispatchError::NoSuchEvent {
                    resource: resource.to_string(),
                    method: wire_method,
                    event: event.to_string(),
                });
            }
            match parsed {
                Ok(method) if table.supports(event, method) => Ok(DispatchDecision {
                    event: event.to_string(),
                    method,
                    matched: true,
                }),
                _ => Err(DispatchError::MethodNotSupported {
                    resource: resource.to_string(),
                    method: wire_method,
                    event: Some(event.to_string()),
                }),
            }
        }
        None => match parsed {
            Ok(method) if table.contains(method.event_name()) => Ok(DispatchDecision {
                event: method.event_name().to_string(),
                method,
                matched: table.supports(method.event_name(), method),
            }),
            _ => Err(DispatchError::MethodNotSupported {
                resource: resource.to_string(),
                method: wire_method,
                event: None,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CapabilityTable {
        CapabilityTable::builder()
            .event("get", [HttpMethod::Get])
            .event("head", [])
            .event("restock", [HttpMethod::Post, HttpMethod::Put])
            .default_event("get")
            .build()
    }

    #[test]
    fn method_name_selects_event() {
        let decision = decide("Widgets", "get", None, &table()).unwrap();
        assert_eq!(decision.event, "get");
        assert_eq!(decision.method, HttpMethod::Get);
        assert!(decision.matched);
    }

    #[test]
    fn method_named_event_needs_no_tag() {
        let decision = decide("Widgets", "Head", None, &table()).unwrap();
        assert_eq!(decision.event, "head");
        assert!(!decision.matched);
    }

    #[test]
    fn undeclared_method_is_rejected_in_uppercase() {
        let err = decide("Widgets", "post", None, &table()).unwrap_err();
        assert_eq!(err.method(), "POST");
        assert_eq!(
            err.to_string(),
            "This resource does not support the HTTP method : POST"
        );
    }

    #[test]
    fn explicit_event_requires_tag_for_method() {
        let decision = decide("Widgets", "PUT", Some("restock"), &table()).unwrap();
        assert_eq!(decision.event, "restock");

        let err = decide("Widgets", "GET", Some("restock"), &table()).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::MethodNotSupported { event: Some(ref e), .. } if e == "restock"
        ));
    }

    #[test]
    fn explicit_untagged_event_is_rejected() {
        let err = decide("Widgets", "HEAD", Some("head"), &table()).unwrap_err();
        assert!(matches!(err, DispatchError::MethodNotSupported { .. }));
    }

    #[test]
    fn explicit_missing_event_is_no_such_event() {
        let err = decide("Widgets", "POST", Some("explode"), &table()).unwrap_err();
        assert!(matches!(err, DispatchError::NoSuchEvent { .. }));
        assert_eq!(
            err.to_string(),
            "This resource does not support the HTTP method : POST"
        );
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = decide("Widgets", "propfind", None, &table()).unwrap_err();
        assert_eq!(err.method(), "PROPFIND");
    }

    #[test]
    fn every_unsupported_method_yields_its_uppercase_name() {
        let table = CapabilityTable::builder()
            .event("get", [HttpMethod::Get])
            .event("head", [HttpMethod::Head])
            .build();
        for method in HttpMethod::ALL {
            let result = decide("R", method.event_name(), None, &table);
            match method {
                HttpMethod::Get | HttpMethod::Head => {
                    assert_eq!(result.unwrap().event, method.event_name())
                }
                _ => assert!(result.unwrap_err().to_string().ends_with(method.as_str())),
            }
        }
    }
}
