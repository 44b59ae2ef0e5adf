//! # HTTP Methods
//!
//! The fixed set of HTTP methods a resource can declare support for. Events are matched
//! against this enum directly; there is no runtime lookup of capability markers.

use std::fmt::{self, Display};
use std::str::FromStr;

/// An HTTP method a [`CapabilityTable`](crate::CapabilityTable) can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Trace,
}

/// Error returned when a method string is not one of the known [`HttpMethod`]s.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    /// The canonical uppercase wire name (e.g. `"POST"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// The event name a request with this method maps to when no event is given.
    pub fn event_name(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Head => "head",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!("Head".parse::<HttpMethod>(), Ok(HttpMethod::Head));
        assert_eq!("DELETE".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
    }

    #[test]
    fn rejects_unknown_methods() {
        assert_eq!(
            "PROPFIND".parse::<HttpMethod>(),
            Err(UnknownMethod("PROPFIND".into()))
        );
    }

    #[test]
    fn event_name_is_lowercase_wire_name() {
        for method in HttpMethod::ALL {
            assert_eq!(method.event_name(), method.as_str().to_lowercase());
        }
    }
}
