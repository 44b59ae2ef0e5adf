//! # Inbound Requests
//!
//! The transport-agnostic view of a request the pipeline works on: a method string,
//! an exact path and the decoded query/form parameters in arrival order.

/// An inbound request as handed over by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: String,
    params: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Builds a request from a path with an optional `?query` part.
    ///
    /// ```rust
    /// use rest_framework::Request;
    ///
    /// let request = Request::from_uri("GET", "/widgets?id=7&note=a%20b");
    /// assert_eq!(request.path(), "/widgets");
    /// assert_eq!(request.param("id"), Some("7"));
    /// assert_eq!(request.param("note"), Some("a b"));
    /// ```
    pub fn from_uri(method: impl Into<String>, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (uri, ""),
        };
        let params = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self {
            method: method.into(),
            path: path.to_string(),
            params,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// The method exactly as received.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The first value of the named parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}
