//! Request context with typed parameters.

use std::collections::HashMap;

use crate::lifecycle::TimingContext;

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self(format!("{:x}-{:08x}", nanos, rand::random::<u32>()))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extracted route parameters (e.g., `:id` from `/customer/:id`).
pub type RouteParams = HashMap<String, String>;

/// Query string parameters.
pub type QueryParams = HashMap<String, String>;

/// HTTP headers, keyed by lowercase name.
pub type Headers = HashMap<String, String>;

/// Geographic information about the serving edge location.
#[derive(Debug, Clone, Default)]
pub struct GeoInfo {
    /// Serving data center (colo) code.
    pub colo: Option<String>,
    /// ISO country code of the client (e.g., "US").
    pub country: Option<String>,
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// Parse a method name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            _ => None,
        }
    }

    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

/// Typed request context passed to page handlers.
#[derive(Debug)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string.
    pub path: String,
    /// Extracted route parameters.
    pub params: RouteParams,
    /// Query string parameters.
    pub query: QueryParams,
    /// HTTP headers.
    pub headers: Headers,
    /// Raw request body.
    pub body: Vec<u8>,
    /// Timing context for observability.
    pub timing: TimingContext,
}

impl RequestContext {
    /// Create a new request context from a path that may carry a query string.
    pub fn new(method: Method, path_with_query: impl AsRef<str>) -> Self {
        let raw = path_with_query.as_ref();
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, parse_urlencoded(query.as_bytes())),
            None => (raw, HashMap::new()),
        };
        let path = if path.is_empty() { "/" } else { path };

        Self {
            request_id: RequestId::generate(),
            method,
            path: path.to_string(),
            params: HashMap::new(),
            query,
            headers: HashMap::new(),
            body: Vec::new(),
            timing: TimingContext::new(),
        }
    }

    /// Add a header (name is stored lowercase).
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a route parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Get a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(|s| s.as_str())
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Get a cookie value from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn form(&self) -> HashMap<String, String> {
        parse_urlencoded(&self.body)
    }

    /// Geographic information derived from edge headers.
    pub fn geo(&self) -> GeoInfo {
        let colo = self
            .header("x-colo")
            .map(str::to_string)
            .or_else(|| {
                self.header("cf-ray")
                    .and_then(|ray| ray.rsplit_once('-'))
                    .map(|(_, colo)| colo.to_string())
            });
        let country = self
            .header("cf-ipcountry")
            .or_else(|| self.header("x-country"))
            .map(str::to_string);
        GeoInfo { colo, country }
    }
}

fn parse_urlencoded(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_query_string() {
        let ctx = RequestContext::new(Method::Get, "/search?q=chai&t=products");
        assert_eq!(ctx.path, "/search");
        assert_eq!(ctx.query_param("q"), Some("chai"));
        assert_eq!(ctx.query_param("t"), Some("products"));
    }

    #[test]
    fn test_empty_path_is_root() {
        let ctx = RequestContext::new(Method::Get, "?x=1");
        assert_eq!(ctx.path, "/");
    }

    #[test]
    fn test_header_case_insensitive() {
        let ctx = RequestContext::new(Method::Get, "/").with_header("Referer", "http://x/orders");
        assert_eq!(ctx.header("referer"), Some("http://x/orders"));
        assert_eq!(ctx.header("REFERER"), Some("http://x/orders"));
    }

    #[test]
    fn test_cookie_lookup() {
        let ctx = RequestContext::new(Method::Get, "/")
            .with_header("cookie", "a=1; nw_session=sess_abc; b=2");
        assert_eq!(ctx.cookie("nw_session"), Some("sess_abc"));
        assert_eq!(ctx.cookie("missing"), None);
    }

    #[test]
    fn test_form_decoding() {
        let ctx = RequestContext::new(Method::Post, "/").with_body("delay=250&defer=1&q=a+b%21");
        let form = ctx.form();
        assert_eq!(form.get("delay").map(String::as_str), Some("250"));
        assert_eq!(form.get("defer").map(String::as_str), Some("1"));
        assert_eq!(form.get("q").map(String::as_str), Some("a b!"));
    }

    #[test]
    fn test_geo_from_headers() {
        let ctx = RequestContext::new(Method::Get, "/dash")
            .with_header("cf-ray", "7d1c2b3a4f5e6d7c-LHR")
            .with_header("cf-ipcountry", "GB");
        let geo = ctx.geo();
        assert_eq!(geo.colo.as_deref(), Some("LHR"));
        assert_eq!(geo.country.as_deref(), Some("GB"));

        let bare = RequestContext::new(Method::Get, "/dash").geo();
        assert!(bare.colo.is_none());
        assert!(bare.country.is_none());
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("post"), Some(Method::Post));
        assert_eq!(Method::parse("GET"), Some(Method::Get));
        assert_eq!(Method::parse("BREW"), None);
        assert_eq!(Method::Post.as_str(), "POST");
    }

    #[test]
    fn test_request_ids_differ() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }
}
