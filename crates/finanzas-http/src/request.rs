//! Request / response values passed through the chain

use finanzas_core::navigation::encode_query;
use serde_json::Value;

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case verb
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Verb
    pub method: Method,
    /// Absolute URL without query string
    pub url: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Extra headers
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Whether credentials (the session cookie) travel with the request
    pub with_credentials: bool,
}

impl HttpRequest {
    /// Request without body, query or headers
    #[inline]
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            with_credentials: false,
        }
    }

    /// GET request
    #[inline]
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// With query parameters appended
    #[inline]
    #[must_use]
    pub fn with_query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// With JSON body
    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// With header
    #[inline]
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header named `name` (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// URL including the encoded query string
    #[must_use]
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, encode_query(&self.query))
        }
    }
}

/// Response as seen by interceptors
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// URL that produced it
    pub url: String,
    /// Parsed JSON body; `Null` when empty, a string when not JSON
    pub body: Value,
}

impl HttpResponse {
    /// Build response
    #[inline]
    #[must_use]
    pub fn new(status: u16, url: impl Into<String>, body: Value) -> Self {
        Self {
            status,
            url: url.into(),
            body,
        }
    }

    /// 2xx
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Parse a raw body: empty → `Null`, JSON → value, anything else → string
#[must_use]
pub fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_url_encodes_query() {
        let req = HttpRequest::get("http://api/v1/categorias/search").with_query([
            ("searchTerm".to_string(), "alimentación y más".to_string()),
            ("limit".to_string(), "10".to_string()),
        ]);
        assert_eq!(
            req.full_url(),
            "http://api/v1/categorias/search?searchTerm=alimentaci%C3%B3n%20y%20m%C3%A1s&limit=10"
        );
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest::get("u").with_header("Cookie", "auth_token=x");
        assert_eq!(req.header("cookie"), Some("auth_token=x"));
    }

    #[test]
    fn body_parsing() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), json!({ "a": 1 }));
        assert_eq!(parse_body("Bad Gateway"), json!("Bad Gateway"));
    }
}
