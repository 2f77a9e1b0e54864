//! Navigation targets
//!
//! The client never renders pages itself. Redirects (login on session expiry,
//! guard rejections) are described as a [`Route`] and handed to a [`Navigator`]
//! supplied by the host.

/// Path plus query parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    /// Absolute path, e.g. `/auth/login`
    pub path: String,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
}

impl Route {
    /// Route without query parameters
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Add a query parameter
    #[inline]
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Value of the first query parameter named `key`
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as `path?k=v&...` with percent-encoded values
    #[must_use]
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        format!("{}?{}", self.path, encode_query(&self.query))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// Percent-encode a query key or value
///
/// RFC 3986 unreserved characters pass through; everything else is `%XX` per UTF-8 byte.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// `k=v&k2=v2` with both sides percent-encoded
#[must_use]
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Host-side navigation
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Move to `route`
    fn navigate(&self, route: &Route);
}

/// Navigator that only records the intent in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: &Route) {
        tracing::info!("Navigating to {}", route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_route_with_return_url() {
        let route = Route::new("/auth/login").with_query("returnUrl", "/gastos?page=2");
        assert_eq!(route.to_url(), "/auth/login?returnUrl=%2Fgastos%3Fpage%3D2");
        assert_eq!(route.query_value("returnUrl"), Some("/gastos?page=2"));
    }

    #[test]
    fn plain_route() {
        assert_eq!(Route::new("/access-denied").to_string(), "/access-denied");
    }

    #[test]
    fn non_ascii_is_utf8_encoded() {
        assert_eq!(encode_component("año"), "a%C3%B1o");
    }

    #[test]
    fn mock_navigator_records_route() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|r| r.path == "/auth/login")
            .times(1)
            .return_const(());
        navigator.navigate(&Route::new("/auth/login"));
    }
}
