//! API client: base URL plus interceptor chain

use crate::chain::Chain;
use crate::error::HttpError;
use crate::request::{HttpRequest, HttpResponse, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Cheap-to-clone handle shared by every service
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    chain: Arc<Chain>,
}

impl ApiClient {
    /// Client sending to `base_url` through `chain`
    #[must_use]
    pub fn new(base_url: impl Into<String>, chain: Arc<Chain>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, chain }
    }

    /// Versioned base URL without trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying chain
    #[inline]
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Absolute URL for `path`; absolute inputs are returned as-is
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a prepared request through the chain
    ///
    /// # Errors
    /// Transport failure or non-2xx status.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.chain.execute(request).await
    }

    /// Send and return the JSON body
    ///
    /// # Errors
    /// Transport failure, non-2xx status, or an unserializable body.
    pub async fn request_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<&B>,
    ) -> Result<Value, HttpError> {
        let mut request = HttpRequest::new(method, self.url(path)).with_query(query);
        if let Some(body) = body {
            let json = serde_json::to_value(body)
                .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
            request = request.with_body(json);
        }
        Ok(self.send(request).await?.body)
    }

    /// `GET path?query`
    ///
    /// # Errors
    /// See [`ApiClient::request_json`].
    pub async fn get_json(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Value, HttpError> {
        self.request_json::<Value>(Method::Get, path, query, None)
            .await
    }

    /// `POST path` with a JSON body
    ///
    /// # Errors
    /// See [`ApiClient::request_json`].
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, HttpError> {
        self.request_json(Method::Post, path, Vec::new(), Some(body))
            .await
    }

    /// `PUT path` with a JSON body
    ///
    /// # Errors
    /// See [`ApiClient::request_json`].
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, HttpError> {
        self.request_json(Method::Put, path, Vec::new(), Some(body))
            .await
    }

    /// `PATCH path`, body optional
    ///
    /// # Errors
    /// See [`ApiClient::request_json`].
    pub async fn patch_json(&self, path: &str, body: Option<&Value>) -> Result<Value, HttpError> {
        self.request_json(Method::Patch, path, Vec::new(), body)
            .await
    }

    /// `DELETE path`
    ///
    /// # Errors
    /// See [`ApiClient::request_json`].
    pub async fn delete_json(&self, path: &str) -> Result<Value, HttpError> {
        self.request_json::<Value>(Method::Delete, path, Vec::new(), None)
            .await
    }

    /// `GET path?query` decoded as `T`
    ///
    /// # Errors
    /// See [`ApiClient::request_json`]; [`HttpError::Decode`] when the body does not fit `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, HttpError> {
        let value = self.get_json(path, query).await?;
        decode(&self.url(path), value)
    }
}

/// Deserialize a response body, reporting mismatches as [`HttpError::Decode`]
///
/// # Errors
/// Body does not fit `T`.
pub fn decode<T: DeserializeOwned>(url: &str, value: Value) -> Result<T, HttpError> {
    serde_json::from_value(value).map_err(|e| HttpError::decode(url, e))
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("chain", &self.chain)
            .finish()
    }
}
