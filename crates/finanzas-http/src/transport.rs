//! Wire transport

use crate::error::HttpError;
use crate::request::{parse_body, HttpRequest, HttpResponse, Method};
use async_trait::async_trait;
use std::time::Duration;

/// Sends one request and returns whatever the server answered
///
/// Non-2xx statuses are responses, not errors; only a missing response is an error.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// [`Transport`] over `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Client with a per-request timeout
    ///
    /// # Errors
    /// TLS backend could not be initialised.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
        Ok(Self { client })
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = request.full_url();
        let mut builder = self
            .client
            .request(to_reqwest(request.method), &request.url)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!("{} {}", request.method, url);
        let response = builder
            .send()
            .await
            .map_err(|e| HttpError::network(&url, e.to_string()))?;
        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| HttpError::network(&url, e.to_string()))?;
        tracing::debug!("{} {} -> {}", request.method, url, status);

        Ok(HttpResponse::new(status, url, parse_body(&raw)))
    }
}
