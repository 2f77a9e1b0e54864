//! Interceptor chain
//!
//! Interceptors run outermost first. Each receives the request and a [`Next`]
//! continuation; calling [`Next::run`] hands the request to the remaining
//! interceptors and finally to the [`Transport`]. The innermost step turns
//! non-2xx responses into [`HttpError::Status`], so interceptors see failures
//! on the error path only.

use crate::error::HttpError;
use crate::request::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// One link in the chain
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Handle `request`, usually by delegating to `next`
    async fn intercept(
        &self,
        request: HttpRequest,
        next: Next<'_>,
    ) -> Result<HttpResponse, HttpError>;
}

/// Remaining chain after the current interceptor
#[derive(Clone, Copy)]
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    /// Continue with `request`
    pub fn run(self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, HttpError>> {
        match self.interceptors.split_first() {
            Some((head, rest)) => {
                let next = Next {
                    interceptors: rest,
                    transport: self.transport,
                };
                Box::pin(async move { head.intercept(request, next).await })
            }
            None => {
                let transport = self.transport;
                Box::pin(async move {
                    let response = transport.send(request).await?;
                    if response.is_success() {
                        Ok(response)
                    } else {
                        Err(HttpError::status(response.status, response.url, response.body))
                    }
                })
            }
        }
    }
}

/// Ordered interceptors in front of a transport
pub struct Chain {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
}

impl Chain {
    /// Chain with no interceptors
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            interceptors: Vec::new(),
            transport,
        }
    }

    /// Append an interceptor (runs after the ones already added)
    #[must_use]
    pub fn with(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Names in execution order
    #[must_use]
    pub fn interceptor_names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Run `request` through every interceptor and the transport
    ///
    /// # Errors
    /// Whatever the interceptors or the transport produce; non-2xx is [`HttpError::Status`].
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        Next {
            interceptors: &self.interceptors,
            transport: self.transport.as_ref(),
        }
        .run(request)
        .await
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("interceptors", &self.interceptor_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    struct FixedTransport {
        status: u16,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            Ok(HttpResponse::new(self.status, request.url, json!({ "ok": self.status })))
        }
    }

    struct Tagging {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Interceptor for Tagging {
        fn name(&self) -> &'static str {
            self.tag
        }

        async fn intercept(
            &self,
            request: HttpRequest,
            next: Next<'_>,
        ) -> Result<HttpResponse, HttpError> {
            self.log.lock().push(format!("enter {}", self.tag));
            let result = next.run(request).await;
            self.log.lock().push(format!("exit {}", self.tag));
            result
        }
    }

    fn chain(status: u16, log: &Arc<Mutex<Vec<String>>>) -> Chain {
        Chain::new(Arc::new(FixedTransport { status }))
            .with(Arc::new(Tagging { tag: "a", log: Arc::clone(log) }))
            .with(Arc::new(Tagging { tag: "b", log: Arc::clone(log) }))
    }

    #[tokio::test]
    async fn interceptors_nest_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = chain(200, &log);

        let response = chain.execute(HttpRequest::get("http://api/x")).await.unwrap();

        assert_eq!(response.body, json!({ "ok": 200 }));
        assert_eq!(chain.interceptor_names(), vec!["a", "b"]);
        assert_eq!(
            *log.lock(),
            vec!["enter a", "enter b", "exit b", "exit a"]
        );
    }

    #[tokio::test]
    async fn non_success_becomes_status_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let err = chain(404, &log)
            .execute(HttpRequest::get("http://api/x"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert!(matches!(err, HttpError::Status { body: Value::Object(_), .. }));
    }
}
