//! Error normalization interceptor

use crate::chain::{Interceptor, Next};
use crate::error::HttpError;
use crate::messages::user_message_for;
use crate::request::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use finanzas_core::Notifier;
use std::sync::Arc;

/// Attaches the Spanish user message to every failure and raises a toast
#[derive(Clone, Default)]
pub struct ErrorInterceptor {
    notifier: Option<Arc<dyn Notifier>>,
}

impl ErrorInterceptor {
    /// Without toasts
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With toasts through `notifier`
    #[inline]
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }
}

#[async_trait]
impl Interceptor for ErrorInterceptor {
    fn name(&self) -> &'static str {
        "error"
    }

    async fn intercept(
        &self,
        request: HttpRequest,
        next: Next<'_>,
    ) -> Result<HttpResponse, HttpError> {
        let method = request.method;
        next.run(request).await.map_err(|err| {
            let message = user_message_for(&err);
            match err.status_code() {
                0 | 500..=599 => tracing::error!("{} failed: {}", method, err),
                _ => tracing::warn!("{} failed: {}", method, err),
            }
            if let Some(notifier) = &self.notifier {
                notifier.error(&message);
            }
            err.with_user_message(message)
        })
    }
}

impl std::fmt::Debug for ErrorInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorInterceptor")
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}
