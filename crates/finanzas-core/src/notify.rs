//! Toast notifications raised by the HTTP layer and the stores

/// Host-side toast sink
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show an error toast
    fn error(&self, message: &str);

    /// Show a success toast
    fn success(&self, message: &str);
}

/// Notifier that writes toasts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn success(&self, message: &str) {
        tracing::info!("{}", message);
    }
}
