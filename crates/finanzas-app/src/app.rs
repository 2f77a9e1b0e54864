//! Application facade
//!
//! [`FinanzasApp`] owns one of everything: the transport, the interceptor
//! chain in its fixed order, the session, the GET cache and the entity
//! stores. Background tasks (cache sweeper, expiry watcher) stop when the
//! facade is dropped.

use crate::error::AppError;
use crate::update::{ReloadHook, UpdatePrompt, UpdateWatcher};
use finanzas_auth::{auth_guard, AuthSession, GuardOutcome, RoleGuard};
use finanzas_core::{ClientConfig, LoginRequest, Navigator, Notifier, RegisterRequest, Usuario};
use finanzas_http::{
    ApiClient, CacheInterceptor, Chain, CredentialsInterceptor, ErrorInterceptor, GetCache,
    LoadingInterceptor, LoadingTracker, ReqwestTransport, SessionStorage, Transport,
};
use finanzas_store::Stores;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Wired client
pub struct FinanzasApp {
    config: ClientConfig,
    client: ApiClient,
    session: Arc<AuthSession>,
    stores: Stores,
    loading: Arc<LoadingTracker>,
    credentials: Arc<CredentialsInterceptor>,
    cache: Option<Arc<GetCache>>,
    tasks: Vec<JoinHandle<()>>,
}

impl FinanzasApp {
    /// Build the facade over a `reqwest` transport
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// Invalid configuration, or the HTTP client could not be built.
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
        Ok(Self::with_transport(config, transport, storage, navigator, notifier))
    }

    /// Build the facade over any transport
    ///
    /// Chain order: loading, credentials, error, cache (when enabled).
    #[must_use]
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let loading = Arc::new(LoadingTracker::new());
        let credentials = Arc::new(CredentialsInterceptor::new(
            storage.clone(),
            navigator,
            &config.session,
        ));

        let mut chain = Chain::new(transport)
            .with(Arc::new(LoadingInterceptor::new(loading.clone())))
            .with(credentials.clone())
            .with(Arc::new(ErrorInterceptor::new().with_notifier(notifier)));

        let mut tasks = Vec::new();
        let cache = if config.cache.enabled {
            let cache = Arc::new(GetCache::from_config(&config.cache));
            chain = chain.with(Arc::new(CacheInterceptor::new(cache.clone())));
            tasks.push(cache.spawn_sweeper(config.cache.sweep_interval()));
            Some(cache)
        } else {
            None
        };

        let client = ApiClient::new(config.api_url.clone(), Arc::new(chain));
        let session = Arc::new(AuthSession::new(client.clone(), storage));
        tasks.push(session.watch_expiry(credentials.subscribe_expired()));
        let stores = Stores::new(&client, &config.stores);

        tracing::info!(
            "Finanzas client ready: {} (cache {})",
            config.api_url,
            if cache.is_some() { "on" } else { "off" }
        );

        Self {
            config,
            client,
            session,
            stores,
            loading,
            credentials,
            cache,
            tasks,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Client running through the full chain
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Session manager
    #[must_use]
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// Entity stores
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    /// GET cache, when enabled
    #[must_use]
    pub fn cache(&self) -> Option<&Arc<GetCache>> {
        self.cache.as_ref()
    }

    /// Whether any request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Observe the global busy flag
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Whether a session-expiry redirect just happened
    #[must_use]
    pub fn is_redirecting(&self) -> bool {
        self.credentials.is_redirecting()
    }

    /// Log in; cached responses of a previous user are dropped first
    ///
    /// # Errors
    /// See [`AuthSession::login`].
    pub async fn login(&self, request: &LoginRequest) -> Result<Usuario, AppError> {
        self.invalidate_cache().await;
        Ok(self.session.login(request).await?)
    }

    /// Register a new account
    ///
    /// # Errors
    /// See [`AuthSession::register`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AppError> {
        Ok(self.session.register(request).await?)
    }

    /// Log out and drop every cached response
    ///
    /// # Errors
    /// Session storage could not be cleared; the cache is cleared regardless.
    pub async fn logout(&self) -> Result<(), AppError> {
        let result = self.session.logout();
        self.invalidate_cache().await;
        Ok(result?)
    }

    async fn invalidate_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all().await;
        }
    }

    /// Authentication guard for `target`
    #[must_use]
    pub fn guard(&self, target: &str) -> GuardOutcome {
        auth_guard(&self.session, &self.config.session, target)
    }

    /// Role guard for `target` admitting `roles`
    #[must_use]
    pub fn role_guard<S: Into<String>>(
        &self,
        roles: impl IntoIterator<Item = S>,
        target: &str,
    ) -> GuardOutcome {
        RoleGuard::new(roles)
            .with_routes(&self.config.session)
            .check(&self.session, target)
    }

    /// Update poller sharing this client
    #[must_use]
    pub fn update_watcher(
        &self,
        current_version: impl Into<String>,
        prompt: Arc<dyn UpdatePrompt>,
        reload: ReloadHook,
    ) -> UpdateWatcher {
        UpdateWatcher::new(
            self.client.clone(),
            &self.config.updates,
            current_version,
            prompt,
            reload,
        )
    }
}

impl Drop for FinanzasApp {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl std::fmt::Debug for FinanzasApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanzasApp")
            .field("api_url", &self.config.api_url)
            .field("chain", self.client.chain())
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
