//! Facade wiring against a scripted backend

use finanzas_app::{FinanzasApp, MockUpdatePrompt, UpdateCheck, UpdateWatcher};
use finanzas_auth::GuardOutcome;
use finanzas_core::{ClientConfig, LoginRequest, PageQuery, UpdateConfig};
use finanzas_http::messages::MSG_UNAUTHORIZED;
use finanzas_http::{MemoryStorage, Method, SessionStorage, AUTH_COOKIE};
use finanzas_test_utils::{
    categoria, ok_envelope, page, plain_client, valid_token, RecordingNavigator,
    RecordingNotifier, ScriptedTransport,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    app: FinanzasApp,
    transport: Arc<ScriptedTransport>,
    storage: Arc<MemoryStorage>,
    navigator: Arc<RecordingNavigator>,
}

fn harness(config: ClientConfig) -> Harness {
    let transport = ScriptedTransport::new();
    let storage = Arc::new(MemoryStorage::new());
    let navigator = RecordingNavigator::new();
    let app = FinanzasApp::with_transport(
        config,
        transport.clone(),
        storage.clone(),
        navigator.clone(),
        RecordingNotifier::new(),
    );
    Harness {
        app,
        transport,
        storage,
        navigator,
    }
}

fn script_login(transport: &ScriptedTransport) {
    transport.respond(
        Method::Post,
        "/auth/login",
        200,
        json!({ "token": valid_token(), "expiresAt": "2099-12-31T23:59:59Z" }),
    );
}

async fn log_in(h: &Harness) {
    script_login(&h.transport);
    h.app
        .login(&LoginRequest::new("ana@example.com", "secreto"))
        .await
        .unwrap();
}

#[tokio::test]
async fn chain_is_wired_in_order() {
    let h = harness(ClientConfig::default());
    assert_eq!(
        h.app.client().chain().interceptor_names(),
        vec!["loading", "credentials", "error", "cache"]
    );

    let without_cache = harness(ClientConfig::default().with_cache_enabled(false));
    assert_eq!(
        without_cache.app.client().chain().interceptor_names(),
        vec!["loading", "credentials", "error"]
    );
    assert!(without_cache.app.cache().is_none());
}

#[tokio::test]
async fn login_authenticates_and_opens_guards() {
    let h = harness(ClientConfig::default());
    assert!(matches!(h.app.guard("/gastos"), GuardOutcome::Redirect(_)));

    log_in(&h).await;

    assert!(h.app.session().is_authenticated());
    assert!(h.storage.cookie(AUTH_COOKIE).is_some());
    assert_eq!(h.app.guard("/gastos"), GuardOutcome::Allow);
    assert_eq!(h.app.role_guard(["User", "Admin"], "/gastos"), GuardOutcome::Allow);
    assert!(!h.app.role_guard(["Admin"], "/admin").is_allowed());
}

#[tokio::test]
async fn stores_run_through_the_session_cookie() {
    let h = harness(ClientConfig::default());
    log_in(&h).await;
    h.transport.respond(
        Method::Get,
        "/categorias",
        200,
        ok_envelope(page(vec![categoria("c1", "Hogar")], 1, 1, 10)),
    );

    h.app
        .stores()
        .categorias
        .load_page(PageQuery::new(1, 10))
        .await
        .unwrap();

    assert_eq!(h.app.stores().categorias.state().items.len(), 1);
    let list = h
        .transport
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Get)
        .unwrap();
    assert!(list.with_credentials);
    assert!(list.header("Cookie").unwrap().starts_with("auth_token="));
    assert!(!h.app.is_loading());
}

#[tokio::test]
async fn logout_invalidates_cached_responses() {
    let h = harness(ClientConfig::default());
    log_in(&h).await;
    h.transport.respond(
        Method::Get,
        "/categorias/recent",
        200,
        ok_envelope(json!([categoria("c1", "Hogar")])),
    );

    h.app.stores().categorias.get_recent(5).await.unwrap();
    h.app.stores().categorias.get_recent(5).await.unwrap();
    assert_eq!(h.transport.count(Method::Get, "/categorias/recent"), 1);

    h.app.logout().await.unwrap();
    assert!(!h.app.session().is_authenticated());
    assert!(h.storage.cookie(AUTH_COOKIE).is_none());

    h.app.stores().categorias.get_recent(5).await.unwrap();
    assert_eq!(h.transport.count(Method::Get, "/categorias/recent"), 2);
}

#[tokio::test]
async fn unauthorized_response_ends_the_session() {
    let h = harness(ClientConfig::default());
    log_in(&h).await;
    let mut authenticated = h.app.session().subscribe_authenticated();
    h.transport.respond(Method::Get, "/gastos", 401, json!({}));

    let err = h
        .app
        .stores()
        .gastos
        .load_page(PageQuery::new(1, 10))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), MSG_UNAUTHORIZED);
    tokio::time::timeout(Duration::from_secs(1), authenticated.wait_for(|a| !*a))
        .await
        .unwrap()
        .unwrap();
    assert!(h.storage.cookie(AUTH_COOKIE).is_none());
    let routes = h.navigator.routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].path, h.app.config().session.login_route);
    assert!(matches!(h.app.guard("/gastos"), GuardOutcome::Redirect(_)));
}

fn update_config() -> UpdateConfig {
    UpdateConfig {
        enabled: true,
        poll_interval_secs: 3600,
        version_path: "/version".to_string(),
    }
}

fn recording_reload() -> (finanzas_app::ReloadHook, Arc<Mutex<Vec<String>>>) {
    let reloads = Arc::new(Mutex::new(Vec::new()));
    let sink = reloads.clone();
    let hook: finanzas_app::ReloadHook = Arc::new(move |version: &str| {
        sink.lock().push(version.to_string());
    });
    (hook, reloads)
}

#[test]
fn same_version_never_prompts() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, "/version", 200, json!({ "version": "1.0.0" }));
    let mut prompt = MockUpdatePrompt::new();
    prompt.expect_confirm().times(0);
    let (reload, reloads) = recording_reload();
    let watcher = UpdateWatcher::new(
        plain_client(transport),
        &update_config(),
        "1.0.0",
        Arc::new(prompt),
        reload,
    );

    let outcome = tokio_test::block_on(watcher.check()).unwrap();

    assert_eq!(outcome, UpdateCheck::UpToDate);
    assert!(reloads.lock().is_empty());
}

#[tokio::test]
async fn declined_version_is_not_offered_again() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, "/version", 200, json!({ "version": "1.1.0" }));
    let mut prompt = MockUpdatePrompt::new();
    prompt
        .expect_confirm()
        .withf(|current, available| current == "1.0.0" && available == "1.1.0")
        .times(1)
        .return_const(false);
    let (reload, reloads) = recording_reload();
    let watcher = UpdateWatcher::new(
        plain_client(transport),
        &update_config(),
        "1.0.0",
        Arc::new(prompt),
        reload,
    );

    assert_eq!(
        watcher.check().await.unwrap(),
        UpdateCheck::Declined("1.1.0".to_string())
    );
    assert_eq!(
        watcher.check().await.unwrap(),
        UpdateCheck::Dismissed("1.1.0".to_string())
    );
    assert!(reloads.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn poller_reloads_after_acceptance() {
    let transport = ScriptedTransport::new();
    transport
        .respond(Method::Get, "/version", 200, json!({ "version": "1.0.0" }))
        .respond(Method::Get, "/version", 200, json!({ "data": { "version": "1.2.0" } }));
    let mut prompt = MockUpdatePrompt::new();
    prompt.expect_confirm().times(1).return_const(true);
    let (reload, reloads) = recording_reload();
    let watcher = Arc::new(UpdateWatcher::new(
        plain_client(transport.clone()),
        &update_config(),
        "1.0.0",
        Arc::new(prompt),
        reload,
    ));

    watcher.spawn().await.unwrap();

    assert_eq!(*reloads.lock(), vec!["1.2.0".to_string()]);
    assert_eq!(transport.count(Method::Get, "/version"), 2);
}

#[tokio::test]
async fn missing_version_is_an_error() {
    let transport = ScriptedTransport::new();
    transport.respond(Method::Get, "/version", 200, json!({ "build": 7 }));
    let (reload, _) = recording_reload();
    let watcher = UpdateWatcher::new(
        plain_client(transport),
        &update_config(),
        "1.0.0",
        Arc::new(MockUpdatePrompt::new()),
        reload,
    );

    assert!(watcher.check().await.is_err());
}
