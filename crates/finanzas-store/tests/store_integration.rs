//! Stores over the REST services, driven by a scripted transport

use chrono::NaiveDate;
use finanzas_core::{Categoria, GastoProgramado, NuevoCatalogo, PageQuery, StoreConfig};
use finanzas_http::Method;
use finanzas_store::{CrudService, RestService, SearchBox, Stores, SEARCH_DEBOUNCE};
use finanzas_test_utils::{
    categoria, data_envelope, failed_envelope, gasto_programado, ok_envelope, page, plain_client,
    ScriptedTransport,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn stores(transport: &Arc<ScriptedTransport>) -> Stores {
    Stores::new(&plain_client(transport.clone()), &StoreConfig::default())
}

fn script_categorias(transport: &ScriptedTransport) {
    transport.respond(
        Method::Get,
        "/categorias",
        200,
        ok_envelope(page(
            vec![
                categoria("c1", "Alimentación"),
                categoria("c2", "Hogar"),
                categoria("c3", "Ocio"),
            ],
            12,
            1,
            10,
        )),
    );
}

fn ids(items: &[Categoria]) -> Vec<&str> {
    items.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn search_resolves_matches_and_clears_loading() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/categorias/search",
        200,
        ok_envelope(json!([categoria("c1", "Alimentación")])),
    );
    let stores = stores(&transport);

    let found = stores.categorias.search("ali", 10).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].nombre, "Alimentación");
    assert!(!stores.categorias.state().loading);
    assert!(stores.categorias.state().items.is_empty());

    let sent = transport.requests();
    assert_eq!(
        sent[0].query,
        vec![
            ("query".to_string(), "ali".to_string()),
            ("limit".to_string(), "10".to_string())
        ]
    );
}

#[tokio::test]
async fn load_page_replaces_items_and_remembers_query() {
    let transport = ScriptedTransport::new();
    script_categorias(&transport);
    let stores = stores(&transport);

    stores
        .categorias
        .load_page(PageQuery::new(1, 10).with_search("o"))
        .await
        .unwrap();

    let state = stores.categorias.state();
    assert_eq!(ids(&state.items), vec!["c1", "c2", "c3"]);
    assert_eq!(state.total_records, 12);
    assert_eq!(state.search_term.as_deref(), Some("o"));
    assert_eq!(state.total_pages(), 2);
}

#[tokio::test(start_paused = true)]
async fn delete_removes_before_the_request_settles() {
    let transport = ScriptedTransport::new();
    script_categorias(&transport);
    transport.respond(Method::Delete, "/categorias/c2", 200, ok_envelope(json!(true)));
    let stores = stores(&transport);
    stores.categorias.load_page(PageQuery::new(1, 10)).await.unwrap();
    transport.with_delay(Duration::from_millis(200));

    let store = stores.categorias.clone();
    let pending = tokio::spawn(async move { store.delete(&"c2".into()).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let during = stores.categorias.state();
    assert_eq!(ids(&during.items), vec!["c1", "c3"]);
    assert_eq!(during.total_records, 11);
    assert!(during.loading);

    pending.await.unwrap().unwrap();
    let after = stores.categorias.state();
    assert_eq!(after.total_records, 11);
    assert!(!after.loading);
    assert_eq!(after.error, None);
}

#[tokio::test]
async fn failed_delete_restores_item_and_reports() {
    let transport = ScriptedTransport::new();
    script_categorias(&transport);
    transport.respond(Method::Delete, "/categorias/c2", 500, json!({}));
    let stores = stores(&transport);
    stores.categorias.load_page(PageQuery::new(1, 10)).await.unwrap();

    let err = stores.categorias.delete(&"c2".into()).await.unwrap_err();

    let state = stores.categorias.state();
    assert_eq!(ids(&state.items), vec!["c1", "c2", "c3"]);
    assert_eq!(state.total_records, 12);
    assert_eq!(state.error.as_deref(), Some("Error al eliminar categoría"));
    assert_eq!(err.user_message(), "Error al eliminar categoría");
}

#[tokio::test]
async fn failed_envelope_message_reaches_the_user() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Post,
        "/categorias",
        200,
        failed_envelope("Ya existe una categoría con ese nombre"),
    );
    let stores = stores(&transport);

    let err = stores
        .categorias
        .create(&NuevoCatalogo::new("Hogar"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Ya existe una categoría con ese nombre");
    assert_eq!(
        stores.categorias.state().error.as_deref(),
        Some("Ya existe una categoría con ese nombre")
    );
}

#[tokio::test]
async fn create_prepends_and_invalid_input_stays_local() {
    let transport = ScriptedTransport::new();
    script_categorias(&transport);
    transport.respond(
        Method::Post,
        "/categorias",
        201,
        ok_envelope(categoria("c9", "Viajes")),
    );
    let stores = stores(&transport);
    stores.categorias.load_page(PageQuery::new(1, 10)).await.unwrap();

    let invalid = stores.categorias.create(&NuevoCatalogo::new("  ")).await;
    assert!(invalid.unwrap_err().is_validation());
    assert_eq!(transport.count(Method::Post, "/categorias"), 0);

    stores
        .categorias
        .create(&NuevoCatalogo::new("Viajes"))
        .await
        .unwrap();

    let state = stores.categorias.state();
    assert_eq!(ids(&state.items), vec!["c9", "c1", "c2", "c3"]);
    assert_eq!(state.total_records, 13);
    assert_eq!(state.error, None);
}

fn script_programados(transport: &ScriptedTransport) {
    transport.respond(
        Method::Get,
        "/gastos-programados",
        200,
        json!({ "data": [gasto_programado("p1", true)], "totalCount": 1 }),
    );
}

#[tokio::test]
async fn toggle_uses_echoed_entity() {
    let transport = ScriptedTransport::new();
    script_programados(&transport);
    transport.respond(
        Method::Patch,
        "/gastos-programados/p1/toggle",
        200,
        data_envelope(gasto_programado("p1", false)),
    );
    let stores = stores(&transport);
    let store = &stores.gastos_programados;
    store.load_page(PageQuery::new(1, 10)).await.unwrap();
    assert!(store.state().items[0].activo);

    let toggled = store.toggle(&"p1".into()).await.unwrap();

    assert_eq!(toggled.map(|g| g.activo), Some(false));
    assert!(!store.state().items[0].activo);
    assert_eq!(store.state().total_records, 1);
}

#[tokio::test]
async fn toggle_without_echo_flips_locally() {
    let transport = ScriptedTransport::new();
    script_programados(&transport);
    transport.respond(
        Method::Patch,
        "/gastos-programados/p1/toggle",
        204,
        serde_json::Value::Null,
    );
    let stores = stores(&transport);
    let store = &stores.gastos_programados;
    store.load_page(PageQuery::new(1, 10)).await.unwrap();

    store.toggle(&"p1".into()).await.unwrap();

    assert!(!store.state().items[0].activo);
    assert!(!store.state().loading);
}

#[tokio::test]
async fn reprogramar_sends_new_date_and_patches_item() {
    let transport = ScriptedTransport::new();
    script_programados(&transport);
    transport.respond(
        Method::Patch,
        "/gastos-programados/p1/reprogramar",
        204,
        serde_json::Value::Null,
    );
    let stores = stores(&transport);
    let store = &stores.gastos_programados;
    store.load_page(PageQuery::new(1, 10)).await.unwrap();
    let fecha = NaiveDate::from_ymd_opt(2024, 5, 15)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .unwrap();

    store.reprogramar(&"p1".into(), fecha).await.unwrap();

    let patch = transport
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Patch)
        .unwrap();
    assert_eq!(patch.body, Some(json!({ "fechaEjecucion": "2024-05-15T09:30:00" })));
    let item: GastoProgramado = store.state().items[0].clone();
    assert_eq!(item.fecha_ejecucion, fecha);
}

#[tokio::test]
async fn rest_service_reads_single_entity() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/categorias/c2",
        200,
        ok_envelope(categoria("c2", "Hogar")),
    );
    let service: RestService<Categoria> = RestService::new(plain_client(transport.clone()));

    let found = service.get(&"c2".into()).await.unwrap();

    assert_eq!(found.nombre, "Hogar");
}

#[tokio::test(start_paused = true)]
async fn search_box_sends_one_request_per_burst() {
    let transport = ScriptedTransport::new();
    transport.respond(
        Method::Get,
        "/categorias/search",
        200,
        ok_envelope(json!([categoria("c1", "Alimentación")])),
    );
    let stores = stores(&transport);
    let search = SearchBox::spawn(stores.categorias.clone(), SEARCH_DEBOUNCE, 10);
    let mut results = search.subscribe();

    for typed in ["a", "al", "ali"] {
        search.input(typed).await;
    }
    results.changed().await.unwrap();

    let latest = search.latest();
    assert_eq!(latest.query, "ali");
    assert_eq!(latest.items.len(), 1);
    assert_eq!(transport.count(Method::Get, "/categorias/search"), 1);

    search.input("   ").await;
    results.changed().await.unwrap();
    assert_eq!(search.latest().items.len(), 0);
    assert_eq!(transport.count(Method::Get, "/categorias/search"), 1);
}
