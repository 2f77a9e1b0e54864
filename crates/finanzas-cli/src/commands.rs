//! Subcommand implementations

use crate::terminal::{StderrNotifier, StdinPrompt};
use crate::{Entity, ScheduledEntity, DEFAULT_SESSION_FILE};
use anyhow::{anyhow, Context, Result};
use finanzas_app::{FinanzasApp, UpdateCheck};
use finanzas_core::{ClientConfig, EntityId, LoginRequest, NuevoCatalogo, PageQuery, TracingNavigator};
use finanzas_http::FileStorage;
use finanzas_store::{ListState, StoreError};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Run `$body` with `$store` bound to the store of `$entity`
macro_rules! with_store {
    ($app:expr, $entity:expr, |$store:ident| $body:expr) => {{
        let stores = $app.stores();
        match $entity {
            Entity::Categorias => { let $store = &stores.categorias; $body }
            Entity::Conceptos => { let $store = &stores.conceptos; $body }
            Entity::Proveedores => { let $store = &stores.proveedores; $body }
            Entity::Clientes => { let $store = &stores.clientes; $body }
            Entity::Personas => { let $store = &stores.personas; $body }
            Entity::Cuentas => { let $store = &stores.cuentas; $body }
            Entity::FormasPago => { let $store = &stores.formas_pago; $body }
            Entity::Gastos => { let $store = &stores.gastos; $body }
            Entity::Ingresos => { let $store = &stores.ingresos; $body }
            Entity::Traspasos => { let $store = &stores.traspasos; $body }
            Entity::GastosProgramados => { let $store = &stores.gastos_programados; $body }
            Entity::IngresosProgramados => { let $store = &stores.ingresos_programados; $body }
            Entity::TraspasosProgramados => { let $store = &stores.traspasos_programados; $body }
        }
    }};
}

pub(crate) fn build_app(config: ClientConfig) -> Result<FinanzasApp> {
    let path = config
        .session
        .storage_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let storage = FileStorage::open(&path)
        .with_context(|| format!("failed to open session file {}", path.display()))?;
    let app = FinanzasApp::new(
        config,
        Arc::new(storage),
        Arc::new(TracingNavigator),
        Arc::new(StderrNotifier),
    )?;
    Ok(app)
}

fn failed(err: &StoreError) -> anyhow::Error {
    anyhow!(err.user_message())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_page<E: Serialize>(state: &ListState<E>) -> Result<()> {
    print_json(&state.items)?;
    println!(
        "Página {} de {} ({} registros)",
        state.page,
        state.total_pages().max(1),
        state.total_records
    );
    Ok(())
}

pub(crate) async fn login(app: &FinanzasApp, correo: String, contrasena: String) -> Result<()> {
    let usuario = app
        .login(&LoginRequest::new(correo, contrasena))
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("Sesión iniciada como {}", usuario.nombre_completo());
    Ok(())
}

pub(crate) async fn logout(app: &FinanzasApp) -> Result<()> {
    app.logout().await?;
    println!("Sesión cerrada");
    Ok(())
}

pub(crate) fn status(app: &FinanzasApp) -> Result<()> {
    let session = app.session();
    match session.current_user() {
        Some(usuario) => {
            println!("Usuario: {} <{}>", usuario.nombre_completo(), usuario.correo);
            if let Some(rol) = &usuario.rol {
                println!("Rol: {rol}");
            }
            if let Some(expira) = session.token_expires_at() {
                println!("Sesión válida hasta {}", expira.to_rfc3339());
            }
        }
        None => println!("Sin sesión activa"),
    }
    Ok(())
}

pub(crate) async fn list(app: &FinanzasApp, entity: Entity, query: PageQuery) -> Result<()> {
    with_store!(app, entity, |store| {
        store.load_page(query).await.map_err(|e| failed(&e))?;
        print_page(&store.state())
    })
}

pub(crate) async fn search(app: &FinanzasApp, entity: Entity, term: &str, limit: u32) -> Result<()> {
    with_store!(app, entity, |store| {
        let found = store.search(term, limit).await.map_err(|e| failed(&e))?;
        print_json(&found)
    })
}

pub(crate) async fn recent(app: &FinanzasApp, entity: Entity, limit: u32) -> Result<()> {
    with_store!(app, entity, |store| {
        let recent = store.get_recent(limit).await.map_err(|e| failed(&e))?;
        print_json(&recent)
    })
}

pub(crate) async fn delete(app: &FinanzasApp, entity: Entity, id: String) -> Result<()> {
    let id = EntityId::from(id);
    with_store!(app, entity, |store| {
        store.delete(&id).await.map_err(|e| failed(&e))?;
    });
    println!("Eliminado {id}");
    Ok(())
}

pub(crate) async fn toggle(app: &FinanzasApp, entity: ScheduledEntity, id: String) -> Result<()> {
    let id = EntityId::from(id);
    let stores = app.stores();
    let activo = match entity {
        ScheduledEntity::GastosProgramados => stores
            .gastos_programados
            .toggle(&id)
            .await
            .map_err(|e| failed(&e))?
            .map(|g| g.activo),
        ScheduledEntity::IngresosProgramados => stores
            .ingresos_programados
            .toggle(&id)
            .await
            .map_err(|e| failed(&e))?
            .map(|i| i.activo),
        ScheduledEntity::TraspasosProgramados => stores
            .traspasos_programados
            .toggle(&id)
            .await
            .map_err(|e| failed(&e))?
            .map(|t| t.activo),
    };
    match activo {
        Some(true) => println!("{id} reanudado"),
        Some(false) => println!("{id} pausado"),
        None => println!("Estado de {id} cambiado"),
    }
    Ok(())
}

pub(crate) async fn add_categoria(app: &FinanzasApp, nombre: String) -> Result<()> {
    let created = app
        .stores()
        .categorias
        .create(&NuevoCatalogo::new(nombre))
        .await
        .map_err(|e| failed(&e))?;
    println!("Categoría creada: {} ({})", created.nombre, created.id);
    Ok(())
}

pub(crate) async fn check_update(app: &FinanzasApp) -> Result<()> {
    let watcher = app.update_watcher(
        finanzas_app::VERSION,
        Arc::new(StdinPrompt),
        Arc::new(|version: &str| println!("Reinicia finanzas para usar la versión {version}")),
    );
    match watcher.check().await? {
        UpdateCheck::UpToDate => println!("Versión {} al día", watcher.current_version()),
        UpdateCheck::Declined(v) | UpdateCheck::Dismissed(v) => {
            println!("Versión {v} disponible, no aplicada");
        }
        UpdateCheck::Applied(_) => {}
    }
    Ok(())
}
