//! Testing utilities for the Finanzas workspace
//!
//! Scripted transport, recording navigator/notifier, unsigned JWT builder and
//! JSON fixtures shared by integration tests.

#![allow(missing_docs)]

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use finanzas_core::{Navigator, Notifier, Route};
use finanzas_http::{ApiClient, Chain, HttpError, HttpRequest, HttpResponse, Method, Transport};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

pub const BASE_URL: &str = "http://localhost:5000/api/v1";

pub const CLAIM_NAME_IDENTIFIER: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
pub const CLAIM_EMAIL_URI: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
pub const CLAIM_ROLE_URI: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(u16, Value),
    NetworkError(String),
}

/// Transport answering from per-route queues; the last answer of a queue repeats
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response for `method` on URLs ending with `path`
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Scripted::Respond(status, body))
    }

    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, Scripted::NetworkError(message.to_string()))
    }

    fn push(&self, method: Method, path: &str, scripted: Scripted) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(scripted);
        self
    }

    /// Every response waits `delay` (tokio clock)
    pub fn with_delay(&self, delay: Duration) -> &Self {
        *self.delay.lock() = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url.ends_with(path))
            .count()
    }

    fn next_for(&self, request: &HttpRequest) -> Option<Scripted> {
        let mut routes = self.routes.lock();
        let queue = routes
            .iter_mut()
            .filter(|((method, path), _)| *method == request.method && request.url.ends_with(path.as_str()))
            .max_by_key(|((_, path), _)| path.len())
            .map(|(_, queue)| queue)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().push(request.clone());
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.next_for(&request) {
            Some(Scripted::Respond(status, body)) => {
                Ok(HttpResponse::new(status, request.full_url(), body))
            }
            Some(Scripted::NetworkError(message)) => Err(HttpError::network(request.full_url(), message)),
            None => Ok(HttpResponse::new(
                404,
                request.full_url(),
                json!({ "message": format!("no script for {} {}", request.method, request.url) }),
            )),
        }
    }
}

/// Client over `transport` with no interceptors
pub fn plain_client(transport: Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::new(BASE_URL, Arc::new(Chain::new(transport)))
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &Route) {
        self.routes.lock().push(route.clone());
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    errors: Mutex<Vec<String>>,
    successes: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.lock().push(message.to_string());
    }
}

/// Unsigned JWT with the given payload
pub fn jwt(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.firma")
}

/// JWT shaped like the backend's: URI claims, `exp` `ttl` from now
pub fn backend_token(id: &str, email: &str, nombre: &str, rol: &str, ttl: chrono::Duration) -> String {
    let exp = (chrono::Utc::now() + ttl).timestamp();
    jwt(&json!({
        CLAIM_NAME_IDENTIFIER: id,
        CLAIM_EMAIL_URI: email,
        "name": nombre,
        CLAIM_ROLE_URI: rol,
        "exp": exp,
    }))
}

pub fn valid_token() -> String {
    backend_token(
        "0f8fad5b-d9cb-469f-a165-70867728950e",
        "ana@example.com",
        "Ana",
        "User",
        chrono::Duration::hours(1),
    )
}

pub fn expired_token() -> String {
    backend_token(
        "0f8fad5b-d9cb-469f-a165-70867728950e",
        "ana@example.com",
        "Ana",
        "User",
        chrono::Duration::hours(-1),
    )
}

pub fn ok_envelope(value: Value) -> Value {
    json!({ "isSuccess": true, "value": value, "error": null })
}

pub fn failed_envelope(message: &str) -> Value {
    json!({ "isSuccess": false, "value": null, "error": { "message": message } })
}

pub fn data_envelope(data: Value) -> Value {
    json!({ "data": data })
}

pub fn page(items: Vec<Value>, total: u64, page: u32, page_size: u32) -> Value {
    json!({ "items": items, "totalCount": total, "page": page, "pageSize": page_size })
}

pub fn categoria(id: &str, nombre: &str) -> Value {
    json!({
        "id": id,
        "nombre": nombre,
        "fechaCreacion": "2024-03-01T10:00:00",
        "usuarioId": "u1",
    })
}

pub fn gasto(id: &str, importe: f64, descripcion: &str) -> Value {
    json!({
        "id": id,
        "importe": importe,
        "fecha": "2024-03-05T00:00:00",
        "descripcion": descripcion,
        "conceptoId": "c1",
        "conceptoNombre": "Supermercado",
        "cuentaId": "cta1",
        "cuentaNombre": "Nómina",
    })
}

pub fn gasto_programado(id: &str, activo: bool) -> Value {
    json!({
        "id": id,
        "importe": 750.0,
        "descripcion": "Alquiler",
        "conceptoId": "c2",
        "cuentaId": "cta1",
        "frecuencia": "MENSUAL",
        "fechaEjecucion": "2024-04-01T00:00:00",
        "activo": activo,
        "hangfireJobId": "job-17",
    })
}
