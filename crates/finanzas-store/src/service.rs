//! REST services
//!
//! [`CrudService`] and [`ScheduledService`] are the seams stores talk to.
//! [`RestService`] implements both over an [`ApiClient`] for any [`Resource`],
//! unwrapping the envelope the resource declares.

use crate::error::StoreError;
use crate::resource::{Resource, Scheduled};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use finanzas_core::model::fecha;
use finanzas_core::{EntityId, EnvelopeKind, Page, PageQuery};
use finanzas_http::ApiClient;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::marker::PhantomData;

/// Collection operations
#[async_trait]
pub trait CrudService<E: Resource>: Send + Sync {
    /// `GET {path}/search?query=&limit=`
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<E>, StoreError>;

    /// `GET {path}/recent?limit=`
    async fn recent(&self, limit: u32) -> Result<Vec<E>, StoreError>;

    /// `GET {path}?page=&pageSize=&searchTerm=&sortColumn=&sortOrder=`
    async fn list(&self, query: &PageQuery) -> Result<Page<E>, StoreError>;

    /// `GET {path}/{id}`
    async fn get(&self, id: &EntityId) -> Result<E, StoreError>;

    /// `POST {path}`
    async fn create(&self, input: &E::Input) -> Result<E, StoreError>;

    /// `PUT {path}/{id}`
    async fn update(&self, id: &EntityId, input: &E::Input) -> Result<E, StoreError>;

    /// `DELETE {path}/{id}`
    async fn delete(&self, id: &EntityId) -> Result<(), StoreError>;
}

/// Extra operations of scheduled transactions
///
/// Both return the updated entity when the server echoes it.
#[async_trait]
pub trait ScheduledService<E: Scheduled>: CrudService<E> {
    /// `PATCH {path}/{id}/toggle`
    async fn toggle(&self, id: &EntityId) -> Result<Option<E>, StoreError>;

    /// `PATCH {path}/{id}/reprogramar`
    async fn reprogramar(
        &self,
        id: &EntityId,
        fecha_ejecucion: NaiveDateTime,
    ) -> Result<Option<E>, StoreError>;
}

/// [`CrudService`] over HTTP
pub struct RestService<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Resource> RestService<E> {
    /// Service for `E` sharing `client`
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn item_path(id: &EntityId) -> String {
        format!("{}/{}", E::PATH, id)
    }

    fn unwrap<T: DeserializeOwned>(body: Value) -> Result<T, StoreError> {
        Ok(E::ENVELOPE.unwrap(body)?)
    }

    /// Echoed entity if present; a failed envelope is still an error
    fn unwrap_optional(body: Value) -> Result<Option<E>, StoreError> {
        E::ENVELOPE.ensure_success(&body)?;
        Ok(E::ENVELOPE.unwrap::<E>(body).ok())
    }

    fn page_from(body: Value, query: &PageQuery) -> Result<Page<E>, StoreError> {
        // `{data: [...], totalCount}` carries the page at the top level
        let top_level_page = E::ENVELOPE == EnvelopeKind::Data
            && body.get("data").is_some_and(Value::is_array);
        let payload = if top_level_page {
            body
        } else {
            Self::unwrap::<Value>(body)?
        };

        let mut page = match payload {
            Value::Array(_) => {
                let items: Vec<E> = serde_json::from_value(payload)
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                Page {
                    total_count: items.len() as u64,
                    items,
                    page: query.page,
                    page_size: query.page_size,
                }
            }
            other => serde_json::from_value::<Page<E>>(other)
                .map_err(|e| StoreError::Decode(e.to_string()))?,
        };
        if page.page_size == 0 {
            page.page_size = query.page_size;
        }
        Ok(page)
    }
}

impl<E> Clone for RestService<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Resource> std::fmt::Debug for RestService<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestService").field("path", &E::PATH).finish()
    }
}

#[async_trait]
impl<E: Resource> CrudService<E> for RestService<E> {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<E>, StoreError> {
        let params = vec![
            ("query".to_string(), query.trim().to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        let body = self
            .client
            .get_json(&format!("{}/search", E::PATH), params)
            .await?;
        Self::unwrap(body)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<E>, StoreError> {
        let params = vec![("limit".to_string(), limit.to_string())];
        let body = self
            .client
            .get_json(&format!("{}/recent", E::PATH), params)
            .await?;
        Self::unwrap(body)
    }

    async fn list(&self, query: &PageQuery) -> Result<Page<E>, StoreError> {
        let body = self.client.get_json(E::PATH, query.to_pairs()).await?;
        Self::page_from(body, query)
    }

    async fn get(&self, id: &EntityId) -> Result<E, StoreError> {
        let body = self.client.get_json(&Self::item_path(id), Vec::new()).await?;
        Self::unwrap(body)
    }

    async fn create(&self, input: &E::Input) -> Result<E, StoreError> {
        let body = self.client.post_json(E::PATH, input).await?;
        Self::unwrap(body)
    }

    async fn update(&self, id: &EntityId, input: &E::Input) -> Result<E, StoreError> {
        let body = self.client.put_json(&Self::item_path(id), input).await?;
        Self::unwrap(body)
    }

    async fn delete(&self, id: &EntityId) -> Result<(), StoreError> {
        let body = self.client.delete_json(&Self::item_path(id)).await?;
        E::ENVELOPE.ensure_success(&body)?;
        Ok(())
    }
}

#[async_trait]
impl<E: Scheduled> ScheduledService<E> for RestService<E> {
    async fn toggle(&self, id: &EntityId) -> Result<Option<E>, StoreError> {
        let path = format!("{}/toggle", Self::item_path(id));
        let body = self.client.patch_json(&path, None).await?;
        Self::unwrap_optional(body)
    }

    async fn reprogramar(
        &self,
        id: &EntityId,
        fecha_ejecucion: NaiveDateTime,
    ) -> Result<Option<E>, StoreError> {
        let path = format!("{}/reprogramar", Self::item_path(id));
        let payload = json!({
            "fechaEjecucion": fecha_ejecucion.format(fecha::FORMAT).to_string(),
        });
        let body = self.client.patch_json(&path, Some(&payload)).await?;
        Self::unwrap_optional(body)
    }
}
