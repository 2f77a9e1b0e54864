//! Generic optimistic entity store
//!
//! One [`EntityStore`] per entity. Every operation follows the same shape:
//! set `loading`, await the service, patch the [`ListState`], and on failure
//! record the user-facing message and return the error to the caller.

use crate::error::{Action, StoreError};
use crate::resource::{Resource, Scheduled};
use crate::service::{CrudService, RestService, ScheduledService};
use crate::state::ListState;
use chrono::NaiveDateTime;
use finanzas_core::{EntityId, PageQuery, StoreConfig, Validate};
use tokio::sync::watch;

/// What a failed delete does to the optimistic removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Put the item back where it was and restore the count
    #[default]
    Rollback,
    /// Leave the item removed; only the error is recorded
    KeepRemoved,
}

impl DeletePolicy {
    /// Policy selected by [`StoreConfig::rollback_failed_delete`]
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        if config.rollback_failed_delete {
            DeletePolicy::Rollback
        } else {
            DeletePolicy::KeepRemoved
        }
    }
}

/// Observable list of `E` backed by service `S`
pub struct EntityStore<E: Resource, S = RestService<E>> {
    service: S,
    state: watch::Sender<ListState<E>>,
    delete_policy: DeletePolicy,
}

impl<E, S> EntityStore<E, S>
where
    E: Resource,
    S: CrudService<E>,
{
    /// Store over `service`
    #[must_use]
    pub fn new(service: S, config: &StoreConfig) -> Self {
        let (state, _) = watch::channel(ListState::new(config.page_size));
        Self {
            service,
            state,
            delete_policy: DeletePolicy::from_config(config),
        }
    }

    /// With a delete policy other than the configured one
    #[inline]
    #[must_use]
    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    /// Snapshot of the state
    #[must_use]
    pub fn state(&self) -> ListState<E> {
        self.state.borrow().clone()
    }

    /// Observe the state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListState<E>> {
        self.state.subscribe()
    }

    /// Underlying service
    #[inline]
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn fail(&self, err: StoreError, action: Action) -> StoreError {
        let err = err.during(action, E::LABEL);
        let message = err.user_message();
        tracing::warn!("{} {} failed: {}", action.verb(), E::LABEL, err);
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
        });
        err
    }

    fn settle(&self) {
        self.state.send_modify(|s| s.loading = false);
    }

    /// Free-text search; the listed items are left alone
    ///
    /// # Errors
    /// Service failure, annotated with the store's fallback message.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<E>, StoreError> {
        self.begin();
        match self.service.search(query, limit).await {
            Ok(found) => {
                self.settle();
                Ok(found)
            }
            Err(e) => Err(self.fail(e, Action::Search)),
        }
    }

    /// Most recent entities
    ///
    /// # Errors
    /// Service failure.
    pub async fn get_recent(&self, limit: u32) -> Result<Vec<E>, StoreError> {
        self.begin();
        match self.service.recent(limit).await {
            Ok(recent) => {
                self.settle();
                Ok(recent)
            }
            Err(e) => Err(self.fail(e, Action::Recent)),
        }
    }

    /// Load one page, replacing the items and total
    ///
    /// # Errors
    /// Service failure; items are left as they were.
    pub async fn load_page(&self, query: PageQuery) -> Result<(), StoreError> {
        self.state.send_modify(|s| {
            s.apply_query(&query);
            s.loading = true;
            s.error = None;
        });
        match self.service.list(&query).await {
            Ok(page) => {
                self.state.send_modify(|s| {
                    s.items = page.items;
                    s.total_records = page.total_count;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => Err(self.fail(e, Action::Load)),
        }
    }

    /// Reload the current page
    ///
    /// # Errors
    /// See [`EntityStore::load_page`].
    pub async fn reload(&self) -> Result<(), StoreError> {
        let query = self.state.borrow().query();
        self.load_page(query).await
    }

    /// Fetch one entity without touching the list
    ///
    /// # Errors
    /// Service failure.
    pub async fn get(&self, id: &EntityId) -> Result<E, StoreError> {
        self.service
            .get(id)
            .await
            .map_err(|e| e.during(Action::Load, E::LABEL))
    }

    /// Validate, create and prepend
    ///
    /// # Errors
    /// Validation failure (nothing is sent) or service failure.
    pub async fn create(&self, input: &E::Input) -> Result<E, StoreError> {
        if let Err(invalid) = input.validate() {
            return Err(self.fail(invalid.into(), Action::Create));
        }
        self.begin();
        match self.service.create(input).await {
            Ok(created) => {
                let item = created.clone();
                self.state.send_modify(|s| {
                    s.items.insert(0, item);
                    s.total_records += 1;
                    s.loading = false;
                });
                tracing::debug!("Created {} {}", E::LABEL, created.id());
                Ok(created)
            }
            Err(e) => Err(self.fail(e, Action::Create)),
        }
    }

    /// Validate, update and replace the matching item
    ///
    /// # Errors
    /// Validation failure (nothing is sent) or service failure.
    pub async fn update(&self, id: &EntityId, input: &E::Input) -> Result<E, StoreError> {
        if let Err(invalid) = input.validate() {
            return Err(self.fail(invalid.into(), Action::Update));
        }
        self.begin();
        match self.service.update(id, input).await {
            Ok(updated) => {
                self.replace(id, updated.clone());
                self.settle();
                Ok(updated)
            }
            Err(e) => Err(self.fail(e, Action::Update)),
        }
    }

    fn replace(&self, id: &EntityId, item: E) {
        self.state.send_modify(|s| {
            if let Some(slot) = s.items.iter_mut().find(|i| i.id() == id) {
                *slot = item;
            }
        });
    }

    /// Remove optimistically, then delete on the server
    ///
    /// The item disappears and `total_records` drops before the request
    /// settles. A failure records the error and, under
    /// [`DeletePolicy::Rollback`], puts the item back.
    ///
    /// # Errors
    /// Service failure.
    pub async fn delete(&self, id: &EntityId) -> Result<(), StoreError> {
        let mut removed: Option<(usize, E)> = None;
        self.state.send_modify(|s| {
            if let Some(index) = s.items.iter().position(|i| i.id() == id) {
                removed = Some((index, s.items.remove(index)));
                s.total_records = s.total_records.saturating_sub(1);
            }
            s.loading = true;
            s.error = None;
        });

        match self.service.delete(id).await {
            Ok(()) => {
                self.settle();
                tracing::debug!("Deleted {} {}", E::LABEL, id);
                Ok(())
            }
            Err(e) => {
                let err = self.fail(e, Action::Delete);
                if let (DeletePolicy::Rollback, Some((index, item))) = (self.delete_policy, removed)
                {
                    self.state.send_modify(|s| {
                        // A reload while the delete was in flight may have brought it back
                        if s.items.iter().any(|i| i.id() == item.id()) {
                            return;
                        }
                        let at = index.min(s.items.len());
                        s.items.insert(at, item);
                        s.total_records += 1;
                    });
                }
                Err(err)
            }
        }
    }

    /// Clear the recorded error
    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }
}

impl<E, S> EntityStore<E, S>
where
    E: Scheduled,
    S: ScheduledService<E>,
{
    /// Pause or resume; the item is patched in place
    ///
    /// # Errors
    /// Service failure.
    pub async fn toggle(&self, id: &EntityId) -> Result<Option<E>, StoreError> {
        self.begin();
        match self.service.toggle(id).await {
            Ok(echoed) => Ok(self.patch(id, echoed, |item| {
                let activo = item.activo();
                item.set_activo(!activo);
            })),
            Err(e) => Err(self.fail(e, Action::Toggle)),
        }
    }

    /// Move the next execution; the item is patched in place
    ///
    /// # Errors
    /// Service failure.
    pub async fn reprogramar(
        &self,
        id: &EntityId,
        fecha_ejecucion: NaiveDateTime,
    ) -> Result<Option<E>, StoreError> {
        self.begin();
        match self.service.reprogramar(id, fecha_ejecucion).await {
            Ok(echoed) => Ok(self.patch(id, echoed, |item| {
                item.set_fecha_ejecucion(fecha_ejecucion);
            })),
            Err(e) => Err(self.fail(e, Action::Reschedule)),
        }
    }

    /// Use the server's copy when echoed, else apply `local` to the listed item
    fn patch(&self, id: &EntityId, echoed: Option<E>, local: impl FnOnce(&mut E)) -> Option<E> {
        let mut result = echoed.clone();
        self.state.send_modify(|s| {
            if let Some(slot) = s.items.iter_mut().find(|i| i.id() == id) {
                match echoed {
                    Some(item) => *slot = item,
                    None => local(slot),
                }
                result = Some(slot.clone());
            }
            s.loading = false;
        });
        result
    }
}

impl<E: Resource, S> std::fmt::Debug for EntityStore<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EntityStore")
            .field("path", &E::PATH)
            .field("items", &state.items.len())
            .field("total_records", &state.total_records)
            .field("delete_policy", &self.delete_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use finanzas_core::{Categoria, NuevoCatalogo, Page};
    use finanzas_http::HttpError;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn categoria(id: &str, nombre: &str) -> Categoria {
        Categoria {
            id: EntityId::from(id),
            nombre: nombre.to_string(),
            fecha_creacion: None,
            usuario_id: None,
        }
    }

    /// In-memory service; `delete` waits for `release` and fails when `fail_delete`
    #[derive(Default)]
    struct FakeService {
        release: Notify,
        fail_delete: bool,
        creates: AtomicUsize,
    }

    #[async_trait]
    impl CrudService<Categoria> for FakeService {
        async fn search(&self, query: &str, _limit: u32) -> Result<Vec<Categoria>, StoreError> {
            Ok(vec![categoria("s1", query)])
        }

        async fn recent(&self, limit: u32) -> Result<Vec<Categoria>, StoreError> {
            Ok((0..limit).map(|i| categoria(&i.to_string(), "r")).collect())
        }

        async fn list(&self, query: &PageQuery) -> Result<Page<Categoria>, StoreError> {
            Ok(Page {
                items: vec![categoria("1", "Hogar"), categoria("2", "Ocio"), categoria("3", "Salud")],
                total_count: 23,
                page: query.page,
                page_size: query.page_size,
            })
        }

        async fn get(&self, id: &EntityId) -> Result<Categoria, StoreError> {
            Ok(categoria(id.as_str(), "x"))
        }

        async fn create(&self, input: &NuevoCatalogo) -> Result<Categoria, StoreError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(categoria("nuevo", &input.nombre))
        }

        async fn update(&self, id: &EntityId, input: &NuevoCatalogo) -> Result<Categoria, StoreError> {
            Ok(categoria(id.as_str(), &input.nombre))
        }

        async fn delete(&self, _id: &EntityId) -> Result<(), StoreError> {
            self.release.notified().await;
            if self.fail_delete {
                Err(HttpError::status(500, "http://api/categorias/2", Value::Null).into())
            } else {
                Ok(())
            }
        }
    }

    async fn loaded(service: FakeService, policy: DeletePolicy) -> std::sync::Arc<EntityStore<Categoria, FakeService>> {
        let store = EntityStore::new(service, &StoreConfig::default()).with_delete_policy(policy);
        store.load_page(PageQuery::new(1, 10)).await.unwrap();
        std::sync::Arc::new(store)
    }

    #[tokio::test]
    async fn delete_is_applied_before_the_call_settles() {
        let store = loaded(FakeService::default(), DeletePolicy::Rollback).await;
        let pending = {
            let store = store.clone();
            tokio::spawn(async move { store.delete(&EntityId::from("2")).await })
        };
        tokio::task::yield_now().await;

        let during = store.state();
        assert_eq!(during.items.len(), 2);
        assert_eq!(during.total_records, 22);
        assert!(during.loading);

        store.service().release.notify_one();
        pending.await.unwrap().unwrap();
        assert!(!store.state().loading);
        assert_eq!(store.state().total_records, 22);
    }

    #[tokio::test]
    async fn failed_delete_rolls_back_in_place() {
        let service = FakeService { fail_delete: true, ..FakeService::default() };
        let store = loaded(service, DeletePolicy::Rollback).await;
        store.service().release.notify_one();

        let err = store.delete(&EntityId::from("2")).await.unwrap_err();

        let state = store.state();
        let ids: Vec<_> = state.items.iter().map(|c| c.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(state.total_records, 23);
        assert_eq!(state.error.as_deref(), Some("Error al eliminar categoría"));
        assert_eq!(err.user_message(), "Error al eliminar categoría");
    }

    #[tokio::test]
    async fn rollback_after_reload_does_not_duplicate() {
        let service = FakeService { fail_delete: true, ..FakeService::default() };
        let store = loaded(service, DeletePolicy::Rollback).await;
        let pending = {
            let store = store.clone();
            tokio::spawn(async move { store.delete(&EntityId::from("2")).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(store.state().items.len(), 2);

        store.reload().await.unwrap();
        store.service().release.notify_one();
        assert!(pending.await.unwrap().is_err());

        let state = store.state();
        let ids: Vec<_> = state.items.iter().map(|c| c.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(state.total_records, 23);
    }

    #[tokio::test]
    async fn failed_delete_can_keep_removal() {
        let service = FakeService { fail_delete: true, ..FakeService::default() };
        let store = loaded(service, DeletePolicy::KeepRemoved).await;
        store.service().release.notify_one();

        assert!(store.delete(&EntityId::from("2")).await.is_err());

        let state = store.state();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.total_records, 22);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn create_prepends_and_counts() {
        let store = loaded(FakeService::default(), DeletePolicy::Rollback).await;

        let created = store.create(&NuevoCatalogo::new("Viajes")).await.unwrap();

        let state = store.state();
        assert_eq!(state.items[0], created);
        assert_eq!(state.total_records, 24);
    }

    #[tokio::test]
    async fn invalid_input_is_never_sent() {
        let store = loaded(FakeService::default(), DeletePolicy::Rollback).await;

        let err = store.create(&NuevoCatalogo::new("   ")).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.service().creates.load(Ordering::SeqCst), 0);
        assert_eq!(store.state().error.as_deref(), Some("El campo nombre es obligatorio"));
    }

    #[tokio::test]
    async fn search_leaves_items_alone() {
        let store = loaded(FakeService::default(), DeletePolicy::Rollback).await;

        let found = store.search("ali", 10).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(store.state().items.len(), 3);
        assert!(!store.state().loading);
    }

    #[tokio::test]
    async fn update_replaces_matching_item() {
        let store = loaded(FakeService::default(), DeletePolicy::Rollback).await;

        store
            .update(&EntityId::from("3"), &NuevoCatalogo::new("Salud y farmacia"))
            .await
            .unwrap();

        assert_eq!(store.state().items[2].nombre, "Salud y farmacia");
    }
}
