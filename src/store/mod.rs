//! Entity stores: one canonical in-memory collection per entity kind, kept
//! synchronized with a remote gateway using optimistic updates.
//!
//! The protocol, per operation:
//! - `fetch_all` replaces the whole collection with the gateway's answer
//! - `create` defers to the gateway (no id exists to assign locally first)
//! - `update` merges the patch locally before the remote call; a failed
//!   remote call rolls back by a full refetch, not a partial revert
//! - `delete` removes locally only after the gateway confirms
//!
//! Every settled mutation and every fetch mirrors the full collection to the
//! durable cache. Operations on one store are not serialized against each
//! other: overlapping mutations may interleave, and the `loading`/`error`
//! flags reflect the most recently settled operation.

pub mod entity;
pub mod projects;
pub mod tasks;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::api::{DataGateway, GatewayMode};
use crate::cache::CacheStore;
use crate::error::SyncError;

use entity::Entity;

/// Observable state of one entity store.
#[derive(Debug, Clone)]
pub struct StoreState<E> {
  /// The canonical in-memory collection, in gateway order
  pub entities: Vec<E>,
  /// True while an operation is in flight
  pub loading: bool,
  /// Display message of the last failure, cleared when an operation starts
  pub error: Option<String>,
}

impl<E> Default for StoreState<E> {
  fn default() -> Self {
    Self {
      entities: Vec::new(),
      loading: false,
      error: None,
    }
  }
}

/// Store for one entity kind, executing mutations against the gateway with
/// optimistic-update semantics.
#[derive(Clone)]
pub struct EntityStore<E: Entity> {
  inner: Arc<StoreInner<E>>,
}

struct StoreInner<E: Entity> {
  state: Mutex<StoreState<E>>,
  gateway: Arc<dyn DataGateway<E>>,
  cache: Arc<dyn CacheStore>,
}

impl<E: Entity> EntityStore<E> {
  pub fn new(gateway: Arc<dyn DataGateway<E>>, cache: Arc<dyn CacheStore>) -> Self {
    Self {
      inner: Arc::new(StoreInner {
        state: Mutex::new(StoreState::default()),
        gateway,
        cache,
      }),
    }
  }

  /// Hydrate the collection from the durable cache.
  ///
  /// A missing slot is a no-op; a corrupt or unreadable slot is logged and
  /// treated as missing. Never fails, never blocks startup.
  pub fn load_from_cache(&self) {
    let stored = match self.inner.cache.get(E::kind()) {
      Ok(Some(stored)) => stored,
      Ok(None) => return,
      Err(error) => {
        warn!("failed to read cached {}: {}", E::kind(), error);
        return;
      }
    };

    match serde_json::from_str::<Vec<E>>(&stored) {
      Ok(entities) => {
        self.lock().entities = entities;
      }
      Err(error) => {
        warn!("discarding corrupt cached {}: {}", E::kind(), error);
      }
    }
  }

  /// Fetch the full collection from the gateway and replace local state.
  ///
  /// This is also the recovery path after a failed update: a full resync
  /// from the authoritative source rather than a partial rollback.
  pub async fn fetch_all(&self) -> Result<Vec<E>, SyncError> {
    self.begin();

    match self.inner.gateway.fetch_all().await {
      Ok(entities) => {
        {
          let mut state = self.lock();
          state.entities = entities.clone();
          state.loading = false;
        }
        self.mirror();
        Ok(entities)
      }
      Err(error) => {
        self.fail(format!("Failed to fetch {}", E::kind()));
        Err(error)
      }
    }
  }

  /// Create an entity through the gateway and append the canonical result.
  ///
  /// There is no optimistic pre-insertion: the entity appears locally only
  /// once the gateway has assigned it an identifier. A response without a
  /// usable identifier fails the operation.
  pub async fn create(&self, draft: E::Draft) -> Result<E, SyncError> {
    if self.inner.gateway.mode() == GatewayMode::Snapshot {
      return Err(SyncError::ReadOnly {
        op: "create",
        noun: E::noun(),
      });
    }

    self.begin();

    match self.inner.gateway.create(&draft).await {
      Ok(created) => {
        if !E::valid_id(created.id()) {
          self.fail(format!("Failed to create {}", E::noun()));
          return Err(SyncError::CreatedWithoutId { noun: E::noun() });
        }

        {
          let mut state = self.lock();
          state.entities.push(created.clone());
          state.loading = false;
        }
        self.mirror();
        Ok(created)
      }
      Err(error) => {
        self.fail(format!("Failed to create {}", E::noun()));
        Err(error)
      }
    }
  }

  /// Apply `patch` optimistically, then confirm it with the gateway.
  ///
  /// The patch is merged in place before the remote call; the gateway's
  /// canonical response then replaces the optimistic value. On remote
  /// failure the collection is resynchronized with `fetch_all` and the
  /// original error is returned.
  pub async fn update(&self, id: &E::Id, patch: E::Patch) -> Result<E, SyncError> {
    if !E::valid_id(id) {
      return Err(SyncError::InvalidId {
        noun: E::noun(),
        id: id.to_string(),
      });
    }
    if self.inner.gateway.mode() == GatewayMode::Snapshot {
      return Err(SyncError::ReadOnly {
        op: "update",
        noun: E::noun(),
      });
    }

    self.begin();

    // Optimistic merge; no blind write to a record we do not hold.
    let found = {
      let mut state = self.lock();
      match state.entities.iter_mut().find(|e| e.id() == id) {
        Some(entity) => {
          entity.apply_patch(&patch);
          true
        }
        None => false,
      }
    };
    if !found {
      self.fail(format!("Failed to update {}", E::noun()));
      return Err(SyncError::NotFound {
        noun: E::noun(),
        id: id.to_string(),
      });
    }
    self.mirror();

    match self.inner.gateway.update(id, &patch).await {
      Ok(canonical) => {
        {
          let mut state = self.lock();
          if let Some(entity) = state.entities.iter_mut().find(|e| e.id() == id) {
            *entity = canonical.clone();
          }
          state.loading = false;
        }
        self.mirror();
        Ok(canonical)
      }
      Err(error) => {
        // Partial local knowledge after a failed partial update is
        // unreliable; resync the whole collection instead of reverting.
        if let Err(resync_error) = self.fetch_all().await {
          warn!(
            "resync after failed {} update also failed: {}",
            E::noun(),
            resync_error
          );
        }
        self.fail(format!("Failed to update {}", E::noun()));
        Err(error)
      }
    }
  }

  /// Delete through the gateway, then remove locally.
  ///
  /// Unlike `update` there is no optimistic removal: the collection is only
  /// touched once the gateway confirms.
  pub async fn delete(&self, id: &E::Id) -> Result<(), SyncError> {
    if !E::valid_id(id) {
      return Err(SyncError::InvalidId {
        noun: E::noun(),
        id: id.to_string(),
      });
    }
    if self.inner.gateway.mode() == GatewayMode::Snapshot {
      return Err(SyncError::ReadOnly {
        op: "delete",
        noun: E::noun(),
      });
    }

    self.begin();

    match self.inner.gateway.delete(id).await {
      Ok(()) => {
        {
          let mut state = self.lock();
          state.entities.retain(|e| e.id() != id);
          state.loading = false;
        }
        self.mirror();
        Ok(())
      }
      Err(error) => {
        self.fail(format!("Failed to delete {}", E::noun()));
        Err(error)
      }
    }
  }

  /// Snapshot of the current store state.
  pub fn state(&self) -> StoreState<E> {
    self.lock().clone()
  }

  /// Snapshot of the current collection.
  pub fn entities(&self) -> Vec<E> {
    self.lock().entities.clone()
  }

  pub fn is_loading(&self) -> bool {
    self.lock().loading
  }

  pub fn last_error(&self) -> Option<String> {
    self.lock().error.clone()
  }

  /// Look up one entity by id in the local collection.
  pub fn find_by_id(&self, id: &E::Id) -> Option<E> {
    self.lock().entities.iter().find(|e| e.id() == id).cloned()
  }

  fn lock(&self) -> MutexGuard<'_, StoreState<E>> {
    // A poisoned lock means a panic elsewhere; the state is still usable.
    self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn begin(&self) {
    let mut state = self.lock();
    state.loading = true;
    state.error = None;
  }

  fn fail(&self, message: String) {
    let mut state = self.lock();
    state.loading = false;
    state.error = Some(message);
  }

  /// Write the full collection to the durable cache.
  ///
  /// Mirror failures do not fail the operation that triggered them: the
  /// cache is a warm-start mirror, not the source of truth.
  fn mirror(&self) {
    let serialized = {
      let state = self.lock();
      serde_json::to_string(&state.entities)
    };

    match serialized {
      Ok(json) => {
        if let Err(error) = self.inner.cache.set(E::kind(), &json) {
          warn!("failed to mirror {} to cache: {}", E::kind(), error);
        }
      }
      Err(error) => {
        warn!("failed to serialize {} for cache: {}", E::kind(), error);
      }
    }
  }
}
