//! Remote data gateways.
//!
//! One CRUD surface per entity kind, with two implementing variants:
//! - `LiveGateway`: the dynamic backend, full CRUD over REST
//! - `SnapshotGateway`: pre-generated read-only collection documents
//!
//! Stores depend only on the `DataGateway` interface, selected once at
//! construction from configuration.

mod live;
mod snapshot;
pub mod types;
mod wire;

pub use live::LiveGateway;
pub use snapshot::SnapshotGateway;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::SyncError;
use crate::store::entity::Entity;
use types::{ProjectId, Task};

/// Deployment-time data source selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
  /// Live backend with full CRUD
  #[default]
  Live,
  /// Pre-generated read-only collection documents
  Snapshot,
}

/// One remote CRUD operation per call, returning the canonical entity
/// representation.
#[async_trait]
pub trait DataGateway<E: Entity>: Send + Sync {
  /// Which deployment mode this gateway serves. Stores query the mode to
  /// fail mutations fast in snapshot mode, and never branch on it otherwise.
  fn mode(&self) -> GatewayMode;

  async fn fetch_all(&self) -> Result<Vec<E>, SyncError>;

  async fn fetch_by_id(&self, id: &E::Id) -> Result<Option<E>, SyncError>;

  async fn create(&self, draft: &E::Draft) -> Result<E, SyncError>;

  async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, SyncError>;

  async fn delete(&self, id: &E::Id) -> Result<(), SyncError>;
}

/// Filtered task listing, supported by both gateway variants.
#[async_trait]
pub trait TaskQueries: Send + Sync {
  async fn tasks_for_project(&self, project: ProjectId) -> Result<Vec<Task>, SyncError>;
}

/// Build the gateway for entity kind `E` in the configured mode.
pub fn gateway_for<E: Entity>(config: &Config) -> Result<Arc<dyn DataGateway<E>>, SyncError> {
  match config.mode {
    GatewayMode::Live => Ok(Arc::new(LiveGateway::new(&config.api.base_url)?)),
    GatewayMode::Snapshot => Ok(Arc::new(SnapshotGateway::new(&config.snapshot.base_url)?)),
  }
}

/// Build the filtered-task query surface for the configured mode.
pub fn task_queries(config: &Config) -> Result<Arc<dyn TaskQueries>, SyncError> {
  match config.mode {
    GatewayMode::Live => Ok(Arc::new(LiveGateway::<Task>::new(&config.api.base_url)?)),
    GatewayMode::Snapshot => Ok(Arc::new(SnapshotGateway::<Task>::new(
      &config.snapshot.base_url,
    )?)),
  }
}
