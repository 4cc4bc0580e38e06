//! Snapshot gateway: pre-generated read-only collection documents.

use std::marker::PhantomData;

use async_trait::async_trait;
use url::Url;

use crate::error::SyncError;
use crate::store::entity::Entity;

use super::live::{check_status, decode, parse_base};
use super::types::{ProjectId, Task};
use super::{DataGateway, GatewayMode, TaskQueries};

/// Read-only gateway over one pre-generated document per entity kind.
///
/// There is no per-id endpoint: lookups filter the full collection.
/// Mutations are rejected without a network round trip.
pub struct SnapshotGateway<E> {
  http: reqwest::Client,
  base: Url,
  _kind: PhantomData<fn() -> E>,
}

impl<E: Entity> SnapshotGateway<E> {
  pub fn new(base_url: &str) -> Result<Self, SyncError> {
    Ok(Self {
      http: reqwest::Client::new(),
      base: parse_base(base_url)?,
      _kind: PhantomData,
    })
  }

  fn document_url(&self) -> Result<Url, SyncError> {
    Ok(self.base.join(&format!("{}.json", E::kind()))?)
  }
}

#[async_trait]
impl<E: Entity> DataGateway<E> for SnapshotGateway<E> {
  fn mode(&self) -> GatewayMode {
    GatewayMode::Snapshot
  }

  async fn fetch_all(&self) -> Result<Vec<E>, SyncError> {
    let response = self.http.get(self.document_url()?).send().await?;
    decode(check_status(response)?).await
  }

  async fn fetch_by_id(&self, id: &E::Id) -> Result<Option<E>, SyncError> {
    let all = self.fetch_all().await?;
    Ok(all.into_iter().find(|entity| entity.id() == id))
  }

  async fn create(&self, _draft: &E::Draft) -> Result<E, SyncError> {
    Err(SyncError::ReadOnly {
      op: "create",
      noun: E::noun(),
    })
  }

  async fn update(&self, _id: &E::Id, _patch: &E::Patch) -> Result<E, SyncError> {
    Err(SyncError::ReadOnly {
      op: "update",
      noun: E::noun(),
    })
  }

  async fn delete(&self, _id: &E::Id) -> Result<(), SyncError> {
    Err(SyncError::ReadOnly {
      op: "delete",
      noun: E::noun(),
    })
  }
}

#[async_trait]
impl TaskQueries for SnapshotGateway<Task> {
  async fn tasks_for_project(&self, project: ProjectId) -> Result<Vec<Task>, SyncError> {
    let all = self.fetch_all().await?;
    Ok(all.into_iter().filter(|t| t.project_id == project).collect())
  }
}
