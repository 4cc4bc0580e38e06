//! Live gateway: full CRUD against the dynamic backend.

use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use url::Url;

use crate::error::SyncError;
use crate::store::entity::Entity;

use super::types::{ProjectId, Task};
use super::{DataGateway, GatewayMode, TaskQueries};

/// REST client for one entity kind against the dynamic backend.
pub struct LiveGateway<E> {
  http: reqwest::Client,
  base: Url,
  _kind: PhantomData<fn() -> E>,
}

impl<E: Entity> LiveGateway<E> {
  pub fn new(base_url: &str) -> Result<Self, SyncError> {
    Ok(Self {
      http: reqwest::Client::new(),
      base: parse_base(base_url)?,
      _kind: PhantomData,
    })
  }

  fn collection_url(&self) -> Result<Url, SyncError> {
    Ok(self.base.join(E::kind())?)
  }

  fn item_url(&self, id: &E::Id) -> Result<Url, SyncError> {
    Ok(self.base.join(&format!("{}/{}", E::kind(), id))?)
  }
}

/// Ensure the base ends with a slash so joins append instead of replace.
pub(super) fn parse_base(raw: &str) -> Result<Url, SyncError> {
  if raw.ends_with('/') {
    Ok(Url::parse(raw)?)
  } else {
    Ok(Url::parse(&format!("{}/", raw))?)
  }
}

/// Reject non-success statuses before decoding.
pub(super) fn check_status(response: Response) -> Result<Response, SyncError> {
  let status = response.status();
  if status.is_success() {
    Ok(response)
  } else {
    Err(SyncError::Status {
      status: status.as_u16(),
      url: response.url().to_string(),
    })
  }
}

/// Decode a response body, keeping decode failures distinct from transport
/// failures.
pub(super) async fn decode<T: serde::de::DeserializeOwned>(
  response: Response,
) -> Result<T, SyncError> {
  let body = response.text().await?;
  Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl<E: Entity> DataGateway<E> for LiveGateway<E> {
  fn mode(&self) -> GatewayMode {
    GatewayMode::Live
  }

  async fn fetch_all(&self) -> Result<Vec<E>, SyncError> {
    let response = self.http.get(self.collection_url()?).send().await?;
    decode(check_status(response)?).await
  }

  async fn fetch_by_id(&self, id: &E::Id) -> Result<Option<E>, SyncError> {
    let response = self.http.get(self.item_url(id)?).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    Ok(Some(decode(check_status(response)?).await?))
  }

  async fn create(&self, draft: &E::Draft) -> Result<E, SyncError> {
    let response = self
      .http
      .post(self.collection_url()?)
      .json(draft)
      .send()
      .await?;
    decode(check_status(response)?).await
  }

  async fn update(&self, id: &E::Id, patch: &E::Patch) -> Result<E, SyncError> {
    let response = self.http.patch(self.item_url(id)?).json(patch).send().await?;
    decode(check_status(response)?).await
  }

  async fn delete(&self, id: &E::Id) -> Result<(), SyncError> {
    let response = self.http.delete(self.item_url(id)?).send().await?;
    check_status(response)?;
    Ok(())
  }
}

#[async_trait]
impl TaskQueries for LiveGateway<Task> {
  async fn tasks_for_project(&self, project: ProjectId) -> Result<Vec<Task>, SyncError> {
    let mut url = self.collection_url()?;
    url
      .query_pairs_mut()
      .append_pair("projectId", &project.to_string());
    let response = self.http.get(url).send().await?;
    decode(check_status(response)?).await
  }
}
