//! Task store bindings.

use std::sync::Arc;

use crate::api;
use crate::api::types::{Task, TaskDraft, TaskId, TaskPatch};
use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::SyncError;

use super::entity::Entity;
use super::EntityStore;

impl Entity for Task {
  type Id = TaskId;
  type Draft = TaskDraft;
  type Patch = TaskPatch;

  fn kind() -> &'static str {
    "tasks"
  }

  fn noun() -> &'static str {
    "task"
  }

  fn id(&self) -> &TaskId {
    &self.id
  }

  fn valid_id(id: &TaskId) -> bool {
    match id {
      TaskId::Num(n) => *n > 0,
      TaskId::Token(t) => !t.is_empty(),
    }
  }

  fn apply_patch(&mut self, patch: &TaskPatch) {
    if let Some(name) = &patch.name {
      self.name = name.clone();
    }
    if let Some(description) = &patch.description {
      self.description = Some(description.clone());
    }
    if let Some(assignee) = &patch.assignee {
      self.assignee = Some(assignee.clone());
    }
    if let Some(status) = patch.status {
      self.status = status;
    }
    if let Some(due_date) = patch.due_date {
      self.due_date = due_date;
    }
    if let Some(order) = patch.order {
      self.order = order;
    }
  }
}

/// Store for the task collection.
pub type TaskStore = EntityStore<Task>;

/// Build the task store for the configured gateway mode.
pub fn task_store(config: &Config, cache: Arc<dyn CacheStore>) -> Result<TaskStore, SyncError> {
  Ok(EntityStore::new(api::gateway_for::<Task>(config)?, cache))
}
