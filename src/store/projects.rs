//! Project store bindings and derived helpers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::api;
use crate::api::types::{Project, ProjectDraft, ProjectId, ProjectPatch, Task};
use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::SyncError;

use super::entity::Entity;
use super::EntityStore;

impl Entity for Project {
  type Id = ProjectId;
  type Draft = ProjectDraft;
  type Patch = ProjectPatch;

  fn kind() -> &'static str {
    "projects"
  }

  fn noun() -> &'static str {
    "project"
  }

  fn id(&self) -> &ProjectId {
    &self.id
  }

  fn valid_id(id: &ProjectId) -> bool {
    id.0 > 0
  }

  fn apply_patch(&mut self, patch: &ProjectPatch) {
    if let Some(name) = &patch.name {
      self.name = name.clone();
    }
    if let Some(short) = &patch.short_description {
      self.short_description = Some(short.clone());
    }
    if let Some(full) = &patch.full_description {
      self.full_description = Some(full.clone());
    }
    if let Some(status) = patch.status {
      self.status = status;
    }
  }
}

/// Store for the project collection.
pub type ProjectStore = EntityStore<Project>;

/// Build the project store for the configured gateway mode.
pub fn project_store(config: &Config, cache: Arc<dyn CacheStore>) -> Result<ProjectStore, SyncError> {
  Ok(EntityStore::new(api::gateway_for::<Project>(config)?, cache))
}

/// Tasks per project, keyed by owning project id.
///
/// Dangling references are counted under their dangling id.
pub fn task_counts(tasks: &[Task]) -> HashMap<ProjectId, usize> {
  let mut counts = HashMap::new();
  for task in tasks {
    *counts.entry(task.project_id).or_insert(0) += 1;
  }
  counts
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::types::{ProjectStatus, TaskId, TaskStatus};
  use chrono::NaiveDate;

  fn project(id: i64, status: ProjectStatus) -> Project {
    Project {
      id: ProjectId(id),
      name: format!("project {}", id),
      short_description: None,
      full_description: None,
      status,
      created_at: None,
    }
  }

  fn task_in(project: i64) -> Task {
    Task {
      id: TaskId::Num(project * 10),
      project_id: ProjectId(project),
      name: "t".to_string(),
      description: None,
      assignee: None,
      status: TaskStatus::Todo,
      due_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
      order: 1,
      created_at: None,
    }
  }

  #[test]
  fn counts_tasks_per_project() {
    let tasks = vec![task_in(1), task_in(1), task_in(2)];
    let counts = task_counts(&tasks);

    assert_eq!(counts.get(&ProjectId(1)), Some(&2));
    assert_eq!(counts.get(&ProjectId(2)), Some(&1));
    assert_eq!(counts.get(&ProjectId(3)), None);
  }

  #[test]
  fn dangling_references_are_counted_too() {
    // No project 99 exists; referential integrity is not enforced here.
    let counts = task_counts(&[task_in(99)]);
    assert_eq!(counts.get(&ProjectId(99)), Some(&1));
  }

  #[test]
  fn decodes_with_string_id() {
    let decoded: Project = serde_json::from_str(
      r#"{"id":"4","name":"site relaunch","status":"active"}"#,
    )
    .unwrap();
    assert_eq!(decoded.id, ProjectId(4));
    assert_eq!(decoded.status, ProjectStatus::Active);
  }

  #[test]
  fn patch_serializes_only_set_fields() {
    let patch = ProjectPatch {
      status: Some(ProjectStatus::Completed),
      ..ProjectPatch::default()
    };
    assert_eq!(
      serde_json::to_value(&patch).unwrap(),
      serde_json::json!({"status": "completed"})
    );
  }

  #[test]
  fn apply_patch_never_touches_the_id() {
    let mut subject = project(4, ProjectStatus::Active);
    subject.apply_patch(&ProjectPatch {
      name: Some("renamed".to_string()),
      short_description: Some("short".to_string()),
      full_description: None,
      status: Some(ProjectStatus::Completed),
    });

    assert_eq!(subject.id, ProjectId(4));
    assert_eq!(subject.name, "renamed");
    assert_eq!(subject.short_description.as_deref(), Some("short"));
    assert_eq!(subject.status, ProjectStatus::Completed);
  }
}
