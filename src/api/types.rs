use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Project identifier, numeric on the wire (possibly as a string).
///
/// `0` is the unassigned sentinel and never a valid persisted id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProjectId(pub i64);

impl fmt::Display for ProjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for ProjectId {
  type Err = std::num::ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.parse::<i64>().map(ProjectId)
  }
}

/// Task identifier: the dynamic backend numbers tasks, snapshot documents
/// may carry the same ids as opaque string tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
  Num(i64),
  Token(String),
}

impl Default for TaskId {
  fn default() -> Self {
    TaskId::Num(0)
  }
}

// A numeric id and its string form are the same id.
impl PartialEq for TaskId {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (TaskId::Num(a), TaskId::Num(b)) => a == b,
      (TaskId::Token(a), TaskId::Token(b)) => a == b,
      (TaskId::Num(n), TaskId::Token(t)) | (TaskId::Token(t), TaskId::Num(n)) => {
        t.parse::<i64>().map_or(false, |parsed| parsed == *n)
      }
    }
  }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TaskId::Num(n) => write!(f, "{}", n),
      TaskId::Token(t) => f.write_str(t),
    }
  }
}

impl FromStr for TaskId {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s.parse::<i64>() {
      Ok(n) => TaskId::Num(n),
      Err(_) => TaskId::Token(s.to_string()),
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
  Pending,
  Active,
  Completed,
  Planned,
}

impl fmt::Display for ProjectStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ProjectStatus::Pending => "pending",
      ProjectStatus::Active => "active",
      ProjectStatus::Completed => "completed",
      ProjectStatus::Planned => "planned",
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
  Todo,
  InProgress,
  Done,
}

impl fmt::Display for TaskStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      TaskStatus::Todo => "todo",
      TaskStatus::InProgress => "in-progress",
      TaskStatus::Done => "done",
    })
  }
}

/// A project board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  #[serde(default)]
  pub id: ProjectId,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub short_description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub full_description: Option<String>,
  pub status: ProjectStatus,
  /// Assigned by the gateway on create
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
}

/// A task on a project board
///
/// `project_id` may dangle; referential integrity is not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  #[serde(default)]
  pub id: TaskId,
  pub project_id: ProjectId,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub assignee: Option<String>,
  pub status: TaskStatus,
  pub due_date: NaiveDate,
  /// Sort position within the board; ordering itself is a view concern
  pub order: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
}

/// Create payload for a project: the entity minus id and creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub short_description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub full_description: Option<String>,
  pub status: ProjectStatus,
}

/// Create payload for a task: the entity minus id and creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
  pub project_id: ProjectId,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<String>,
  pub status: TaskStatus,
  pub due_date: NaiveDate,
  pub order: i64,
}

/// Patchable fields of a project. The id is deliberately absent: partial
/// updates cannot overwrite it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub short_description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub full_description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<ProjectStatus>,
}

/// Patchable fields of a task. The id and the owning project are deliberately
/// absent: partial updates cannot overwrite them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assignee: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<TaskStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub due_date: Option<NaiveDate>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub order: Option<i64>,
}
