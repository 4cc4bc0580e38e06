//! Per-kind parameterization of the entity store.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// An entity kind managed by an `EntityStore`.
///
/// Implementations supply the identifier semantics, the create/patch payload
/// types and the naming used for cache slots, gateway routes and status
/// messages. Entities round-trip through the cache as JSON, hence the serde
/// bounds.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  type Id: Clone + PartialEq + Display + Send + Sync + 'static;

  /// Create payload: the entity minus its identifier and creation timestamp.
  type Draft: Serialize + Send + Sync + 'static;

  /// Patchable-field subset. Protected fields (the identifier and, for
  /// tasks, the owning project) do not exist on this type.
  type Patch: Serialize + Send + Sync + 'static;

  /// Collection name: cache slot and gateway route ("projects", "tasks").
  fn kind() -> &'static str;

  /// Singular name used in status messages ("project", "task").
  fn noun() -> &'static str;

  fn id(&self) -> &Self::Id;

  /// Whether `id` is well formed. Mutations against an invalid id fail fast
  /// without touching the network; a created entity arriving with an invalid
  /// id is rejected as created-without-id.
  fn valid_id(id: &Self::Id) -> bool;

  /// Merge set patch fields into the entity in place.
  fn apply_patch(&mut self, patch: &Self::Patch);
}
