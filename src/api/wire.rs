//! Lenient wire-format decoding for identifiers.
//!
//! The dynamic backend hands out numeric ids while snapshot documents and
//! older cached collections may carry the same ids as strings. Foreign keys
//! are coerced to numeric form on every decode: hydration, fetch and
//! write-back all pass through these impls.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use super::types::ProjectId;

impl<'de> Deserialize<'de> for ProjectId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
      type Value = ProjectId;

      fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a numeric id or a numeric string")
      }

      fn visit_i64<E: de::Error>(self, v: i64) -> Result<ProjectId, E> {
        Ok(ProjectId(v))
      }

      fn visit_u64<E: de::Error>(self, v: u64) -> Result<ProjectId, E> {
        i64::try_from(v)
          .map(ProjectId)
          .map_err(|_| E::custom(format!("id {} out of range", v)))
      }

      fn visit_str<E: de::Error>(self, v: &str) -> Result<ProjectId, E> {
        v.parse::<i64>()
          .map(ProjectId)
          .map_err(|_| E::custom(format!("non-numeric id: {:?}", v)))
      }
    }

    deserializer.deserialize_any(IdVisitor)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_numbers() {
    let id: ProjectId = serde_json::from_str("3").unwrap();
    assert_eq!(id, ProjectId(3));
  }

  #[test]
  fn coerces_numeric_strings() {
    let id: ProjectId = serde_json::from_str("\"3\"").unwrap();
    assert_eq!(id, ProjectId(3));
  }

  #[test]
  fn rejects_non_numeric_strings() {
    assert!(serde_json::from_str::<ProjectId>("\"abc\"").is_err());
  }
}
