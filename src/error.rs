use thiserror::Error;

/// Errors surfaced by gateways, caches and entity stores.
///
/// Store operations additionally record a coarse display message on the
/// store state; callers that need to tell failure classes apart match on
/// this type instead.
#[derive(Debug, Error)]
pub enum SyncError {
  /// A malformed or missing identifier was handed to `update` or `delete`.
  #[error("invalid {noun} id: {id}")]
  InvalidId { noun: &'static str, id: String },

  /// The identifier is not present in the in-memory collection.
  #[error("{noun} with id {id} not found")]
  NotFound { noun: &'static str, id: String },

  /// A mutation was attempted while the gateway serves a read-only snapshot.
  #[error("{op} {noun} not supported in snapshot mode")]
  ReadOnly { op: &'static str, noun: &'static str },

  /// The gateway answered a create without a usable identifier.
  #[error("{noun} created without id")]
  CreatedWithoutId { noun: &'static str },

  /// The HTTP request itself failed.
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The gateway answered with a non-success status.
  #[error("unexpected status {status} from {url}")]
  Status { status: u16, url: String },

  /// The gateway answered with a body that does not decode.
  #[error("malformed response: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("invalid base url: {0}")]
  BaseUrl(#[from] url::ParseError),

  /// The cache backend failed. Corrupt cached snapshots are recovered
  /// internally and never reach this variant.
  #[error("cache storage: {0}")]
  Cache(#[from] rusqlite::Error),

  #[error("cache directory: {0}")]
  Io(#[from] std::io::Error),

  #[error("could not determine data directory")]
  NoDataDir,

  #[error("cache lock poisoned")]
  CacheLock,
}
