//! Error type for `incident-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Decoding failures from the core types (malformed tags, unknown status).
  #[error("core error: {0}")]
  Core(#[from] incident_core::Error),

  /// The store could not be reached or rejected the statement.
  #[error("store unavailable: {0}")]
  StoreUnavailable(#[from] tokio_rusqlite::Error),

  /// A partial update failed to write. `message` is the store's own text.
  #[error("failed to update incident {incident_id:?}: {message}")]
  Update {
    incident_id: String,
    message:     String,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
