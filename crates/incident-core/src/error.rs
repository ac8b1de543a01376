//! Error types for `incident-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Stored tag text on a moderated read was not a JSON array of strings.
  #[error("malformed tags on incident {id}: {source}")]
  MalformedTags {
    id:     i64,
    #[source]
    source: serde_json::Error,
  },

  #[error("unknown moderation status: {0:?}")]
  UnknownStatus(String),

  #[error("incident {0} has no moderation status")]
  MissingStatus(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
