//! Error type for `rootline-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] rootline_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("decode error: {0}")]
  Decode(String),

  /// A source with the same content fingerprint is already committed.
  /// Nothing was written.
  #[error("duplicate source fingerprint; existing source is {existing}")]
  DuplicateFingerprint { existing: Uuid },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
