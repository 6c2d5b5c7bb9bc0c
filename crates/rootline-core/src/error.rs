//! Error types for `rootline-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("source not found: {0}")]
  SourceNotFound(Uuid),

  #[error("unknown discriminant: {0:?}")]
  UnknownDiscriminant(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
