//! Error type for `rootline-engine`.
//!
//! Only fatal conditions surface here. Recoverable import conditions ride in
//! the [`ImportResult`](rootline_core::import::ImportResult) lists instead.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The input produced no valid record lines; nothing was committed.
  #[error("input is empty or contains no parsable record lines")]
  EmptyOrUnparsable,

  /// Byte-identical content was imported before; nothing was committed.
  #[error("identical content was already imported as source {existing_source}")]
  DuplicateSource { existing_source: Uuid },

  /// Traversal depth must be a positive integer; there is no unbounded
  /// mode.
  #[error("traversal depth must be a positive integer, got {0}")]
  InvalidDepth(i64),

  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  /// A storage failure, propagated verbatim — never a silently partial
  /// result.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
