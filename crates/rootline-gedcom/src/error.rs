//! Error types for the rootline-gedcom codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The input produced no valid level-tagged lines at all.
  #[error("input is empty or contains no parsable record lines")]
  EmptyOrUnparsable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
