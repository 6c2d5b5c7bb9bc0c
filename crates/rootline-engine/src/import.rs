//! The ingestion pipeline.
//!
//! One sequential pass per source: decode → fingerprint → tokenize → build →
//! normalize → duplicate check → commit. The commit is a single store
//! transaction, so cancellation anywhere before it has zero partial effect.

use rootline_core::{
  import::{ImportIssue, ImportResult, IssueKind, NewSource},
  store::GraphStore,
};
use rootline_gedcom::NormalizeOptions;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// SHA-256 hex digest of the raw input bytes. This is the source
/// fingerprint used for duplicate detection; byte-identical input always
/// produces the same value.
pub fn fingerprint(raw: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(raw);
  hex::encode(hasher.finalize())
}

/// Ingest one batch of raw bytes as a new source.
///
/// Fatal outcomes, with nothing written:
/// - [`Error::EmptyOrUnparsable`] — no valid record line in the input;
/// - [`Error::DuplicateSource`] — byte-identical content already imported.
///
/// Everything else commits and reports recoverable conditions inside the
/// returned [`ImportResult`], in source-line order.
pub async fn import<S>(
  store: &S,
  raw: &[u8],
  source_name: &str,
  options: &NormalizeOptions,
) -> Result<ImportResult>
where
  S: GraphStore,
{
  // Best-effort decode: strict UTF-8 first, lossy with a warning after.
  let (text, encoding_warning) = match std::str::from_utf8(raw) {
    Ok(s) => (std::borrow::Cow::Borrowed(s), None),
    Err(_) => (
      String::from_utf8_lossy(raw),
      Some(ImportIssue::new(
        IssueKind::Encoding,
        None,
        "input is not valid UTF-8; decoded with replacement characters",
      )),
    ),
  };

  let parsed = rootline_gedcom::parse(&text, options).map_err(|e| match e {
    rootline_gedcom::Error::EmptyOrUnparsable => Error::EmptyOrUnparsable,
  })?;

  let fingerprint = fingerprint(raw);
  if let Some(existing) = store
    .source_by_fingerprint(&fingerprint)
    .await
    .map_err(Error::store)?
  {
    tracing::info!(
      existing = %existing.source_id,
      "rejecting re-import of identical content"
    );
    return Err(Error::DuplicateSource {
      existing_source: existing.source_id,
    });
  }

  let persons_created = parsed.batch.persons.len();
  let relationships_created = parsed.batch.relationships.len();
  let events_created = parsed.batch.events.len();
  let places_created = parsed.batch.places.len();

  let source = store
    .commit_source(
      NewSource {
        name: source_name.to_string(),
        fingerprint,
      },
      parsed.batch,
    )
    .await
    .map_err(Error::store)?;

  let mut warnings = parsed.warnings;
  if let Some(w) = encoding_warning {
    warnings.insert(0, w);
  }

  tracing::info!(
    source = %source.source_id,
    persons = persons_created,
    relationships = relationships_created,
    warnings = warnings.len(),
    errors = parsed.errors.len(),
    "import committed"
  );

  Ok(ImportResult {
    source_id: source.source_id,
    persons_created,
    relationships_created,
    events_created,
    places_created,
    warnings,
    errors: parsed.errors,
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
