//! Import-result types — the warning/error taxonomy and the batch handed to
//! the store for an atomic commit.
//!
//! Recoverable conditions never abort an import; they accumulate here, in
//! source-line order, and travel back to the caller inside [`ImportResult`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{Event, Person, Place, Relationship};

// ─── Issues ──────────────────────────────────────────────────────────────────

/// Classification of a non-fatal import condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
  /// A line whose leading token is not a non-negative integer level.
  MalformedLine,
  /// A token that fits nowhere in the record forest (orphaned fragment,
  /// level jump).
  Structural,
  /// A pointer with no matching record; the referencing edge was dropped.
  DanglingReference,
  /// A record identifier repeated within one batch; the later record won.
  DuplicateRecordId,
  /// A parent-of edge that would have made a person its own ancestor.
  /// Reported as an error, not a warning — it usually indicates corrupt
  /// source data.
  CycleRejected,
  /// Input bytes that were not valid UTF-8 and were decoded lossily.
  Encoding,
}

/// One recoverable condition encountered during import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportIssue {
  pub kind:    IssueKind,
  /// 1-based input line number, where one applies.
  pub line:    Option<usize>,
  pub message: String,
}

impl ImportIssue {
  pub fn new(
    kind: IssueKind,
    line: Option<usize>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      kind,
      line,
      message: message.into(),
    }
  }
}

// ─── Batch ───────────────────────────────────────────────────────────────────

/// Everything a successful normalization produced, ready for a single
/// transactional commit.
///
/// All entities carry `source_id = Uuid::nil()`; the store stamps the real
/// source UUID when it creates the [`Source`](crate::entity::Source) row.
#[derive(Debug, Clone, Default)]
pub struct GraphBatch {
  pub persons:       Vec<Person>,
  pub relationships: Vec<Relationship>,
  pub events:        Vec<Event>,
  pub places:        Vec<Place>,
}

/// Input to [`crate::store::GraphStore::commit_source`].
/// `imported_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewSource {
  pub name:        String,
  pub fingerprint: String,
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// The outcome of a committed import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
  pub source_id:             Uuid,
  pub persons_created:       usize,
  pub relationships_created: usize,
  pub events_created:        usize,
  pub places_created:        usize,
  /// Recoverable conditions, in source-line order.
  pub warnings:              Vec<ImportIssue>,
  /// Rejected-but-committed conditions (cycle-forming edges), reported
  /// separately so callers can surface them prominently.
  pub errors:                Vec<ImportIssue>,
}
