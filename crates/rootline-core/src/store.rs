//! The `GraphStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `rootline-store-sqlite`). Higher layers (`rootline-engine`,
//! `rootline-api`) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  entity::{Event, Person, Place, Relationship, Source},
  import::{GraphBatch, NewSource},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Applied when a caller omits [`PersonQuery::limit`].
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Parameters for [`GraphStore::search_persons`].
#[derive(Debug, Clone, Default)]
pub struct PersonQuery {
  /// Case-insensitive substring matched against given names, surname, and
  /// their concatenation.
  pub text:   Option<String>,
  /// Restrict results to one source.
  pub source: Option<Uuid>,
  /// Maximum result count; [`DEFAULT_SEARCH_LIMIT`] when `None`.
  pub limit:  Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a rootline graph-store backend.
///
/// Writes happen only through [`GraphStore::commit_source`], which persists a
/// whole batch atomically, and [`GraphStore::delete_source`], which removes a
/// source and everything it owns. Entities are never mutated in place.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GraphStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Sources ───────────────────────────────────────────────────────────

  /// Persist `batch` under a newly created source, atomically: either the
  /// source row and every entity land, or nothing does.
  ///
  /// Fails without writing anything when `source.fingerprint` already
  /// exists; the error carries the pre-existing source's UUID.
  fn commit_source(
    &self,
    source: NewSource,
    batch: GraphBatch,
  ) -> impl Future<Output = Result<Source, Self::Error>> + Send + '_;

  /// Look up a source by its content fingerprint.
  fn source_by_fingerprint<'a>(
    &'a self,
    fingerprint: &'a str,
  ) -> impl Future<Output = Result<Option<Source>, Self::Error>> + Send + 'a;

  /// Retrieve a source by UUID. Returns `None` if not found.
  fn get_source(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Source>, Self::Error>> + Send + '_;

  /// List all sources, newest first.
  fn list_sources(
    &self,
  ) -> impl Future<Output = Result<Vec<Source>, Self::Error>> + Send + '_;

  /// Delete a source and cascade to everything it owns, including
  /// relationships from *other* sources that reference a deleted person.
  /// Idempotent: deleting an unknown UUID is a no-op.
  fn delete_source(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Retrieve a person by UUID. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Retrieve many persons at once. Unknown UUIDs are silently absent from
  /// the result.
  fn get_persons<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// All persons owned by one source.
  fn persons_by_source(
    &self,
    source_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Search persons by name. See [`PersonQuery`].
  fn search_persons<'a>(
    &'a self,
    query: &'a PersonQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Every relationship with at least one endpoint in `ids`.
  /// This is the traversal engine's frontier-expansion read.
  fn relationships_touching<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Relationship>, Self::Error>> + Send + 'a;

  /// Every relationship with *both* endpoints in `ids` — the edge set of
  /// the induced subgraph.
  fn relationships_among<'a>(
    &'a self,
    ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Relationship>, Self::Error>> + Send + 'a;

  // ── Events & places ───────────────────────────────────────────────────

  /// All events owned by a person, in insertion order.
  fn events_for_person(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  /// Retrieve a place by UUID. Returns `None` if not found.
  fn get_place(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Place>, Self::Error>> + Send + '_;
}
