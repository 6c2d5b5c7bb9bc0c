//! The entity model — persons, relationships, events, places, sources.
//!
//! Every entity is owned by exactly one [`Source`] and is immutable after
//! commit. There is no per-entity deletion; removing a source removes
//! everything it owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date::PartialDate;

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Recorded sex. Tri-state; sources frequently omit it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
  Male,
  Female,
  #[default]
  Unknown,
}

/// How certain the source is about a relationship claim.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
  Low,
  #[default]
  Medium,
  High,
}

/// The kind of a directed relationship edge.
///
/// `ParentOf` runs parent → child and must stay acyclic across the graph of
/// one source. `SpouseOf` and `SiblingOf` are symmetric in meaning but stored
/// once, in the order the source listed the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
  ParentOf,
  SpouseOf,
  SiblingOf,
}

/// Life-event taxonomy. Events outside the core set keep their original
/// record tag in [`Event::raw_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  Birth,
  Death,
  Marriage,
  Divorce,
  Other,
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// An individual, as claimed by one source.
///
/// A second import of overlapping data creates new `Person` rows under the
/// new source; rows are never merged or mutated across sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:      Uuid,
  pub source_id:      Uuid,
  /// The source-local record identifier (e.g. the xref of the original
  /// record). Stable within its source, meaningless outside it.
  pub record_id:      Option<String>,
  pub given_names:    Option<String>,
  pub surname:        Option<String>,
  pub sex:            Sex,
  pub birth_date:     Option<PartialDate>,
  pub birth_place_id: Option<Uuid>,
  pub death_date:     Option<PartialDate>,
  pub death_place_id: Option<Uuid>,
  /// Derived at import: no death information and a birth year within the
  /// configured window of the present.
  pub living:         bool,
  pub notes:          Option<String>,
}

impl Person {
  /// Given names and surname joined for display. `"(unknown)"` when the
  /// source provided neither.
  pub fn display_name(&self) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(ref g) = self.given_names {
      parts.push(g);
    }
    if let Some(ref s) = self.surname {
      parts.push(s);
    }
    if parts.is_empty() {
      "(unknown)".to_string()
    } else {
      parts.join(" ")
    }
  }
}

// ─── Relationship ────────────────────────────────────────────────────────────

/// A directed edge between two persons of the same source.
/// Invariant: `person_a != person_b`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
  pub relationship_id: Uuid,
  pub source_id:       Uuid,
  pub person_a:        Uuid,
  pub person_b:        Uuid,
  pub kind:            RelationshipKind,
  /// Marriage date for spouse edges.
  pub started:         Option<PartialDate>,
  /// Divorce date for spouse edges.
  pub ended:           Option<PartialDate>,
  pub confidence:      Confidence,
}

impl Relationship {
  /// The opposite endpoint, or `None` if `person_id` is not on this edge.
  pub fn other_endpoint(&self, person_id: Uuid) -> Option<Uuid> {
    if person_id == self.person_a {
      Some(self.person_b)
    } else if person_id == self.person_b {
      Some(self.person_a)
    } else {
      None
    }
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// What an event is attached to: a person (birth, death, …) or a
/// relationship (marriage, divorce).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EventOwner {
  Person(Uuid),
  Relationship(Uuid),
}

/// A dated, placed occurrence attached to exactly one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
  pub event_id:  Uuid,
  pub source_id: Uuid,
  pub owner:     EventOwner,
  pub kind:      EventKind,
  /// Original record tag for [`EventKind::Other`] events (e.g. `BAPM`).
  pub raw_tag:   Option<String>,
  pub date:      Option<PartialDate>,
  pub place_id:  Option<Uuid>,
  pub note:      Option<String>,
}

// ─── Place ───────────────────────────────────────────────────────────────────

/// One node of a place hierarchy.
///
/// `name` is the full comma-separated text from this node outward
/// ("Springfield, Illinois, USA"); `parent_id` points at the chain minus the
/// first segment. Deduplicated within a source by `normalized_name`, never
/// across sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
  pub place_id:        Uuid,
  pub source_id:       Uuid,
  pub name:            String,
  /// Case- and diacritic-folded `name`; the intra-source dedup key.
  pub normalized_name: String,
  pub parent_id:       Option<Uuid>,
  pub latitude:        Option<f64>,
  pub longitude:       Option<f64>,
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// One ingested batch and the owner of everything derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
  pub source_id:   Uuid,
  pub name:        String,
  /// SHA-256 hex digest of the raw input bytes; unique across the store.
  pub fingerprint: String,
  pub imported_at: DateTime<Utc>,
}
