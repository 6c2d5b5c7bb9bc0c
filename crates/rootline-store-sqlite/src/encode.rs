//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Partial dates are stored as
//! compact JSON. Enums are stored as the same lowercase strings their serde
//! representations use. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use rootline_core::{
  date::PartialDate,
  entity::{
    Confidence, Event, EventKind, EventOwner, Person, Place, Relationship,
    RelationshipKind, Sex, Source,
  },
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_sex(s: Sex) -> &'static str {
  match s {
    Sex::Male => "male",
    Sex::Female => "female",
    Sex::Unknown => "unknown",
  }
}

pub fn decode_sex(s: &str) -> Result<Sex> {
  match s {
    "male" => Ok(Sex::Male),
    "female" => Ok(Sex::Female),
    "unknown" => Ok(Sex::Unknown),
    other => Err(Error::Decode(format!("unknown sex: {other:?}"))),
  }
}

pub fn encode_confidence(c: Confidence) -> &'static str {
  match c {
    Confidence::Low => "low",
    Confidence::Medium => "medium",
    Confidence::High => "high",
  }
}

pub fn decode_confidence(s: &str) -> Result<Confidence> {
  match s {
    "low" => Ok(Confidence::Low),
    "medium" => Ok(Confidence::Medium),
    "high" => Ok(Confidence::High),
    other => Err(Error::Decode(format!("unknown confidence: {other:?}"))),
  }
}

pub fn encode_relationship_kind(k: RelationshipKind) -> &'static str {
  match k {
    RelationshipKind::ParentOf => "parent-of",
    RelationshipKind::SpouseOf => "spouse-of",
    RelationshipKind::SiblingOf => "sibling-of",
  }
}

pub fn decode_relationship_kind(s: &str) -> Result<RelationshipKind> {
  match s {
    "parent-of" => Ok(RelationshipKind::ParentOf),
    "spouse-of" => Ok(RelationshipKind::SpouseOf),
    "sibling-of" => Ok(RelationshipKind::SiblingOf),
    other => {
      Err(Error::Decode(format!("unknown relationship kind: {other:?}")))
    }
  }
}

pub fn encode_event_kind(k: EventKind) -> &'static str {
  match k {
    EventKind::Birth => "birth",
    EventKind::Death => "death",
    EventKind::Marriage => "marriage",
    EventKind::Divorce => "divorce",
    EventKind::Other => "other",
  }
}

pub fn decode_event_kind(s: &str) -> Result<EventKind> {
  match s {
    "birth" => Ok(EventKind::Birth),
    "death" => Ok(EventKind::Death),
    "marriage" => Ok(EventKind::Marriage),
    "divorce" => Ok(EventKind::Divorce),
    "other" => Ok(EventKind::Other),
    other => Err(Error::Decode(format!("unknown event kind: {other:?}"))),
  }
}

// ─── PartialDate ─────────────────────────────────────────────────────────────

pub fn encode_partial_date(d: &PartialDate) -> Result<String> {
  Ok(serde_json::to_string(d)?)
}

pub fn decode_partial_date(s: &str) -> Result<PartialDate> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `sources` row.
pub struct RawSource {
  pub source_id:   String,
  pub name:        String,
  pub fingerprint: String,
  pub imported_at: String,
}

impl RawSource {
  pub fn into_source(self) -> Result<Source> {
    Ok(Source {
      source_id:   decode_uuid(&self.source_id)?,
      name:        self.name,
      fingerprint: self.fingerprint,
      imported_at: decode_dt(&self.imported_at)?,
    })
  }
}

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:      String,
  pub source_id:      String,
  pub record_id:      Option<String>,
  pub given_names:    Option<String>,
  pub surname:        Option<String>,
  pub sex:            String,
  pub birth_date:     Option<String>,
  pub birth_place_id: Option<String>,
  pub death_date:     Option<String>,
  pub death_place_id: Option<String>,
  pub living:         bool,
  pub notes:          Option<String>,
}

/// Column list matching [`RawPerson`] field order; shared by every person
/// SELECT.
pub const PERSON_COLUMNS: &str = "person_id, source_id, record_id, \
   given_names, surname, sex, birth_date, birth_place_id, death_date, \
   death_place_id, living, notes";

impl RawPerson {
  /// Encode a domain person for insertion under `source_id` (already
  /// encoded). The entity's own nil source placeholder is ignored.
  pub fn from_person(p: &Person, source_id: &str) -> Result<Self> {
    Ok(Self {
      person_id:      encode_uuid(p.person_id),
      source_id:      source_id.to_string(),
      record_id:      p.record_id.clone(),
      given_names:    p.given_names.clone(),
      surname:        p.surname.clone(),
      sex:            encode_sex(p.sex).to_string(),
      birth_date:     p
        .birth_date
        .as_ref()
        .map(encode_partial_date)
        .transpose()?,
      birth_place_id: p.birth_place_id.map(encode_uuid),
      death_date:     p
        .death_date
        .as_ref()
        .map(encode_partial_date)
        .transpose()?,
      death_place_id: p.death_place_id.map(encode_uuid),
      living:         p.living,
      notes:          p.notes.clone(),
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:      row.get(0)?,
      source_id:      row.get(1)?,
      record_id:      row.get(2)?,
      given_names:    row.get(3)?,
      surname:        row.get(4)?,
      sex:            row.get(5)?,
      birth_date:     row.get(6)?,
      birth_place_id: row.get(7)?,
      death_date:     row.get(8)?,
      death_place_id: row.get(9)?,
      living:         row.get(10)?,
      notes:          row.get(11)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      person_id:      decode_uuid(&self.person_id)?,
      source_id:      decode_uuid(&self.source_id)?,
      record_id:      self.record_id,
      given_names:    self.given_names,
      surname:        self.surname,
      sex:            decode_sex(&self.sex)?,
      birth_date:     self
        .birth_date
        .as_deref()
        .map(decode_partial_date)
        .transpose()?,
      birth_place_id: self
        .birth_place_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      death_date:     self
        .death_date
        .as_deref()
        .map(decode_partial_date)
        .transpose()?,
      death_place_id: self
        .death_place_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      living:         self.living,
      notes:          self.notes,
    })
  }
}

/// Raw strings read directly from a `relationships` row.
pub struct RawRelationship {
  pub relationship_id: String,
  pub source_id:       String,
  pub person_a:        String,
  pub person_b:        String,
  pub kind:            String,
  pub started:         Option<String>,
  pub ended:           Option<String>,
  pub confidence:      String,
}

/// Column list matching [`RawRelationship`] field order.
pub const RELATIONSHIP_COLUMNS: &str = "relationship_id, source_id, \
   person_a, person_b, kind, started, ended, confidence";

impl RawRelationship {
  pub fn from_relationship(r: &Relationship, source_id: &str) -> Result<Self> {
    Ok(Self {
      relationship_id: encode_uuid(r.relationship_id),
      source_id:       source_id.to_string(),
      person_a:        encode_uuid(r.person_a),
      person_b:        encode_uuid(r.person_b),
      kind:            encode_relationship_kind(r.kind).to_string(),
      started:         r
        .started
        .as_ref()
        .map(encode_partial_date)
        .transpose()?,
      ended:           r.ended.as_ref().map(encode_partial_date).transpose()?,
      confidence:      encode_confidence(r.confidence).to_string(),
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      relationship_id: row.get(0)?,
      source_id:       row.get(1)?,
      person_a:        row.get(2)?,
      person_b:        row.get(3)?,
      kind:            row.get(4)?,
      started:         row.get(5)?,
      ended:           row.get(6)?,
      confidence:      row.get(7)?,
    })
  }

  pub fn into_relationship(self) -> Result<Relationship> {
    Ok(Relationship {
      relationship_id: decode_uuid(&self.relationship_id)?,
      source_id:       decode_uuid(&self.source_id)?,
      person_a:        decode_uuid(&self.person_a)?,
      person_b:        decode_uuid(&self.person_b)?,
      kind:            decode_relationship_kind(&self.kind)?,
      started:         self
        .started
        .as_deref()
        .map(decode_partial_date)
        .transpose()?,
      ended:           self
        .ended
        .as_deref()
        .map(decode_partial_date)
        .transpose()?,
      confidence:      decode_confidence(&self.confidence)?,
    })
  }
}

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:        String,
  pub source_id:       String,
  pub person_id:       Option<String>,
  pub relationship_id: Option<String>,
  pub kind:            String,
  pub raw_tag:         Option<String>,
  pub date:            Option<String>,
  pub place_id:        Option<String>,
  pub note:            Option<String>,
}

impl RawEvent {
  pub fn from_event(e: &Event, source_id: &str) -> Result<Self> {
    let (person_id, relationship_id) = match e.owner {
      EventOwner::Person(id) => (Some(encode_uuid(id)), None),
      EventOwner::Relationship(id) => (None, Some(encode_uuid(id))),
    };
    Ok(Self {
      event_id: encode_uuid(e.event_id),
      source_id: source_id.to_string(),
      person_id,
      relationship_id,
      kind: encode_event_kind(e.kind).to_string(),
      raw_tag: e.raw_tag.clone(),
      date: e.date.as_ref().map(encode_partial_date).transpose()?,
      place_id: e.place_id.map(encode_uuid),
      note: e.note.clone(),
    })
  }

  pub fn into_event(self) -> Result<Event> {
    let owner = match (self.person_id, self.relationship_id) {
      (Some(p), None) => EventOwner::Person(decode_uuid(&p)?),
      (None, Some(r)) => EventOwner::Relationship(decode_uuid(&r)?),
      _ => {
        return Err(Error::Decode(
          "event row must reference exactly one owner".to_string(),
        ));
      }
    };
    Ok(Event {
      event_id: decode_uuid(&self.event_id)?,
      source_id: decode_uuid(&self.source_id)?,
      owner,
      kind: decode_event_kind(&self.kind)?,
      raw_tag: self.raw_tag,
      date: self.date.as_deref().map(decode_partial_date).transpose()?,
      place_id: self.place_id.as_deref().map(decode_uuid).transpose()?,
      note: self.note,
    })
  }
}

/// Raw strings read directly from a `places` row.
pub struct RawPlace {
  pub place_id:        String,
  pub source_id:       String,
  pub name:            String,
  pub normalized_name: String,
  pub parent_id:       Option<String>,
  pub latitude:        Option<f64>,
  pub longitude:       Option<f64>,
}

impl RawPlace {
  pub fn from_place(p: &Place, source_id: &str) -> Result<Self> {
    Ok(Self {
      place_id:        encode_uuid(p.place_id),
      source_id:       source_id.to_string(),
      name:            p.name.clone(),
      normalized_name: p.normalized_name.clone(),
      parent_id:       p.parent_id.map(encode_uuid),
      latitude:        p.latitude,
      longitude:       p.longitude,
    })
  }

  pub fn into_place(self) -> Result<Place> {
    Ok(Place {
      place_id:        decode_uuid(&self.place_id)?,
      source_id:       decode_uuid(&self.source_id)?,
      name:            self.name,
      normalized_name: self.normalized_name,
      parent_id:       self
        .parent_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      latitude:        self.latitude,
      longitude:       self.longitude,
    })
  }
}
