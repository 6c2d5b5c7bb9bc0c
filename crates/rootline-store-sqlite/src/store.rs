//! [`SqliteStore`] — the SQLite implementation of [`GraphStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rootline_core::{
  entity::{Event, Person, Place, Relationship, Source},
  import::{GraphBatch, NewSource},
  store::{DEFAULT_SEARCH_LIMIT, GraphStore, PersonQuery},
};

use crate::{
  Error, Result,
  encode::{
    PERSON_COLUMNS, RELATIONSHIP_COLUMNS, RawEvent, RawPerson, RawPlace,
    RawRelationship, RawSource, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rootline graph store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// run on one dedicated thread, which serialises commits per database.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── GraphStore impl ─────────────────────────────────────────────────────────

impl GraphStore for SqliteStore {
  type Error = Error;

  // ── Sources ───────────────────────────────────────────────────────────────

  async fn commit_source(
    &self,
    source: NewSource,
    batch: GraphBatch,
  ) -> Result<Source> {
    let created = Source {
      source_id:   Uuid::new_v4(),
      name:        source.name,
      fingerprint: source.fingerprint,
      imported_at: Utc::now(),
    };
    let src_id = encode_uuid(created.source_id);

    // Encode every row up front; the closure only binds and executes.
    let places: Vec<RawPlace> = batch
      .places
      .iter()
      .map(|p| RawPlace::from_place(p, &src_id))
      .collect::<Result<_>>()?;
    let persons: Vec<RawPerson> = batch
      .persons
      .iter()
      .map(|p| RawPerson::from_person(p, &src_id))
      .collect::<Result<_>>()?;
    let relationships: Vec<RawRelationship> = batch
      .relationships
      .iter()
      .map(|r| RawRelationship::from_relationship(r, &src_id))
      .collect::<Result<_>>()?;
    let events: Vec<RawEvent> = batch
      .events
      .iter()
      .map(|e| RawEvent::from_event(e, &src_id))
      .collect::<Result<_>>()?;

    let name = created.name.clone();
    let fingerprint = created.fingerprint.clone();
    let imported_at = encode_dt(created.imported_at);

    // `Some(existing)` means the fingerprint is taken and nothing was
    // written.
    let existing: Option<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
          .query_row(
            "SELECT source_id FROM sources WHERE fingerprint = ?1",
            rusqlite::params![fingerprint],
            |r| r.get(0),
          )
          .optional()?;
        if let Some(existing) = existing {
          return Ok(Some(existing));
        }

        tx.execute(
          "INSERT INTO sources (source_id, name, fingerprint, imported_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![src_id, name, fingerprint, imported_at],
        )?;

        {
          let mut stmt = tx.prepare(
            "INSERT INTO places (
               place_id, source_id, name, normalized_name, parent_id,
               latitude, longitude
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          )?;
          for p in &places {
            stmt.execute(rusqlite::params![
              p.place_id,
              p.source_id,
              p.name,
              p.normalized_name,
              p.parent_id,
              p.latitude,
              p.longitude,
            ])?;
          }
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO persons (
               person_id, source_id, record_id, given_names, surname, sex,
               birth_date, birth_place_id, death_date, death_place_id,
               living, notes
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          )?;
          for p in &persons {
            stmt.execute(rusqlite::params![
              p.person_id,
              p.source_id,
              p.record_id,
              p.given_names,
              p.surname,
              p.sex,
              p.birth_date,
              p.birth_place_id,
              p.death_date,
              p.death_place_id,
              p.living,
              p.notes,
            ])?;
          }
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO relationships (
               relationship_id, source_id, person_a, person_b, kind,
               started, ended, confidence
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          )?;
          for r in &relationships {
            stmt.execute(rusqlite::params![
              r.relationship_id,
              r.source_id,
              r.person_a,
              r.person_b,
              r.kind,
              r.started,
              r.ended,
              r.confidence,
            ])?;
          }
        }

        {
          let mut stmt = tx.prepare(
            "INSERT INTO events (
               event_id, source_id, person_id, relationship_id, kind,
               raw_tag, date, place_id, note
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;
          for e in &events {
            stmt.execute(rusqlite::params![
              e.event_id,
              e.source_id,
              e.person_id,
              e.relationship_id,
              e.kind,
              e.raw_tag,
              e.date,
              e.place_id,
              e.note,
            ])?;
          }
        }

        tx.commit()?;
        Ok(None)
      })
      .await?;

    match existing {
      Some(existing) => Err(Error::DuplicateFingerprint {
        existing: Uuid::parse_str(&existing)?,
      }),
      None => Ok(created),
    }
  }

  async fn source_by_fingerprint(
    &self,
    fingerprint: &str,
  ) -> Result<Option<Source>> {
    let fingerprint = fingerprint.to_string();
    let raw: Option<RawSource> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT source_id, name, fingerprint, imported_at
               FROM sources WHERE fingerprint = ?1",
              rusqlite::params![fingerprint],
              |row| {
                Ok(RawSource {
                  source_id:   row.get(0)?,
                  name:        row.get(1)?,
                  fingerprint: row.get(2)?,
                  imported_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSource::into_source).transpose()
  }

  async fn get_source(&self, id: Uuid) -> Result<Option<Source>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawSource> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT source_id, name, fingerprint, imported_at
               FROM sources WHERE source_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawSource {
                  source_id:   row.get(0)?,
                  name:        row.get(1)?,
                  fingerprint: row.get(2)?,
                  imported_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSource::into_source).transpose()
  }

  async fn list_sources(&self) -> Result<Vec<Source>> {
    let raws: Vec<RawSource> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT source_id, name, fingerprint, imported_at
           FROM sources ORDER BY imported_at DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSource {
              source_id:   row.get(0)?,
              name:        row.get(1)?,
              fingerprint: row.get(2)?,
              imported_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSource::into_source).collect()
  }

  async fn delete_source(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    // Everything owned by the source goes via ON DELETE CASCADE; person
    // endpoints additionally cascade relationships held by other sources.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sources WHERE source_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"
              ),
              rusqlite::params![id_str],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn get_persons(&self, ids: &[Uuid]) -> Result<Vec<Person>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
    let placeholders = vec!["?"; id_strs.len()].join(",");

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE person_id IN ({placeholders})"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(id_strs.iter()),
            RawPerson::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn persons_by_source(&self, source_id: Uuid) -> Result<Vec<Person>> {
    let id_str = encode_uuid(source_id);
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons WHERE source_id = ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn search_persons(&self, query: &PersonQuery) -> Result<Vec<Person>> {
    let pattern = query.text.as_deref().map(|t| format!("%{t}%"));
    let source_str = query.source.map(encode_uuid);
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT) as i64;

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE (?1 IS NULL
                  OR given_names LIKE ?1
                  OR surname LIKE ?1
                  OR (COALESCE(given_names, '') || ' '
                      || COALESCE(surname, '')) LIKE ?1)
             AND (?2 IS NULL OR source_id = ?2)
           ORDER BY surname, given_names
           LIMIT ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![pattern, source_str, limit],
            RawPerson::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn relationships_touching(
    &self,
    ids: &[Uuid],
  ) -> Result<Vec<Relationship>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
    let placeholders = vec!["?"; id_strs.len()].join(",");

    let raws: Vec<RawRelationship> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
           WHERE person_a IN ({placeholders})
              OR person_b IN ({placeholders})"
        ))?;
        let bound: Vec<&String> =
          id_strs.iter().chain(id_strs.iter()).collect();
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(bound),
            RawRelationship::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRelationship::into_relationship)
      .collect()
  }

  async fn relationships_among(
    &self,
    ids: &[Uuid],
  ) -> Result<Vec<Relationship>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let id_strs: Vec<String> = ids.iter().copied().map(encode_uuid).collect();
    let placeholders = vec!["?"; id_strs.len()].join(",");

    let raws: Vec<RawRelationship> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RELATIONSHIP_COLUMNS} FROM relationships
           WHERE person_a IN ({placeholders})
             AND person_b IN ({placeholders})"
        ))?;
        let bound: Vec<&String> =
          id_strs.iter().chain(id_strs.iter()).collect();
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(bound),
            RawRelationship::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRelationship::into_relationship)
      .collect()
  }

  // ── Events & places ───────────────────────────────────────────────────────

  async fn events_for_person(&self, person_id: Uuid) -> Result<Vec<Event>> {
    let id_str = encode_uuid(person_id);
    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, source_id, person_id, relationship_id, kind,
                  raw_tag, date, place_id, note
           FROM events WHERE person_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawEvent {
              event_id:        row.get(0)?,
              source_id:       row.get(1)?,
              person_id:       row.get(2)?,
              relationship_id: row.get(3)?,
              kind:            row.get(4)?,
              raw_tag:         row.get(5)?,
              date:            row.get(6)?,
              place_id:        row.get(7)?,
              note:            row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn get_place(&self, id: Uuid) -> Result<Option<Place>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawPlace> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT place_id, source_id, name, normalized_name,
                      parent_id, latitude, longitude
               FROM places WHERE place_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawPlace {
                  place_id:        row.get(0)?,
                  source_id:       row.get(1)?,
                  name:            row.get(2)?,
                  normalized_name: row.get(3)?,
                  parent_id:       row.get(4)?,
                  latitude:        row.get(5)?,
                  longitude:       row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPlace::into_place).transpose()
  }
}
