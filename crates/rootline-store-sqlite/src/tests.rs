//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use rootline_core::{
  date::PartialDate,
  entity::{
    Confidence, Event, EventKind, EventOwner, Person, Place, Relationship,
    RelationshipKind, Sex,
  },
  import::{GraphBatch, NewSource},
  store::{GraphStore, PersonQuery},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Batch helpers ───────────────────────────────────────────────────────────

fn person(given: &str, surname: &str) -> Person {
  Person {
    person_id:      Uuid::new_v4(),
    source_id:      Uuid::nil(),
    record_id:      Some(format!("I-{given}")),
    given_names:    Some(given.to_string()),
    surname:        Some(surname.to_string()),
    sex:            Sex::Unknown,
    birth_date:     None,
    birth_place_id: None,
    death_date:     None,
    death_place_id: None,
    living:         false,
    notes:          None,
  }
}

fn edge(a: Uuid, b: Uuid, kind: RelationshipKind) -> Relationship {
  Relationship {
    relationship_id: Uuid::new_v4(),
    source_id:       Uuid::nil(),
    person_a:        a,
    person_b:        b,
    kind,
    started:         None,
    ended:           None,
    confidence:      Confidence::default(),
  }
}

fn new_source(name: &str, fingerprint: &str) -> NewSource {
  NewSource {
    name:        name.to_string(),
    fingerprint: fingerprint.to_string(),
  }
}

// ─── Sources ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn commit_and_fetch_source() {
  let s = store().await;
  let src = s
    .commit_source(new_source("first import", "fp-1"), GraphBatch::default())
    .await
    .unwrap();

  let by_id = s.get_source(src.source_id).await.unwrap().unwrap();
  assert_eq!(by_id.name, "first import");
  assert_eq!(by_id.fingerprint, "fp-1");

  let by_fp = s.source_by_fingerprint("fp-1").await.unwrap().unwrap();
  assert_eq!(by_fp.source_id, src.source_id);

  assert!(s.source_by_fingerprint("fp-2").await.unwrap().is_none());
}

#[tokio::test]
async fn commit_stamps_source_id_on_entities() {
  let s = store().await;
  let alice = person("Alice", "Liddell");
  let bob = person("Bob", "Liddell");
  let batch = GraphBatch {
    persons: vec![alice.clone(), bob.clone()],
    relationships: vec![edge(
      alice.person_id,
      bob.person_id,
      RelationshipKind::ParentOf,
    )],
    ..Default::default()
  };

  let src = s
    .commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();

  let persons = s.persons_by_source(src.source_id).await.unwrap();
  assert_eq!(persons.len(), 2);
  assert!(persons.iter().all(|p| p.source_id == src.source_id));

  let rels = s
    .relationships_touching(&[alice.person_id])
    .await
    .unwrap();
  assert_eq!(rels.len(), 1);
  assert_eq!(rels[0].source_id, src.source_id);
}

#[tokio::test]
async fn list_sources_returns_all() {
  let s = store().await;
  s.commit_source(new_source("a", "fp-a"), GraphBatch::default())
    .await
    .unwrap();
  s.commit_source(new_source("b", "fp-b"), GraphBatch::default())
    .await
    .unwrap();

  let all = s.list_sources().await.unwrap();
  assert_eq!(all.len(), 2);
}

// ─── Duplicate fingerprints ──────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_fingerprint_rejects_and_writes_nothing() {
  let s = store().await;
  let first = s
    .commit_source(
      new_source("first", "same-fp"),
      GraphBatch {
        persons: vec![person("Alice", "Liddell")],
        ..Default::default()
      },
    )
    .await
    .unwrap();

  let err = s
    .commit_source(
      new_source("second", "same-fp"),
      GraphBatch {
        persons: vec![person("Mallory", "Intruder")],
        ..Default::default()
      },
    )
    .await
    .unwrap_err();

  let Error::DuplicateFingerprint { existing } = err else {
    panic!("expected DuplicateFingerprint, got {err:?}");
  };
  assert_eq!(existing, first.source_id);

  // Nothing from the rejected batch landed.
  assert_eq!(s.list_sources().await.unwrap().len(), 1);
  let found = s
    .search_persons(&PersonQuery {
      text: Some("Mallory".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(found.is_empty());
}

#[tokio::test]
async fn duplicate_rejection_is_stable_across_unrelated_sources() {
  let s = store().await;
  s.commit_source(new_source("a", "fp-a"), GraphBatch::default())
    .await
    .unwrap();
  s.commit_source(new_source("b", "fp-b"), GraphBatch::default())
    .await
    .unwrap();

  let err = s
    .commit_source(new_source("a again", "fp-a"), GraphBatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateFingerprint { .. }));
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_source_cascades_to_owned_rows() {
  let s = store().await;
  let alice = person("Alice", "Liddell");
  let bob = person("Bob", "Liddell");
  let rel = edge(alice.person_id, bob.person_id, RelationshipKind::ParentOf);
  let place = Place {
    place_id:        Uuid::new_v4(),
    source_id:       Uuid::nil(),
    name:            "Oxford, England".into(),
    normalized_name: "oxford, england".into(),
    parent_id:       None,
    latitude:        None,
    longitude:       None,
  };
  let event = Event {
    event_id:  Uuid::new_v4(),
    source_id: Uuid::nil(),
    owner:     EventOwner::Person(alice.person_id),
    kind:      EventKind::Birth,
    raw_tag:   None,
    date:      Some(PartialDate::YearOnly(1852)),
    place_id:  Some(place.place_id),
    note:      None,
  };
  let batch = GraphBatch {
    persons:       vec![alice.clone(), bob.clone()],
    relationships: vec![rel],
    events:        vec![event],
    places:        vec![place.clone()],
  };

  let src = s
    .commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();
  s.delete_source(src.source_id).await.unwrap();

  assert!(s.get_source(src.source_id).await.unwrap().is_none());
  assert!(s.get_person(alice.person_id).await.unwrap().is_none());
  assert!(s.get_place(place.place_id).await.unwrap().is_none());
  assert!(
    s.relationships_touching(&[alice.person_id, bob.person_id])
      .await
      .unwrap()
      .is_empty()
  );
  assert!(
    s.events_for_person(alice.person_id)
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn delete_source_removes_cross_source_relationships() {
  let s = store().await;
  let alice = person("Alice", "First");
  let src1 = s
    .commit_source(
      new_source("first", "fp-1"),
      GraphBatch {
        persons: vec![alice.clone()],
        ..Default::default()
      },
    )
    .await
    .unwrap();

  // Second source owns an edge that references a person from the first.
  let bob = person("Bob", "Second");
  let cross = edge(alice.person_id, bob.person_id, RelationshipKind::SpouseOf);
  let src2 = s
    .commit_source(
      new_source("second", "fp-2"),
      GraphBatch {
        persons: vec![bob.clone()],
        relationships: vec![cross],
        ..Default::default()
      },
    )
    .await
    .unwrap();

  s.delete_source(src1.source_id).await.unwrap();

  // Bob survives but the edge with a deleted endpoint does not.
  assert!(s.get_person(bob.person_id).await.unwrap().is_some());
  assert!(
    s.relationships_touching(&[bob.person_id])
      .await
      .unwrap()
      .is_empty()
  );
  assert!(s.get_source(src2.source_id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_nonexistent_source_is_a_noop() {
  let s = store().await;
  s.delete_source(Uuid::new_v4()).await.unwrap();
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_matches_given_surname_and_full_name() {
  let s = store().await;
  let batch = GraphBatch {
    persons: vec![
      person("Alice", "Liddell"),
      person("Bob", "Carroll"),
      person("Alicia", "Stone"),
    ],
    ..Default::default()
  };
  s.commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();

  let by_given = s
    .search_persons(&PersonQuery {
      text: Some("alic".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_given.len(), 2);

  let by_surname = s
    .search_persons(&PersonQuery {
      text: Some("carroll".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_surname.len(), 1);
  assert_eq!(by_surname[0].given_names.as_deref(), Some("Bob"));

  let by_full = s
    .search_persons(&PersonQuery {
      text: Some("Alice Liddell".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(by_full.len(), 1);
}

#[tokio::test]
async fn search_filters_by_source() {
  let s = store().await;
  let src1 = s
    .commit_source(
      new_source("one", "fp-1"),
      GraphBatch {
        persons: vec![person("Alice", "Liddell")],
        ..Default::default()
      },
    )
    .await
    .unwrap();
  s.commit_source(
    new_source("two", "fp-2"),
    GraphBatch {
      persons: vec![person("Alice", "Other")],
      ..Default::default()
    },
  )
  .await
  .unwrap();

  let scoped = s
    .search_persons(&PersonQuery {
      text:   Some("Alice".into()),
      source: Some(src1.source_id),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(scoped.len(), 1);
  assert_eq!(scoped[0].source_id, src1.source_id);
}

#[tokio::test]
async fn search_respects_limit() {
  let s = store().await;
  let batch = GraphBatch {
    persons: (0..10)
      .map(|i| person(&format!("Child{i}"), "Doe"))
      .collect(),
    ..Default::default()
  };
  s.commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();

  let limited = s
    .search_persons(&PersonQuery {
      text:  Some("Doe".into()),
      limit: Some(3),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(limited.len(), 3);
}

// ─── Persons & relationships ─────────────────────────────────────────────────

#[tokio::test]
async fn get_persons_bulk_skips_unknown_ids() {
  let s = store().await;
  let alice = person("Alice", "Liddell");
  s.commit_source(
    new_source("import", "fp-1"),
    GraphBatch {
      persons: vec![alice.clone()],
      ..Default::default()
    },
  )
  .await
  .unwrap();

  let fetched = s
    .get_persons(&[alice.person_id, Uuid::new_v4()])
    .await
    .unwrap();
  assert_eq!(fetched.len(), 1);
  assert_eq!(fetched[0].person_id, alice.person_id);

  assert!(s.get_persons(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn relationships_touching_vs_among() {
  let s = store().await;
  let a = person("A", "X");
  let b = person("B", "X");
  let c = person("C", "X");
  let batch = GraphBatch {
    persons:       vec![a.clone(), b.clone(), c.clone()],
    relationships: vec![
      edge(a.person_id, b.person_id, RelationshipKind::ParentOf),
      edge(b.person_id, c.person_id, RelationshipKind::ParentOf),
    ],
    ..Default::default()
  };
  s.commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();

  // Touching picks up the edge that leaves the set.
  let touching = s
    .relationships_touching(&[a.person_id, b.person_id])
    .await
    .unwrap();
  assert_eq!(touching.len(), 2);

  // Among keeps only fully-contained edges.
  let among = s
    .relationships_among(&[a.person_id, b.person_id])
    .await
    .unwrap();
  assert_eq!(among.len(), 1);
  assert_eq!(among[0].person_a, a.person_id);
}

#[tokio::test]
async fn parallel_edges_of_different_kinds_are_both_kept() {
  let s = store().await;
  let a = person("A", "X");
  let b = person("B", "X");
  let batch = GraphBatch {
    persons:       vec![a.clone(), b.clone()],
    relationships: vec![
      edge(a.person_id, b.person_id, RelationshipKind::ParentOf),
      edge(a.person_id, b.person_id, RelationshipKind::SiblingOf),
    ],
    ..Default::default()
  };
  s.commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();

  let among = s
    .relationships_among(&[a.person_id, b.person_id])
    .await
    .unwrap();
  assert_eq!(among.len(), 2);
}

// ─── Events & places ─────────────────────────────────────────────────────────

#[tokio::test]
async fn event_dates_and_owner_roundtrip() {
  let s = store().await;
  let alice = person("Alice", "Liddell");
  let date =
    PartialDate::Exact(NaiveDate::from_ymd_opt(1852, 5, 4).unwrap());
  let event = Event {
    event_id:  Uuid::new_v4(),
    source_id: Uuid::nil(),
    owner:     EventOwner::Person(alice.person_id),
    kind:      EventKind::Birth,
    raw_tag:   None,
    date:      Some(date.clone()),
    place_id:  None,
    note:      Some("recorded in the parish register".into()),
  };
  let batch = GraphBatch {
    persons: vec![alice.clone()],
    events: vec![event.clone()],
    ..Default::default()
  };
  s.commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();

  let events = s.events_for_person(alice.person_id).await.unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].kind, EventKind::Birth);
  assert_eq!(events[0].date, Some(date));
  assert_eq!(events[0].owner, EventOwner::Person(alice.person_id));
}

#[tokio::test]
async fn place_hierarchy_roundtrips() {
  let s = store().await;
  let country = Place {
    place_id:        Uuid::new_v4(),
    source_id:       Uuid::nil(),
    name:            "England".into(),
    normalized_name: "england".into(),
    parent_id:       None,
    latitude:        None,
    longitude:       None,
  };
  let city = Place {
    place_id:        Uuid::new_v4(),
    source_id:       Uuid::nil(),
    name:            "Oxford, England".into(),
    normalized_name: "oxford, england".into(),
    parent_id:       Some(country.place_id),
    latitude:        Some(51.752),
    longitude:       Some(-1.2577),
  };
  let batch = GraphBatch {
    places: vec![country.clone(), city.clone()],
    ..Default::default()
  };
  s.commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();

  let fetched = s.get_place(city.place_id).await.unwrap().unwrap();
  assert_eq!(fetched.parent_id, Some(country.place_id));
  assert_eq!(fetched.latitude, Some(51.752));

  let parent = s
    .get_place(fetched.parent_id.unwrap())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(parent.name, "England");
}

#[tokio::test]
async fn partial_date_variants_roundtrip_through_person_columns() {
  let s = store().await;
  let mut p = person("Ada", "Byron");
  p.birth_date = Some(PartialDate::Qualified {
    qualifier: rootline_core::date::DateQualifier::About,
    date:      Box::new(PartialDate::YearOnly(1815)),
  });
  p.death_date = Some(PartialDate::Text("in her prime".into()));
  let batch = GraphBatch {
    persons: vec![p.clone()],
    ..Default::default()
  };
  s.commit_source(new_source("import", "fp-1"), batch)
    .await
    .unwrap();

  let fetched = s.get_person(p.person_id).await.unwrap().unwrap();
  assert_eq!(fetched.birth_date, p.birth_date);
  assert_eq!(fetched.death_date, p.death_date);
}
