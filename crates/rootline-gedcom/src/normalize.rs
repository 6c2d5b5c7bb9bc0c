//! Entity normalization — record forest to graph batch.
//!
//! Two passes over the forest:
//!   pass 1: every Individual record becomes a Person draft keyed by its
//!           cross-reference id, carrying its events and place links;
//!   pass 2: FamilyUnion records resolve member pointers against that key
//!           space and emit relationship edges and union events.
//!
//! Parent-of edges are admitted one at a time, in input order; an edge whose
//! insertion would close an ancestry cycle is rejected and reported in the
//! batch's error list while the rest of the batch proceeds.

use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use rootline_core::{
  date::PartialDate,
  entity::{
    Confidence, Event, EventKind, EventOwner, Person, Place, Relationship,
    RelationshipKind, Sex,
  },
  import::{GraphBatch, ImportIssue, IssueKind},
};
use uuid::Uuid;

use crate::{
  date::parse_date,
  structure::{Record, RecordKind, RecordNode},
};

// ─── Options ─────────────────────────────────────────────────────────────────

/// A person born within this many years of the present may still be living.
const LIVING_WINDOW_YEARS: i32 = 110;

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
  /// Persons with no death information and a birth year at or after this
  /// are flagged as living.
  pub living_cutoff_year: i32,
}

impl Default for NormalizeOptions {
  fn default() -> Self {
    Self {
      living_cutoff_year: chrono::Utc::now().year() - LIVING_WINDOW_YEARS,
    }
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// Everything normalization produced. All entities carry
/// `source_id = Uuid::nil()`; the store stamps the real source at commit.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
  pub batch:    GraphBatch,
  pub warnings: Vec<ImportIssue>,
  /// Cycle-rejected parent edges. Reported separately from warnings.
  pub errors:   Vec<ImportIssue>,
}

// ─── Place arena ─────────────────────────────────────────────────────────────

/// Intra-batch place interner. A comma-separated place text becomes a chain
/// of nodes, one per hierarchy suffix, deduplicated by folded full text.
#[derive(Default)]
struct PlaceArena {
  by_key: HashMap<String, Uuid>,
  places: Vec<Place>,
}

impl PlaceArena {
  /// Intern `text` and its ancestor chain; returns the leaf place id.
  fn leaf_for(&mut self, text: &str) -> Option<Uuid> {
    let segments: Vec<&str> = text
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .collect();
    if segments.is_empty() {
      return None;
    }

    // Build from the outermost suffix inward so every node's parent
    // already exists.
    let mut parent: Option<Uuid> = None;
    for start in (0..segments.len()).rev() {
      let name = segments[start..].join(", ");
      let key = fold(&name);
      let id = match self.by_key.get(&key) {
        Some(id) => *id,
        None => {
          let id = Uuid::new_v4();
          self.places.push(Place {
            place_id:        id,
            source_id:       Uuid::nil(),
            name,
            normalized_name: key.clone(),
            parent_id:       parent,
            latitude:        None,
            longitude:       None,
          });
          self.by_key.insert(key, id);
          id
        }
      };
      parent = Some(id);
    }
    parent
  }

  fn set_coordinates(&mut self, id: Uuid, lat: f64, lon: f64) {
    if let Some(place) =
      self.places.iter_mut().find(|p| p.place_id == id)
      && place.latitude.is_none()
    {
      place.latitude = Some(lat);
      place.longitude = Some(lon);
    }
  }
}

/// Case- and diacritic-fold a place name for deduplication.
fn fold(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.to_lowercase().chars() {
    match c {
      'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => out.push('a'),
      'è' | 'é' | 'ê' | 'ë' => out.push('e'),
      'ì' | 'í' | 'î' | 'ï' => out.push('i'),
      'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => out.push('o'),
      'ù' | 'ú' | 'û' | 'ü' => out.push('u'),
      'ý' | 'ÿ' => out.push('y'),
      'ç' => out.push('c'),
      'ñ' => out.push('n'),
      'š' => out.push('s'),
      'ž' => out.push('z'),
      'ł' => out.push('l'),
      'æ' => out.push_str("ae"),
      'œ' => out.push_str("oe"),
      'ß' => out.push_str("ss"),
      other => out.push(other),
    }
  }
  out
}

/// Parse a `LATI`/`LONG` value: optional `N`/`S`/`E`/`W` prefix, then a
/// decimal number. `S` and `W` negate.
fn parse_coordinate(raw: &str) -> Option<f64> {
  let t = raw.trim();
  let mut chars = t.chars();
  let (sign, rest) = match chars.next()? {
    'N' | 'n' | 'E' | 'e' => (1.0, chars.as_str()),
    'S' | 's' | 'W' | 'w' => (-1.0, chars.as_str()),
    _ => (1.0, t),
  };
  rest.trim().parse::<f64>().ok().map(|v| sign * v)
}

// ─── Event details ───────────────────────────────────────────────────────────

/// Parsed `DATE`/`PLAC`/`NOTE` children of an event-like node.
struct EventDetail {
  date:     Option<PartialDate>,
  place_id: Option<Uuid>,
  note:     Option<String>,
}

fn event_detail(node: &RecordNode, places: &mut PlaceArena) -> EventDetail {
  let date = node.child_value("DATE").map(parse_date);

  let place_id = node.child("PLAC").and_then(|plac| {
    let id = plac.value.as_deref().and_then(|v| places.leaf_for(v))?;
    if let Some(map) = plac.child("MAP")
      && let Some(lat) =
        map.child_value("LATI").and_then(parse_coordinate)
      && let Some(lon) =
        map.child_value("LONG").and_then(parse_coordinate)
    {
      places.set_coordinates(id, lat, lon);
    }
    Some(id)
  });

  let note = node.child_value("NOTE").map(str::to_string);

  EventDetail {
    date,
    place_id,
    note,
  }
}

// ─── Individuals (pass 1) ────────────────────────────────────────────────────

/// Individual sub-records treated as events outside the birth/death pair.
const OTHER_EVENT_TAGS: &[&str] = &[
  "OCCU", "BAPM", "CHR", "BURI", "CREM", "RESI", "EMIG", "IMMI", "EDUC",
  "RELI", "CENS", "WILL", "PROB",
];

struct IndividualDraft {
  person: Person,
  events: Vec<Event>,
}

fn walk_individual(
  node: &RecordNode,
  options: &NormalizeOptions,
  places: &mut PlaceArena,
) -> IndividualDraft {
  let person_id = Uuid::new_v4();
  let mut person = Person {
    person_id,
    source_id: Uuid::nil(),
    record_id: node.pointer.clone(),
    given_names: None,
    surname: None,
    sex: Sex::Unknown,
    birth_date: None,
    birth_place_id: None,
    death_date: None,
    death_place_id: None,
    living: false,
    notes: None,
  };
  let mut events = Vec::new();
  let mut died = false;

  for child in &node.children {
    match child.tag.as_str() {
      "NAME" => {
        if person.given_names.is_none() && person.surname.is_none() {
          let (given, surname) =
            split_name(child.value.as_deref().unwrap_or(""));
          person.given_names = given;
          person.surname = surname;
        }
      }
      "SEX" => {
        person.sex = match child.value.as_deref().map(str::trim) {
          Some("M") | Some("m") => Sex::Male,
          Some("F") | Some("f") => Sex::Female,
          _ => Sex::Unknown,
        };
      }
      "BIRT" => {
        let detail = event_detail(child, places);
        person.birth_date = detail.date.clone();
        person.birth_place_id = detail.place_id;
        events.push(Event {
          event_id:  Uuid::new_v4(),
          source_id: Uuid::nil(),
          owner:     EventOwner::Person(person_id),
          kind:      EventKind::Birth,
          raw_tag:   None,
          date:      detail.date,
          place_id:  detail.place_id,
          note:      detail.note,
        });
      }
      "DEAT" => {
        died = true;
        let detail = event_detail(child, places);
        person.death_date = detail.date.clone();
        person.death_place_id = detail.place_id;
        events.push(Event {
          event_id:  Uuid::new_v4(),
          source_id: Uuid::nil(),
          owner:     EventOwner::Person(person_id),
          kind:      EventKind::Death,
          raw_tag:   None,
          date:      detail.date,
          place_id:  detail.place_id,
          note:      detail.note,
        });
      }
      "NOTE" => {
        if let Some(ref v) = child.value {
          person.notes = Some(match person.notes.take() {
            Some(existing) => format!("{existing}; {v}"),
            None => v.clone(),
          });
        }
      }
      tag if OTHER_EVENT_TAGS.contains(&tag) => {
        let detail = event_detail(child, places);
        let note = match (child.value.clone(), detail.note) {
          (Some(v), Some(n)) => Some(format!("{v}; {n}")),
          (v, n) => v.or(n),
        };
        events.push(Event {
          event_id:  Uuid::new_v4(),
          source_id: Uuid::nil(),
          owner:     EventOwner::Person(person_id),
          kind:      EventKind::Other,
          raw_tag:   Some(tag.to_string()),
          date:      detail.date,
          place_id:  detail.place_id,
          note,
        });
      }
      _ => {}
    }
  }

  // A person is living only when nothing says otherwise and their birth
  // year is recent enough to make it plausible.
  person.living = !died
    && person.death_date.is_none()
    && person
      .birth_date
      .as_ref()
      .and_then(PartialDate::year)
      .is_some_and(|y| y >= options.living_cutoff_year);

  IndividualDraft { person, events }
}

/// Split a `Given /Surname/` name value.
fn split_name(value: &str) -> (Option<String>, Option<String>) {
  match value.split_once('/') {
    Some((given, rest)) => {
      let surname = rest.split('/').next().unwrap_or("");
      (non_empty(given), non_empty(surname))
    }
    None => (non_empty(value), None),
  }
}

fn non_empty(s: &str) -> Option<String> {
  let s = s.trim();
  if s.is_empty() {
    None
  } else {
    Some(s.to_string())
  }
}

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// A parent-of edge awaiting cycle admission.
struct ParentCandidate {
  parent: Uuid,
  child:  Uuid,
  line:   usize,
  label:  String,
}

pub fn normalize(
  records: &[Record],
  options: &NormalizeOptions,
) -> NormalizedBatch {
  let mut out = NormalizedBatch::default();
  let mut places = PlaceArena::default();

  // ── Pass 1: individuals ───────────────────────────────────────────────
  let mut drafts: Vec<Option<IndividualDraft>> = Vec::new();
  let mut by_pointer: HashMap<String, usize> = HashMap::new();

  for record in records {
    if record.kind != RecordKind::Individual {
      continue;
    }
    let draft = walk_individual(&record.node, options, &mut places);

    match record.node.pointer.as_ref() {
      Some(ptr) => match by_pointer.get(ptr) {
        Some(&idx) => {
          // Last write within the batch wins.
          out.warnings.push(ImportIssue::new(
            IssueKind::DuplicateRecordId,
            Some(record.node.line),
            format!("record @{ptr}@ redefined; keeping the later record"),
          ));
          drafts[idx] = Some(draft);
        }
        None => {
          by_pointer.insert(ptr.clone(), drafts.len());
          drafts.push(Some(draft));
        }
      },
      None => drafts.push(Some(draft)),
    }
  }

  let resolve = |ptr: &str| -> Option<Uuid> {
    let key = ptr.trim().trim_matches('@');
    by_pointer
      .get(key)
      .and_then(|&idx| drafts[idx].as_ref())
      .map(|d| d.person.person_id)
  };

  // ── Pass 2: family unions ─────────────────────────────────────────────
  let mut parent_candidates: Vec<ParentCandidate> = Vec::new();
  let mut sibling_seen: HashSet<(Uuid, Uuid)> = HashSet::new();

  for record in records {
    if record.kind != RecordKind::FamilyUnion {
      continue;
    }
    let node = &record.node;
    let fam_label = node
      .pointer
      .as_deref()
      .map(|p| format!("@{p}@"))
      .unwrap_or_else(|| format!("family at line {}", node.line));

    let mut member = |tag: &str, child: &RecordNode| -> Option<Uuid> {
      let raw = child.value.as_deref().unwrap_or("");
      match resolve(raw) {
        Some(id) => Some(id),
        None => {
          out.warnings.push(ImportIssue::new(
            IssueKind::DanglingReference,
            Some(child.line),
            format!(
              "{tag} {raw} in {fam_label} matches no individual; dropped"
            ),
          ));
          None
        }
      }
    };

    let husband = node.child("HUSB").and_then(|c| member("HUSB", c));
    let wife = node.child("WIFE").and_then(|c| member("WIFE", c));
    let children: Vec<Uuid> = node
      .children_tagged("CHIL")
      .filter_map(|c| member("CHIL", c))
      .collect();

    // Spouse edge, with marriage/divorce events hanging off it.
    if let (Some(h), Some(w)) = (husband, wife) {
      if h == w {
        out.warnings.push(ImportIssue::new(
          IssueKind::Structural,
          Some(node.line),
          format!("{fam_label} lists the same person as both spouses"),
        ));
      } else {
        let relationship_id = Uuid::new_v4();
        let mut started = None;
        let mut ended = None;

        if let Some(marr) = node.child("MARR") {
          let detail = event_detail(marr, &mut places);
          started = detail.date.clone();
          out.batch.events.push(Event {
            event_id:  Uuid::new_v4(),
            source_id: Uuid::nil(),
            owner:     EventOwner::Relationship(relationship_id),
            kind:      EventKind::Marriage,
            raw_tag:   None,
            date:      detail.date,
            place_id:  detail.place_id,
            note:      detail.note,
          });
        }
        if let Some(div) = node.child("DIV") {
          let detail = event_detail(div, &mut places);
          ended = detail.date.clone();
          out.batch.events.push(Event {
            event_id:  Uuid::new_v4(),
            source_id: Uuid::nil(),
            owner:     EventOwner::Relationship(relationship_id),
            kind:      EventKind::Divorce,
            raw_tag:   None,
            date:      detail.date,
            place_id:  detail.place_id,
            note:      detail.note,
          });
        }

        out.batch.relationships.push(Relationship {
          relationship_id,
          source_id: Uuid::nil(),
          person_a: h,
          person_b: w,
          kind: RelationshipKind::SpouseOf,
          started,
          ended,
          confidence: Confidence::default(),
        });
      }
    }

    // Parent edges are only candidates here; cycle admission runs after
    // all families are read.
    for parent in [husband, wife].into_iter().flatten() {
      for &child in &children {
        if parent == child {
          out.warnings.push(ImportIssue::new(
            IssueKind::Structural,
            Some(node.line),
            format!("{fam_label} lists a person as their own child"),
          ));
          continue;
        }
        parent_candidates.push(ParentCandidate {
          parent,
          child,
          line: node.line,
          label: fam_label.clone(),
        });
      }
    }

    // Sibling edges between children of the same union.
    for (i, &a) in children.iter().enumerate() {
      for &b in &children[i + 1..] {
        if a == b {
          continue;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if sibling_seen.insert(key) {
          out.batch.relationships.push(Relationship {
            relationship_id: Uuid::new_v4(),
            source_id:       Uuid::nil(),
            person_a:        a,
            person_b:        b,
            kind:            RelationshipKind::SiblingOf,
            started:         None,
            ended:           None,
            confidence:      Confidence::default(),
          });
        }
      }
    }
  }

  // ── Cycle admission over parent edges ─────────────────────────────────
  let mut children_of: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
  let mut parent_seen: HashSet<(Uuid, Uuid)> = HashSet::new();

  for candidate in parent_candidates {
    if !parent_seen.insert((candidate.parent, candidate.child)) {
      continue;
    }
    if reaches(&children_of, candidate.child, candidate.parent) {
      out.errors.push(ImportIssue::new(
        IssueKind::CycleRejected,
        Some(candidate.line),
        format!(
          "parent edge in {} would make a person their own ancestor; \
           edge rejected",
          candidate.label
        ),
      ));
      continue;
    }
    children_of
      .entry(candidate.parent)
      .or_default()
      .push(candidate.child);
    out.batch.relationships.push(Relationship {
      relationship_id: Uuid::new_v4(),
      source_id:       Uuid::nil(),
      person_a:        candidate.parent,
      person_b:        candidate.child,
      kind:            RelationshipKind::ParentOf,
      started:         None,
      ended:           None,
      confidence:      Confidence::default(),
    });
  }

  // ── Materialise drafts ────────────────────────────────────────────────
  for draft in drafts.into_iter().flatten() {
    out.batch.persons.push(draft.person);
    out.batch.events.extend(draft.events);
  }
  out.batch.places = places.places;

  out
}

/// Depth-first reachability along accepted parent→child edges.
fn reaches(
  children_of: &HashMap<Uuid, Vec<Uuid>>,
  from: Uuid,
  target: Uuid,
) -> bool {
  let mut visiting: HashSet<Uuid> = HashSet::new();
  let mut stack = vec![from];
  while let Some(node) = stack.pop() {
    if node == target {
      return true;
    }
    if !visiting.insert(node) {
      continue;
    }
    if let Some(next) = children_of.get(&node) {
      stack.extend(next.iter().copied());
    }
  }
  false
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{structure::build_forest, tokenize::Tokenizer};

  fn run(input: &str) -> NormalizedBatch {
    let mut tokenizer = Tokenizer::new(input);
    let tokens: Vec<_> = tokenizer.by_ref().collect();
    let mut warnings = tokenizer.into_warnings();
    let forest = build_forest(tokens, &mut warnings);
    let options = NormalizeOptions {
      living_cutoff_year: 1916,
    };
    let mut out = normalize(&forest, &options);
    out.warnings.splice(0..0, warnings);
    out
  }

  fn person<'a>(batch: &'a NormalizedBatch, record_id: &str) -> &'a Person {
    batch
      .batch
      .persons
      .iter()
      .find(|p| p.record_id.as_deref() == Some(record_id))
      .unwrap()
  }

  const FAMILY: &str = "\
0 @I1@ INDI
1 NAME John /Doe/
1 SEX M
1 BIRT
2 DATE 2 FEB 1860
2 PLAC Springfield, Illinois, USA
1 DEAT
2 DATE 1930
0 @I2@ INDI
1 NAME Mary /Roe/
1 SEX F
0 @I3@ INDI
1 NAME Sam /Doe/
1 BIRT
2 DATE ABT 1890
0 @I4@ INDI
1 NAME Sue /Doe/
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 CHIL @I4@
1 MARR
2 DATE 12 JUN 1885
2 PLAC Springfield, Illinois, USA
";

  #[test]
  fn persons_and_fields_are_extracted() {
    let out = run(FAMILY);
    assert_eq!(out.batch.persons.len(), 4);

    let john = person(&out, "I1");
    assert_eq!(john.given_names.as_deref(), Some("John"));
    assert_eq!(john.surname.as_deref(), Some("Doe"));
    assert_eq!(john.sex, Sex::Male);
    assert!(john.birth_date.is_some());
    assert!(john.birth_place_id.is_some());
    assert_eq!(john.death_date, Some(PartialDate::YearOnly(1930)));
    assert!(!john.living);
  }

  #[test]
  fn family_produces_spouse_parent_and_sibling_edges() {
    let out = run(FAMILY);
    let kinds = |k: RelationshipKind| {
      out
        .batch
        .relationships
        .iter()
        .filter(|r| r.kind == k)
        .count()
    };
    assert_eq!(kinds(RelationshipKind::SpouseOf), 1);
    // Two parents times two children.
    assert_eq!(kinds(RelationshipKind::ParentOf), 4);
    assert_eq!(kinds(RelationshipKind::SiblingOf), 1);
    assert!(out.errors.is_empty());
  }

  #[test]
  fn marriage_event_sets_relationship_start() {
    let out = run(FAMILY);
    let spouse = out
      .batch
      .relationships
      .iter()
      .find(|r| r.kind == RelationshipKind::SpouseOf)
      .unwrap();
    assert!(spouse.started.is_some());

    let marriage = out
      .batch
      .events
      .iter()
      .find(|e| e.kind == EventKind::Marriage)
      .unwrap();
    assert_eq!(
      marriage.owner,
      EventOwner::Relationship(spouse.relationship_id)
    );
    assert!(marriage.place_id.is_some());
  }

  #[test]
  fn places_dedupe_by_folded_chain() {
    let out = run(FAMILY);
    // Springfield / Illinois / USA, shared by birth and marriage.
    assert_eq!(out.batch.places.len(), 3);
    let leaf = out
      .batch
      .places
      .iter()
      .find(|p| p.name.starts_with("Springfield"))
      .unwrap();
    let parent = out
      .batch
      .places
      .iter()
      .find(|p| p.place_id == leaf.parent_id.unwrap())
      .unwrap();
    assert_eq!(parent.name, "Illinois, USA");
  }

  #[test]
  fn diacritics_fold_for_dedup() {
    let out = run(
      "0 @I1@ INDI\n1 BIRT\n2 PLAC Orléans, France\n\
       0 @I2@ INDI\n1 DEAT\n2 PLAC ORLEANS, France",
    );
    let leaves: Vec<_> = out
      .batch
      .places
      .iter()
      .filter(|p| p.parent_id.is_some())
      .collect();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].normalized_name, "orleans, france");
  }

  #[test]
  fn dangling_pointer_drops_edge_with_warning() {
    let out = run(
      "0 @I1@ INDI\n1 NAME A\n0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I9@",
    );
    assert!(out.batch.relationships.is_empty());
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].kind, IssueKind::DanglingReference);
  }

  #[test]
  fn duplicate_record_id_keeps_later_record() {
    let out = run(
      "0 @I1@ INDI\n1 NAME First /Version/\n\
       0 @I1@ INDI\n1 NAME Second /Version/",
    );
    assert_eq!(out.batch.persons.len(), 1);
    assert_eq!(
      out.batch.persons[0].given_names.as_deref(),
      Some("Second")
    );
    assert_eq!(out.warnings.len(), 1);
    assert_eq!(out.warnings[0].kind, IssueKind::DuplicateRecordId);
  }

  #[test]
  fn contradictory_parent_edges_reject_only_the_cycle_closer() {
    let out = run(
      "0 @I1@ INDI\n1 NAME A\n0 @I2@ INDI\n1 NAME B\n\
       0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I2@\n\
       0 @F2@ FAM\n1 HUSB @I2@\n1 CHIL @I1@",
    );
    let parents: Vec<_> = out
      .batch
      .relationships
      .iter()
      .filter(|r| r.kind == RelationshipKind::ParentOf)
      .collect();
    assert_eq!(parents.len(), 1);
    let a = person(&out, "I1").person_id;
    let b = person(&out, "I2").person_id;
    assert_eq!(parents[0].person_a, a);
    assert_eq!(parents[0].person_b, b);
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.errors[0].kind, IssueKind::CycleRejected);
  }

  #[test]
  fn longer_cycle_rejects_exactly_one_edge() {
    // A → B → C accepted; C → A closes a length-3 cycle.
    let out = run(
      "0 @I1@ INDI\n0 @I2@ INDI\n0 @I3@ INDI\n\
       0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I2@\n\
       0 @F2@ FAM\n1 HUSB @I2@\n1 CHIL @I3@\n\
       0 @F3@ FAM\n1 HUSB @I3@\n1 CHIL @I1@",
    );
    let parents = out
      .batch
      .relationships
      .iter()
      .filter(|r| r.kind == RelationshipKind::ParentOf)
      .count();
    assert_eq!(parents, 2);
    assert_eq!(out.errors.len(), 1);
  }

  #[test]
  fn living_flag_requires_recent_birth_and_no_death() {
    let out = run(
      "0 @I1@ INDI\n1 BIRT\n2 DATE 1950\n\
       0 @I2@ INDI\n1 BIRT\n2 DATE 1850\n\
       0 @I3@ INDI\n1 BIRT\n2 DATE 1950\n1 DEAT Y",
    );
    assert!(person(&out, "I1").living);
    assert!(!person(&out, "I2").living);
    assert!(!person(&out, "I3").living);
  }

  #[test]
  fn bare_deat_y_marks_death_without_date() {
    let out = run("0 @I1@ INDI\n1 DEAT Y");
    let p = person(&out, "I1");
    assert!(!p.living);
    assert!(p.death_date.is_none());
    assert!(
      out
        .batch
        .events
        .iter()
        .any(|e| e.kind == EventKind::Death)
    );
  }

  #[test]
  fn other_events_keep_their_tag() {
    let out = run(
      "0 @I1@ INDI\n1 OCCU Farmer\n1 BURI\n2 PLAC Oak Hill Cemetery",
    );
    let occu = out
      .batch
      .events
      .iter()
      .find(|e| e.raw_tag.as_deref() == Some("OCCU"))
      .unwrap();
    assert_eq!(occu.kind, EventKind::Other);
    assert_eq!(occu.note.as_deref(), Some("Farmer"));

    let buri = out
      .batch
      .events
      .iter()
      .find(|e| e.raw_tag.as_deref() == Some("BURI"))
      .unwrap();
    assert!(buri.place_id.is_some());
  }

  #[test]
  fn notes_concatenate_in_order() {
    let out = run("0 @I1@ INDI\n1 NOTE first\n1 NOTE second");
    assert_eq!(
      person(&out, "I1").notes.as_deref(),
      Some("first; second")
    );
  }

  #[test]
  fn map_coordinates_attach_to_leaf_place() {
    let out = run(
      "0 @I1@ INDI\n1 BIRT\n2 PLAC Boston, USA\n3 MAP\n\
       4 LATI N42.3601\n4 LONG W71.0589",
    );
    let leaf = out
      .batch
      .places
      .iter()
      .find(|p| p.name.starts_with("Boston"))
      .unwrap();
    assert_eq!(leaf.latitude, Some(42.3601));
    assert_eq!(leaf.longitude, Some(-71.0589));
  }

  #[test]
  fn unrecognized_records_produce_no_entities() {
    let out = run("0 HEAD\n1 CHAR UTF-8\n0 TRLR");
    assert!(out.batch.persons.is_empty());
    assert!(out.batch.relationships.is_empty());
    assert!(out.warnings.is_empty());
  }
}
