//! Bounded graph traversal.
//!
//! Layered breadth-first expansion with a visited set: work is O(V+E) within
//! the explored radius however many spouse/sibling cycles the wider graph
//! contains, and a person is never visited twice. There is no unbounded
//! mode; callers choose the radius every time.

use std::collections::HashSet;

use rootline_core::{
  entity::{Person, Relationship, RelationshipKind},
  store::GraphStore,
};
use uuid::Uuid;

use crate::error::{Error, Result};

/// The induced subgraph around a start person: every person within the
/// requested hop count, plus every edge running between two of them.
#[derive(Debug, Clone)]
pub struct Neighborhood {
  pub persons:       Vec<Person>,
  pub relationships: Vec<Relationship>,
}

/// Validate a caller-supplied depth. Zero and negative are refused; there is
/// no "unbounded" sentinel.
fn check_depth(depth: i64) -> Result<u32> {
  u32::try_from(depth)
    .ok()
    .filter(|d| *d >= 1)
    .ok_or(Error::InvalidDepth(depth))
}

async fn require_person<S: GraphStore>(
  store: &S,
  person_id: Uuid,
) -> Result<()> {
  store
    .get_person(person_id)
    .await
    .map_err(Error::store)?
    .map(|_| ())
    .ok_or(Error::PersonNotFound(person_id))
}

// ─── Neighborhood ────────────────────────────────────────────────────────────

/// All persons reachable from `person_id` over relationship edges of any
/// kind within `max_degrees` hops — the start person included — plus the
/// edges between them. Parallel edges of different kinds are all returned.
pub async fn neighborhood<S>(
  store: &S,
  person_id: Uuid,
  max_degrees: i64,
) -> Result<Neighborhood>
where
  S: GraphStore,
{
  let max_degrees = check_depth(max_degrees)?;
  require_person(store, person_id).await?;

  let mut visited: HashSet<Uuid> = HashSet::from([person_id]);
  // Discovery order, for a deterministic result layout.
  let mut order: Vec<Uuid> = vec![person_id];
  let mut frontier: Vec<Uuid> = vec![person_id];

  for _ in 0..max_degrees {
    if frontier.is_empty() {
      break;
    }
    let edges = store
      .relationships_touching(&frontier)
      .await
      .map_err(Error::store)?;

    let mut next: Vec<Uuid> = Vec::new();
    for edge in &edges {
      for endpoint in [edge.person_a, edge.person_b] {
        if visited.insert(endpoint) {
          order.push(endpoint);
          next.push(endpoint);
        }
      }
    }
    frontier = next;
  }

  let persons = in_discovery_order(
    store.get_persons(&order).await.map_err(Error::store)?,
    &order,
  );
  let relationships = store
    .relationships_among(&order)
    .await
    .map_err(Error::store)?;

  Ok(Neighborhood {
    persons,
    relationships,
  })
}

// ─── Ancestors / descendants ─────────────────────────────────────────────────

/// Persons reachable from `person_id` by following parent-of edges child →
/// parent, up to `max_generations` steps. Never includes `person_id`.
pub async fn ancestors<S>(
  store: &S,
  person_id: Uuid,
  max_generations: i64,
) -> Result<Vec<Person>>
where
  S: GraphStore,
{
  parent_walk(store, person_id, max_generations, Direction::Up).await
}

/// Persons reachable from `person_id` by following parent-of edges parent →
/// child, up to `max_generations` steps. Never includes `person_id`.
pub async fn descendants<S>(
  store: &S,
  person_id: Uuid,
  max_generations: i64,
) -> Result<Vec<Person>>
where
  S: GraphStore,
{
  parent_walk(store, person_id, max_generations, Direction::Down).await
}

#[derive(Clone, Copy)]
enum Direction {
  /// Child → parent.
  Up,
  /// Parent → child.
  Down,
}

async fn parent_walk<S>(
  store: &S,
  person_id: Uuid,
  max_generations: i64,
  direction: Direction,
) -> Result<Vec<Person>>
where
  S: GraphStore,
{
  let max_generations = check_depth(max_generations)?;
  require_person(store, person_id).await?;

  let mut visited: HashSet<Uuid> = HashSet::from([person_id]);
  let mut order: Vec<Uuid> = Vec::new();
  let mut frontier: Vec<Uuid> = vec![person_id];

  for _ in 0..max_generations {
    if frontier.is_empty() {
      break;
    }
    let in_frontier: HashSet<Uuid> = frontier.iter().copied().collect();
    let edges = store
      .relationships_touching(&frontier)
      .await
      .map_err(Error::store)?;

    let mut next: Vec<Uuid> = Vec::new();
    for edge in &edges {
      if edge.kind != RelationshipKind::ParentOf {
        continue;
      }
      // person_a is the parent, person_b the child.
      let found = match direction {
        Direction::Up if in_frontier.contains(&edge.person_b) => {
          Some(edge.person_a)
        }
        Direction::Down if in_frontier.contains(&edge.person_a) => {
          Some(edge.person_b)
        }
        _ => None,
      };
      if let Some(found) = found
        && visited.insert(found)
      {
        order.push(found);
        next.push(found);
      }
    }
    frontier = next;
  }

  Ok(in_discovery_order(
    store.get_persons(&order).await.map_err(Error::store)?,
    &order,
  ))
}

/// Re-sort a fetched person set into BFS discovery order.
fn in_discovery_order(mut persons: Vec<Person>, order: &[Uuid]) -> Vec<Person> {
  let rank: std::collections::HashMap<Uuid, usize> = order
    .iter()
    .copied()
    .enumerate()
    .map(|(i, id)| (id, i))
    .collect();
  persons.sort_by_key(|p| rank.get(&p.person_id).copied().unwrap_or(usize::MAX));
  persons
}

// ─── Tests ───────────────────────────────────────────────────────────────────
