//! Handlers for `/persons` endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use rootline_core::{
  entity::{Event, Person},
  store::{GraphStore, PersonQuery},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  /// Case-insensitive substring over given names, surname, and full name.
  pub q:         Option<String>,
  pub source_id: Option<Uuid>,
  pub limit:     Option<usize>,
}

/// `GET /persons/search?q=...[&source_id=...][&limit=...]`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  let query = PersonQuery {
    text:   params.q,
    source: params.source_id,
    limit:  params.limit,
  };
  let persons = state
    .store
    .search_persons(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(persons))
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// A person together with their events, as returned by the detail endpoint.
#[derive(Debug, Serialize)]
pub struct PersonDetail {
  #[serde(flatten)]
  pub person: Person,
  pub events: Vec<Event>,
}

/// `GET /persons/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PersonDetail>, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  let person = state
    .store
    .get_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  let events = state
    .store
    .events_for_person(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(PersonDetail { person, events }))
}
