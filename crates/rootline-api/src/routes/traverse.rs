//! Handlers for the bounded-traversal endpoints.
//!
//! Depth parameters arrive as signed integers on purpose: zero and negative
//! values must reach the engine to be refused with a 400 rather than being
//! silently clamped at deserialization.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use rootline_core::{
  entity::{Person, Relationship},
  store::GraphStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Neighborhood ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NeighborhoodParams {
  pub degrees: i64,
}

#[derive(Debug, Serialize)]
pub struct NeighborhoodResponse {
  pub persons:       Vec<Person>,
  pub relationships: Vec<Relationship>,
}

/// `GET /persons/{id}/neighborhood?degrees=N`
pub async fn neighborhood<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<NeighborhoodParams>,
) -> Result<Json<NeighborhoodResponse>, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  let hood =
    rootline_engine::neighborhood(state.store.as_ref(), id, params.degrees)
      .await?;
  Ok(Json(NeighborhoodResponse {
    persons:       hood.persons,
    relationships: hood.relationships,
  }))
}

// ─── Ancestors / descendants ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerationParams {
  pub generations: i64,
}

/// `GET /persons/{id}/ancestors?generations=N`
pub async fn ancestors<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<GenerationParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  let persons =
    rootline_engine::ancestors(state.store.as_ref(), id, params.generations)
      .await?;
  Ok(Json(persons))
}

/// `GET /persons/{id}/descendants?generations=N`
pub async fn descendants<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<GenerationParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  let persons =
    rootline_engine::descendants(state.store.as_ref(), id, params.generations)
      .await?;
  Ok(Json(persons))
}
