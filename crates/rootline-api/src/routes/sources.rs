//! Handlers for `/sources` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/sources` | Newest first |
//! | `GET`    | `/sources/{id}` | 404 if not found |
//! | `DELETE` | `/sources/{id}` | Cascading; idempotent, always 204 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rootline_core::{entity::Source, store::GraphStore};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `GET /sources`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Source>>, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  let sources = state
    .store
    .list_sources()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(sources))
}

/// `GET /sources/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Source>, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  let source = state
    .store
    .get_source(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("source {id} not found")))?;
  Ok(Json(source))
}

/// `DELETE /sources/{id}` — deleting an unknown id is a no-op, not an
/// error; the caller may be racing another deletion.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .delete_source(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
