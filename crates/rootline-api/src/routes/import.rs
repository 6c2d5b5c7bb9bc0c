//! Handler for `POST /import`.
//!
//! The request body is the raw genealogical record file; `?name=` labels the
//! resulting source. Fatal conditions map to 409 (duplicate) and 422
//! (nothing parsable); everything else commits and returns the import
//! report, warnings and errors included.

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use rootline_core::{import::ImportResult, store::GraphStore};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ImportParams {
  /// Display name for the new source; defaults to "upload".
  pub name: Option<String>,
}

/// `POST /import[?name=...]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ImportParams>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: GraphStore + Clone + Send + Sync + 'static,
{
  let name = params.name.as_deref().unwrap_or("upload");
  let result: ImportResult =
    rootline_engine::import(state.store.as_ref(), &body, name, &state.normalize)
      .await?;
  Ok((StatusCode::CREATED, Json(result)))
}
