//! Handlers for master-data lists (studios, tags, actresses, ...).
//!
//! Reads go through the [`SnapshotProvider`] cache held in `AppState`.
//! Creating a value invalidates that selector's list.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use cinedex_core::selector::FieldSelector;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for creating a master-data value.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateValueRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Request body for dropping cached lists. Without a selector every list
/// is dropped.
#[derive(Debug, Default, Deserialize)]
pub struct InvalidateRequest {
    pub selector: Option<String>,
}

fn parse_selector(raw: &str) -> AppResult<FieldSelector> {
    FieldSelector::from_str_value(raw).map_err(AppError::BadRequest)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /{selector}
pub async fn list_values(
    State(state): State<AppState>,
    Path(selector): Path<String>,
) -> AppResult<impl IntoResponse> {
    let selector = parse_selector(&selector)?;
    let values = state.master_data.available_values(selector).await?;
    Ok(Json(DataResponse { data: values }))
}

/// POST /{selector}
///
/// Create a value, or return the existing one when the store already has
/// it under the same name.
pub async fn create_value(
    State(state): State<AppState>,
    Path(selector): Path<String>,
    Json(body): Json<CreateValueRequest>,
) -> AppResult<impl IntoResponse> {
    let selector = parse_selector(&selector)?;
    body.validate()?;
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name must not be blank".into()));
    }

    let item = state.master_data.create_value(selector, name).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// POST /invalidate
pub async fn invalidate(
    State(state): State<AppState>,
    Json(body): Json<InvalidateRequest>,
) -> AppResult<StatusCode> {
    let selector = body.selector.as_deref().map(parse_selector).transpose()?;
    state.master_data.invalidate(selector).await;
    Ok(StatusCode::NO_CONTENT)
}
