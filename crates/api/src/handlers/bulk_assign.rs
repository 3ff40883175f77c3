//! Handlers for bulk assignment.
//!
//! Both endpoints fetch the requested movies from the store first. Ids the
//! store does not return are never written; preview lists them under
//! `missing` and apply reports each as a failed target.

use std::collections::HashMap;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use cinedex_core::assignment::AssignmentRequest;
use cinedex_core::bulk::{self, AssignmentPreview};
use cinedex_core::error::CoreError;
use cinedex_core::executor::TargetError;
use cinedex_core::selector::{AssignmentMode, FieldSelector};
use cinedex_core::store::TargetSource;
use cinedex_core::target::Target;
use cinedex_core::types::TargetId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Error message recorded for ids the store does not know.
pub const TARGET_NOT_FOUND: &str = "Target not found";

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body shared by preview and apply.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkAssignRequest {
    #[validate(length(min = 1, max = 1000))]
    pub target_ids: Vec<String>,
    pub selector: String,
    #[validate(length(min = 1))]
    pub values: Vec<String>,
    pub mode: String,
}

impl BulkAssignRequest {
    fn parse(&self) -> AppResult<(Vec<TargetId>, AssignmentRequest)> {
        self.validate()?;

        let selector = FieldSelector::from_str_value(&self.selector).map_err(AppError::BadRequest)?;
        let mode = AssignmentMode::from_str_value(&self.mode).map_err(AppError::BadRequest)?;
        let request = AssignmentRequest::new(selector, &self.values, mode)?;

        let ids: Vec<TargetId> = self
            .target_ids
            .iter()
            .map(|id| TargetId::new(id.trim()))
            .collect();
        bulk::validate_unique_ids(&ids)?;

        Ok((ids, request))
    }
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Preview plus the requested ids the store did not return.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub preview: AssignmentPreview,
    pub missing: Vec<TargetId>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch `ids` from the store, returning found movies in request order and
/// the ids that were not found.
async fn fetch_targets<S: TargetSource + ?Sized>(
    store: &S,
    ids: &[TargetId],
) -> AppResult<(Vec<Target>, Vec<TargetId>)> {
    let mut by_id: HashMap<TargetId, Target> = store
        .get_targets_by_ids(ids)
        .await?
        .into_iter()
        .map(|t| (t.id.clone(), t))
        .collect();

    let mut found = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
        match by_id.remove(id) {
            Some(target) => found.push(target),
            None => missing.push(id.clone()),
        }
    }

    if found.is_empty() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: ids
                .iter()
                .map(TargetId::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }));
    }
    if !missing.is_empty() {
        tracing::warn!(missing = missing.len(), "Requested movies not found in store");
    }
    Ok((found, missing))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /preview
///
/// Bucket the requested movies against the value and show which would be
/// written. Nothing is written.
pub async fn preview(
    State(state): State<AppState>,
    Json(body): Json<BulkAssignRequest>,
) -> AppResult<impl IntoResponse> {
    let (ids, request) = body.parse()?;
    let (targets, missing) = fetch_targets(&*state.store, &ids).await?;

    let preview = bulk::preview(&targets, &request)?;

    Ok(Json(DataResponse {
        data: PreviewResponse { preview, missing },
    }))
}

/// POST /apply
///
/// Apply the assignment one movie at a time. Per-movie failures, including
/// unknown ids, are reported in the result rather than failing the request,
/// in the order the ids were given.
pub async fn apply(
    State(state): State<AppState>,
    Json(body): Json<BulkAssignRequest>,
) -> AppResult<impl IntoResponse> {
    let (ids, request) = body.parse()?;
    let (targets, missing) = fetch_targets(&*state.store, &ids).await?;

    let mut result = bulk::assign(
        &targets,
        &request,
        &*state.store,
        Some(state.shutdown.child_token()),
    )
    .await?;

    result
        .errors
        .extend(missing.into_iter().map(|target_id| TargetError {
            target_id,
            message: TARGET_NOT_FOUND.to_string(),
        }));
    let position: HashMap<&TargetId, usize> = ids
        .iter()
        .enumerate()
        .map(|(index, id)| (id, index))
        .collect();
    result.errors.sort_by_key(|e| position.get(&e.target_id).copied());

    tracing::info!(
        operation_id = %result.operation_id,
        selector = request.selector.as_str(),
        summary = %result.summary(),
        "Bulk assignment applied"
    );

    Ok(Json(DataResponse { data: result }))
}
