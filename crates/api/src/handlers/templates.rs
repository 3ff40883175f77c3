//! Handlers for cover/gallery URL templates.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use cinedex_core::error::CoreError;
use cinedex_core::template::{self, TemplateViolation};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct ExpandRequest {
    pub template: String,
    #[validate(length(min = 1))]
    pub code: String,
    pub image_index: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub template_url: String,
    pub gallery_template: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResolveRequest {
    #[validate(length(min = 1))]
    pub code: String,
    pub movie_type: Option<String>,
    pub studio: Option<String>,
    /// Number of gallery URLs to build, at most 200.
    #[serde(default)]
    #[validate(range(max = 200))]
    pub gallery_count: u32,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ExpandResponse {
    pub url: String,
}

/// A violation with its human-readable message.
#[derive(Debug, Serialize)]
pub struct ViolationView {
    #[serde(flatten)]
    pub violation: TemplateViolation,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub violations: Vec<ViolationView>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub group_id: String,
    pub cover_url: String,
    pub gallery_urls: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /groups
pub async fn list_groups(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let groups = state.store.fetch_template_groups().await?;
    Ok(Json(DataResponse { data: groups }))
}

/// POST /expand
pub async fn expand(Json(body): Json<ExpandRequest>) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let url = template::expand(&body.template, &body.code, body.image_index);
    Ok(Json(DataResponse {
        data: ExpandResponse { url },
    }))
}

/// POST /validate
///
/// Violations are advisory; the response is 200 either way.
pub async fn validate(Json(body): Json<ValidateRequest>) -> AppResult<impl IntoResponse> {
    let violations: Vec<ViolationView> =
        template::validate_group(&body.template_url, body.gallery_template.as_deref())
            .into_iter()
            .map(|violation| ViolationView {
                message: violation.message(),
                violation,
            })
            .collect();

    Ok(Json(DataResponse {
        data: ValidateResponse {
            valid: violations.is_empty(),
            violations,
        },
    }))
}

/// POST /resolve
///
/// Pick the template group for a movie and build its cover and gallery URLs.
pub async fn resolve(
    State(state): State<AppState>,
    Json(body): Json<ResolveRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let groups = state.store.fetch_template_groups().await?;

    let group = template::select_group(&groups, body.movie_type.as_deref(), body.studio.as_deref())
        .ok_or_else(|| CoreError::NotFound {
            entity: "TemplateGroup",
            id: "default".to_string(),
        })?;

    Ok(Json(DataResponse {
        data: ResolveResponse {
            group_id: group.id.clone(),
            cover_url: group.cover_url(&body.code),
            gallery_urls: group.gallery_urls(&body.code, body.gallery_count),
        },
    }))
}
