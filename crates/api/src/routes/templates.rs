//! Route definitions for cover/gallery URL templates.
//!
//! Mounted at `/templates` by `api_routes()`.
//!
//! ```text
//! GET    /groups            -> list_groups
//! POST   /expand            -> expand
//! POST   /validate          -> validate
//! POST   /resolve           -> resolve
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups", get(templates::list_groups))
        .route("/expand", post(templates::expand))
        .route("/validate", post(templates::validate))
        .route("/resolve", post(templates::resolve))
}
