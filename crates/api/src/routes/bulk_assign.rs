//! Route definitions for bulk assignment.
//!
//! Mounted at `/bulk-assign` by `api_routes()`.
//!
//! ```text
//! POST   /preview           -> preview
//! POST   /apply             -> apply
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::bulk_assign;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/preview", post(bulk_assign::preview))
        .route("/apply", post(bulk_assign::apply))
}
