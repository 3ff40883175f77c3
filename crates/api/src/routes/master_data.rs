//! Route definitions for master-data lists.
//!
//! Mounted at `/master-data` by `api_routes()`.
//!
//! ```text
//! POST   /invalidate        -> invalidate
//! GET    /{selector}        -> list_values
//! POST   /{selector}        -> create_value
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::master_data;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/invalidate", post(master_data::invalidate))
        .route(
            "/{selector}",
            get(master_data::list_values).post(master_data::create_value),
        )
}
