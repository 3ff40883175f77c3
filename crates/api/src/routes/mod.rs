pub mod bulk_assign;
pub mod health;
pub mod master_data;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /bulk-assign/preview                  dry-run analysis and plan (POST)
/// /bulk-assign/apply                    analyze, plan and write (POST)
///
/// /master-data/invalidate               drop cached lists (POST)
/// /master-data/{selector}               cached list (GET), create value (POST)
///
/// /templates/groups                     template registry (GET)
/// /templates/expand                     expand one template (POST)
/// /templates/validate                   check a cover/gallery pair (POST)
/// /templates/resolve                    pick a group and build URLs (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/bulk-assign", bulk_assign::router())
        .nest("/master-data", master_data::router())
        .nest("/templates", templates::router())
}
