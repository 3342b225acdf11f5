pub mod health;

use axum::{
    routing::{delete, get, patch},
    Router,
};

use crate::archive::handlers as trash;
use crate::entries::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/debug/tables", get(handlers::handle_list_tables))
        // Primary store
        .route(
            "/data",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route("/data/:id", delete(handlers::handle_delete))
        .route("/search", get(handlers::handle_search))
        .route("/search-by-date", get(handlers::handle_search_by_date))
        // Trash (archive store)
        .route("/trash", get(trash::handle_list_trash))
        .route("/trash/:id/restore", patch(trash::handle_restore))
        .route("/trash/:id", delete(trash::handle_purge))
        .with_state(state)
}
