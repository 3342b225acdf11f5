//! Axum route handlers for the trash view backed by the archive table.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::entries::handlers::DetailResponse;
use crate::errors::AppError;
use crate::models::entry::{ArchivedEntry, Entry};
use crate::state::AppState;

/// GET /trash
pub async fn handle_list_trash(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArchivedEntry>>, AppError> {
    let rows = state.archive.list_inactive().await?;
    info!("GET /trash returning {} entries", rows.len());
    Ok(Json(rows))
}

/// PATCH /trash/:id/restore
///
/// Flips the archive row active, then writes it back into the primary store
/// under the same id. The two writes are not atomic: if the upsert fails the
/// archive row stays active with no primary copy.
pub async fn handle_restore(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Entry>, AppError> {
    info!("PATCH /trash/{id}/restore");
    let row = state.archive.mark_active(id).await?;

    let restored = state.entries.upsert(&Entry::from(row)).await?;
    info!("Entry {id} restored into primary store");
    Ok(Json(restored))
}

/// DELETE /trash/:id
pub async fn handle_purge(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DetailResponse>, AppError> {
    info!("DELETE /trash/{id}");
    state.archive.hard_delete(id).await?;
    info!("Entry {id} permanently deleted from archive");
    Ok(DetailResponse::new("Permanently deleted"))
}
