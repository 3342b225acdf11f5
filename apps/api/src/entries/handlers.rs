//! Axum route handlers for the primary entry table.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::archive::ArchiveError;
use crate::entries::search::{parse_target_date, SearchField};
use crate::errors::AppError;
use crate::models::entry::{Entry, NewEntry};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub field: String,
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: &str) -> Json<Self> {
        Json(Self {
            detail: detail.to_string(),
        })
    }
}

/// Mirror writes are best-effort once the primary store has committed:
/// a failure is logged and the request still succeeds.
pub fn log_mirror_failure(operation: &str, id: i32, result: Result<(), ArchiveError>) {
    if let Err(e) = result {
        warn!(entry_id = id, operation, error = %e, "Archive mirror failed; stores may diverge");
    }
}

/// POST /data
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<NewEntry>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    info!("POST /data for person '{}'", req.person_name);
    req.validate()?;

    let entry = state.entries.create(&req).await?;
    info!("Created entry {}", entry.id);

    log_mirror_failure("insert_active", entry.id, state.archive.insert_active(&entry).await);

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /data
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Entry>>, AppError> {
    let entries = state.entries.list_all().await?;
    info!("GET /data returning {} entries", entries.len());
    Ok(Json(entries))
}

/// GET /search?field=&query=
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Entry>>, AppError> {
    info!("GET /search with field={} query={}", params.field, params.query);
    let field: SearchField = params.field.parse()?;

    let entries = state.entries.search(field, &params.query).await?;
    info!("Search on {field} found {} entries", entries.len());
    Ok(Json(entries))
}

/// GET /search-by-date?date=YYYY-MM-DD
pub async fn handle_search_by_date(
    State(state): State<AppState>,
    Query(params): Query<DateQuery>,
) -> Result<Json<Vec<Entry>>, AppError> {
    info!("GET /search-by-date with date={}", params.date);
    let date = parse_target_date(&params.date)?;

    let entries = state.entries.search_by_date_range(date).await?;
    info!("Found {} entries covering {date}", entries.len());
    Ok(Json(entries))
}

/// DELETE /data/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DetailResponse>, AppError> {
    info!("DELETE /data/{id}");
    state.entries.delete(id).await?;

    log_mirror_failure("mark_inactive", id, state.archive.mark_inactive(id).await);

    Ok(DetailResponse::new("Deleted successfully"))
}

/// GET /debug/tables
pub async fn handle_list_tables(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let tables = state.entries.table_names().await?;
    info!("GET /debug/tables returning {} tables", tables.len());
    Ok(Json(tables))
}
