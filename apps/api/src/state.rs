use std::sync::Arc;

use crate::archive::ArchiveStore;
use crate::entries::repository::EntryStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Both handles are built once in `main`; tests swap in in-memory stores.
#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<dyn EntryStore>,
    pub archive: Arc<dyn ArchiveStore>,
}
