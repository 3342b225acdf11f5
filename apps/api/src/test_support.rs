#![cfg(test)]
//! In-memory stand-ins for the primary store and the archive table.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::archive::{ArchiveError, ArchiveStore};
use crate::entries::repository::EntryStore;
use crate::entries::search::SearchField;
use crate::errors::AppError;
use crate::models::entry::{ArchivedEntry, Entry, NewEntry};
use crate::state::AppState;

#[derive(Default)]
pub struct InMemoryEntries {
    rows: Mutex<BTreeMap<i32, Entry>>,
    next_id: Mutex<i32>,
}

impl InMemoryEntries {
    pub fn ids(&self) -> Vec<i32> {
        self.rows.lock().unwrap().keys().copied().collect()
    }

    pub fn get(&self, id: i32) -> Option<Entry> {
        self.rows.lock().unwrap().get(&id).cloned()
    }
}

fn field_value(entry: &Entry, field: SearchField) -> String {
    match field {
        SearchField::ReadingName => entry.reading_name.clone(),
        SearchField::PersonName => entry.person_name.clone(),
        SearchField::ClanName => entry.clan_name.clone(),
        SearchField::StartDate => entry.start_date.to_string(),
    }
}

#[async_trait]
impl EntryStore for InMemoryEntries {
    async fn create(&self, entry: &NewEntry) -> Result<Entry, AppError> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let stored = Entry {
            id: *next_id,
            reading_name: entry.reading_name.clone(),
            person_name: entry.person_name.clone(),
            clan_name: entry.clan_name.clone(),
            start_date: entry.start_date,
            end_date: entry.end_date,
        };
        self.rows.lock().unwrap().insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Entry>, AppError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn search(&self, field: SearchField, query: &str) -> Result<Vec<Entry>, AppError> {
        let needle = query.to_lowercase();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|e| {
                let value = field_value(e, field);
                if field.is_exact() {
                    value == query
                } else {
                    value.to_lowercase().contains(&needle)
                }
            })
            .cloned()
            .collect())
    }

    async fn search_by_date_range(&self, date: NaiveDate) -> Result<Vec<Entry>, AppError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.start_date <= date && date <= e.end_date)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Entry {id} not found")))
    }

    async fn upsert(&self, entry: &Entry) -> Result<Entry, AppError> {
        self.rows.lock().unwrap().insert(entry.id, entry.clone());
        Ok(entry.clone())
    }

    async fn table_names(&self) -> Result<Vec<String>, AppError> {
        Ok(vec!["_sqlx_migrations".to_string(), "seva_entries".to_string()])
    }
}

/// Archive fake. With `failing` set every call returns a 503 remote error.
#[derive(Default)]
pub struct FakeArchive {
    rows: Mutex<BTreeMap<i32, ArchivedEntry>>,
    failing: AtomicBool,
}

impl FakeArchive {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, id: i32) -> Option<ArchivedEntry> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn seed(&self, row: ArchivedEntry) {
        self.rows.lock().unwrap().insert(row.id, row);
    }

    fn check(&self) -> Result<(), ArchiveError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ArchiveError::Remote {
                status: 503,
                body: "archive unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn set_active(&self, id: i32, active: bool) {
        if let Some(row) = self.rows.lock().unwrap().get_mut(&id) {
            row.active = active;
        }
    }
}

#[async_trait]
impl ArchiveStore for FakeArchive {
    async fn list_inactive(&self) -> Result<Vec<ArchivedEntry>, ArchiveError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|r| !r.active)
            .cloned()
            .collect())
    }

    async fn mark_active(&self, id: i32) -> Result<ArchivedEntry, ArchiveError> {
        self.check()?;
        self.set_active(id, true);
        self.get(id).ok_or(ArchiveError::NotFound(id))
    }

    async fn mark_inactive(&self, id: i32) -> Result<(), ArchiveError> {
        self.check()?;
        self.set_active(id, false);
        Ok(())
    }

    async fn hard_delete(&self, id: i32) -> Result<(), ArchiveError> {
        self.check()?;
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn insert_active(&self, entry: &Entry) -> Result<(), ArchiveError> {
        self.check()?;
        self.seed(ArchivedEntry::from_entry(entry, true));
        Ok(())
    }
}

pub struct TestStores {
    pub entries: Arc<InMemoryEntries>,
    pub archive: Arc<FakeArchive>,
}

impl TestStores {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(InMemoryEntries::default()),
            archive: Arc::new(FakeArchive::default()),
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            entries: self.entries.clone(),
            archive: self.archive.clone(),
        }
    }
}
