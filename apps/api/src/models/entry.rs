use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

/// A stored Seva entry as it lives in the primary store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: i32,
    pub reading_name: String,
    pub person_name: String,
    pub clan_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Creation payload: every entry field except the store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    pub reading_name: String,
    pub person_name: String,
    pub clan_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewEntry {
    /// Rejects blank text fields. Dates are already checked by deserialization;
    /// `start_date <= end_date` is deliberately not enforced.
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [
            ("reading_name", &self.reading_name),
            ("person_name", &self.person_name),
            ("clan_name", &self.clan_name),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

/// A row in the remote archive table. `active = false` means the entry is in the trash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedEntry {
    pub id: i32,
    pub reading_name: String,
    pub person_name: String,
    pub clan_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub active: bool,
}

impl ArchivedEntry {
    pub fn from_entry(entry: &Entry, active: bool) -> Self {
        Self {
            id: entry.id,
            reading_name: entry.reading_name.clone(),
            person_name: entry.person_name.clone(),
            clan_name: entry.clan_name.clone(),
            start_date: entry.start_date,
            end_date: entry.end_date,
            active,
        }
    }
}

impl From<ArchivedEntry> for Entry {
    fn from(row: ArchivedEntry) -> Self {
        Entry {
            id: row.id,
            reading_name: row.reading_name,
            person_name: row.person_name,
            clan_name: row.clan_name,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}
