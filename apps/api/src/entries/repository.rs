use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;

use crate::entries::search::{contains_pattern, SearchField};
use crate::errors::AppError;
use crate::models::entry::{Entry, NewEntry};

/// Typed operations on the primary entry table.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn create(&self, entry: &NewEntry) -> Result<Entry, AppError>;

    /// Every row, in store-native order.
    async fn list_all(&self) -> Result<Vec<Entry>, AppError>;

    async fn search(&self, field: SearchField, query: &str) -> Result<Vec<Entry>, AppError>;

    /// Rows whose `[start_date, end_date]` range contains `date`, inclusive.
    async fn search_by_date_range(&self, date: NaiveDate) -> Result<Vec<Entry>, AppError>;

    /// Fails with `AppError::NotFound` when no row has this id.
    async fn delete(&self, id: i32) -> Result<(), AppError>;

    /// Insert-or-replace keyed by `entry.id`.
    async fn upsert(&self, entry: &Entry) -> Result<Entry, AppError>;

    /// Table names in the store's public schema.
    async fn table_names(&self) -> Result<Vec<String>, AppError>;
}

pub struct PgEntryRepository {
    pool: PgPool,
}

impl PgEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for PgEntryRepository {
    async fn create(&self, entry: &NewEntry) -> Result<Entry, AppError> {
        let stored = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO seva_entries
                (reading_name, person_name, clan_name, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&entry.reading_name)
        .bind(&entry.person_name)
        .bind(&entry.clan_name)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted seva entry {}", stored.id);
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Entry>, AppError> {
        Ok(
            sqlx::query_as::<_, Entry>("SELECT * FROM seva_entries")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn search(&self, field: SearchField, query: &str) -> Result<Vec<Entry>, AppError> {
        // `field.column()` comes from a closed enum, never from request input.
        let (sql, arg) = if field.is_exact() {
            (
                format!(
                    "SELECT * FROM seva_entries WHERE to_char({}, 'YYYY-MM-DD') = $1",
                    field.column()
                ),
                query.to_string(),
            )
        } else {
            (
                format!("SELECT * FROM seva_entries WHERE {} ILIKE $1", field.column()),
                contains_pattern(query),
            )
        };

        Ok(sqlx::query_as::<_, Entry>(&sql)
            .bind(arg)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn search_by_date_range(&self, date: NaiveDate) -> Result<Vec<Entry>, AppError> {
        Ok(sqlx::query_as::<_, Entry>(
            "SELECT * FROM seva_entries WHERE start_date <= $1 AND end_date >= $1",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM seva_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Entry {id} not found")));
        }
        Ok(())
    }

    async fn upsert(&self, entry: &Entry) -> Result<Entry, AppError> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO seva_entries
                (id, reading_name, person_name, clan_name, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                reading_name = EXCLUDED.reading_name,
                person_name = EXCLUDED.person_name,
                clan_name = EXCLUDED.clan_name,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(&entry.reading_name)
        .bind(&entry.person_name)
        .bind(&entry.clan_name)
        .bind(entry.start_date)
        .bind(entry.end_date)
        .fetch_one(&mut *tx)
        .await?;

        // An explicit id bypasses the serial. Advance the sequence to it so later
        // creates never hand out a restored id; never move it backwards, or ids
        // still sitting in the trash could be reissued.
        sqlx::query(
            r#"
            SELECT setval(pg_get_serial_sequence('seva_entries', 'id'), $1::bigint)
            WHERE $1::bigint > COALESCE(
                pg_sequence_last_value(pg_get_serial_sequence('seva_entries', 'id')::regclass),
                0
            )
            "#,
        )
        .bind(stored.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!("Upserted seva entry {}", stored.id);
        Ok(stored)
    }

    async fn table_names(&self) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = 'public' ORDER BY table_name",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}
