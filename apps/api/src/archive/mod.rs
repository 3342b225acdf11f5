//! Archive gateway: the remote REST table that mirrors every entry and holds
//! the `active` flag behind the trash view.
//!
//! Calls are single-attempt. A non-success status comes back as
//! `ArchiveError::Remote` and the caller decides whether to surface it or
//! only log it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::ArchiveConfig;
use crate::models::entry::{ArchivedEntry, Entry};

pub mod handlers;

/// Timeout applied to every archive write (POST, PATCH, DELETE).
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive store returned status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Entry {0} not found in archive")]
    NotFound(i32),
}

/// Operations against the archive table, keyed by entry id.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    async fn list_inactive(&self) -> Result<Vec<ArchivedEntry>, ArchiveError>;

    /// Flips the row active and returns it as re-fetched after the update.
    async fn mark_active(&self, id: i32) -> Result<ArchivedEntry, ArchiveError>;

    async fn mark_inactive(&self, id: i32) -> Result<(), ArchiveError>;

    async fn hard_delete(&self, id: i32) -> Result<(), ArchiveError>;

    async fn insert_active(&self, entry: &Entry) -> Result<(), ArchiveError>;
}

/// PostgREST-style HTTP client for the archive table.
#[derive(Clone)]
pub struct ArchiveClient {
    client: Client,
    table_url: String,
    api_key: String,
}

impl ArchiveClient {
    pub fn new(config: &ArchiveConfig) -> Result<Self, ArchiveError> {
        Ok(Self {
            client: Client::builder().build()?,
            table_url: format!("{}/rest/v1/{}", config.base_url, config.table),
            api_key: config.api_key.clone(),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn row_filter(id: i32) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }

    async fn fetch_row(&self, id: i32) -> Result<Option<ArchivedEntry>, ArchiveError> {
        let response = self
            .authorized(self.client.get(&self.table_url))
            .query(&Self::row_filter(id))
            .query(&[("select", "*")])
            .send()
            .await?;
        let rows: Vec<ArchivedEntry> = ensure_success(response).await?.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn set_active(&self, id: i32, active: bool) -> Result<(), ArchiveError> {
        let response = self
            .authorized(self.client.patch(&self.table_url))
            .query(&Self::row_filter(id))
            .json(&json!({ "active": active }))
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;
        ensure_success(response).await?;
        debug!("Archive row {id} set active={active}");
        Ok(())
    }
}

#[async_trait]
impl ArchiveStore for ArchiveClient {
    async fn list_inactive(&self) -> Result<Vec<ArchivedEntry>, ArchiveError> {
        let response = self
            .authorized(self.client.get(&self.table_url))
            .query(&[("active", "eq.false"), ("select", "*")])
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn mark_active(&self, id: i32) -> Result<ArchivedEntry, ArchiveError> {
        self.set_active(id, true).await?;
        self.fetch_row(id).await?.ok_or(ArchiveError::NotFound(id))
    }

    async fn mark_inactive(&self, id: i32) -> Result<(), ArchiveError> {
        self.set_active(id, false).await
    }

    async fn hard_delete(&self, id: i32) -> Result<(), ArchiveError> {
        let response = self
            .authorized(self.client.delete(&self.table_url))
            .query(&Self::row_filter(id))
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn insert_active(&self, entry: &Entry) -> Result<(), ArchiveError> {
        let response = self
            .authorized(self.client.post(&self.table_url))
            .header("Prefer", "return=minimal")
            .json(&ArchivedEntry::from_entry(entry, true))
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        ensure_success(response).await?;
        debug!("Archive insert for entry {} returned {status}", entry.id);
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, ArchiveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ArchiveError::Remote {
        status: status.as_u16(),
        body,
    })
}
