//! Durable whole-collection record store.
//!
//! The local store is the source of truth for reads. Each logical collection
//! (`users`, `syncQueue`) is one row in a SQLite table, holding the entire
//! record list as a JSON blob. `put` rewrites the whole collection;
//! read-modify-write is the caller's responsibility and two racing writers
//! lose to the last `put` (accepted for this single-profile deployment).

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

/// Collection key for registered accounts.
pub const USERS: &str = "users";
/// Collection key for pending sync queue entries.
pub const SYNC_QUEUE: &str = "syncQueue";

/// SQLite-backed collection store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Open a store at the given SQLite URL and ensure the schema exists.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid store URL '{database_url}'"))?
            .create_if_missing(true);

        // One connection: the store models a single browser profile and the
        // whole-collection blobs must not interleave across connections.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open local store at '{database_url}'"))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                name TEXT PRIMARY KEY,
                data TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create collections table")?;

        Ok(Self { pool })
    }

    /// In-memory store, used by tests and ephemeral sessions.
    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Open the default on-disk store under the OS app-data directory.
    pub async fn open_default() -> anyhow::Result<Self> {
        let path = default_db_path()?;
        let url = format!("sqlite://{}", path.to_string_lossy());
        Self::connect(&url).await
    }

    /// Whole-collection read.
    ///
    /// Missing or unparseable state repairs to an empty collection; this
    /// never fails from the caller's perspective.
    pub async fn get<T: DeserializeOwned>(&self, collection: &str) -> Vec<T> {
        let row = sqlx::query("SELECT data FROM collections WHERE name = ?1")
            .bind(collection)
            .fetch_optional(&self.pool)
            .await;

        let raw: String = match row {
            Ok(Some(row)) => match row.try_get("data") {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(collection, "unreadable collection row, treating as empty: {err}");
                    return Vec::new();
                }
            },
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(collection, "collection read failed, treating as empty: {err}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(collection, "unparseable collection state, treating as empty: {err}");
                Vec::new()
            }
        }
    }

    /// Whole-collection overwrite.
    pub async fn put<T: Serialize>(&self, collection: &str, records: &[T]) -> anyhow::Result<()> {
        let data = serde_json::to_string(records)
            .with_context(|| format!("failed to serialize collection '{collection}'"))?;

        sqlx::query(
            r#"
            INSERT INTO collections (name, data)
            VALUES (?1, ?2)
            ON CONFLICT(name) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(collection)
        .bind(&data)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to persist collection '{collection}'"))?;

        Ok(())
    }

    #[cfg(test)]
    async fn put_raw(&self, collection: &str, data: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO collections (name, data)
            VALUES (?1, ?2)
            ON CONFLICT(name) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(collection)
        .bind(data)
        .execute(&self.pool)
        .await
        .context("failed to write raw collection state")?;
        Ok(())
    }
}

/// Resolve `{app_data_dir}/stockbook/store.db`.
fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory")?;

    let mut dir = base;
    dir.push("stockbook");

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create store directory at {dir:?}"))?;

    dir.push("store.db");
    Ok(dir)
}
