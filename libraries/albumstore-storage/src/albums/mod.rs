use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tokio::time::timeout;

use crate::error::{Result, StorageError};

/// Absolute budget for a single statement against the backing database.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(3);

pub type AlbumId = i64;

/// An album record
///
/// Timestamps are fixed-width RFC 3339 text, so lexicographic and
/// chronological order agree. Two wire quirks are inherited contract,
/// kept as-is: `id` travels as a JSON string, and `title` serializes
/// as `"name"` (request bodies still use `"title"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    #[serde(with = "id_string")]
    pub id: AlbumId,
    pub created_at: String,
    pub updated_at: String,
    #[serde(rename = "name")]
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub year: String,
}

/// Data for creating a new album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub year: String,
}

pub async fn create(pool: &SqlitePool, album: CreateAlbum) -> Result<Album> {
    let now = format_timestamp(Utc::now());

    let result = timeout(
        STORE_TIMEOUT,
        sqlx::query(
            "INSERT INTO albums (title, artist, genre, year, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.genre)
        .bind(&album.year)
        .bind(&now)
        .bind(&now)
        .execute(pool),
    )
    .await
    .map_err(|_| StorageError::Timeout)??;

    let id = result.last_insert_rowid();

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Album", id.to_string()))
}

pub async fn get_by_id(pool: &SqlitePool, id: AlbumId) -> Result<Option<Album>> {
    let row = timeout(
        STORE_TIMEOUT,
        sqlx::query(
            "SELECT id, created_at, updated_at, title, artist, genre, year
             FROM albums
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool),
    )
    .await
    .map_err(|_| StorageError::Timeout)??;

    Ok(row.map(|row| read_album(&row)))
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = timeout(
        STORE_TIMEOUT,
        sqlx::query(
            "SELECT id, created_at, updated_at, title, artist, genre, year
             FROM albums
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool),
    )
    .await
    .map_err(|_| StorageError::Timeout)??;

    Ok(rows.iter().map(read_album).collect())
}

/// Overwrite the stored attributes with the record's in-memory values
/// and refresh `updated_at`. No existence pre-check; a zero affected-row
/// count means the id no longer exists.
pub async fn update(pool: &SqlitePool, album: &Album) -> Result<Album> {
    let now = format_timestamp(Utc::now());

    let result = timeout(
        STORE_TIMEOUT,
        sqlx::query(
            "UPDATE albums
             SET title = ?, artist = ?, genre = ?, year = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&album.title)
        .bind(&album.artist)
        .bind(&album.genre)
        .bind(&album.year)
        .bind(&now)
        .bind(album.id)
        .execute(pool),
    )
    .await
    .map_err(|_| StorageError::Timeout)??;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Album", album.id.to_string()));
    }

    get_by_id(pool, album.id)
        .await?
        .ok_or_else(|| StorageError::not_found("Album", album.id.to_string()))
}

/// Idempotent: succeeds whether or not a row matched.
pub async fn delete(pool: &SqlitePool, id: AlbumId) -> Result<()> {
    timeout(
        STORE_TIMEOUT,
        sqlx::query("DELETE FROM albums WHERE id = ?")
            .bind(id)
            .execute(pool),
    )
    .await
    .map_err(|_| StorageError::Timeout)??;

    Ok(())
}

fn read_album(row: &SqliteRow) -> Album {
    Album {
        id: row.get("id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        title: row.get("title"),
        artist: row.get("artist"),
        genre: row.get("genre"),
        year: row.get("year"),
    }
}

// Microsecond precision keeps the width fixed and makes successive
// updates to one record strictly ordered in practice.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Wire ids are strings; stored and in-memory ids stay i64.
mod id_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
