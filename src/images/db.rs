/**
 * Event Image Bookkeeping
 *
 * Database rows tracking the files attached to events. Invariants:
 *
 * - At most one image per event has `is_main = true`. The unset-all /
 *   set-one maintenance runs inside a transaction so concurrent requests
 *   cannot leave two mains.
 * - `sort_order` is the image count at insertion time (append order).
 * - Listings return the main image first, then sort order, then id.
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use std::collections::HashMap;

/// Image attached to an event
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventImage {
    pub id: i64,
    pub event_id: i64,
    /// Server-generated, collision-resistant filename
    pub filename: String,
    pub is_main: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const IMAGE_COLUMNS: &str = "id, event_id, filename, is_main, sort_order, created_at, updated_at";
const IMAGE_ORDER: &str = "is_main DESC, sort_order ASC, id ASC";

/// Images of one event, main first
pub async fn find_by_event_id(pool: &PgPool, event_id: i64) -> Result<Vec<EventImage>, sqlx::Error> {
    sqlx::query_as::<_, EventImage>(&format!(
        "SELECT {IMAGE_COLUMNS} FROM event_images WHERE event_id = $1 ORDER BY {IMAGE_ORDER}"
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await
}

/// Images for many events in one query, grouped per event
///
/// Avoids the N+1 pattern when a timeline's events are listed.
pub async fn find_by_event_ids(
    pool: &PgPool,
    event_ids: &[i64],
) -> Result<HashMap<i64, Vec<EventImage>>, sqlx::Error> {
    if event_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let images = sqlx::query_as::<_, EventImage>(&format!(
        "SELECT {IMAGE_COLUMNS} FROM event_images WHERE event_id = ANY($1) ORDER BY {IMAGE_ORDER}"
    ))
    .bind(event_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<EventImage>> = HashMap::new();
    for image in images {
        grouped.entry(image.event_id).or_default().push(image);
    }
    Ok(grouped)
}

/// True if the event already has a main image
pub async fn has_main(pool: &PgPool, event_id: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM event_images WHERE event_id = $1 AND is_main = true")
        .bind(event_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Attach an image row to an event
///
/// Sort order is the current image count (append semantics). When
/// `is_main` is set, every other image of the event is unset in the same
/// transaction.
pub async fn add(
    pool: &PgPool,
    event_id: i64,
    filename: &str,
    is_main: bool,
) -> Result<EventImage, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM event_images WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?;

    let image = sqlx::query_as::<_, EventImage>(
        r#"
        INSERT INTO event_images (event_id, filename, is_main, sort_order)
        VALUES ($1, $2, $3, $4)
        RETURNING id, event_id, filename, is_main, sort_order, created_at, updated_at
        "#,
    )
    .bind(event_id)
    .bind(filename)
    .bind(is_main)
    .bind(count as i32)
    .fetch_one(&mut *tx)
    .await?;

    if is_main {
        sqlx::query(
            "UPDATE event_images SET is_main = false, updated_at = $1 WHERE event_id = $2 AND id <> $3",
        )
        .bind(Utc::now())
        .bind(event_id)
        .bind(image.id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(image)
}

/// Designate one image as the event's main image
///
/// Unset-all then set-one inside a transaction, leaving exactly one main
/// regardless of prior state. Returns the owning event's id, or None when
/// the image is unknown.
pub async fn set_main(pool: &PgPool, image_id: i64) -> Result<Option<i64>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT event_id FROM event_images WHERE id = $1")
        .bind(image_id)
        .fetch_optional(&mut *tx)
        .await?;
    let event_id: i64 = match row {
        Some(row) => row.get("event_id"),
        None => return Ok(None),
    };

    let now = Utc::now();
    sqlx::query("UPDATE event_images SET is_main = false, updated_at = $1 WHERE event_id = $2")
        .bind(now)
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE event_images SET is_main = true, updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(image_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(event_id))
}

/// Delete one image row; returns its (event_id, filename) for file cleanup
pub async fn delete(pool: &PgPool, image_id: i64) -> Result<Option<(i64, String)>, sqlx::Error> {
    let row = sqlx::query("DELETE FROM event_images WHERE id = $1 RETURNING event_id, filename")
        .bind(image_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| (r.get("event_id"), r.get("filename"))))
}

/// Delete all image rows of an event; returns the filenames for file cleanup
pub async fn delete_all_for_event(
    pool: &PgPool,
    event_id: i64,
) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM event_images WHERE event_id = $1 RETURNING filename")
        .bind(event_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.get("filename")).collect())
}
