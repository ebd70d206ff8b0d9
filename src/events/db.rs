/**
 * Event Model and Database Operations
 *
 * Events belong to exactly one timeline and carry the date model: a
 * decimal year (NUMERIC(15,2), large enough for -13700000000) plus
 * optional month and day.
 *
 * Ordering invariant: every listing sorts by year ascending, then month
 * ascending with NULL treated as 0, then day the same way. The COALESCE
 * lives in the SQL so no caller can forget it.
 */

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::images::db::EventImage;

/// Dated occurrence on a timeline
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub timeline_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Decimal year; negative for BCE/astronomical dates
    pub year: Decimal,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub is_important: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Owning timeline's name, denormalized for display (join queries only)
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_name: Option<String>,
    /// Owning timeline's slug, denormalized for display (join queries only)
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_slug: Option<String>,
    /// Attached images, main first; populated after the row query
    #[sqlx(skip)]
    pub images: Vec<EventImage>,
}

const EVENT_COLUMNS: &str = "events.id, events.timeline_id, events.title, events.description, \
     events.year, events.month, events.day, events.is_important, \
     events.created_at, events.updated_at";

const EVENT_ORDER: &str =
    "events.year ASC, COALESCE(events.month, 0) ASC, COALESCE(events.day, 0) ASC";

/// All events of a timeline in chronological order, timeline name/slug attached
pub async fn find_by_timeline_id(
    pool: &PgPool,
    timeline_id: i64,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        SELECT {EVENT_COLUMNS},
               timelines.name AS timeline_name, timelines.slug AS timeline_slug
        FROM events
        LEFT JOIN timelines ON events.timeline_id = timelines.id
        WHERE events.timeline_id = $1
        ORDER BY {EVENT_ORDER}
        "#
    ))
    .bind(timeline_id)
    .fetch_all(pool)
    .await
}

/// Single event with the same denormalization
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        SELECT {EVENT_COLUMNS},
               timelines.name AS timeline_name, timelines.slug AS timeline_slug
        FROM events
        LEFT JOIN timelines ON events.timeline_id = timelines.id
        WHERE events.id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Importance-flagged events across the user's timelines, capped at `limit`
///
/// Scoped to the requesting user through the timeline join.
pub async fn find_important(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(&format!(
        r#"
        SELECT {EVENT_COLUMNS},
               timelines.name AS timeline_name, timelines.slug AS timeline_slug
        FROM events
        JOIN timelines ON events.timeline_id = timelines.id
        WHERE events.is_important = true AND timelines.user_id = $1
        ORDER BY {EVENT_ORDER}
        LIMIT $2
        "#
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Insert a new event
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    timeline_id: i64,
    title: &str,
    description: Option<&str>,
    year: Decimal,
    month: Option<i32>,
    day: Option<i32>,
    is_important: bool,
) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (timeline_id, title, description, year, month, day, is_important)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, timeline_id, title, description, year, month, day, is_important,
                  created_at, updated_at
        "#,
    )
    .bind(timeline_id)
    .bind(title)
    .bind(description)
    .bind(year)
    .bind(month)
    .bind(day)
    .bind(is_important)
    .fetch_one(pool)
    .await
}

/// Store the merged state of an event
///
/// The handler merges the partial update into the fetched row first.
pub async fn update(pool: &PgPool, event: &Event) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        r#"
        UPDATE events
        SET title = $1, description = $2, year = $3, month = $4, day = $5,
            is_important = $6, updated_at = $7
        WHERE id = $8
        RETURNING id, timeline_id, title, description, year, month, day, is_important,
                  created_at, updated_at
        "#,
    )
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.year)
    .bind(event.month)
    .bind(event.day)
    .bind(event.is_important)
    .bind(Utc::now())
    .bind(event.id)
    .fetch_one(pool)
    .await
}

/// Delete an event row; returns false when it did not exist
///
/// Image rows cascade, but callers must delete image files first (the
/// handler does, via the image service).
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
