/**
 * Timeline Model and Database Operations
 *
 * Every query scopes by the owning user in the WHERE clause; ownership is
 * not a separate authorization step. A timeline another user owns is
 * indistinguishable from one that does not exist.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::events::db::Event;

/// Timeline category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Nation,
    Continent,
    Custom,
}

impl TimelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nation => "nation",
            Self::Continent => "continent",
            Self::Custom => "custom",
        }
    }
}

/// Timeline owned by a user
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub name: String,
    /// URL-safe identifier, unique per user
    pub slug: String,
    pub description: Option<String>,
    /// One of "nation", "continent", "custom"; `type` on the wire, which
    /// is a Rust keyword, hence the field name
    #[serde(rename = "type")]
    pub kind: String,
    pub color: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Populated on detail lookups; empty on list queries
    #[sqlx(skip)]
    pub events: Vec<Event>,
}

const TIMELINE_COLUMNS: &str =
    "id, user_id, name, slug, description, kind, color, sort_order, created_at, updated_at";

/// All timelines owned by a user, ordered by sort order then name
pub async fn find_all(pool: &PgPool, user_id: Uuid) -> Result<Vec<Timeline>, sqlx::Error> {
    sqlx::query_as::<_, Timeline>(&format!(
        "SELECT {TIMELINE_COLUMNS} FROM timelines WHERE user_id = $1 ORDER BY sort_order ASC, name ASC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// One owned timeline by id
pub async fn find_by_id(
    pool: &PgPool,
    id: i64,
    user_id: Uuid,
) -> Result<Option<Timeline>, sqlx::Error> {
    sqlx::query_as::<_, Timeline>(&format!(
        "SELECT {TIMELINE_COLUMNS} FROM timelines WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// One owned timeline by slug
pub async fn find_by_slug(
    pool: &PgPool,
    slug: &str,
    user_id: Uuid,
) -> Result<Option<Timeline>, sqlx::Error> {
    sqlx::query_as::<_, Timeline>(&format!(
        "SELECT {TIMELINE_COLUMNS} FROM timelines WHERE slug = $1 AND user_id = $2"
    ))
    .bind(slug)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// True if the user already has a timeline with this slug
///
/// `exclude_id` skips the row being updated so a timeline can keep its
/// own slug.
pub async fn slug_in_use(
    pool: &PgPool,
    user_id: Uuid,
    slug: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM timelines WHERE user_id = $1 AND slug = $2 AND ($3::BIGINT IS NULL OR id <> $3)",
    )
    .bind(user_id)
    .bind(slug)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Insert a new timeline
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    slug: &str,
    description: Option<&str>,
    kind: TimelineKind,
    color: Option<&str>,
    sort_order: i32,
) -> Result<Timeline, sqlx::Error> {
    sqlx::query_as::<_, Timeline>(
        r#"
        INSERT INTO timelines (user_id, name, slug, description, kind, color, sort_order)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, user_id, name, slug, description, kind, color, sort_order, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(slug)
    .bind(description)
    .bind(kind.as_str())
    .bind(color)
    .bind(sort_order)
    .fetch_one(pool)
    .await
}

/// Store the merged state of an owned timeline
///
/// The handler merges the partial update into the fetched row first, so
/// this is a full-row write guarded by (id, user_id).
pub async fn update(pool: &PgPool, timeline: &Timeline) -> Result<Timeline, sqlx::Error> {
    sqlx::query_as::<_, Timeline>(
        r#"
        UPDATE timelines
        SET name = $1, slug = $2, description = $3, kind = $4, color = $5,
            sort_order = $6, updated_at = $7
        WHERE id = $8 AND user_id = $9
        RETURNING id, user_id, name, slug, description, kind, color, sort_order, created_at, updated_at
        "#,
    )
    .bind(&timeline.name)
    .bind(&timeline.slug)
    .bind(&timeline.description)
    .bind(&timeline.kind)
    .bind(&timeline.color)
    .bind(timeline.sort_order)
    .bind(Utc::now())
    .bind(timeline.id)
    .bind(timeline.user_id)
    .fetch_one(pool)
    .await
}

/// Delete an owned timeline; the FK cascade removes events and image rows
///
/// Returns false when no owned row matched. Image files on disk are left
/// behind by this path; only explicit event deletion cleans files.
pub async fn delete(pool: &PgPool, id: i64, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM timelines WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(TimelineKind::Nation.as_str(), "nation");
        assert_eq!(TimelineKind::Continent.as_str(), "continent");
        assert_eq!(TimelineKind::Custom.as_str(), "custom");
    }

    #[test]
    fn test_kind_deserializes_lowercase() {
        let kind: TimelineKind = serde_json::from_str("\"nation\"").unwrap();
        assert_eq!(kind, TimelineKind::Nation);
        assert!(serde_json::from_str::<TimelineKind>("\"country\"").is_err());
    }

    #[test]
    fn test_timeline_serializes_kind_as_type() {
        let timeline = Timeline {
            id: 1,
            user_id: Uuid::new_v4(),
            name: "Rome".to_string(),
            slug: "rome".to_string(),
            description: None,
            kind: "nation".to_string(),
            color: None,
            sort_order: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            events: Vec::new(),
        };

        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json["type"], "nation");
        assert!(json.get("kind").is_none());
        // Ownership is enforced server-side; the owner id is not exposed
        assert!(json.get("userId").is_none());
    }
}
