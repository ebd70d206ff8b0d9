/**
 * Timeline HTTP Handlers
 *
 * CRUD for user-owned timelines. Detail lookups (by id or slug) eagerly
 * attach the timeline's events in chronological order, each with its
 * images, so one request renders a whole timeline page.
 */

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::error::{is_unique_violation, ApiError};
use crate::events;
use crate::images;
use crate::json;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;
use crate::timelines::db::{self, Timeline, TimelineKind};
use crate::timelines::slug::slugify;

/// Create request; slug is derived from the name when absent
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimelineRequest {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<TimelineKind>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// Partial update; `Option<Option<_>>` with the `double_option`
/// deserializer distinguishes "not provided" (outer None) from "set to
/// null" (Some(None)) for nullable fields
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimelineRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "json::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, rename = "type")]
    pub kind: Option<TimelineKind>,
    #[serde(default, deserialize_with = "json::double_option")]
    pub color: Option<Option<String>>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// GET /api/timelines - all timelines owned by the caller
pub async fn list_timelines(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Timeline>>, ApiError> {
    let timelines = db::find_all(&state.pool, user.user_id).await?;
    Ok(Json(timelines))
}

/// GET /api/timelines/{id} - one owned timeline with events and images
pub async fn get_timeline(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Timeline>, ApiError> {
    let timeline = db::find_by_id(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Timeline not found."))?;

    Ok(Json(attach_events(&state, timeline).await?))
}

/// GET /api/timelines/slug/{slug} - lookup by slug, same shape
pub async fn get_timeline_by_slug(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<Timeline>, ApiError> {
    let timeline = db::find_by_slug(&state.pool, &slug, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Timeline not found."))?;

    Ok(Json(attach_events(&state, timeline).await?))
}

/// POST /api/timelines
///
/// # Errors
///
/// * `400` - blank name, or a name/slug that slugifies to nothing
/// * `400` - the caller already has a timeline with this slug
pub async fn create_timeline(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateTimelineRequest>,
) -> Result<(StatusCode, Json<Timeline>), ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Name ist erforderlich."));
    }

    let slug = match request.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => slugify(name),
    };
    if slug.is_empty() {
        return Err(ApiError::validation(
            "Aus dem Namen lässt sich kein Slug ableiten.",
        ));
    }

    if db::slug_in_use(&state.pool, user.user_id, &slug, None).await? {
        return Err(slug_conflict(&slug));
    }

    let timeline = db::create(
        &state.pool,
        user.user_id,
        name,
        &slug,
        request.description.as_deref(),
        request.kind.unwrap_or(TimelineKind::Custom),
        request.color.as_deref(),
        request.sort_order.unwrap_or(0),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            slug_conflict(&slug)
        } else {
            e.into()
        }
    })?;

    tracing::info!("Timeline created: {} ({})", timeline.name, timeline.slug);

    Ok((StatusCode::CREATED, Json(timeline)))
}

/// PUT /api/timelines/{id}
///
/// Partial update: only the provided fields change.
pub async fn update_timeline(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTimelineRequest>,
) -> Result<Json<Timeline>, ApiError> {
    let mut timeline = db::find_by_id(&state.pool, id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Timeline not found."))?;

    if let Some(slug) = &request.slug {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ApiError::validation("Slug darf nicht leer sein."));
        }
        if slug != timeline.slug
            && db::slug_in_use(&state.pool, user.user_id, slug, Some(id)).await?
        {
            return Err(slug_conflict(slug));
        }
        timeline.slug = slug.to_string();
    }
    if let Some(name) = request.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::validation("Name darf nicht leer sein."));
        }
        timeline.name = name;
    }
    if let Some(description) = request.description {
        timeline.description = description;
    }
    if let Some(kind) = request.kind {
        timeline.kind = kind.as_str().to_string();
    }
    if let Some(color) = request.color {
        timeline.color = color;
    }
    if let Some(sort_order) = request.sort_order {
        timeline.sort_order = sort_order;
    }

    let updated = db::update(&state.pool, &timeline).await.map_err(|e| {
        if is_unique_violation(&e) {
            slug_conflict(&timeline.slug)
        } else {
            e.into()
        }
    })?;

    Ok(Json(updated))
}

/// DELETE /api/timelines/{id}
///
/// The FK cascade removes events and image rows. Image files on disk are
/// left behind by this path; only explicit event deletion cleans files.
pub async fn delete_timeline(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !db::delete(&state.pool, id, user.user_id).await? {
        return Err(ApiError::not_found("Timeline not found."));
    }

    tracing::info!("Timeline {} deleted by {}", id, user.email);

    Ok(StatusCode::NO_CONTENT)
}

fn slug_conflict(slug: &str) -> ApiError {
    ApiError::conflict(format!("Slug \"{slug}\" wird bereits verwendet."))
}

/// Load the timeline's events (sorted) and attach each event's images
/// with a single batched lookup.
async fn attach_events(state: &AppState, mut timeline: Timeline) -> Result<Timeline, ApiError> {
    let mut events = events::db::find_by_timeline_id(&state.pool, timeline.id).await?;

    let event_ids: Vec<i64> = events.iter().map(|e| e.id).collect();
    let mut grouped = images::db::find_by_event_ids(&state.pool, &event_ids).await?;
    for event in &mut events {
        event.images = grouped.remove(&event.id).unwrap_or_default();
    }

    timeline.events = events;
    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_missing_from_null() {
        let provided: UpdateTimelineRequest =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(provided.description, Some(None));

        let missing: UpdateTimelineRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(missing.description, None);

        let set: UpdateTimelineRequest =
            serde_json::from_str(r#"{"description": "Roman history"}"#).unwrap();
        assert_eq!(set.description, Some(Some("Roman history".to_string())));
    }

    #[test]
    fn test_create_request_defaults() {
        let request: CreateTimelineRequest = serde_json::from_str(r#"{"name": "Rome"}"#).unwrap();
        assert_eq!(request.name, "Rome");
        assert!(request.slug.is_none());
        assert!(request.kind.is_none());
    }

    #[test]
    fn test_create_request_with_kind() {
        let request: CreateTimelineRequest =
            serde_json::from_str(r#"{"name": "Europe", "type": "continent"}"#).unwrap();
        assert_eq!(request.kind, Some(TimelineKind::Continent));
    }

    #[test]
    fn test_update_request_clears_color_explicitly() {
        let cleared: UpdateTimelineRequest =
            serde_json::from_str(r#"{"color": null}"#).unwrap();
        assert_eq!(cleared.color, Some(None));

        let set: UpdateTimelineRequest =
            serde_json::from_str(r##"{"color": "#aa0000"}"##).unwrap();
        assert_eq!(set.color, Some(Some("#aa0000".to_string())));
    }
}
