/**
 * Event HTTP Handlers
 *
 * CRUD for dated events plus the cross-timeline "important events"
 * listing. All listings come back in chronological order (year, then
 * month, then day, with missing month/day sorting first).
 */

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ApiError;
use crate::events::db::{self, Event};
use crate::images;
use crate::json;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;
use crate::timelines;

/// Default cap for the important-events listing
const DEFAULT_IMPORTANT_LIMIT: i64 = 20;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub timeline_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Decimal year; negative for BCE/astronomical dates
    pub year: Decimal,
    #[serde(default)]
    pub month: Option<i32>,
    #[serde(default)]
    pub day: Option<i32>,
    #[serde(default)]
    pub is_important: Option<bool>,
}

/// Partial update; `Option<Option<_>>` with the `double_option`
/// deserializer distinguishes "not provided" (outer None) from "set to
/// null" (Some(None)) for nullable fields
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "json::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub year: Option<Decimal>,
    #[serde(default, deserialize_with = "json::double_option")]
    pub month: Option<Option<i32>>,
    #[serde(default, deserialize_with = "json::double_option")]
    pub day: Option<Option<i32>>,
    #[serde(default)]
    pub is_important: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct ImportantQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// GET /api/events/timeline/{timelineId} - chronological events with images
pub async fn get_events_by_timeline(
    State(state): State<AppState>,
    Path(timeline_id): Path<i64>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = db::find_by_timeline_id(&state.pool, timeline_id).await?;
    Ok(Json(attach_images(&state, events).await?))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Event>, ApiError> {
    let mut event = db::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found."))?;

    event.images = images::db::find_by_event_id(&state.pool, event.id).await?;
    Ok(Json(event))
}

/// GET /api/events/important?limit=N - the caller's flagged events
pub async fn get_important_events(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ImportantQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_IMPORTANT_LIMIT);

    let events = db::find_important(&state.pool, user.user_id, limit).await?;
    Ok(Json(attach_images(&state, events).await?))
}

/// POST /api/events
///
/// # Errors
///
/// * `400` - blank title, or month/day outside their ranges
/// * `404` - the referenced timeline does not exist or is not owned by
///   the caller
pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::validation("Titel ist erforderlich."));
    }
    validate_month_day(request.month, request.day)?;

    timelines::db::find_by_id(&state.pool, request.timeline_id, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Timeline not found."))?;

    let event = db::create(
        &state.pool,
        request.timeline_id,
        title,
        request.description.as_deref(),
        request.year,
        request.month,
        request.day,
        request.is_important.unwrap_or(false),
    )
    .await?;

    tracing::info!("Event created: {} (timeline {})", event.title, event.timeline_id);

    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/{id}
///
/// Partial update: a field changes only when present in the body, so a
/// boolean can be set to false and nullable fields can be cleared
/// explicitly.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let mut event = db::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found."))?;

    if let Some(title) = request.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::validation("Titel darf nicht leer sein."));
        }
        event.title = title;
    }
    if let Some(description) = request.description {
        event.description = description;
    }
    if let Some(year) = request.year {
        event.year = year;
    }
    if let Some(month) = request.month {
        event.month = month;
    }
    if let Some(day) = request.day {
        event.day = day;
    }
    if let Some(is_important) = request.is_important {
        event.is_important = is_important;
    }
    validate_month_day(event.month, event.day)?;

    let updated = db::update(&state.pool, &event).await?;
    Ok(Json(updated))
}

/// DELETE /api/events/{id}
///
/// Removes the image rows and their files before the event row, so the
/// disk is cleaned even though the DB cascade alone would have handled
/// the rows.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if db::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Event not found."));
    }

    let filenames = images::db::delete_all_for_event(&state.pool, id).await?;
    for filename in &filenames {
        state.storage.remove(id, filename).await;
    }

    db::delete(&state.pool, id).await?;

    tracing::info!("Event {} deleted ({} images)", id, filenames.len());

    Ok(StatusCode::NO_CONTENT)
}

fn validate_month_day(month: Option<i32>, day: Option<i32>) -> Result<(), ApiError> {
    if let Some(month) = month {
        if !(1..=12).contains(&month) {
            return Err(ApiError::validation("Monat muss zwischen 1 und 12 liegen."));
        }
    }
    if let Some(day) = day {
        if !(1..=31).contains(&day) {
            return Err(ApiError::validation("Tag muss zwischen 1 und 31 liegen."));
        }
    }
    Ok(())
}

/// Batch-load images for a list of events (one query, grouped per event)
async fn attach_images(state: &AppState, mut events: Vec<Event>) -> Result<Vec<Event>, ApiError> {
    let event_ids: Vec<i64> = events.iter().map(|e| e.id).collect();
    let mut grouped = images::db::find_by_event_ids(&state.pool, &event_ids).await?;
    for event in &mut events {
        event.images = grouped.remove(&event.id).unwrap_or_default();
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_month_day_ranges() {
        assert!(validate_month_day(None, None).is_ok());
        assert!(validate_month_day(Some(1), Some(31)).is_ok());
        assert!(validate_month_day(Some(12), None).is_ok());
        assert!(validate_month_day(Some(0), None).is_err());
        assert!(validate_month_day(Some(13), None).is_err());
        assert!(validate_month_day(None, Some(0)).is_err());
        assert!(validate_month_day(None, Some(32)).is_err());
    }

    #[test]
    fn test_create_request_accepts_astronomical_year() {
        let request: CreateEventRequest = serde_json::from_str(
            r#"{"timelineId": 1, "title": "Big Bang", "year": -13700000000}"#,
        )
        .unwrap();
        assert_eq!(request.year, Decimal::from(-13_700_000_000i64));
        assert!(request.month.is_none());
    }

    #[test]
    fn test_update_request_clears_month_explicitly() {
        let cleared: UpdateEventRequest = serde_json::from_str(r#"{"month": null}"#).unwrap();
        assert_eq!(cleared.month, Some(None));

        let set: UpdateEventRequest = serde_json::from_str(r#"{"month": 5}"#).unwrap();
        assert_eq!(set.month, Some(Some(5)));

        let untouched: UpdateEventRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(untouched.month, None);
    }

    #[test]
    fn test_update_request_importance_flag() {
        let off: UpdateEventRequest =
            serde_json::from_str(r#"{"isImportant": false}"#).unwrap();
        assert_eq!(off.is_important, Some(false));
    }
}
