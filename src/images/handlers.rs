/**
 * Event Image HTTP Handlers
 *
 * Multipart upload plus image management (delete, designate main). The
 * first image an event ever receives becomes its main image; afterwards
 * main status only moves via the explicit PATCH endpoint.
 *
 * Uploads are all-or-nothing: every part is read and validated (count,
 * extension, size) before any file is written or any row inserted, so a
 * rejected request attaches nothing.
 */

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::error::ApiError;
use crate::events;
use crate::images::db::{self, EventImage};
use crate::images::storage::{self, MAX_FILES_PER_UPLOAD, MAX_FILE_SIZE};
use crate::server::state::AppState;

/// POST /api/events/{id}/images - attach up to 10 images to an event
///
/// # Errors
///
/// * `404` - the event does not exist
/// * `400` - no files, too many files, a file over 6MB, or a disallowed
///   extension; nothing is stored in that case
pub async fn upload_images(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<EventImage>>), ApiError> {
    events::db::find_by_id(&state.pool, event_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event not found."))?;

    let uploads = collect_uploads(multipart).await?;

    let mut event_has_main = db::has_main(&state.pool, event_id).await?;
    let mut saved = Vec::with_capacity(uploads.len());

    for (filename, data) in &uploads {
        state.storage.save(event_id, filename, data).await?;

        // The event's first image becomes the main image
        let is_main = !event_has_main;
        let image = db::add(&state.pool, event_id, filename, is_main).await?;
        event_has_main = true;
        saved.push(image);
    }

    tracing::info!("{} image(s) uploaded for event {}", saved.len(), event_id);

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Read and validate every part of the upload before anything persists
///
/// Returns the generated filename and the bytes for each file part.
/// Any violation rejects the whole batch.
async fn collect_uploads(mut multipart: Multipart) -> Result<Vec<(String, Bytes)>, ApiError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::upload(format!("Upload fehlgeschlagen: {e}")))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            // Non-file form fields are ignored
            continue;
        };

        if uploads.len() >= MAX_FILES_PER_UPLOAD {
            return Err(ApiError::upload("Maximal 10 Bilder pro Upload."));
        }

        let filename = storage::generate_filename(&original_name)?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::upload(format!("Upload fehlgeschlagen: {e}")))?;
        if data.len() > MAX_FILE_SIZE {
            return Err(ApiError::upload("Bilder dürfen höchstens 6 MB groß sein."));
        }

        uploads.push((filename, data));
    }

    if uploads.is_empty() {
        return Err(ApiError::upload("Keine Bilder übermittelt."));
    }

    Ok(uploads)
}

/// DELETE /api/events/{id}/images/{imageId}
pub async fn delete_image(
    State(state): State<AppState>,
    Path((_event_id, image_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let (event_id, filename) = db::delete(&state.pool, image_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Image not found."))?;

    state.storage.remove(event_id, &filename).await;

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/events/{id}/images/{imageId}/main - designate the main image
pub async fn set_main_image(
    State(state): State<AppState>,
    Path((_event_id, image_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<EventImage>>, ApiError> {
    let event_id = db::set_main(&state.pool, image_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Image not found."))?;

    let images = db::find_by_event_id(&state.pool, event_id).await?;
    Ok(Json(images))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    const BOUNDARY: &str = "test-boundary";

    async fn multipart_with_files(files: &[(&str, &[u8])]) -> Multipart {
        let mut body = Vec::new();
        for (name, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                     name=\"images\"; filename=\"{name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_collect_uploads_accepts_valid_batch() {
        let multipart =
            multipart_with_files(&[("a.jpg", b"one"), ("b.png", b"two")]).await;
        let uploads = collect_uploads(multipart).await.unwrap();

        assert_eq!(uploads.len(), 2);
        assert!(uploads[0].0.ends_with(".jpg"));
        assert_eq!(uploads[1].1.as_ref(), b"two");
    }

    #[tokio::test]
    async fn test_collect_uploads_rejects_bad_extension_mid_batch() {
        let multipart =
            multipart_with_files(&[("a.jpg", b"one"), ("evil.exe", b"two")]).await;
        let result = collect_uploads(multipart).await;
        assert!(matches!(result, Err(ApiError::Upload(_))));
    }

    #[tokio::test]
    async fn test_collect_uploads_rejects_oversized_file() {
        let big = vec![0u8; MAX_FILE_SIZE + 1];
        let multipart = multipart_with_files(&[("a.jpg", b"ok"), ("b.jpg", &big)]).await;
        let result = collect_uploads(multipart).await;
        assert!(matches!(result, Err(ApiError::Upload(_))));
    }

    #[tokio::test]
    async fn test_collect_uploads_rejects_too_many_files() {
        let files: Vec<(String, &[u8])> = (0..MAX_FILES_PER_UPLOAD + 1)
            .map(|i| (format!("img{i}.jpg"), b"x".as_slice()))
            .collect();
        let borrowed: Vec<(&str, &[u8])> =
            files.iter().map(|(n, d)| (n.as_str(), *d)).collect();

        let multipart = multipart_with_files(&borrowed).await;
        let result = collect_uploads(multipart).await;
        assert!(matches!(result, Err(ApiError::Upload(_))));
    }

    #[tokio::test]
    async fn test_collect_uploads_rejects_empty_request() {
        let multipart = multipart_with_files(&[]).await;
        let result = collect_uploads(multipart).await;
        assert!(matches!(result, Err(ApiError::Upload(_))));
    }
}
