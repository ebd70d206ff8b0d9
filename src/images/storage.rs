/**
 * Image File Storage
 *
 * Files live under `{storage_dir}/events/{event_id}/`, one directory per
 * event, with server-generated names: a UUID prefix for collision
 * resistance followed by a sanitized fragment of the original name so a
 * directory listing stays readable.
 *
 * File writes and the corresponding DB rows are not transactional with
 * each other; the DB row is the source of truth and file removal is
 * best-effort (a missing file is an acceptable end state).
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;

/// Upload limits: at most 10 files per request, 6MB each
pub const MAX_FILES_PER_UPLOAD: usize = 10;
pub const MAX_FILE_SIZE: usize = 6 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const MAX_BASE_LEN: usize = 60;

/// Image storage rooted at the configured directory
#[derive(Clone)]
pub struct ImageStorage {
    base: Arc<PathBuf>,
}

impl ImageStorage {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Arc::new(base.into()),
        }
    }

    /// Root directory that `/uploads` serves statically
    pub fn root(&self) -> &Path {
        &self.base
    }

    fn event_dir(&self, event_id: i64) -> PathBuf {
        self.base.join("events").join(event_id.to_string())
    }

    /// Absolute path of a stored image
    pub fn image_path(&self, event_id: i64, filename: &str) -> PathBuf {
        self.event_dir(event_id).join(filename)
    }

    /// Write an uploaded image under the event's directory
    pub async fn save(
        &self,
        event_id: i64,
        filename: &str,
        data: &[u8],
    ) -> Result<(), ApiError> {
        let dir = self.event_dir(event_id);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(filename), data).await?;
        Ok(())
    }

    /// Best-effort file removal; a file that is already gone is fine
    pub async fn remove(&self, event_id: i64, filename: &str) {
        let path = self.image_path(event_id, filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove image file {}: {:?}", path.display(), e);
            }
        }
    }
}

/// True if the filename carries an accepted image extension
pub fn allowed_extension(filename: &str) -> bool {
    extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn extension(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|e| e.to_str())
}

/// Build the stored filename for an upload
///
/// `{uuid}-{sanitized-base}.{ext}`; the base keeps only ASCII
/// alphanumerics, underscore and hyphen, truncated so paths stay short.
///
/// # Errors
///
/// Upload error when the extension is not an accepted image type.
pub fn generate_filename(original: &str) -> Result<String, ApiError> {
    if !allowed_extension(original) {
        return Err(ApiError::upload(
            "Nur Bilder (JPEG, PNG, GIF, WebP) erlaubt.",
        ));
    }
    // allowed_extension verified this exists
    let ext = extension(original).unwrap_or("jpg").to_lowercase();

    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let base: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_BASE_LEN)
        .collect();

    Ok(format!("{}-{}.{}", Uuid::new_v4(), base, ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(allowed_extension("photo.jpg"));
        assert!(allowed_extension("photo.JPEG"));
        assert!(allowed_extension("photo.png"));
        assert!(allowed_extension("photo.gif"));
        assert!(allowed_extension("photo.webp"));
    }

    #[test]
    fn test_rejected_extensions() {
        assert!(!allowed_extension("malware.exe"));
        assert!(!allowed_extension("document.pdf"));
        assert!(!allowed_extension("archive.tar.gz"));
        assert!(!allowed_extension("noextension"));
    }

    #[test]
    fn test_generate_filename_shape() {
        let name = generate_filename("My Photo (1).jpg").unwrap();
        assert!(name.ends_with(".jpg"));
        assert!(name.contains("My_Photo__1_"));
        // UUID prefix keeps two uploads of the same file distinct
        let other = generate_filename("My Photo (1).jpg").unwrap();
        assert_ne!(name, other);
    }

    #[test]
    fn test_generate_filename_rejects_bad_type() {
        let result = generate_filename("script.sh");
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_filename_truncates_long_base() {
        let long = format!("{}.png", "a".repeat(200));
        let name = generate_filename(&long).unwrap();
        // uuid (36) + '-' + base (<= 60) + ".png"
        assert!(name.len() <= 36 + 1 + 60 + 4);
    }

    #[test]
    fn test_image_path_layout() {
        let storage = ImageStorage::new("/data/uploads");
        let path = storage.image_path(42, "abc.jpg");
        assert_eq!(path, PathBuf::from("/data/uploads/events/42/abc.jpg"));
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = std::env::temp_dir().join(format!("storage-{}", Uuid::new_v4()));
        let storage = ImageStorage::new(&dir);

        storage.save(7, "test.png", b"fake image").await.unwrap();
        assert!(storage.image_path(7, "test.png").exists());

        storage.remove(7, "test.png").await;
        assert!(!storage.image_path(7, "test.png").exists());

        // Removing again is not an error
        storage.remove(7, "test.png").await;

        std::fs::remove_dir_all(&dir).ok();
    }
}
