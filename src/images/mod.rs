//! Event Image Module
//!
//! Image attachments for events: rows in `event_images` plus files on
//! disk under the storage root. The DB row is the source of truth; file
//! operations are best-effort cleanup around it.
//!
//! - **`db`** - Image rows, single-main invariant, batched lookups
//! - **`handlers`** - Multipart upload, delete, designate-main
//! - **`storage`** - File layout, naming and type/size limits

pub mod db;
pub mod handlers;
pub mod storage;

pub use db::EventImage;
pub use storage::ImageStorage;
