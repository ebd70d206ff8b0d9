//! Event Module
//!
//! Dated events inside timelines. Years are decimals so both everyday
//! dates and astronomical scales (negative billions of years) sort on
//! one axis; month and day are optional refinements.
//!
//! - **`db`** - Event model, chronological queries, denormalized
//!   timeline name/slug on listings
//! - **`handlers`** - CRUD plus the important-events listing

pub mod db;
pub mod handlers;

pub use db::Event;
