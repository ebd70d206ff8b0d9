//! Timeline Module
//!
//! User-owned timelines: the top-level containers events live in. Each
//! timeline belongs to one user and is addressable by id or by a slug
//! that is unique per owner.
//!
//! - **`db`** - Timeline model and queries (ownership enforced in SQL)
//! - **`handlers`** - CRUD HTTP handlers
//! - **`slug`** - Name-to-slug derivation

pub mod db;
pub mod handlers;
pub mod slug;

pub use db::{Timeline, TimelineKind};
