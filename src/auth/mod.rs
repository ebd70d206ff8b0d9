//! Authentication: user records, single-use tokens, sessions and handlers

pub mod handlers;
pub mod sessions;
pub mod tokens;
pub mod users;
