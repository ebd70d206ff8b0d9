//! Chronika - Personal Timeline Service
//!
//! Chronika is an HTTP backend for personal timeline management:
//! authenticated users create named timelines (nations, continents,
//! custom topics) and fill them with dated events, optionally attaching
//! images and flagging events as important.
//!
//! # Module Structure
//!
//! - **`auth`** - Accounts, credentials, session tokens and the
//!   verification/reset token lifecycle
//! - **`timelines`** - User-owned timelines with per-user slugs
//! - **`events`** - Dated events with decimal years (astronomical dates
//!   sort alongside everyday ones)
//! - **`images`** - Image attachments: DB bookkeeping and file storage
//! - **`email`** - Outgoing verification and password-reset mail
//! - **`error`** - `ApiError` and its HTTP status mapping
//! - **`json`** - Partial-update deserialization helpers
//! - **`middleware`** - Bearer-token authentication
//! - **`routes`** - Route assembly
//! - **`server`** - Configuration, state and startup
//!
//! # Usage
//!
//! ```rust,no_run
//! use chronika::server::{create_app, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let app = create_app(&config).await?;
//! // Serve `app` with axum
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod email;
pub mod error;
pub mod json;
pub mod events;
pub mod images;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod timelines;
