//! Server Module
//!
//! Startup plumbing for the HTTP server.
//!
//! - **`config`** - Environment-driven configuration, loaded once
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`init`** - Pool/migration/mailer wiring and app creation
//!
//! The flow is `Config::from_env()` → `create_app(&config)` → serve.

pub mod config;
pub mod init;
pub mod state;

pub use config::Config;
pub use init::create_app;
pub use state::AppState;
