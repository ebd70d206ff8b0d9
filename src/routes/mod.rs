//! Route Configuration Module
//!
//! HTTP route assembly for the server.
//!
//! - **`router`** - Full router: API routes, static `/uploads` service,
//!   CORS, body limit, fallback
//! - **`api_routes`** - The `/api` endpoints, split into public auth
//!   routes and token-protected routes

pub mod api_routes;
pub mod router;

pub use router::create_router;
