//! Middleware Module
//!
//! HTTP middleware applied before requests reach handlers. Currently
//! only authentication: routes mounted behind `auth_middleware` see an
//! `AuthenticatedUser` in their request extensions, surfaced to
//! handlers through the `AuthUser` extractor.

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
