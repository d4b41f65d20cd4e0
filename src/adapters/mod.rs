//! Adapters - implementations of the port interfaces.
//!
//! - `postgres` - sqlx repositories (production storage)
//! - `memory` - in-memory repositories and clocks (tests, HTTP harness)
//! - `auth` - bearer token validation
//! - `security` - argon2 password hashing
//! - `events` - event publishers
//! - `scheduler` - background reconciliation
//! - `http` - axum REST API

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod scheduler;
pub mod security;
