//! Live Classroom - virtual classroom session orchestration
//!
//! Runs the live part of a course: scheduling and starting sessions,
//! registration with capacity and optional room passwords, presence derived
//! from an append-only activity log, breakout rooms, and live polls.
//!
//! Layout:
//!
//! - `domain` - aggregates, value objects and the rules they enforce
//! - `ports` - traits the application depends on
//! - `application` - command and query handlers
//! - `adapters` - PostgreSQL, in-memory, auth, HTTP and background jobs
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
