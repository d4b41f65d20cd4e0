//! Registration domain module.
//!
//! A registration is a user's seat in a session, unique per (session, user).

mod entity;

pub use entity::{Registration, RegistrationStatus};
