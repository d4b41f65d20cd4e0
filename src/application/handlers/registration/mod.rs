//! Registration handlers.

mod register;

pub use register::{RegisterCommand, RegisterHandler, RegisterResult};
