//! Shared types for stackd
//!
//! The error taxonomy and the identity model (`User`, `Role`, `Principal`)
//! consumed by every other crate in the workspace.

pub mod error;
pub mod user;

pub use error::{Error, Result};
pub use user::{Principal, Role, User};
