//! Identity & Authorization
//!
//! Stateless token issuance and verification over a credential store, with
//! an optional external-directory authentication path raced against the
//! local password check.

pub mod config;
pub mod directory;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

pub use config::AuthConfig;
pub use directory::DirectoryAuthenticator;
pub use service::IdentityService;
pub use store::{CredentialStore, MemoryCredentialStore};
pub use token::{Claims, TokenSigner};
