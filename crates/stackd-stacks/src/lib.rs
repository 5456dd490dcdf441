//! Tenant-scoped orchestration
//!
//! The quota-aware, label-based multi-tenancy layer above the engine
//! adapter: every deployed service is tagged with its owner and a service
//! class, and every read reconstructs the tenant's view from the engine's
//! flat listings.

pub mod compose;
pub mod model;
pub mod service;

pub use compose::ComposeFile;
pub use model::{ServiceView, Stack, TaskView};
pub use service::{StackConfig, StackService};

/// Label carrying the owning tenant's name
pub const OWNER_LABEL: &str = "stackd.owner";
/// Label marking services managed by this system
pub const CLASS_LABEL: &str = "stackd.class";
