//! Orchestration engine adapter
//!
//! Two redundant transports to the container-orchestration daemon: a
//! structured API seam ([`EngineApi`]) and a command-line transport
//! ([`CliTransport`]) that owns deploy/remove. The tenant layer above
//! consumes both and trusts neither alone.

pub mod api;
pub mod cli;
pub mod error;
pub mod filter;
pub mod naming;
pub mod record;
pub mod rest;

pub use api::EngineApi;
pub use cli::{CliStackRecord, CliTransport, DockerCli};
pub use error::EngineError;
pub use filter::{NodeFilter, ServiceFilter, TaskFilter};
pub use record::{NodeRecord, PortRecord, ServiceRecord, TaskRecord};
pub use rest::HttpEngineApi;

/// Adapter result type
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Engine label grouping services into a stack
pub const NAMESPACE_LABEL: &str = "com.docker.stack.namespace";
