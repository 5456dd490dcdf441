//! Structured transport seam

use crate::filter::{NodeFilter, ServiceFilter, TaskFilter};
use crate::record::{NodeRecord, ServiceRecord, TaskRecord};
use crate::EngineResult;
use async_trait::async_trait;

/// Structured API to the orchestration daemon.
///
/// Implemented by the process that owns the daemon socket; the tenant layer
/// consumes it as an abstract list capability.
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// True when the daemon answers over this transport
    async fn ping(&self) -> EngineResult<bool>;
    /// Services matching `filter`
    async fn list_services(&self, filter: &ServiceFilter) -> EngineResult<Vec<ServiceRecord>>;
    /// Tasks belonging to the filtered services
    async fn list_tasks(&self, filter: &TaskFilter) -> EngineResult<Vec<TaskRecord>>;
    /// Nodes referenced by the filtered ids
    async fn list_nodes(&self, filter: &NodeFilter) -> EngineResult<Vec<NodeRecord>>;
}
