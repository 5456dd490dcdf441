//! Derived stack views
//!
//! Nothing here is persisted: the engine is the source of truth and these
//! records are rebuilt from its flat listings on every read.

use serde::Serialize;
use stackd_engine::{NodeRecord, ServiceRecord, TaskRecord};

/// A task joined with its execution host
#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub record: TaskRecord,
    pub node: Option<NodeRecord>,
}

/// A service joined with its tasks
#[derive(Debug, Clone, Serialize)]
pub struct ServiceView {
    #[serde(flatten)]
    pub record: ServiceRecord,
    pub tasks: Vec<TaskView>,
}

impl ServiceView {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.record.label(key)
    }
}

/// A deployment-namespace grouping of services
#[derive(Debug, Clone, Serialize)]
pub struct Stack {
    pub name: String,
    pub services: Vec<ServiceView>,
}
