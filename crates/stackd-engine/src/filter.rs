//! Listing filters
//!
//! Filters mirror the engine's own filter maps: label equality for
//! services, owning-service sets for tasks, id sets for nodes.

/// Service listing filter (label equality, all must match)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    pub labels: Vec<(String, String)>,
}

impl ServiceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    /// True when every required label matches
    pub fn matches(&self, labels: &std::collections::BTreeMap<String, String>) -> bool {
        self.labels
            .iter()
            .all(|(k, v)| labels.get(k).map(String::as_str) == Some(v.as_str()))
    }
}

/// Task listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub service_ids: Vec<String>,
}

impl TaskFilter {
    pub fn for_services(service_ids: Vec<String>) -> Self {
        Self { service_ids }
    }
}

/// Node listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    pub ids: Vec<String>,
}

impl NodeFilter {
    pub fn for_ids(ids: Vec<String>) -> Self {
        Self { ids }
    }
}
