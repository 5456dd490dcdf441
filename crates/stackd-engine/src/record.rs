//! Engine record types
//!
//! Typed projections of the engine's service/task/node listings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Published port of a service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortRecord {
    pub target_port: u16,
}

/// A deployable unit ("service")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub image: String,
    /// Deployment labels, including ownership metadata and the namespace
    pub labels: BTreeMap<String, String>,
    pub ports: Vec<PortRecord>,
}

impl ServiceRecord {
    /// Label value, if present
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// A running execution instance of a service ("task")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub service_id: String,
    /// Assigned execution host, if scheduled
    pub node_id: Option<String>,
    pub state: String,
    pub created_at: String,
}

/// A cluster execution host ("node")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub state: String,
    pub addr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_lookup() {
        let mut labels = BTreeMap::new();
        labels.insert("stackd.owner".to_string(), "alice".to_string());
        let service = ServiceRecord {
            id: "s1".into(),
            name: "web".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
            image: "nginx:latest".into(),
            labels,
            ports: vec![PortRecord { target_port: 80 }],
        };

        assert_eq!(service.label("stackd.owner"), Some("alice"));
        assert_eq!(service.label("missing"), None);
    }
}
