//! Structured HTTP transport
//!
//! Talks to the orchestration daemon's REST endpoint, the same surface the
//! CLI wraps. Listings arrive as the engine's own JSON shapes and are
//! mapped into the typed records.

use crate::api::EngineApi;
use crate::error::EngineError;
use crate::filter::{NodeFilter, ServiceFilter, TaskFilter};
use crate::record::{NodeRecord, PortRecord, ServiceRecord, TaskRecord};
use crate::EngineResult;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:2375";

/// REST transport to the orchestration daemon
pub struct HttpEngineApi {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpEngineApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        filters: serde_json::Value,
    ) -> EngineResult<Vec<T>> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self
            .client
            .get(&url)
            .query(&[("filters", filters.to_string())])
            .send()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))
    }
}

impl Default for HttpEngineApi {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl EngineApi for HttpEngineApi {
    async fn ping(&self) -> EngineResult<bool> {
        let url = format!("{}/_ping", self.endpoint);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::debug!("engine ping failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn list_services(&self, filter: &ServiceFilter) -> EngineResult<Vec<ServiceRecord>> {
        let labels: Vec<String> = filter
            .labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let wires: Vec<WireService> = self
            .list("/services", serde_json::json!({ "label": labels }))
            .await?;
        Ok(wires.into_iter().map(ServiceRecord::from).collect())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> EngineResult<Vec<TaskRecord>> {
        let wires: Vec<WireTask> = self
            .list("/tasks", serde_json::json!({ "service": filter.service_ids }))
            .await?;
        Ok(wires.into_iter().map(TaskRecord::from).collect())
    }

    async fn list_nodes(&self, filter: &NodeFilter) -> EngineResult<Vec<NodeRecord>> {
        let wires: Vec<WireNode> = self
            .list("/nodes", serde_json::json!({ "id": filter.ids }))
            .await?;
        Ok(wires.into_iter().map(NodeRecord::from).collect())
    }
}

// Engine wire shapes, narrowed to the fields the records carry.

#[derive(Debug, Deserialize)]
struct WireService {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "CreatedAt", default)]
    created_at: String,
    #[serde(rename = "Spec", default)]
    spec: WireServiceSpec,
    #[serde(rename = "Endpoint", default)]
    endpoint: WireEndpoint,
}

#[derive(Debug, Default, Deserialize)]
struct WireServiceSpec {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Labels", default)]
    labels: BTreeMap<String, String>,
    #[serde(rename = "TaskTemplate", default)]
    task_template: WireTaskTemplate,
}

#[derive(Debug, Default, Deserialize)]
struct WireTaskTemplate {
    #[serde(rename = "ContainerSpec", default)]
    container_spec: WireContainerSpec,
}

#[derive(Debug, Default, Deserialize)]
struct WireContainerSpec {
    #[serde(rename = "Image", default)]
    image: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireEndpoint {
    #[serde(rename = "Ports", default)]
    ports: Vec<WirePort>,
}

#[derive(Debug, Deserialize)]
struct WirePort {
    #[serde(rename = "TargetPort")]
    target_port: u16,
}

impl From<WireService> for ServiceRecord {
    fn from(wire: WireService) -> Self {
        Self {
            id: wire.id,
            name: wire.spec.name,
            created_at: wire.created_at,
            image: wire.spec.task_template.container_spec.image,
            labels: wire.spec.labels,
            ports: wire
                .endpoint
                .ports
                .into_iter()
                .map(|p| PortRecord {
                    target_port: p.target_port,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireTask {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "ServiceID")]
    service_id: String,
    #[serde(rename = "NodeID", default)]
    node_id: Option<String>,
    #[serde(rename = "Status", default)]
    status: WireTaskStatus,
    #[serde(rename = "CreatedAt", default)]
    created_at: String,
}

#[derive(Debug, Default, Deserialize)]
struct WireTaskStatus {
    #[serde(rename = "State", default)]
    state: String,
}

impl From<WireTask> for TaskRecord {
    fn from(wire: WireTask) -> Self {
        Self {
            id: wire.id,
            service_id: wire.service_id,
            node_id: wire.node_id,
            state: wire.status.state,
            created_at: wire.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireNode {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Status", default)]
    status: WireNodeStatus,
}

#[derive(Debug, Default, Deserialize)]
struct WireNodeStatus {
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Addr", default)]
    addr: String,
}

impl From<WireNode> for NodeRecord {
    fn from(wire: WireNode) -> Self {
        Self {
            id: wire.id,
            state: wire.status.state,
            addr: wire.status.addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_wire_shape_maps_to_record() {
        let raw = r#"{
            "ID": "svc-1",
            "CreatedAt": "2026-01-01T00:00:00Z",
            "Spec": {
                "Name": "web_nginx",
                "Labels": {
                    "com.docker.stack.namespace": "web",
                    "stackd.owner": "alice"
                },
                "TaskTemplate": { "ContainerSpec": { "Image": "nginx:latest" } }
            },
            "Endpoint": { "Ports": [ { "TargetPort": 80 } ] }
        }"#;
        let wire: WireService = serde_json::from_str(raw).unwrap();
        let record = ServiceRecord::from(wire);

        assert_eq!(record.id, "svc-1");
        assert_eq!(record.image, "nginx:latest");
        assert_eq!(record.label("stackd.owner"), Some("alice"));
        assert_eq!(record.ports, vec![PortRecord { target_port: 80 }]);
    }

    #[test]
    fn task_without_node_assignment() {
        let raw = r#"{ "ID": "t1", "ServiceID": "svc-1", "Status": { "State": "pending" } }"#;
        let wire: WireTask = serde_json::from_str(raw).unwrap();
        let record = TaskRecord::from(wire);

        assert_eq!(record.state, "pending");
        assert!(record.node_id.is_none());
    }

    #[test]
    fn node_wire_shape_maps_to_record() {
        let raw = r#"{ "ID": "n1", "Status": { "State": "ready", "Addr": "10.0.0.1" } }"#;
        let wire: WireNode = serde_json::from_str(raw).unwrap();
        let record = NodeRecord::from(wire);

        assert_eq!(record.state, "ready");
        assert_eq!(record.addr, "10.0.0.1");
    }
}
