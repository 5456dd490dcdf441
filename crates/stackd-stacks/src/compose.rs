//! Compose document model
//!
//! A typed tree over the orchestration spec: only the sections the label
//! injector touches are modeled, everything else rides along in flattened
//! maps and survives the round trip untouched.

use serde::{Deserialize, Serialize};
use stackd_common::{Error, Result};
use std::collections::BTreeMap;

/// Top-level compose document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, ComposeService>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, serde_yaml::Value>,
}

/// One declared service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeService {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeploySection>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, serde_yaml::Value>,
}

/// The `deploy` section of a service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploySection {
    /// Deployment labels, mapping form only. The compose list form
    /// (`- key=value`) is rejected at parse time.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, serde_yaml::Value>,
}

/// Placement constraints of a service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, serde_yaml::Value>,
}

impl ComposeFile {
    /// Parse a compose document
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| Error::InvalidOperation(format!("invalid compose document: {}", e)))
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::InvalidOperation(format!("compose serialization failed: {}", e)))
    }

    /// Inject ownership labels (and optional placement constraints) into
    /// every declared service, default-constructing missing sections.
    pub fn inject_tenant_labels(
        &mut self,
        labels: &[(&str, &str)],
        constraints: &[String],
    ) {
        for service in self.services.values_mut() {
            let deploy = service.deploy.get_or_insert_with(DeploySection::default);
            for (key, value) in labels {
                deploy.labels.insert((*key).to_string(), (*value).to_string());
            }
            if !constraints.is_empty() {
                deploy
                    .placement
                    .get_or_insert_with(Placement::default)
                    .constraints
                    .extend(constraints.iter().cloned());
            }
        }
    }
}
