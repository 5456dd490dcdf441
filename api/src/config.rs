//! Global configuration pass-through
//!
//! Admin-gated access to an opaque configuration document. The core never
//! reads this; it exists for operators tuning the deployment.

use async_trait::async_trait;
use serde_json::Value;
use stackd_common::{Error, Principal, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration document persistence
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_config(&self) -> Result<Value>;
    async fn update_config(&self, config: Value) -> Result<Value>;
}

/// JSON-file backed config store; a missing file reads as `{}`
pub struct JsonFileConfigStore {
    path: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigStore for JsonFileConfigStore {
    async fn get_config(&self) -> Result<Value> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| Error::InvalidOperation(format!("corrupt config file: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Value::Object(Default::default())),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_config(&self, config: Value) -> Result<Value> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = serde_json::to_string_pretty(&config)
            .map_err(|e| Error::InvalidOperation(format!("unserializable config: {}", e)))?;
        tokio::fs::write(&self.path, text).await?;
        Ok(config)
    }
}

/// Admin gate in front of the store
pub struct ConfigService {
    store: Arc<dyn ConfigStore>,
}

impl ConfigService {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    pub async fn get_config(&self, actor: &Principal) -> Result<Value> {
        self.require_admin(actor)?;
        self.store.get_config().await
    }

    pub async fn update_config(&self, actor: &Principal, config: Value) -> Result<Value> {
        self.require_admin(actor)?;
        tracing::info!(user = %actor.name, "configuration updated");
        self.store.update_config(config).await
    }

    fn require_admin(&self, actor: &Principal) -> Result<()> {
        if !actor.is_admin() {
            return Err(Error::forbidden(&actor.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stackd_common::Role;

    fn service(dir: &tempfile::TempDir) -> ConfigService {
        ConfigService::new(Arc::new(JsonFileConfigStore::new(
            dir.path().join("config.json"),
        )))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let admin = Principal::new("root", Role::Admin);

        assert_eq!(svc.get_config(&admin).await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn update_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let admin = Principal::new("root", Role::Admin);

        svc.update_config(&admin, json!({ "banner": "hello" })).await.unwrap();
        assert_eq!(
            svc.get_config(&admin).await.unwrap(),
            json!({ "banner": "hello" })
        );
    }

    #[tokio::test]
    async fn non_admins_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let tenant = Principal::new("alice", Role::User);

        assert!(matches!(
            svc.get_config(&tenant).await.unwrap_err(),
            Error::Forbidden { .. }
        ));
        assert!(matches!(
            svc.update_config(&tenant, json!({})).await.unwrap_err(),
            Error::Forbidden { .. }
        ));
    }
}
