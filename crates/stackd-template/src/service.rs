//! Template authorization gate

use crate::store::{StackTemplate, TemplateStore};
use stackd_common::{Error, Principal, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Thin gate in front of the template store: reads pass through, mutations
/// require the admin role.
pub struct TemplateService {
    store: Arc<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self { store }
    }

    pub async fn get_template_path_by_name(&self, name: &str) -> Result<Option<PathBuf>> {
        self.store.find_path_by_name(name).await
    }

    pub async fn get_template_data_by_name(&self, name: &str) -> Result<Option<String>> {
        self.store.read_by_name(name).await
    }

    pub async fn get_template_by_name(&self, name: &str) -> Result<Option<StackTemplate>> {
        self.store.get_by_name(name).await
    }

    pub async fn get_templates(&self) -> Result<Vec<StackTemplate>> {
        self.store.list_all().await
    }

    pub async fn create_template(
        &self,
        actor: &Principal,
        name: &str,
        data: &str,
    ) -> Result<StackTemplate> {
        self.require_admin(actor)?;
        let template = self.store.create(name, data).await?;
        tracing::info!(template = %name, user = %actor.name, "template created");
        Ok(template)
    }

    pub async fn update_template(
        &self,
        actor: &Principal,
        name: &str,
        data: &str,
    ) -> Result<StackTemplate> {
        self.require_admin(actor)?;
        let template = self.store.update(name, data).await?;
        tracing::info!(template = %name, user = %actor.name, "template updated");
        Ok(template)
    }

    pub async fn delete_template(&self, actor: &Principal, name: &str) -> Result<bool> {
        self.require_admin(actor)?;
        let deleted = self.store.delete(name).await?;
        tracing::info!(template = %name, user = %actor.name, deleted, "template delete");
        Ok(deleted)
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
    use crate::store::FsTemplateStore;
    use stackd_common::Role;

    fn service() -> (tempfile::TempDir, TemplateService) {
        let dir = tempfile::tempdir().unwrap();
        let service = TemplateService::new(Arc::new(FsTemplateStore::new(dir.path())));
        (dir, service)
    }

    #[tokio::test]
    async fn mutations_require_admin() {
        let (_dir, svc) = service();
        let tenant = Principal::new("alice", Role::User);

        assert!(matches!(
            svc.create_template(&tenant, "web", "a: 1").await.unwrap_err(),
            Error::Forbidden { .. }
        ));
        assert!(matches!(
            svc.update_template(&tenant, "web", "a: 1").await.unwrap_err(),
            Error::Forbidden { .. }
        ));
        assert!(matches!(
            svc.delete_template(&tenant, "web").await.unwrap_err(),
            Error::Forbidden { .. }
        ));
    }

    #[tokio::test]
    async fn reads_are_open_to_any_principal() {
        let (_dir, svc) = service();
        let admin = Principal::new("root", Role::Admin);
        svc.create_template(&admin, "web", "a: 1").await.unwrap();

        let template = svc.get_template_by_name("web").await.unwrap().unwrap();
        assert_eq!(template.data, "a: 1");
        assert_eq!(svc.get_templates().await.unwrap().len(), 1);
    }
}
