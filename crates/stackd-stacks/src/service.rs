//! Tenant-scoped stack service

use crate::compose::ComposeFile;
use crate::model::{ServiceView, Stack, TaskView};
use crate::{CLASS_LABEL, OWNER_LABEL};
use stackd_common::{Error, Principal, Result};
use stackd_engine::{
    CliStackRecord, CliTransport, EngineApi, NodeFilter, ServiceFilter, TaskFilter,
    NAMESPACE_LABEL,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Fixed service configuration
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// Per-tenant stack ceiling. The admission condition is
    /// `current count <= max`, so `max + 1` live stacks are admitted
    /// before blocking. Fixed contract; do not tighten without a policy
    /// change.
    pub max_stacks_per_tenant: usize,
    /// Value of the service-class label marking managed workloads
    pub tenant_tag: String,
    /// Placement constraints appended to every deployed service
    pub placement_constraints: Vec<String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            max_stacks_per_tenant: 2,
            tenant_tag: "stackd".to_string(),
            placement_constraints: Vec::new(),
        }
    }
}

/// Quota-aware multi-tenancy layer above the engine adapter
pub struct StackService {
    api: Arc<dyn EngineApi>,
    cli: Arc<dyn CliTransport>,
    config: StackConfig,
}

impl StackService {
    pub fn new(api: Arc<dyn EngineApi>, cli: Arc<dyn CliTransport>, config: StackConfig) -> Self {
        Self { api, cli, config }
    }

    /// True only when both transports independently report healthy.
    ///
    /// Either transport can be partially initialized while the other still
    /// answers, so neither is trusted alone.
    pub async fn ping(&self) -> bool {
        let api_ok = match self.api.ping().await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!("structured transport unhealthy: {}", e);
                false
            }
        };
        let cli_ok = match self.cli.ping().await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::warn!("command-line transport unhealthy: {}", e);
                false
            }
        };
        api_ok && cli_ok
    }

    /// Deploy a raw spec submitted by an admin.
    ///
    /// Raw submission is admin-only: a tenant-crafted service graph could
    /// otherwise bypass label injection.
    pub async fn create_from_template_data(
        &self,
        actor: &Principal,
        spec_text: &str,
        name: Option<&str>,
    ) -> Result<String> {
        if !actor.is_admin() {
            return Err(Error::forbidden(&actor.name));
        }
        self.deploy_labeled(actor, spec_text, name).await
    }

    /// Deploy from a template path already resolved by the template gate.
    pub async fn create_from_template_path(
        &self,
        actor: &Principal,
        template_path: &Path,
        name: Option<&str>,
    ) -> Result<String> {
        if !actor.is_admin() {
            let count = self.list_stacks(actor, None).await?.len();
            if count > self.config.max_stacks_per_tenant {
                return Err(Error::QuotaExceeded {
                    user: actor.name.clone(),
                    limit: self.config.max_stacks_per_tenant,
                });
            }
        }

        let spec_text = tokio::fs::read_to_string(template_path).await?;
        self.deploy_labeled(actor, &spec_text, name).await
    }

    /// List the actor's stacks, grouped by namespace label.
    pub async fn list_stacks(&self, actor: &Principal, name: Option<&str>) -> Result<Vec<Stack>> {
        let services = self.list_services(actor, name).await?;

        let mut stacks: Vec<Stack> = Vec::new();
        for service in services {
            let Some(namespace) = service.label(NAMESPACE_LABEL).map(str::to_string) else {
                continue;
            };
            match stacks.iter_mut().find(|s| s.name == namespace) {
                Some(stack) => stack.services.push(service),
                None => stacks.push(Stack {
                    name: namespace,
                    services: vec![service],
                }),
            }
        }
        Ok(stacks)
    }

    /// List the actor's services with tasks and nodes folded in.
    ///
    /// Three-tier enrichment join: services, then their tasks, then the
    /// nodes those tasks reference. An empty tier short-circuits the rest.
    pub async fn list_services(
        &self,
        actor: &Principal,
        name: Option<&str>,
    ) -> Result<Vec<ServiceView>> {
        let mut filter = ServiceFilter::new().with_label(CLASS_LABEL, &self.config.tenant_tag);
        if !actor.is_admin() {
            filter = filter.with_label(OWNER_LABEL, &actor.name);
        }
        if let Some(name) = name {
            filter = filter.with_label(NAMESPACE_LABEL, name);
        }

        let services = self.api.list_services(&filter).await?;
        if services.is_empty() {
            return Ok(Vec::new());
        }

        let task_filter =
            TaskFilter::for_services(services.iter().map(|s| s.id.clone()).collect());
        let tasks = self.api.list_tasks(&task_filter).await?;

        let nodes = if tasks.is_empty() {
            Vec::new()
        } else {
            let node_ids: BTreeSet<String> =
                tasks.iter().filter_map(|t| t.node_id.clone()).collect();
            if node_ids.is_empty() {
                Vec::new()
            } else {
                self.api
                    .list_nodes(&NodeFilter::for_ids(node_ids.into_iter().collect()))
                    .await?
            }
        };

        let views = services
            .into_iter()
            .map(|record| {
                let tasks = tasks
                    .iter()
                    .filter(|t| t.service_id == record.id)
                    .map(|t| TaskView {
                        record: t.clone(),
                        node: t.node_id.as_ref().and_then(|id| {
                            nodes.iter().find(|n| &n.id == id).cloned()
                        }),
                    })
                    .collect();
                ServiceView { record, tasks }
            })
            .collect();
        Ok(views)
    }

    /// The named stack as the actor sees it, if any.
    pub async fn get_stack_by_name(&self, actor: &Principal, name: &str) -> Result<Option<Stack>> {
        Ok(self.list_stacks(actor, Some(name)).await?.into_iter().next())
    }

    /// Remove the named stack.
    ///
    /// Ownership is re-validated here independently of the listing filter:
    /// the caller must own at least one service in the stack (or be admin)
    /// or this returns `false` without touching the engine.
    pub async fn remove_stack_by_name(&self, actor: &Principal, name: &str) -> Result<bool> {
        let Some(stack) = self.get_stack_by_name(actor, name).await? else {
            return Ok(false);
        };

        let owned = stack.services.iter().any(|service| {
            service.label(NAMESPACE_LABEL) == Some(name)
                && (actor.is_admin() || service.label(OWNER_LABEL) == Some(actor.name.as_str()))
        });
        if !owned {
            return Ok(false);
        }

        self.cli.remove(name).await?;
        tracing::info!(stack = %name, user = %actor.name, "stack removed");
        Ok(true)
    }

    /// Engine-level stack listing, unscoped by tenant labels (admin only).
    pub async fn list_engine_stacks(&self, actor: &Principal) -> Result<Vec<CliStackRecord>> {
        if !actor.is_admin() {
            return Err(Error::forbidden(&actor.name));
        }
        Ok(self.cli.list_stacks().await?)
    }

    /// Reclaim unused engine resources (admin only).
    pub async fn prune(&self, actor: &Principal) -> Result<()> {
        if !actor.is_admin() {
            return Err(Error::forbidden(&actor.name));
        }
        self.cli.prune().await?;
        tracing::info!(user = %actor.name, "engine resources pruned");
        Ok(())
    }

    async fn deploy_labeled(
        &self,
        actor: &Principal,
        spec_text: &str,
        name: Option<&str>,
    ) -> Result<String> {
        let mut doc = ComposeFile::parse(spec_text)?;
        doc.inject_tenant_labels(
            &[
                (OWNER_LABEL, actor.name.as_str()),
                (CLASS_LABEL, self.config.tenant_tag.as_str()),
            ],
            &self.config.placement_constraints,
        );

        let temp = tempfile::NamedTempFile::new()?;
        tokio::fs::write(temp.path(), doc.to_yaml()?).await?;

        let deployed = self.cli.deploy(temp.path(), name).await?;
        tracing::info!(stack = %deployed, user = %actor.name, "stack deployed");
        Ok(deployed)
    }
}
