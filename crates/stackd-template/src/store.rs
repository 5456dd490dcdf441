//! Template store
//!
//! Templates are keyed by name; the filesystem implementation keeps each
//! one as `<name>.yml` under a configured directory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stackd_common::{Error, Result};
use std::path::PathBuf;

/// A named orchestration template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackTemplate {
    pub name: String,
    pub data: String,
}

/// Template persistence
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Path of the stored template, if present
    async fn find_path_by_name(&self, name: &str) -> Result<Option<PathBuf>>;
    /// Raw template text, if present
    async fn read_by_name(&self, name: &str) -> Result<Option<String>>;
    /// Name + data record, if present
    async fn get_by_name(&self, name: &str) -> Result<Option<StackTemplate>>;
    /// Create a new template; `Conflict` when the name is taken
    async fn create(&self, name: &str, data: &str) -> Result<StackTemplate>;
    /// Overwrite an existing template; `NotFound` when absent
    async fn update(&self, name: &str, data: &str) -> Result<StackTemplate>;
    /// Delete a template; false when it was absent
    async fn delete(&self, name: &str) -> Result<bool>;
    /// All stored templates
    async fn list_all(&self) -> Result<Vec<StackTemplate>>;
}

const TEMPLATE_EXT: &str = "yml";

/// Directory-backed template store
pub struct FsTemplateStore {
    dir: PathBuf,
}

impl FsTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, TEMPLATE_EXT))
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn find_path_by_name(&self, name: &str) -> Result<Option<PathBuf>> {
        let path = self.path_for(name);
        Ok(tokio::fs::try_exists(&path).await?.then_some(path))
    }

    async fn read_by_name(&self, name: &str) -> Result<Option<String>> {
        match self.find_path_by_name(name).await? {
            Some(path) => Ok(Some(tokio::fs::read_to_string(path).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<StackTemplate>> {
        Ok(self.read_by_name(name).await?.map(|data| StackTemplate {
            name: name.to_string(),
            data,
        }))
    }

    async fn create(&self, name: &str, data: &str) -> Result<StackTemplate> {
        if self.find_path_by_name(name).await?.is_some() {
            return Err(Error::Conflict(name.to_string()));
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(name), data).await?;
        Ok(StackTemplate {
            name: name.to_string(),
            data: data.to_string(),
        })
    }

    async fn update(&self, name: &str, data: &str) -> Result<StackTemplate> {
        let path = self
            .find_path_by_name(name)
            .await?
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        tokio::fs::write(path, data).await?;
        Ok(StackTemplate {
            name: name.to_string(),
            data: data.to_string(),
        })
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        match self.find_path_by_name(name).await? {
            Some(path) => {
                tokio::fs::remove_file(path).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<StackTemplate>> {
        let mut templates = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(templates),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXT) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                let data = tokio::fs::read_to_string(&path).await?;
                templates.push(StackTemplate {
                    name: name.to_string(),
                    data,
                });
            }
        }
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsTemplateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsTemplateStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn create_then_read() {
        let (_dir, store) = store();
        store.create("web", "services: {}").await.unwrap();

        assert_eq!(store.read_by_name("web").await.unwrap().unwrap(), "services: {}");
        assert!(store.find_path_by_name("web").await.unwrap().is_some());
        assert!(store.get_by_name("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_twice_conflicts() {
        let (_dir, store) = store();
        store.create("web", "a: 1").await.unwrap();
        let err = store.create("web", "a: 2").await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let (_dir, store) = store();
        let err = store.update("ghost", "a: 1").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_reports_absence() {
        let (_dir, store) = store();
        store.create("web", "a: 1").await.unwrap();

        assert!(store.delete("web").await.unwrap());
        assert!(!store.delete("web").await.unwrap());
    }

    #[tokio::test]
    async fn list_all_is_sorted_by_name() {
        let (_dir, store) = store();
        store.create("zeta", "z: 1").await.unwrap();
        store.create("alpha", "a: 1").await.unwrap();

        let names: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }
}
