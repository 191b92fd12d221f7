//! One [`StakeholderStore`] per project per process.
//!
//! The registry is built once at startup and handed to whatever serves
//! requests (the CLI, the MCP server). Stores are created lazily on first use
//! and reused for the life of the registry, so every caller in the process
//! sees the same in-memory view of a project.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::store::StakeholderStore;

/// Turn a caller-supplied project identifier into a directory-safe slug
/// (e.g. "Acme Web App" -> "acme-web-app").
pub fn project_slug(project: &str) -> String {
    project
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

#[derive(Clone)]
enum Location {
    Disk(StoreConfig),
    Memory,
}

#[derive(Clone)]
pub struct StakeholderRegistry {
    location: Location,
    stores: Arc<Mutex<HashMap<String, StakeholderStore>>>,
}

impl StakeholderRegistry {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_location(Location::Disk(config))
    }

    /// Registry whose stores never touch the disk.
    pub fn in_memory() -> Self {
        Self::with_location(Location::Memory)
    }

    fn with_location(location: Location) -> Self {
        Self {
            location,
            stores: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The store for `project`, creating it (and its directory) on first use.
    /// Identifiers that slugify to the same value share a store.
    pub async fn store(&self, project: &str) -> Result<StakeholderStore> {
        let slug = project_slug(project);
        if slug.is_empty() {
            return Err(StoreError::InvalidProject(project.to_string()));
        }

        let mut stores = self.stores.lock().await;
        if let Some(store) = stores.get(&slug) {
            return Ok(store.clone());
        }

        let store = match &self.location {
            Location::Disk(config) => {
                let dir = config.project_dir(&slug);
                tokio::fs::create_dir_all(&dir).await?;
                tracing::debug!(project = %slug, dir = %dir.display(), "Opened stakeholder store");
                StakeholderStore::open(dir)
            }
            Location::Memory => StakeholderStore::open_memory(),
        };

        stores.insert(slug, store.clone());
        Ok(store)
    }

    /// Slugs of the projects opened so far, sorted.
    pub async fn open_projects(&self) -> Vec<String> {
        let mut slugs: Vec<String> = self.stores.lock().await.keys().cloned().collect();
        slugs.sort();
        slugs
    }
}
