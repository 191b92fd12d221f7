//! Where stakeholder files live.
//!
//! Configuration is via environment variables:
//! - `STAKEHOLDERS_DATA_DIR` - Root data directory (default: the platform data
//!   directory, e.g. `~/.local/share/stakeholders` on Linux)

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "STAKEHOLDERS_DATA_DIR";

/// Subdirectory of the data directory holding one directory per project.
const PROJECTS_DIR: &str = "projects";

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load configuration from the environment, falling back to the platform
    /// data directory.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(dir));
        }
        Self::platform_default()
    }

    pub fn platform_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "stakeholders")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(Self::new(dirs.data_dir()))
    }

    /// Directory for a project slug. The slug must already be sanitised.
    pub fn project_dir(&self, slug: &str) -> PathBuf {
        self.data_dir.join(PROJECTS_DIR).join(slug)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
