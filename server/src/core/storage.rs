//! Application data directory management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::constants::{APP_DOT_FOLDER, ENV_DATA_DIR};

/// Subdirectories of the data directory
#[derive(Debug, Clone, Copy)]
pub enum DataSubdir {
    Sqlite,
}

impl DataSubdir {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
        }
    }
}

/// Resolved application storage paths
#[derive(Debug, Clone)]
pub struct AppStorage {
    data_dir: PathBuf,
}

impl AppStorage {
    /// Initialize storage, creating the data directory and subdirectories
    pub async fn init() -> Result<Self> {
        let data_dir = Self::resolve_data_dir();
        let storage = Self { data_dir };

        for subdir in [DataSubdir::Sqlite] {
            let path = storage.subdir(subdir);
            tokio::fs::create_dir_all(&path)
                .await
                .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        }

        tracing::debug!(path = %storage.data_dir.display(), "Storage initialized");
        Ok(storage)
    }

    /// Resolve the data directory: env override, else ~/.flightlens
    pub fn resolve_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR)
            && !dir.is_empty()
        {
            return PathBuf::from(dir);
        }

        dirs::home_dir()
            .map(|home| home.join(APP_DOT_FOLDER))
            .unwrap_or_else(|| PathBuf::from(APP_DOT_FOLDER))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn subdir(&self, subdir: DataSubdir) -> PathBuf {
        self.data_dir.join(subdir.as_str())
    }

    #[cfg(test)]
    pub fn init_for_test(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}
