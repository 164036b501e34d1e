//! Configuration management for the swipedeck CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use swipedeck_client::ClientConfig;
use swipedeck_types::DeviceId;

const DEVICE_FILE: &str = "device.json";

/// Device identity stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Identifier sent as `X-Device-ID`.
    pub device_id: DeviceId,
    /// When the identity was generated (Unix seconds).
    pub created_at: u64,
}

impl DeviceConfig {
    /// Generate a fresh identity.
    pub fn new() -> Self {
        Self {
            device_id: DeviceId::generate(),
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Load device identity from a directory.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(DEVICE_FILE);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).context("Invalid device configuration")
    }

    /// Save device identity to a directory.
    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(DEVICE_FILE);
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&path, contents)
            .await
            .context("Failed to save device configuration")?;
        set_file_permissions_0600(&path).await?;
        Ok(())
    }

    /// Check if an identity was saved.
    pub async fn exists(data_dir: &Path) -> bool {
        tokio::fs::try_exists(data_dir.join(DEVICE_FILE))
            .await
            .unwrap_or(false)
    }

    /// Load the saved identity, generating and saving one on first use.
    pub async fn load_or_create(data_dir: &Path) -> Result<Self> {
        if Self::exists(data_dir).await {
            return Self::load(data_dir).await;
        }
        let config = Self::new();
        config.save(data_dir).await?;
        tracing::info!(device = %config.device_id, "Generated device identity");
        Ok(config)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the client configuration, applying a `--base-url` override.
pub fn load_client_config(path: Option<&Path>, base_url: Option<&str>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = base_url {
        config.base_url = base_url.to_string();
    }
    Ok(config)
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
async fn set_file_permissions_0600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .context("Failed to set file permissions")?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}
