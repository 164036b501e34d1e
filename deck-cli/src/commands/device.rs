//! Show the device identity.

use anyhow::Result;
use std::path::Path;

use crate::config::DeviceConfig;

/// Run the device command.
pub async fn run(data_dir: &Path) -> Result<DeviceConfig> {
    let device = DeviceConfig::load_or_create(data_dir).await?;

    println!("Device:");
    println!("  ID:       {}", device.device_id);
    println!("  Created:  {}", device.created_at);
    println!("  Data dir: {}", data_dir.display());

    Ok(device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn device_is_stable_across_runs() {
        let dir = tempdir().unwrap();

        let first = run(dir.path()).await.unwrap();
        let second = run(dir.path()).await.unwrap();

        assert_eq!(first.device_id, second.device_id);
    }
}
