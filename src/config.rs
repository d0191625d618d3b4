use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::workers::WorkerLimits;

/// Parallel-download settings loaded from `~/.config/sdm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Requested worker cap. Applied through `WorkerLimits::set_max_workers`,
    /// so out-of-range file values are clamped, never rejected.
    pub max_workers: usize,
    /// Whether the parallel download phase is enabled at all.
    pub enabled: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_workers: 1,
            enabled: false,
        }
    }
}

impl ParallelConfig {
    /// Push this config's worker cap into the shared limits.
    pub fn apply(&self, limits: &WorkerLimits) {
        limits.set_max_workers(self.max_workers);
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sdm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ParallelConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ParallelConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ParallelConfig = toml::from_str(&data)?;
    Ok(cfg)
}
