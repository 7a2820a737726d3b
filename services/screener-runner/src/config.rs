//! Layered configuration: YAML file, then `SCREENER__` environment overrides

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use screener_core::StrategyConfig;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "configs/strategy_config.yaml";

/// Environment prefix; `__` also separates nesting levels, e.g.
/// `SCREENER__RISK_MANAGEMENT__MAX_RECOMMENDATIONS=10`
pub const ENV_PREFIX: &str = "SCREENER";
pub const ENV_SEPARATOR: &str = "__";

/// Load and validate the strategy configuration from the process
/// environment and an optional file.
pub fn load(path: &Path) -> anyhow::Result<StrategyConfig> {
    load_with_env(path, None)
}

/// Same as [`load`] with an explicit environment map (tests)
pub fn load_with_env(
    path: &Path,
    env: Option<HashMap<String, String>>,
) -> anyhow::Result<StrategyConfig> {
    if path.exists() {
        info!("Loading strategy config from {}", path.display());
    } else {
        warn!("Config file {} not found, using defaults", path.display());
    }

    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Yaml).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        )
        .build()
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    let config: StrategyConfig = settings
        .try_deserialize()
        .context("Failed to parse strategy config")?;

    config.validate().context("Invalid strategy config")?;
    Ok(config)
}

/// Effective configuration as YAML
pub fn to_yaml(config: &StrategyConfig) -> anyhow::Result<String> {
    serde_yaml::to_string(config).context("Failed to render config")
}
