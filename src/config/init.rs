use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::{get_config_path, Config};

const HEADER: &str = "\
# intro-scorer configuration
#
# Every section is optional; omitted sections use the built-in tables.
# Rule weights are fixed (salutation 5, keywords 30, flow 5, grammar 10,
# vocabulary 10, fillers 15, sentiment 15); points here must stay within them.
";

/// Write the fully-resolved default configuration to `path` (or the default
/// config path), creating parent directories as needed.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }
    }

    let yaml = serde_saphyr::to_string(&Config::default().resolved())
        .context("Failed to serialize default config")?;

    fs::write(&config_path, format!("{}\n{}", HEADER, yaml))
        .with_context(|| format!("Failed to write config file at {}", config_path.display()))?;

    Ok(config_path)
}
