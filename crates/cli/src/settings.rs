use anyhow::{Context, Result};
use classmap_graph::ClassMapConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_FILE_NAME: &str = "classmap.toml";

/// Load settings from `explicit`, or from `classmap.toml` in `workdir` when present.
///
/// A missing explicit file is an error; a missing implicit file yields defaults.
pub(crate) fn load_config(explicit: Option<&Path>, workdir: &Path) -> Result<ClassMapConfig> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = workdir.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                return Ok(ClassMapConfig::default());
            }
            candidate
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = parse_config(&raw)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub(crate) fn parse_config(raw: &str) -> Result<ClassMapConfig> {
    let config: ClassMapConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}
