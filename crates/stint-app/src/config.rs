use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

/// Flat key/value configuration. Defaults are applied first, then the config
/// file (if any) overlays them.
#[derive(Debug, Clone)]
pub struct Config {
    map: HashMap<String, String>,
    pub loaded_file: Option<PathBuf>,
}

impl Config {
    #[tracing::instrument(skip(config_override))]
    pub fn load(config_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = Config {
            map: HashMap::new(),
            loaded_file: None,
        };

        cfg.map
            .insert("data.location".to_string(), "~/.stint".to_string());

        if let Some(path) = resolve_config_path(config_override) {
            if path.exists() {
                info!(config = %path.display(), "loading config");
                cfg.load_file(&path)?;
            } else {
                debug!(config = %path.display(), "no config file; using defaults");
            }
        }

        Ok(cfg)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    #[tracing::instrument(skip(self))]
    fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        let table: toml::Table = text
            .parse()
            .with_context(|| format!("failed parsing {}", path.display()))?;
        flatten_table("", &table, &mut self.map);
        self.loaded_file = Some(path.to_path_buf());
        Ok(())
    }
}

fn flatten_table(prefix: &str, table: &toml::Table, map: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten_table(&full, nested, map),
            toml::Value::String(text) => {
                debug!(key = %full, value = %text, "config entry");
                map.insert(full, text.clone());
            }
            other => {
                debug!(key = %full, value = %other, "config entry");
                map.insert(full, other.to_string());
            }
        }
    }
}

fn resolve_config_path(config_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = config_override {
        return Some(expand_tilde(path));
    }
    if let Ok(env) = std::env::var("STINT_CONFIG")
        && !env.is_empty()
    {
        return Some(expand_tilde(Path::new(&env)));
    }
    dirs::config_dir().map(|dir| dir.join("stint").join("stint.toml"))
}

pub fn resolve_data_dir(cfg: &Config, cli_override: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = cli_override {
        return Ok(expand_tilde(dir));
    }
    let location = cfg
        .get("data.location")
        .unwrap_or_else(|| "~/.stint".to_string());
    Ok(expand_tilde(Path::new(&location)))
}

fn expand_tilde(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    if text == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
