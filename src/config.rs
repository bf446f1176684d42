//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treestore/treestore.toml`
//! 3. Environment variables: `TREESTORE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{LevelPolicy, StoreOptions};

/// Unified configuration for treestore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Items file used when no `--file` is given
    pub items_file: Option<PathBuf>,
    /// Descendant level handling on reparent
    pub level_policy: LevelPolicy,
    /// Annotate tree output with levels
    pub show_levels: bool,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub items_file: Option<PathBuf>,
    pub level_policy: Option<LevelPolicy>,
    pub show_levels: Option<bool>,
}

/// Get the XDG config directory for treestore.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treestore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treestore.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path; unexpandable input is kept as is.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            level_policy: self.level_policy,
        }
    }

    fn expand_paths(&mut self) {
        if let Some(file) = &self.items_file {
            self.items_file = Some(expand_path(file));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            items_file: overlay
                .items_file
                .clone()
                .or_else(|| self.items_file.clone()),
            level_policy: overlay.level_policy.unwrap_or(self.level_policy),
            show_levels: overlay.show_levels.unwrap_or(self.show_levels),
        }
    }

    /// Load settings from the XDG location plus `TREESTORE_*` overrides.
    pub fn load() -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load settings with an explicit global config path.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load_from(global_path: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = global_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply TREESTORE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREESTORE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("items_file") {
            settings.items_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("level_policy") {
            settings.level_policy = parse_level_policy(&val)?;
        }
        if let Ok(val) = config.get_bool("show_levels") {
            settings.show_levels = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treestore configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treestore/treestore.toml
#   Env:    TREESTORE_* environment variables (explicit overrides)

# Items file used when --file is not given
# items_file = "~/rows.toml"

# Descendant levels on reparent: "preserve" keeps them, "cascade" recomputes them
# level_policy = "preserve"

# Annotate tree output with row levels
# show_levels = false
"#
        .to_string()
    }
}

fn parse_level_policy(value: &str) -> Result<LevelPolicy, ApplicationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "preserve" => Ok(LevelPolicy::Preserve),
        "cascade" => Ok(LevelPolicy::Cascade),
        other => Err(ApplicationError::Config {
            message: format!("invalid level_policy: {other} (expected preserve or cascade)"),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
