//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/costtree/costtree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `COSTTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Category, IdStyle};

/// Unified configuration for costtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Currency symbol printed in front of amounts
    pub currency: String,
    /// How new node ids are generated
    pub id_style: IdStyle,
    /// Description given to the root of a new document
    pub root_description: String,
    /// Category of newly added cost lines
    pub default_category: Category,
    /// Redraw the tree and summary after every edit
    pub render_after_edit: bool,
    /// Prompt shown by the interactive session
    pub prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "$".into(),
            id_style: IdStyle::Sequential,
            root_description: "Total project / process cost".into(),
            default_category: Category::General,
            render_after_edit: true,
            prompt: "costtree>".into(),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub currency: Option<String>,
    pub id_style: Option<IdStyle>,
    pub root_description: Option<String>,
    pub default_category: Option<Category>,
    pub render_after_edit: Option<bool>,
    pub prompt: Option<String>,
}

/// Get the XDG config directory for costtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "costtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("costtree.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path given on the command line.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): specified fields win.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            currency: overlay
                .currency
                .clone()
                .unwrap_or_else(|| self.currency.clone()),
            id_style: overlay.id_style.unwrap_or(self.id_style),
            root_description: overlay
                .root_description
                .clone()
                .unwrap_or_else(|| self.root_description.clone()),
            default_category: overlay.default_category.unwrap_or(self.default_category),
            render_after_edit: overlay.render_after_edit.unwrap_or(self.render_after_edit),
            prompt: overlay.prompt.clone().unwrap_or_else(|| self.prompt.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file (`--config`); must exist when given
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/costtree/costtree.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `COSTTREE_*` prefix
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(config_file, None)
    }

    /// Like [`Settings::load`], reading `COSTTREE_*` overrides from `env`
    /// instead of the process environment when a map is given.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let path = expand_path(path);
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current, env)
    }

    /// Apply COSTTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COSTTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("currency") {
            settings.currency = val;
        }
        if let Ok(val) = config.get_string("id_style") {
            settings.id_style = val.parse()?;
        }
        if let Ok(val) = config.get_string("root_description") {
            settings.root_description = val;
        }
        if let Ok(val) = config.get_string("default_category") {
            settings.default_category = val.parse()?;
        }
        if let Ok(val) = config.get_bool("render_after_edit") {
            settings.render_after_edit = val;
        }
        if let Ok(val) = config.get_string("prompt") {
            settings.prompt = val;
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
        r#"# costtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/costtree/costtree.toml
#   Explicit: costtree --config <file>
#   Env:      COSTTREE_* environment variables (e.g. COSTTREE_CURRENCY=EUR)

# Currency symbol printed in front of amounts
# currency = "$"

# Node ids: "sequential" (1, 2, 3, ...) or "random" (9-character tokens)
# id_style = "sequential"

# Description of the root node of a new tree
# root_description = "Total project / process cost"

# Category of newly added cost lines:
# general, prevention, appraisal, internal-failure, external-failure
# default_category = "general"

# Redraw tree and financial summary after every edit
# render_after_edit = true

# Prompt of the interactive session
# prompt = "costtree>"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
