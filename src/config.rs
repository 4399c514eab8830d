//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/calltree/calltree.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `CALLTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::IdStyle;

/// Unified configuration for calltree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// How new node ids are generated
    pub id_style: IdStyle,
    /// Prefix of sequential ids (`n` gives n1, n2, ...)
    pub id_prefix: String,
    /// Shown instead of an empty label
    pub placeholder: String,
    /// Print node ids next to labels
    pub show_ids: bool,
    /// Collapsed nodes show how many children they hide
    pub show_hidden_count: bool,
    /// Deepest tree level whose children are still printed
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id_style: IdStyle::Sequential,
            id_prefix: "n".into(),
            placeholder: "(empty)".into(),
            show_ids: true,
            show_hidden_count: true,
            max_depth: 200,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, keep base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub id_style: Option<IdStyle>,
    pub id_prefix: Option<String>,
    pub placeholder: Option<String>,
    pub show_ids: Option<bool>,
    pub show_hidden_count: Option<bool>,
    pub max_depth: Option<usize>,
}

/// Get the XDG config directory for calltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "calltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("calltree.toml"))
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
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            id_style: overlay.id_style.unwrap_or(self.id_style),
            id_prefix: overlay
                .id_prefix
                .clone()
                .unwrap_or_else(|| self.id_prefix.clone()),
            placeholder: overlay
                .placeholder
                .clone()
                .unwrap_or_else(|| self.placeholder.clone()),
            show_ids: overlay.show_ids.unwrap_or(self.show_ids),
            show_hidden_count: overlay.show_hidden_count.unwrap_or(self.show_hidden_count),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// `explicit` must exist when given; the global file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), explicit)
    }

    /// Load from the given global and explicit files, then apply `CALLTREE_*`
    /// environment overrides.
    pub fn load_layers(global: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("explicit config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        let current = Self::apply_env_overrides(current, Self::environment())?;
        current.validate()?;
        Ok(current)
    }

    fn environment() -> Environment {
        Environment::with_prefix("CALLTREE")
            .prefix_separator("_")
            .separator("__")
    }

    /// Apply CALLTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("id_style") {
            settings.id_style = val
                .parse::<IdStyle>()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get_string("id_prefix") {
            settings.id_prefix = val;
        }
        if let Ok(val) = config.get_string("placeholder") {
            settings.placeholder = val;
        }
        if let Ok(val) = config.get_bool("show_ids") {
            settings.show_ids = val;
        }
        if let Ok(val) = config.get_bool("show_hidden_count") {
            settings.show_hidden_count = val;
        }
        if let Ok(val) = config.get_int("max_depth") {
            settings.max_depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("max_depth must not be negative: {val}"),
            })?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.id_prefix.chars().any(char::is_whitespace) {
            return Err(ApplicationError::Config {
                message: format!("id_prefix must not contain whitespace: {:?}", self.id_prefix),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# calltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/calltree/calltree.toml
#   Explicit: calltree --config <FILE>
#   Env:      CALLTREE_* environment variables

# Node ids: "sequential" (n1, n2, ...) or "random" (uuid)
# id_style = "sequential"

# Prefix of sequential ids
# id_prefix = "n"

# Text shown for nodes without a label
# placeholder = "(empty)"

# Print node ids next to labels
# show_ids = true

# Collapsed nodes show how many children they hide
# show_hidden_count = true

# Deepest level whose children are printed; deeper nodes are summarized
# max_depth = 200
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
