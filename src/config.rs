//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/lineage/lineage.toml`
//! 3. Local config: file passed with `--config`
//! 4. Environment variables: `LINEAGE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::builder::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use crate::domain::{BuildOptions, DEFAULT_TREE_NAME, VIRTUAL_ROOT_ID};

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub members_file: Option<PathBuf>,
    pub default_tree_name: Option<String>,
    pub virtual_root_id: Option<String>,
    pub max_depth: Option<usize>,
}

/// Unified configuration for lineage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON file with member records (default: none, must be given on the command line)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members_file: Option<PathBuf>,
    /// Label for members without a tree name
    pub default_tree_name: String,
    /// Id carried by synthesized roots
    pub virtual_root_id: String,
    /// Longest allowed mentor chain, at most 1024; 0 selects the limit
    pub max_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            members_file: None,
            default_tree_name: DEFAULT_TREE_NAME.to_string(),
            virtual_root_id: VIRTUAL_ROOT_ID.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Get the XDG config directory for lineage.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lineage").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("lineage.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Options handed to the forest builder.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            default_tree_name: self.default_tree_name.clone(),
            virtual_root_id: self.virtual_root_id.clone(),
            max_depth: self.max_depth,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(path) = &self.members_file {
            let expanded = expand_env_vars(path.to_string_lossy().as_ref());
            self.members_file = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            members_file: overlay
                .members_file
                .clone()
                .or_else(|| self.members_file.clone()),
            default_tree_name: overlay
                .default_tree_name
                .clone()
                .unwrap_or_else(|| self.default_tree_name.clone()),
            virtual_root_id: overlay
                .virtual_root_id
                .clone()
                .unwrap_or_else(|| self.virtual_root_id.clone()),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Optional config file layered over the global one
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/lineage/lineage.toml`
    /// 3. Local config file
    /// 4. Environment variables: `LINEAGE_*` prefix
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // An explicitly requested file must exist
        if let Some(local_path) = local_config {
            let raw = load_raw_settings(local_path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply LINEAGE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("LINEAGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("members_file") {
            settings.members_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("default_tree_name") {
            settings.default_tree_name = val;
        }
        if let Ok(val) = config.get_string("virtual_root_id") {
            settings.virtual_root_id = val;
        }
        match config.get_int("max_depth") {
            Ok(val) => {
                settings.max_depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("LINEAGE_MAX_DEPTH must not be negative: {}", val),
                })?;
            }
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.default_tree_name.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "default_tree_name must not be empty".to_string(),
            });
        }
        if self.virtual_root_id.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "virtual_root_id must not be empty".to_string(),
            });
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ApplicationError::Config {
                message: format!(
                    "max_depth must not exceed {}: {}",
                    MAX_DEPTH_LIMIT, self.max_depth
                ),
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
        r#"# lineage configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/lineage/lineage.toml
#   Local:  file given with --config
#   Env:    LINEAGE_* environment variables (e.g. LINEAGE_MAX_DEPTH=64)

# JSON file with member records (~ and $VAR are expanded)
# members_file = "~/acm/lineage_members.json"

# Label for members without a tree name
# default_tree_name = "Unnamed Tree"

# Id carried by the synthesized root of a tree with several founders
# virtual_root_id = "virtual-root"

# Longest allowed mentor chain (at most 1024, 0 = 1024)
# max_depth = 1024
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
