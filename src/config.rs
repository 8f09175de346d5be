//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dtree/dtree.toml`
//! 3. Project config: `<project_dir>/.dtree.toml`
//! 4. Environment variables: `DTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{DEFAULT_ARTIFACT_NAME, DEFAULT_MAX_DEPTH};
use crate::util::path::{expand_env_vars, resolve_against};

/// Default graph snapshot file name.
pub const DEFAULT_GRAPH_FILE: &str = "graph.toml";

/// Traversal guard settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TraversalConfig {
    /// Longest root-to-leaf path accepted before the export is aborted
    pub max_depth: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Raw traversal config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTraversalConfig {
    pub max_depth: Option<usize>,
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub graph_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub artifact_name: Option<String>,
    pub strict_edges: Option<bool>,
    #[serde(default)]
    pub traversal: RawTraversalConfig,
}

/// Unified configuration for dtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Graph snapshot, relative paths resolve against the project directory
    pub graph_file: PathBuf,
    /// Directory receiving exported artifacts
    pub output_dir: PathBuf,
    /// File name of the exported document
    pub artifact_name: String,
    /// Reject edges the resolver would ignore (third child, duplicates, taken roles)
    pub strict_edges: bool,
    pub traversal: TraversalConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graph_file: PathBuf::from(DEFAULT_GRAPH_FILE),
            output_dir: PathBuf::from("."),
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            strict_edges: false,
            traversal: TraversalConfig::default(),
        }
    }
}

/// Get the XDG config directory for dtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dtree.toml"))
}

/// Get the path to the project config file.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".dtree.toml")
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
    /// Absolute location of the graph snapshot for `project_dir`.
    pub fn graph_path(&self, project_dir: &Path) -> PathBuf {
        resolve_against(project_dir, &self.graph_file)
    }

    /// Absolute location of the exported artifact for `project_dir`.
    pub fn artifact_path(&self, project_dir: &Path) -> PathBuf {
        resolve_against(project_dir, &self.output_dir).join(&self.artifact_name)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.graph_file = PathBuf::from(expand_env_vars(&self.graph_file.to_string_lossy()));
        self.output_dir = PathBuf::from(expand_env_vars(&self.output_dir.to_string_lossy()));
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            graph_file: overlay
                .graph_file
                .clone()
                .unwrap_or_else(|| self.graph_file.clone()),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            artifact_name: overlay
                .artifact_name
                .clone()
                .unwrap_or_else(|| self.artifact_name.clone()),
            strict_edges: overlay.strict_edges.unwrap_or(self.strict_edges),
            traversal: TraversalConfig {
                max_depth: overlay
                    .traversal
                    .max_depth
                    .unwrap_or(self.traversal.max_depth),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for the local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/dtree/dtree.toml`
    /// 3. Project config: `<project_dir>/.dtree.toml`
    /// 4. Environment variables: `DTREE_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = project_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply DTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("DTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("graph_file") {
            settings.graph_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("artifact_name") {
            settings.artifact_name = val;
        }
        if let Ok(val) = config.get_bool("strict_edges") {
            settings.strict_edges = val;
        }
        if let Ok(val) = config.get_int("traversal.max_depth") {
            settings.traversal.max_depth = usize::try_from(val).map_err(|_| {
                ApplicationError::Config {
                    message: format!("traversal.max_depth must be positive, got {}", val),
                }
            })?;
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
        r#"# dtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:  ~/.config/dtree/dtree.toml
#   Project: <project_dir>/.dtree.toml
#   Env:     DTREE_* environment variables (DTREE_TRAVERSAL__MAX_DEPTH=64)

# Graph snapshot edited by `dtree node` / `dtree edge`
# graph_file = "graph.toml"

# Where `dtree export` writes the document
# output_dir = "."
# artifact_name = "decision_tree.yaml"

# Reject a third child, duplicate edges and taken roles when connecting
# strict_edges = false

[traversal]
# Longest root-to-leaf path before the export is aborted.
# Documents nested deeper than ~125 levels cannot be imported again.
# max_depth = 100
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_artifact_is_decision_tree_yaml() {
        let settings = Settings::default();
        assert_eq!(settings.artifact_name, "decision_tree.yaml");
        assert_eq!(settings.graph_file, PathBuf::from("graph.toml"));
        assert!(!settings.strict_edges);
        assert_eq!(settings.traversal.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn given_overlay_when_merging_then_specified_fields_win() {
        let base = Settings::default();
        let overlay = RawSettings {
            artifact_name: Some("model.yaml".into()),
            strict_edges: Some(true),
            traversal: RawTraversalConfig { max_depth: Some(8) },
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.artifact_name, "model.yaml");
        assert!(merged.strict_edges);
        assert_eq!(merged.traversal.max_depth, 8);
        assert_eq!(merged.graph_file, base.graph_file);
        assert_eq!(merged.output_dir, base.output_dir);
    }

    #[test]
    fn given_tilde_in_output_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            output_dir: PathBuf::from("~/exports"),
            ..Default::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(
            settings.output_dir.starts_with(&home),
            "output_dir should start with home dir: {}",
            settings.output_dir.display()
        );
    }

    #[test]
    fn given_relative_paths_when_resolving_then_joined_to_project_dir() {
        let settings = Settings::default();
        let project = Path::new("/work/tree");
        assert_eq!(
            settings.graph_path(project),
            PathBuf::from("/work/tree/graph.toml")
        );
        assert_eq!(
            settings.artifact_path(project),
            PathBuf::from("/work/tree/decision_tree.yaml")
        );
    }

    #[test]
    fn given_template_when_parsing_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.artifact_name.is_none());
    }

    #[test]
    fn given_settings_when_rendering_toml_then_round_trips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
