//! Layered settings loading

use std::path::PathBuf;

use tempfile::TempDir;

use dtree::application::ApplicationError;
use dtree::config::{project_config_path, Settings};
use dtree::domain::DEFAULT_MAX_DEPTH;

fn write_project_config(dir: &TempDir, content: &str) {
    std::fs::write(project_config_path(dir.path()), content).expect("write project config");
}

#[test]
fn given_project_config_when_load_then_overrides_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    write_project_config(
        &temp,
        r#"graph_file = "model/graph.toml"
output_dir = "dist"
artifact_name = "tree.yaml"
strict_edges = true

[traversal]
max_depth = 16
"#,
    );

    // Act
    let settings = Settings::load(Some(temp.path())).unwrap();

    // Assert
    assert_eq!(settings.graph_file, PathBuf::from("model/graph.toml"));
    assert!(settings.strict_edges);
    assert_eq!(settings.traversal.max_depth, 16);
    assert_eq!(
        settings.graph_path(temp.path()),
        temp.path().join("model").join("graph.toml")
    );
    assert_eq!(
        settings.artifact_path(temp.path()),
        temp.path().join("dist").join("tree.yaml")
    );
}

#[test]
fn given_partial_project_config_when_load_then_unset_fields_inherit() {
    let temp = TempDir::new().unwrap();
    write_project_config(&temp, "artifact_name = \"other.yaml\"\n");

    let settings = Settings::load(Some(temp.path())).unwrap();

    assert_eq!(settings.artifact_name, "other.yaml");
    assert_eq!(settings.traversal.max_depth, DEFAULT_MAX_DEPTH);
}

#[test]
fn given_template_as_project_config_when_load_then_defaults() {
    let temp = TempDir::new().unwrap();
    write_project_config(&temp, &Settings::template());

    let settings = Settings::load(Some(temp.path())).unwrap();

    assert!(!settings.strict_edges);
    assert_eq!(settings.artifact_name, "decision_tree.yaml");
}

#[test]
fn given_malformed_project_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    write_project_config(&temp, "strict_edges = \"maybe\"\n");

    let err = Settings::load(Some(temp.path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_loaded_settings_when_rendered_then_parses_back() {
    let temp = TempDir::new().unwrap();
    let settings = Settings::load(Some(temp.path())).unwrap();

    let text = settings.to_toml().unwrap();

    let parsed: Settings = toml::from_str(&text).unwrap();
    assert_eq!(parsed, settings);
}
