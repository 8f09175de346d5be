//! DTREE_* environment overrides
//!
//! Own test binary: mutates the process environment.

use tempfile::TempDir;

use dtree::config::{project_config_path, Settings};

const VARS: [(&str, &str); 3] = [
    ("DTREE_TRAVERSAL__MAX_DEPTH", "64"),
    ("DTREE_STRICT_EDGES", "true"),
    ("DTREE_ARTIFACT_NAME", "x.yaml"),
];

#[test]
fn given_env_vars_when_load_then_override_project_config() {
    // Arrange
    let temp = TempDir::new().unwrap();
    std::fs::write(
        project_config_path(temp.path()),
        r#"artifact_name = "project.yaml"
strict_edges = false

[traversal]
max_depth = 16
"#,
    )
    .unwrap();
    for (key, value) in VARS {
        std::env::set_var(key, value);
    }

    // Act
    let result = Settings::load(Some(temp.path()));

    for (key, _) in VARS {
        std::env::remove_var(key);
    }

    // Assert
    let settings = result.unwrap();
    assert_eq!(settings.traversal.max_depth, 64);
    assert!(settings.strict_edges);
    assert_eq!(settings.artifact_name, "x.yaml");
}
