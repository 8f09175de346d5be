//! YAML rendering of the decision tree document.
//!
//! Keys are emitted in declaration order (`feature`, `threshold`, `left`,
//! `right` / `name`, `threshold`), absent children as `null`. Every subtree is
//! written by value: serde_yaml never emits anchors or aliases.

use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::tree::DecisionTreeDocument;

/// Default file name of the exported artifact.
pub const DEFAULT_ARTIFACT_NAME: &str = "decision_tree.yaml";

/// MIME type of the exported artifact.
pub const MIME_TYPE: &str = "text/yaml";

#[instrument(level = "debug", skip(document))]
pub fn to_yaml(document: &DecisionTreeDocument) -> Result<String, DomainError> {
    serde_yaml::to_string(document).map_err(|e| DomainError::Serialize {
        message: e.to_string(),
    })
}

#[instrument(level = "debug", skip(text))]
pub fn from_yaml(text: &str) -> Result<DecisionTreeDocument, DomainError> {
    serde_yaml::from_str(text).map_err(|e| DomainError::InvalidDocument {
        message: e.to_string(),
    })
}
