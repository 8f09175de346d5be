//! dtree: derive binary decision trees from an editable node/edge graph
//! and serialize them as YAML documents.
//!
//! Layers:
//! - `domain`: graph model, child resolution, tree builder, YAML codec
//! - `application`: graph editing and export services
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: argument parsing and command handlers

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
