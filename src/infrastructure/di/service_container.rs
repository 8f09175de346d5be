//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ExportService, GraphService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Graph editing
    pub graph_service: Arc<GraphService>,

    /// Tree export and import
    pub export_service: ExportService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let graph_service = Arc::new(GraphService::new(fs.clone(), settings.strict_edges));
        let export_service =
            ExportService::new(fs, graph_service.clone(), settings.traversal.max_depth);

        Self {
            settings,
            graph_service,
            export_service,
        }
    }
}
