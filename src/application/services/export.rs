//! Export service
//!
//! Builds the decision tree from the persisted graph, serializes it to YAML
//! and writes the artifact. Also imports a YAML document back into a graph.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use termtree::Tree;
use tracing::{debug, info, instrument};

use crate::application::services::GraphService;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    from_yaml, to_yaml, DecisionTreeDocument, GraphModel, TreeBuilder, TreeNodeConvert,
};
use crate::infrastructure::traits::FileSystem;

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// Where the artifact was written
    pub path: PathBuf,
    /// The serialized document
    pub content: String,
    /// Number of tree nodes emitted
    pub node_count: usize,
}

/// Service turning graphs into YAML artifacts and back.
pub struct ExportService {
    fs: Arc<dyn FileSystem>,
    graphs: Arc<GraphService>,
    max_depth: usize,
}

impl ExportService {
    pub fn new(fs: Arc<dyn FileSystem>, graphs: Arc<GraphService>, max_depth: usize) -> Self {
        Self {
            fs,
            graphs,
            max_depth,
        }
    }

    /// Derive the tree from the first root of `graph`.
    pub fn build_document(&self, graph: &GraphModel) -> ApplicationResult<DecisionTreeDocument> {
        let document = TreeBuilder::new(graph)
            .with_max_depth(self.max_depth)
            .build_from_root()?;
        Ok(document)
    }

    /// Build and serialize the tree rooted at `root_id`.
    #[instrument(level = "debug", skip(self, graph))]
    pub fn generate_document(&self, graph: &GraphModel, root_id: &str) -> ApplicationResult<String> {
        let document = TreeBuilder::new(graph)
            .with_max_depth(self.max_depth)
            .build(root_id)?;
        Ok(to_yaml(&document)?)
    }

    /// Render the YAML text for the graph stored at `graph_path`.
    pub fn render(&self, graph_path: &Path) -> ApplicationResult<(String, DecisionTreeDocument)> {
        let graph = self.graphs.load(graph_path)?;
        let document = self.build_document(&graph)?;
        let content = to_yaml(&document)?;
        Ok((content, document))
    }

    /// Export the graph at `graph_path` to `output`.
    ///
    /// The artifact is written atomically: a failed build or write leaves any
    /// previous file untouched and never produces a partial one.
    #[instrument(level = "debug", skip(self))]
    pub fn export(&self, graph_path: &Path, output: &Path) -> ApplicationResult<ExportOutput> {
        let (content, document) = self.render(graph_path)?;
        self.fs
            .ensure_parent(output)
            .with_path_context("create output directory", output)?;
        self.fs
            .write_atomic(output, &content)
            .with_path_context("write artifact", output)?;
        info!(
            "exported {} nodes to {}",
            document.root.size(),
            output.display()
        );
        Ok(ExportOutput {
            path: output.to_path_buf(),
            content,
            node_count: document.root.size(),
        })
    }

    /// Read a YAML document and write an equivalent graph to `graph_path`.
    #[instrument(level = "debug", skip(self))]
    pub fn import(
        &self,
        yaml_path: &Path,
        graph_path: &Path,
        force: bool,
    ) -> ApplicationResult<GraphModel> {
        if self.fs.exists(graph_path) && !force {
            return Err(ApplicationError::GraphExists(graph_path.to_path_buf()));
        }
        let text = self
            .fs
            .read_to_string(yaml_path)
            .with_path_context("read document", yaml_path)?;
        let document = from_yaml(&text)?;
        let graph = document.to_graph();
        debug!(
            "import: {} nodes, {} edges",
            graph.nodes().len(),
            graph.edges().len()
        );
        self.fs
            .ensure_parent(graph_path)
            .with_path_context("create graph directory", graph_path)?;
        self.graphs.save(graph_path, &graph)?;
        Ok(graph)
    }

    /// Text tree of the derived decision tree, for terminal display.
    pub fn preview(&self, graph_path: &Path) -> ApplicationResult<Tree<String>> {
        let (_, document) = self.render(graph_path)?;
        Ok(document.to_tree_string())
    }
}
