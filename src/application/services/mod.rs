//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod export;
mod graph;

pub use export::{ExportOutput, ExportService};
pub use graph::{GraphService, MAX_CHILDREN};
