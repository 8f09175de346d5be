//! Command dispatch and handlers

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::debug;

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, EdgeCommands, NodeCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, project_config_path, Settings};
use crate::domain::MIME_TYPE;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

/// Execute the parsed CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    debug!("project_dir: {}", project_dir.display());

    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `dtree --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => cmd_config(command, &project_dir),
        _ => {
            let settings = Settings::load(Some(project_dir.as_path()))?;
            let container = ServiceContainer::new(settings);
            let graph_path = container.settings.graph_path(&project_dir);
            debug!("graph_path: {}", graph_path.display());

            match command {
                Commands::Init { force } => cmd_init(&container, &graph_path, *force),
                Commands::Node { command } => cmd_node(&container, &graph_path, command),
                Commands::Edge { command } => cmd_edge(&container, &graph_path, command),
                Commands::Show => cmd_show(&container, &graph_path),
                Commands::Export { output, stdout } => cmd_export(
                    &container,
                    &graph_path,
                    &project_dir,
                    output.as_deref(),
                    *stdout,
                ),
                Commands::Import { file, force } => {
                    cmd_import(&container, &graph_path, file, *force)
                }
                Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
            }
        }
    }
}

fn resolve_project_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(d) if !d.is_dir() => Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            d.display()
        ))),
        Some(d) => Ok(d.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("get current directory", e))),
    }
}

// ============================================================
// Graph commands
// ============================================================

fn cmd_init(container: &ServiceContainer, graph_path: &Path, force: bool) -> CliResult<()> {
    let graph = container.graph_service.init(graph_path, force)?;
    let root = graph.find_root().map_err(ApplicationError::from)?;
    output::success(&format!("Initialized graph: {}", graph_path.display()));
    output::detail(&format!("root: {}", root));
    Ok(())
}

fn cmd_node(
    container: &ServiceContainer,
    graph_path: &Path,
    command: &NodeCommands,
) -> CliResult<()> {
    let graphs = &container.graph_service;
    match command {
        NodeCommands::Add => {
            let node = graphs.add_node(graph_path)?;
            output::action("Added", &node);
        }
        NodeCommands::Edit {
            id,
            label,
            threshold,
        } => {
            if label.is_none() && threshold.is_none() {
                return Err(CliError::InvalidArgs(
                    "nothing to change, pass --label and/or --threshold".to_string(),
                ));
            }
            if graphs.update_node(graph_path, id, label.as_deref(), *threshold)? {
                output::action("Updated", id);
            } else {
                output::warning(&format!("no node '{}', nothing changed", id));
            }
        }
        NodeCommands::List => {
            let graph = graphs.load(graph_path)?;
            output::header(&format!("Nodes ({})", graph.nodes().len()));
            for node in graph.nodes() {
                let children = graph.outgoing(&node.id).map(|e| e.target.as_str()).join(", ");
                if children.is_empty() {
                    output::detail(&node);
                } else {
                    output::detail(&format!("{} -> [{}]", node, children));
                }
            }
        }
    }
    Ok(())
}

fn cmd_edge(
    container: &ServiceContainer,
    graph_path: &Path,
    command: &EdgeCommands,
) -> CliResult<()> {
    let graphs = &container.graph_service;
    match command {
        EdgeCommands::Add {
            source,
            target,
            role,
        } => {
            let edge = graphs.connect(graph_path, source, target, role.map(Into::into))?;
            output::action("Connected", &edge);
        }
        EdgeCommands::List => {
            let graph = graphs.load(graph_path)?;
            output::header(&format!("Edges ({})", graph.edges().len()));
            for edge in graph.edges() {
                output::detail(edge);
            }
        }
    }
    Ok(())
}

fn cmd_show(container: &ServiceContainer, graph_path: &Path) -> CliResult<()> {
    let tree = container.export_service.preview(graph_path)?;
    output::info(&tree);
    Ok(())
}

fn cmd_export(
    container: &ServiceContainer,
    graph_path: &Path,
    project_dir: &Path,
    output_path: Option<&Path>,
    stdout: bool,
) -> CliResult<()> {
    if stdout {
        let (content, _) = container.export_service.render(graph_path)?;
        print!("{}", content);
        return Ok(());
    }

    let target = match output_path {
        Some(p) => crate::util::path::resolve_against(project_dir, p),
        None => container.settings.artifact_path(project_dir),
    };
    let result = container.export_service.export(graph_path, &target)?;
    output::success(&format!(
        "Exported {} nodes to {} ({})",
        result.node_count,
        result.path.display(),
        MIME_TYPE
    ));
    Ok(())
}

fn cmd_import(
    container: &ServiceContainer,
    graph_path: &Path,
    file: &Path,
    force: bool,
) -> CliResult<()> {
    let graph = container.export_service.import(file, graph_path, force)?;
    output::success(&format!(
        "Imported {} nodes, {} edges into {}",
        graph.nodes().len(),
        graph.edges().len(),
        graph_path.display()
    ));
    Ok(())
}

// ============================================================
// Config commands
// ============================================================

fn cmd_config(command: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| ApplicationError::Config {
                    message: "cannot determine global config directory".to_string(),
                })?
            } else {
                project_config_path(project_dir)
            };
            let fs = RealFileSystem;
            if fs.exists(&path) {
                return Err(CliError::InvalidArgs(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            fs.write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created config: {}", path.display()));
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::action("global", "(unavailable)"),
            }
            output::action("project", &project_config_path(project_dir).display());
        }
    }
    Ok(())
}
