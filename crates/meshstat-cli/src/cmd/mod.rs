pub mod analyze;
pub mod coefficient;
pub mod completions;
pub mod stats;

use std::path::Path;

use meshstat_core::Graph;
use meshstat_core::config::{EffectiveConfig, LoaderConfig};
use tracing::debug;

use crate::output::{self, CliError, OutputMode};

/// Settings every graph command needs, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub output: OutputMode,
    pub loader: LoaderConfig,
    pub top: usize,
}

impl CommandContext {
    /// Fold CLI overrides into the resolved config.
    pub fn new(effective: &EffectiveConfig, no_header: bool) -> Self {
        let mut loader = effective.project.loader.clone();
        if no_header {
            loader.header = false;
        }
        Self {
            output: OutputMode::from_name(&effective.resolved_output).unwrap_or(OutputMode::Text),
            loader,
            top: effective.project.report.top,
        }
    }
}

/// Load an edge list, rendering a structured error on failure.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains a malformed
/// line or self-loop.
pub fn load_graph(path: &Path, ctx: &CommandContext) -> anyhow::Result<Graph> {
    let mut graph = Graph::new();
    if let Err(err) = graph.load_path(path, &ctx.loader) {
        output::render_error(ctx.output, &CliError::from(&err))?;
        return Err(err.into());
    }
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "edge list loaded"
    );
    Ok(graph)
}
