use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use meshstat_core::Graph;
use meshstat_core::error::ErrorCode;
use serde::Serialize;

use super::{CommandContext, load_graph};
use crate::output::{CliError, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `meshstat coefficient`.
#[derive(Args, Debug)]
pub struct CoefficientArgs {
    /// Edge list file.
    pub path: PathBuf,

    /// Node label, matched exactly after trimming.
    pub node: String,
}

#[derive(Debug, Serialize)]
pub struct CoefficientReport {
    pub node: String,
    pub degree: usize,
    pub coefficient: f64,
}

impl CoefficientReport {
    /// `None` when the node never appeared in the edge list.
    pub fn lookup(graph: &Graph, node: &str) -> Option<Self> {
        Some(Self {
            node: node.to_string(),
            degree: graph.degree(node)?,
            coefficient: graph.clustering_coefficient(node)?,
        })
    }
}

/// Run `meshstat coefficient`.
///
/// # Errors
///
/// Returns an error if loading fails or the node is not in the graph.
pub fn run_coefficient(args: &CoefficientArgs, ctx: &CommandContext) -> Result<()> {
    let graph = load_graph(&args.path, ctx)?;
    let node = args.node.trim();

    let Some(report) = CoefficientReport::lookup(&graph, node) else {
        let message = format!("node `{node}` not found in {}", args.path.display());
        render_error(
            ctx.output,
            &CliError::with_code(ErrorCode::NodeNotFound, message.clone()),
        )?;
        bail!(message);
    };

    render_mode(ctx.output, &report, write_text, write_pretty)
}

fn write_text(report: &CoefficientReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}\t{:.6}", report.node, report.coefficient)
}

fn write_pretty(report: &CoefficientReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Node: {}", report.node))?;
    pretty_kv(w, "degree", report.degree.to_string())?;
    pretty_kv(w, "clustering", format!("{:.4}", report.coefficient))
}
