//! `meshstat analyze`: graph-wide clustering and centralization report.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use meshstat_core::Graph;
use serde::Serialize;

use super::{CommandContext, load_graph};
use crate::output::{CliError, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Edge list file.
    pub path: PathBuf,

    /// Number of most clustered nodes to list (default from config, else 10).
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankedNode {
    pub node: String,
    pub coefficient: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeReport {
    pub path: String,
    pub nodes: usize,
    pub edges: usize,
    pub undirected_edges: usize,
    pub average_clustering: f64,
    pub top: Vec<RankedNode>,
    /// `None` when the graph has fewer than three nodes.
    pub freeman_centralization: Option<f64>,
    /// Why `freeman_centralization` is `None` (`E3001`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centralization_error: Option<CliError>,
    pub content_hash: String,
}

impl AnalyzeReport {
    pub fn build(graph: &Graph, path: &str, top: usize) -> Self {
        let centralization = graph.freeman_centralization();

        Self {
            path: path.to_string(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            undirected_edges: graph.undirected_edge_count(),
            average_clustering: graph.average_clustering_coefficient(),
            top: graph
                .top_clustering_coefficients(top)
                .into_iter()
                .map(|(node, coefficient)| RankedNode {
                    node: node.to_string(),
                    coefficient,
                })
                .collect(),
            freeman_centralization: centralization.as_ref().ok().copied(),
            centralization_error: centralization.err().map(|err| CliError::from(&err)),
            content_hash: graph.content_hash().to_string(),
        }
    }
}

/// Run `meshstat analyze`.
///
/// # Errors
///
/// Returns an error if the edge list fails to load or output cannot be
/// written.
pub fn run_analyze(args: &AnalyzeArgs, ctx: &CommandContext) -> Result<()> {
    let graph = load_graph(&args.path, ctx)?;
    let top = args.top.unwrap_or(ctx.top);
    let report = AnalyzeReport::build(&graph, &args.path.display().to_string(), top);

    render_mode(ctx.output, &report, write_text, write_pretty)
}

fn centralization_display(report: &AnalyzeReport, precision: usize) -> String {
    report
        .freeman_centralization
        .map_or_else(|| "undefined".to_string(), |c| format!("{c:.precision$}"))
}

fn write_text(report: &AnalyzeReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "nodes {}", report.nodes)?;
    writeln!(w, "edges {}", report.edges)?;
    writeln!(w, "undirected_edges {}", report.undirected_edges)?;
    writeln!(w, "average_clustering {:.6}", report.average_clustering)?;
    for ranked in &report.top {
        writeln!(w, "top {}\t{:.6}", ranked.node, ranked.coefficient)?;
    }
    writeln!(
        w,
        "freeman_centralization {}",
        centralization_display(report, 6)
    )
}

fn write_pretty(report: &AnalyzeReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Graph: {}", report.path))?;
    pretty_kv(w, "nodes", report.nodes.to_string())?;
    pretty_kv(
        w,
        "edges",
        format!("{} ({} undirected)", report.edges, report.undirected_edges),
    )?;
    pretty_kv(w, "avg clustering", format!("{:.4}", report.average_clustering))?;

    writeln!(w)?;
    pretty_section(w, &format!("Top {} clustering coefficients", report.top.len()))?;
    if report.top.is_empty() {
        writeln!(w, "  (no nodes)")?;
    }
    let width = report
        .top
        .iter()
        .map(|ranked| ranked.node.len())
        .max()
        .unwrap_or(0);
    for (rank, ranked) in report.top.iter().enumerate() {
        writeln!(
            w,
            "{:>3}. {:<width$}  {:.4}",
            rank + 1,
            ranked.node,
            ranked.coefficient
        )?;
    }

    writeln!(w)?;
    pretty_kv(w, "centralization", centralization_display(report, 4))?;
    if let Some(err) = &report.centralization_error {
        writeln!(w, "  note: {}", err.message)?;
    }
    Ok(())
}
