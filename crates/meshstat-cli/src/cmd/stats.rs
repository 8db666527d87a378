use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use meshstat_core::graph::GraphStats;
use meshstat_core::metrics::{DegreeSummary, degree_distribution};
use serde::Serialize;

use super::{CommandContext, load_graph};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `meshstat stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Edge list file.
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub path: String,
    #[serde(flatten)]
    pub stats: GraphStats,
    pub degrees: DegreeSummary,
}

/// Run `meshstat stats`.
///
/// # Errors
///
/// Returns an error if the edge list fails to load or output cannot be
/// written.
pub fn run_stats(args: &StatsArgs, ctx: &CommandContext) -> Result<()> {
    let graph = load_graph(&args.path, ctx)?;
    let report = StatsReport {
        path: args.path.display().to_string(),
        stats: GraphStats::from_graph(&graph),
        degrees: degree_distribution(&graph),
    };

    render_mode(ctx.output, &report, write_text, write_pretty)
}

fn write_text(report: &StatsReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &report.stats;
    writeln!(w, "nodes {}", s.node_count)?;
    writeln!(w, "edges {}", s.edge_count)?;
    writeln!(w, "undirected_edges {}", s.undirected_edge_count)?;
    writeln!(w, "density {:.6}", s.density)?;
    writeln!(w, "components {}", s.component_count)?;
    writeln!(w, "isolated {}", s.isolated_node_count)?;
    writeln!(w, "max_degree {}", s.max_degree)?;
    writeln!(w, "min_degree {}", report.degrees.min_degree)?;
    writeln!(w, "mean_degree {:.6}", report.degrees.mean_degree)?;
    writeln!(w, "content_hash {}", s.content_hash)
}

fn write_pretty(report: &StatsReport, w: &mut dyn Write) -> io::Result<()> {
    let s = &report.stats;
    pretty_section(w, &format!("Graph: {}", report.path))?;
    pretty_kv(w, "nodes", s.node_count.to_string())?;
    pretty_kv(
        w,
        "edges",
        format!("{} ({} undirected)", s.edge_count, s.undirected_edge_count),
    )?;
    pretty_kv(w, "density", format!("{:.4}", s.density))?;
    pretty_kv(
        w,
        "components",
        if s.is_connected() {
            format!("{} (connected)", s.component_count)
        } else {
            s.component_count.to_string()
        },
    )?;
    pretty_kv(w, "isolated", s.isolated_node_count.to_string())?;

    writeln!(w)?;
    pretty_section(w, "Degrees")?;
    pretty_kv(w, "min", report.degrees.min_degree.to_string())?;
    pretty_kv(w, "max", report.degrees.max_degree.to_string())?;
    pretty_kv(w, "mean", format!("{:.3}", report.degrees.mean_degree))?;

    writeln!(w)?;
    pretty_kv(w, "content hash", &s.content_hash)
}
