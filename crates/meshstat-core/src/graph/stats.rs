//! Basic structural statistics for a loaded graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Total number of nodes, isolated ones included.
//! - **edge_count**: EdgeSet size (distinct ordered pairs as read).
//! - **undirected_edge_count**: Distinct adjacencies.
//! - **density**: `2m / (n(n-1))` over undirected edges. A complete graph
//!   has density 1.0; graphs with fewer than two nodes have density 0.0.
//! - **component_count**: Number of connected components.
//! - **isolated_node_count**: Nodes with no neighbors.
//! - **max_degree**: Highest neighbor count of any node.

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::build::Graph;

/// Summary statistics for a loaded graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub undirected_edge_count: usize,
    /// Ranges from 0.0 (no edges) to 1.0 (every pair adjacent).
    pub density: f64,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub max_degree: usize,
    pub content_hash: String,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let inner = graph.inner();
        let node_count = inner.node_count();
        let undirected_edge_count = inner.edge_count();

        let degrees: Vec<usize> = inner
            .node_indices()
            .map(|idx| inner.neighbors(idx).count())
            .collect();

        Self {
            node_count,
            edge_count: graph.edge_count(),
            undirected_edge_count,
            density: compute_density(node_count, undirected_edge_count),
            component_count: connected_components(inner),
            isolated_node_count: degrees.iter().filter(|&&d| d == 0).count(),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            content_hash: graph.content_hash().to_string(),
        }
    }

    /// Return `true` if every node is reachable from every other.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.component_count == 1
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
    edge_count as f64 / max_edges
}
