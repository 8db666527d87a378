//! Local and average clustering coefficients.
//!
//! # Definition
//!
//! For a node `v` with `k` neighbors, let `e` be the number of neighbor
//! pairs `{x, y}` that are adjacent. Then
//!
//! ```text
//! C(v) = 2e / (k(k - 1))     if k >= 2
//! C(v) = 0.0                 if k < 2
//! ```
//!
//! The average clustering coefficient is the mean of `C(v)` over **all**
//! nodes, zero-valued and isolated ones included. An empty graph averages
//! to 0.0.
//!
//! Cost is O(V · d²) for maximum degree `d`: for every node, each
//! neighbor's adjacency is scanned once against a hash set of the node's
//! neighborhood.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::Graph;
use crate::timing;

/// Clustering coefficients for every node of a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteringReport {
    /// `(node, coefficient)` sorted by coefficient descending, then by
    /// node label ascending.
    pub ranked: Vec<(String, f64)>,
    /// Mean coefficient over every node.
    pub average: f64,
    #[serde(skip)]
    by_node: HashMap<String, f64>,
}

impl ClusteringReport {
    /// Coefficient of `node`, or `None` if the node is unknown.
    #[must_use]
    pub fn get(&self, node: &str) -> Option<f64> {
        self.by_node.get(node).copied()
    }

    /// Number of nodes covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Return `true` if the graph had no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Clustering coefficient of the node at `idx`.
///
/// Runs in O(Σ deg(x)) over the neighbors `x` of `idx`, at most O(d²).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn local_clustering_coefficient(graph: &Graph, idx: NodeIndex) -> f64 {
    let inner = graph.inner();
    let neighborhood: HashSet<NodeIndex> = inner.neighbors(idx).collect();
    let k = neighborhood.len();
    if k < 2 {
        return 0.0;
    }

    // Each linked pair {x, y} is seen once from x and once from y.
    let twice_links: usize = neighborhood
        .iter()
        .map(|&x| {
            inner
                .neighbors(x)
                .filter(|y| neighborhood.contains(y))
                .count()
        })
        .sum();

    twice_links as f64 / (k * (k - 1)) as f64
}

/// Compute clustering coefficients for every node, without caching.
///
/// Prefer the memoized [`Graph::clustering`] accessors when querying
/// repeatedly.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn clustering_coefficients(graph: &Graph) -> ClusteringReport {
    let inner = graph.inner();

    let mut ranked: Vec<(String, f64)> = inner
        .node_indices()
        .filter_map(|idx| {
            let label = graph.label(idx)?;
            Some((label.to_string(), local_clustering_coefficient(graph, idx)))
        })
        .collect();

    let average = if ranked.is_empty() {
        0.0
    } else {
        ranked.iter().map(|(_, c)| c).sum::<f64>() / ranked.len() as f64
    };

    ranked.sort_by(|(na, ca), (nb, cb)| rank_order(*ca, *cb).then_with(|| na.cmp(nb)));

    let by_node = ranked.iter().cloned().collect();

    debug!(average, "clustering coefficients computed");

    ClusteringReport {
        ranked,
        average,
        by_node,
    }
}

fn rank_order(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

impl Graph {
    /// Clustering coefficients for every node, computed once per load.
    #[must_use]
    pub fn clustering(&self) -> &ClusteringReport {
        self.cache
            .clustering
            .get_or_init(|| timing::timed("metrics.clustering", || clustering_coefficients(self)))
    }

    /// Clustering coefficient of `node`, or `None` if it was never loaded.
    #[must_use]
    pub fn clustering_coefficient(&self, node: &str) -> Option<f64> {
        self.clustering().get(node)
    }

    /// Every `(node, coefficient)` pair, highest coefficient first; ties
    /// are ordered by node label.
    #[must_use]
    pub fn all_clustering_coefficients(&self) -> Vec<(&str, f64)> {
        self.clustering()
            .ranked
            .iter()
            .map(|(node, c)| (node.as_str(), *c))
            .collect()
    }

    /// The first `n` entries of [`Graph::all_clustering_coefficients`].
    #[must_use]
    pub fn top_clustering_coefficients(&self, n: usize) -> Vec<(&str, f64)> {
        self.clustering()
            .ranked
            .iter()
            .take(n)
            .map(|(node, c)| (node.as_str(), *c))
            .collect()
    }

    /// Mean clustering coefficient over all nodes.
    #[must_use]
    pub fn average_clustering_coefficient(&self) -> f64 {
        self.clustering().average
    }
}
