//! Freeman degree centralization.
//!
//! # Definition
//!
//! With `d_max` the largest degree and `n` the node count,
//!
//! ```text
//!            Σ_v (d_max - deg(v))
//! C_D  =  -----------------------
//!              (n - 1)(n - 2)
//! ```
//!
//! The denominator is the deviation sum of a star on `n` nodes, so a star
//! scores 1.0 and any regular graph scores 0.0. It is zero for `n = 2` and
//! meaningless below that, so graphs with fewer than three nodes yield
//! [`MetricError::UndefinedCentralization`].

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::MetricError;
use crate::graph::Graph;
use crate::timing;

/// Degree distribution figures feeding the centralization formula.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeSummary {
    pub node_count: usize,
    pub max_degree: usize,
    pub min_degree: usize,
    pub mean_degree: f64,
    /// `Σ (max_degree - deg(v))` over all nodes.
    pub deviation_sum: usize,
}

/// Summarize the degree distribution of `graph`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_distribution(graph: &Graph) -> DegreeSummary {
    let inner = graph.inner();
    let degrees: Vec<usize> = inner
        .node_indices()
        .map(|idx| inner.neighbors(idx).count())
        .collect();

    let node_count = degrees.len();
    let max_degree = degrees.iter().copied().max().unwrap_or(0);
    let min_degree = degrees.iter().copied().min().unwrap_or(0);
    let total: usize = degrees.iter().sum();
    let mean_degree = if node_count == 0 {
        0.0
    } else {
        total as f64 / node_count as f64
    };
    let deviation_sum = degrees.iter().map(|d| max_degree - d).sum();

    DegreeSummary {
        node_count,
        max_degree,
        min_degree,
        mean_degree,
        deviation_sum,
    }
}

/// Compute Freeman degree centralization, without caching.
///
/// # Errors
///
/// Returns [`MetricError::UndefinedCentralization`] for graphs with fewer
/// than three nodes.
#[instrument(skip_all, fields(nodes = graph.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn freeman_centralization(graph: &Graph) -> Result<f64, MetricError> {
    let summary = degree_distribution(graph);
    let n = summary.node_count;
    if n < 3 {
        return Err(MetricError::UndefinedCentralization { node_count: n });
    }

    let max_deviation = ((n - 1) * (n - 2)) as f64;
    let value = summary.deviation_sum as f64 / max_deviation;

    debug!(
        max_degree = summary.max_degree,
        deviation_sum = summary.deviation_sum,
        value,
        "freeman centralization computed"
    );

    Ok(value)
}

impl Graph {
    /// Freeman degree centralization, computed once per load.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::UndefinedCentralization`] for graphs with
    /// fewer than three nodes. The error is cached like a value.
    pub fn freeman_centralization(&self) -> Result<f64, MetricError> {
        self.cache
            .centralization
            .get_or_init(|| {
                timing::timed("metrics.centralization", || freeman_centralization(self))
            })
            .clone()
    }
}
