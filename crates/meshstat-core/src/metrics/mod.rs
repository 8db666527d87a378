//! Structural metrics over a loaded [`Graph`](crate::graph::Graph).
//!
//! # Overview
//!
//! - **Clustering** (`clustering`): how many of a node's neighbor pairs are
//!   themselves adjacent, per node and averaged over the graph.
//! - **Freeman centralization** (`centralization`): how unevenly degree is
//!   spread, relative to a star on the same number of nodes.
//!
//! Each module exposes an uncached free function and memoized accessors on
//! `Graph`. The cache is a pair of [`OnceLock`]s, so the first accessor
//! call computes and every later call returns the stored value until the
//! next successful load replaces the model.
//!
//! ```rust
//! use meshstat_core::config::LoaderConfig;
//! use meshstat_core::graph::Graph;
//!
//! let mut graph = Graph::new();
//! graph.load_str("h\nA,B\nB,C\nC,D\n", &LoaderConfig::default()).unwrap();
//!
//! let top = graph.top_clustering_coefficients(10);
//! let centralization = graph.freeman_centralization().unwrap();
//! assert!((centralization - 1.0 / 3.0).abs() < 1e-12);
//! # let _ = top;
//! ```

pub mod centralization;
pub mod clustering;

use std::sync::OnceLock;

use crate::error::MetricError;

pub use centralization::{DegreeSummary, degree_distribution, freeman_centralization};
pub use clustering::{ClusteringReport, clustering_coefficients, local_clustering_coefficient};

/// Per-load memoized metric results.
#[derive(Debug, Default)]
pub(crate) struct MetricCache {
    pub(crate) clustering: OnceLock<ClusteringReport>,
    pub(crate) centralization: OnceLock<Result<f64, MetricError>>,
}
