#![forbid(unsafe_code)]
//! meshstat-core library.
//!
//! Loads an undirected graph from an edge-list file and computes local and
//! average clustering coefficients plus Freeman degree centralization.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in [`error`]; `anyhow::Result` for
//!   configuration loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! ```rust
//! use meshstat_core::config::LoaderConfig;
//! use meshstat_core::graph::Graph;
//!
//! let mut graph = Graph::new();
//! graph
//!     .load_str("source,target\nA,B\nB,C\nA,C\n", &LoaderConfig::default())
//!     .expect("valid edge list");
//!
//! assert_eq!(graph.clustering_coefficient("A"), Some(1.0));
//! assert_eq!(graph.clustering_coefficient("Z"), None);
//! assert!((graph.average_clustering_coefficient() - 1.0).abs() < 1e-12);
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod timing;

pub use error::{ErrorCode, LoadError, MetricError};
pub use graph::{AdjacencySet, Graph};
