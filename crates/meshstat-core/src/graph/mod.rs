//! Undirected graph model and edge-list loading.
//!
//! ## Pipeline
//!
//! ```text
//! edge-list text
//!        ↓  edge_list::read_records()
//! Vec<NumberedRecord>   (header skipped, lines tokenized)
//!        ↓  build::Graph::from_records()
//! Graph                 (petgraph UnGraph + EdgeSet + content hash)
//!        ↓  metrics::{clustering, centralization}, stats::GraphStats
//! cached metrics / summary statistics
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,no_run
//! use meshstat_core::config::LoaderConfig;
//! use meshstat_core::graph::{Graph, GraphStats};
//!
//! let mut graph = Graph::new();
//! graph.load_path("edges.csv", &LoaderConfig::default())?;
//! let stats = GraphStats::from_graph(&graph);
//!
//! println!("nodes={} edges={} density={:.3}",
//!     stats.node_count, stats.edge_count, stats.density);
//! # Ok::<(), meshstat_core::LoadError>(())
//! ```

pub mod build;
pub mod edge_list;
pub mod stats;

pub use build::{AdjacencySet, Edge, Graph};
pub use edge_list::{NumberedRecord, Record};
pub use stats::GraphStats;
