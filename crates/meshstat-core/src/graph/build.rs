//! Graph construction from edge-list records.
//!
//! # Overview
//!
//! [`Graph`] stores an undirected [`petgraph`] graph whose node weights are
//! node labels, a label → `NodeIndex` map, and the EdgeSet: every distinct
//! ordered `(source, target)` pair in the order it was first read. `A,B` and
//! `B,A` are two EdgeSet entries but a single undirected adjacency, so
//! [`Graph::edge_count`] and [`Graph::undirected_edge_count`] can differ.
//!
//! ## Reloading
//!
//! Every `load_*` call parses into a fresh model and swaps it in only after
//! the whole input parsed. A failed load leaves the previous state (and
//! its cached metrics) untouched; a successful one discards both.
//!
//! ## Content Hash
//!
//! [`Graph::content_hash`] is a BLAKE3 hash of the node list and EdgeSet in
//! load order. Two loads of the same input produce the same hash.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use petgraph::graph::{NodeIndex, UnGraph};
use tracing::{debug, instrument, warn};

use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::graph::edge_list::{self, Record};
use crate::metrics::MetricCache;
use crate::timing;

/// Node label → neighbor labels. Symmetric by construction.
pub type AdjacencySet = BTreeMap<String, BTreeSet<String>>;

/// An edge exactly as it was read: `source` is the first field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An undirected, unweighted graph with lazily cached metrics.
///
/// Construct with [`Graph::new`] and populate with one of the `load_*`
/// methods. Metric accessors live in [`crate::metrics`].
#[derive(Debug)]
pub struct Graph {
    graph: UnGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
    edges: Vec<Edge>,
    content_hash: String,
    pub(crate) cache: MetricCache,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::from_records(std::iter::empty())
    }

    /// Build a graph directly from parsed records.
    ///
    /// Edge records whose endpoints are equal only register the node.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut graph = UnGraph::<String, ()>::default();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut edges = Vec::new();
        let mut seen: HashSet<Edge> = HashSet::new();

        for record in records {
            match record {
                Record::Isolated(node) => {
                    intern(&mut graph, &mut node_map, &node);
                }
                Record::Edge { source, target } => {
                    let a = intern(&mut graph, &mut node_map, &source);
                    if source == target {
                        warn!(node = %source, "ignoring self-loop record");
                        continue;
                    }
                    let b = intern(&mut graph, &mut node_map, &target);

                    // petgraph keeps parallel edges; adjacency must stay a set.
                    if graph.find_edge(a, b).is_none() {
                        graph.add_edge(a, b, ());
                    }

                    let edge = Edge { source, target };
                    if seen.insert(edge.clone()) {
                        edges.push(edge);
                    }
                }
            }
        }

        let content_hash = compute_content_hash(&graph, &edges);

        Self {
            graph,
            node_map,
            edges,
            content_hash,
            cache: MetricCache::default(),
        }
    }

    /// Load an edge-list file, replacing the current model.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Open`] if the file cannot be opened, otherwise
    /// the errors of [`Graph::load_reader`].
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_path(
        &mut self,
        path: impl AsRef<Path>,
        config: &LoaderConfig,
    ) -> Result<AdjacencySet, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_reader(BufReader::new(file), config)
    }

    /// Load an in-memory edge list, replacing the current model.
    ///
    /// # Errors
    ///
    /// See [`Graph::load_reader`].
    pub fn load_str(&mut self, text: &str, config: &LoaderConfig) -> Result<AdjacencySet, LoadError> {
        self.load_reader(text.as_bytes(), config)
    }

    /// Load edge-list lines from `reader`, replacing the current model.
    ///
    /// The load is all-or-nothing: on error `self` is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] on I/O failures, [`LoadError::Parse`] for
    /// lines without a source token and [`LoadError::SelfLoop`] for `A,A`.
    #[instrument(skip_all)]
    pub fn load_reader<R: BufRead>(
        &mut self,
        reader: R,
        config: &LoaderConfig,
    ) -> Result<AdjacencySet, LoadError> {
        let loaded = timing::timed("graph.load", || {
            let records = edge_list::read_records(reader, config)?;
            Ok::<_, LoadError>(Self::from_records(
                records.into_iter().map(|numbered| numbered.record),
            ))
        })?;

        debug!(
            nodes = loaded.node_count(),
            edges = loaded.edge_count(),
            hash = %loaded.content_hash,
            "edge list loaded"
        );

        *self = loaded;
        Ok(self.adjacency())
    }

    /// Number of nodes, isolated ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of EdgeSet entries (distinct ordered pairs as read).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct undirected adjacencies.
    #[must_use]
    pub fn undirected_edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return `true` if nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Return `true` if `node` is part of the model.
    #[must_use]
    pub fn contains_node(&self, node: &str) -> bool {
        self.node_map.contains_key(node)
    }

    /// Node labels in first-seen order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.raw_nodes().iter().map(|node| node.weight.as_str())
    }

    /// The EdgeSet in first-seen order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Return `true` if `a` and `b` are adjacent, in either direction.
    #[must_use]
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(ia), Some(ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Number of distinct neighbors, or `None` for an unknown node.
    #[must_use]
    pub fn degree(&self, node: &str) -> Option<usize> {
        self.node_index(node)
            .map(|idx| self.graph.neighbors(idx).count())
    }

    /// Neighbor labels of `node`, or `None` for an unknown node.
    #[must_use]
    pub fn neighbors(&self, node: &str) -> Option<BTreeSet<&str>> {
        let idx = self.node_index(node)?;
        Some(
            self.graph
                .neighbors(idx)
                .filter_map(|n| self.label(n))
                .collect(),
        )
    }

    /// Materialize the full adjacency map.
    #[must_use]
    pub fn adjacency(&self) -> AdjacencySet {
        self.graph
            .node_indices()
            .filter_map(|idx| {
                let label = self.label(idx)?;
                let neighbors = self
                    .graph
                    .neighbors(idx)
                    .filter_map(|n| self.label(n).map(str::to_string))
                    .collect();
                Some((label.to_string(), neighbors))
            })
            .collect()
    }

    /// BLAKE3 hash of the loaded model (`blake3:<hex>`).
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// The underlying petgraph graph.
    #[must_use]
    pub fn inner(&self) -> &UnGraph<String, ()> {
        &self.graph
    }

    /// Look up the `NodeIndex` for a label.
    #[must_use]
    pub fn node_index(&self, node: &str) -> Option<NodeIndex> {
        self.node_map.get(node).copied()
    }

    /// Return the label of a node.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn intern(
    graph: &mut UnGraph<String, ()>,
    node_map: &mut HashMap<String, NodeIndex>,
    label: &str,
) -> NodeIndex {
    if let Some(idx) = node_map.get(label) {
        return *idx;
    }
    let idx = graph.add_node(label.to_string());
    node_map.insert(label.to_string(), idx);
    idx
}

fn compute_content_hash(graph: &UnGraph<String, ()>, edges: &[Edge]) -> String {
    let mut hasher = blake3::Hasher::new();
    for label in graph.raw_nodes().iter().map(|node| &node.weight) {
        hasher.update(b"n\x00");
        hasher.update(label.as_bytes());
        hasher.update(b"\x00");
    }
    for edge in edges {
        hasher.update(b"e\x00");
        hasher.update(edge.source.as_bytes());
        hasher.update(b"\x00");
        hasher.update(edge.target.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
