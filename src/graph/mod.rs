//! Graph representation and algorithms module

pub mod algorithms;
pub mod builder;
pub mod compressed;

use std::path::Path;

use crate::error::Result;

pub use algorithms::BfsResult;
pub use builder::{CsrArrays, CsrBuilder};
pub use compressed::{CsrGraph, GraphSummary};

/// Operations every graph representation provides
///
/// `CsrGraph` is the only implementation; callers that want to stay
/// representation-agnostic hold a `Box<dyn GraphBackend>`.
pub trait GraphBackend: Send + Sync {
    /// Replace the graph with the contents of an edge-list file
    ///
    /// On error the previous state is left untouched.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Node ids reachable from `start` within `max_depth` hops, in discovery order
    fn bfs(&self, start: usize, max_depth: u32) -> Vec<u32>;

    /// Out-degree of `node`, `None` if out of range
    fn degree(&self, node: usize) -> Option<usize>;

    /// Ascending neighbor ids of `node`, empty if out of range
    fn neighbors(&self, node: usize) -> &[u32];

    /// Highest out-degree node, lowest id on ties; `None` for an empty graph
    fn node_with_max_degree(&self) -> Option<u32>;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// Approximate footprint of the adjacency arrays in whole megabytes
    fn memory_estimate_mb(&self) -> usize;

    fn describe(&self) -> GraphSummary;
}
