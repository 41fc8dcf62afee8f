//! Memory-efficient graph representation

use std::fmt;
use std::io::BufRead;
use std::mem;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::data::{EdgeListLoader, LoadStats, StagingEdges};
use crate::error::{GraphError, Result};
use crate::graph::algorithms;
use crate::graph::builder::{CsrArrays, CsrBuilder};
use crate::graph::GraphBackend;
use crate::observe::{GraphEvent, GraphObserver, LogObserver};

const BYTES_PER_MB: usize = 1024 * 1024;

/// Diagnostic summary of a loaded graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub directed: bool,
    pub memory_mb: usize,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== GRAPH INFO ===")?;
        writeln!(f, "Nodes:    {}", self.node_count)?;
        writeln!(f, "Edges:    {}", self.edge_count)?;
        writeln!(f, "Directed: {}", if self.directed { "yes" } else { "no" })?;
        writeln!(f, "CSR size: {} MB", self.memory_mb)?;
        write!(f, "==================")
    }
}

/// Compressed sparse row representation of a graph
///
/// Starts empty; `load` replaces the whole structure, and a loaded graph is
/// read-only. Reloading takes `&mut self`, so it can never overlap with
/// shared readers.
pub struct CsrGraph {
    config: GraphConfig,
    csr: CsrArrays,
    last_load: Option<LoadStats>,
    observer: Arc<dyn GraphObserver>,
}

impl fmt::Debug for CsrGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrGraph")
            .field("config", &self.config)
            .field("node_count", &self.node_count())
            .field("edge_count", &self.edge_count())
            .finish()
    }
}

impl Default for CsrGraph {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl CsrGraph {
    /// Create an empty graph that reports through the `log` facade
    pub fn new(config: GraphConfig) -> Self {
        Self::with_observer(config, Arc::new(LogObserver))
    }

    /// Create an empty graph with a custom observer
    pub fn with_observer(config: GraphConfig, observer: Arc<dyn GraphObserver>) -> Self {
        Self {
            config,
            csr: CsrArrays {
                row_ptr: vec![0],
                ..CsrArrays::default()
            },
            last_load: None,
            observer,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn is_directed(&self) -> bool {
        self.config.directed
    }

    pub fn row_ptr(&self) -> &[u32] {
        &self.csr.row_ptr
    }

    pub fn col_indices(&self) -> &[u32] {
        &self.csr.col_indices
    }

    pub fn values(&self) -> &[f64] {
        &self.csr.values
    }

    /// Statistics from the most recent successful load
    pub fn last_load_stats(&self) -> Option<LoadStats> {
        self.last_load
    }

    pub(crate) fn emit(&self, event: GraphEvent) {
        self.observer.on_event(&event);
    }

    /// Load from an in-memory or streaming source
    ///
    /// `source` names the input in diagnostics and errors.
    pub fn load_from_reader<R: BufRead>(&mut self, reader: R, source: &str) -> Result<()> {
        let started = Instant::now();
        self.emit(GraphEvent::LoadStarted {
            source: source.to_string(),
        });

        let parsed = EdgeListLoader::new(self.config.directed)
            .parse_reader(reader)
            .map_err(|err| GraphError::Read {
                path: source.into(),
                source: err,
            });
        self.finish_load(source, parsed, started)
    }

    fn load_path(&mut self, path: &Path) -> Result<()> {
        let started = Instant::now();
        let source = path.display().to_string();
        self.emit(GraphEvent::LoadStarted {
            source: source.clone(),
        });

        let parsed = EdgeListLoader::new(self.config.directed).load_path(path);
        self.finish_load(&source, parsed, started)
    }

    fn finish_load(
        &mut self,
        source: &str,
        parsed: Result<(StagingEdges, LoadStats)>,
        started: Instant,
    ) -> Result<()> {
        let built = parsed.and_then(|(staging, stats)| {
            CsrBuilder::new(self.config.default_weight)
                .build(staging)
                .map(|csr| (csr, stats))
        });

        let (csr, stats) = match built {
            Ok(built) => built,
            Err(err) => {
                self.emit(GraphEvent::LoadFailed {
                    source: source.to_string(),
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        // Old arrays are released here, after the new ones are complete
        self.csr = csr;
        self.last_load = Some(stats);

        self.emit(GraphEvent::LoadCompleted {
            source: source.to_string(),
            stats,
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            memory_mb: self.memory_estimate_mb(),
            elapsed: started.elapsed(),
        });
        Ok(())
    }

    /// Get outgoing edges for a node, empty if out of range
    pub fn outgoing_edges(&self, node: usize) -> &[u32] {
        match self.edge_range(node) {
            Some((start, end)) => &self.csr.col_indices[start..end],
            None => &[],
        }
    }

    /// Weights of a node's outgoing edges, parallel to `outgoing_edges`
    pub fn edge_weights(&self, node: usize) -> &[f64] {
        match self.edge_range(node) {
            Some((start, end)) => &self.csr.values[start..end],
            None => &[],
        }
    }

    /// Check if there's an edge from src to dst
    pub fn has_edge(&self, src: usize, dst: u32) -> bool {
        self.outgoing_edges(src).binary_search(&dst).is_ok()
    }

    /// Get out-degree of a node, `None` if out of range
    pub fn out_degree(&self, node: usize) -> Option<usize> {
        self.edge_range(node).map(|(start, end)| end - start)
    }

    fn edge_range(&self, node: usize) -> Option<(usize, usize)> {
        if node >= self.node_count() {
            return None;
        }
        let start = self.csr.row_ptr[node] as usize;
        let end = self.csr.row_ptr[node + 1] as usize;
        Some((start, end))
    }

    /// Estimate CSR memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        estimate_bytes(&self.csr)
    }
}

/// Bytes held by the CSR arrays, counted by length rather than capacity
pub fn estimate_bytes(csr: &CsrArrays) -> usize {
    (csr.row_ptr.len() + csr.col_indices.len()) * mem::size_of::<u32>()
        + csr.values.len() * mem::size_of::<f64>()
}

impl GraphBackend for CsrGraph {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.load_path(path)
    }

    fn bfs(&self, start: usize, max_depth: u32) -> Vec<u32> {
        algorithms::bfs(self, start, max_depth)
    }

    fn degree(&self, node: usize) -> Option<usize> {
        self.out_degree(node)
    }

    fn neighbors(&self, node: usize) -> &[u32] {
        self.outgoing_edges(node)
    }

    fn node_with_max_degree(&self) -> Option<u32> {
        let mut best: Option<(u32, usize)> = None;
        for (node, window) in self.csr.row_ptr.windows(2).enumerate() {
            let degree = (window[1] - window[0]) as usize;
            if best.map_or(true, |(_, max)| degree > max) {
                best = Some((node as u32, degree));
            }
        }

        let (node, degree) = best?;
        self.emit(GraphEvent::MaxDegreeFound { node, degree });
        Some(node)
    }

    fn node_count(&self) -> usize {
        self.csr.node_count()
    }

    fn edge_count(&self) -> usize {
        self.csr.edge_count()
    }

    fn memory_estimate_mb(&self) -> usize {
        self.memory_usage() / BYTES_PER_MB
    }

    fn describe(&self) -> GraphSummary {
        GraphSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            directed: self.config.directed,
            memory_mb: self.memory_estimate_mb(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::testing::RecordingObserver;
    use crate::observe::NullObserver;
    use std::io::Cursor;

    const TRIANGLE: &str = "0 1\n1 2\n2 0\n0 1\n# comment\n";

    fn load(input: &str, directed: bool) -> CsrGraph {
        let mut graph =
            CsrGraph::with_observer(GraphConfig::new(directed), Arc::new(NullObserver));
        graph.load_from_reader(Cursor::new(input), "test").unwrap();
        graph
    }

    #[test]
    fn starts_empty() {
        let graph = CsrGraph::with_observer(GraphConfig::default(), Arc::new(NullObserver));
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.row_ptr(), &[0]);
        assert_eq!(graph.node_with_max_degree(), None);
        assert_eq!(graph.degree(0), None);
        assert!(graph.last_load_stats().is_none());
    }

    #[test]
    fn triangle_scenario() {
        let graph = load(TRIANGLE, true);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        for node in 0..3 {
            assert_eq!(graph.degree(node), Some(1));
        }
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(2), &[0]);
        assert_eq!(graph.node_with_max_degree(), Some(0));
    }

    #[test]
    fn out_of_range_queries() {
        let graph = load(TRIANGLE, true);
        assert_eq!(graph.degree(3), None);
        assert!(graph.neighbors(3).is_empty());
        assert!(graph.edge_weights(99).is_empty());
        assert!(!graph.has_edge(7, 0));
    }

    #[test]
    fn row_ptr_invariants() {
        let graph = load("5 1\n0 3\n3 3\n0 1\n2 5\n", false);
        let row_ptr = graph.row_ptr();
        assert_eq!(row_ptr[0], 0);
        assert_eq!(row_ptr[graph.node_count()] as usize, graph.edge_count());
        assert!(row_ptr.windows(2).all(|w| w[0] <= w[1]));

        let total: usize = (0..graph.node_count())
            .map(|n| graph.degree(n).unwrap())
            .sum();
        assert_eq!(total, graph.edge_count());
        for node in 0..graph.node_count() {
            assert_eq!(graph.degree(node).unwrap(), graph.neighbors(node).len());
            assert!(graph.neighbors(node).windows(2).all(|w| w[0] < w[1]));
        }
        assert!(graph
            .col_indices()
            .iter()
            .all(|&c| (c as usize) < graph.node_count()));
    }

    #[test]
    fn undirected_materializes_both_directions() {
        let graph = load("0 4\n0 4\n", false);
        assert!(graph.has_edge(0, 4));
        assert!(graph.has_edge(4, 0));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn self_loops_are_kept() {
        let graph = load("1 1\n1 1\n1 0\n", true);
        assert_eq!(graph.neighbors(1), &[0, 1]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn max_degree_prefers_lowest_id() {
        let graph = load("3 0\n3 1\n1 0\n1 2\n", true);
        assert_eq!(graph.degree(1), Some(2));
        assert_eq!(graph.degree(3), Some(2));
        assert_eq!(graph.node_with_max_degree(), Some(1));
    }

    #[test]
    fn max_degree_on_empty_and_reloaded_graphs() {
        let graph = load("", true);
        assert_eq!(graph.node_with_max_degree(), None);

        let mut graph = load("0 0\n", true);
        graph.load_from_reader(Cursor::new("2 2\n"), "test").unwrap();
        assert_eq!(graph.node_with_max_degree(), Some(2));
    }

    #[test]
    fn edge_weights_follow_config() {
        let mut graph = CsrGraph::with_observer(
            GraphConfig::new(true).with_default_weight(2.5),
            Arc::new(NullObserver),
        );
        graph
            .load_from_reader(Cursor::new("0 1\n0 2\n"), "weights")
            .unwrap();
        assert_eq!(graph.edge_weights(0), &[2.5, 2.5]);
        assert_eq!(graph.values().len(), graph.edge_count());
    }

    #[test]
    fn memory_estimate_counts_array_lengths() {
        let graph = load(TRIANGLE, true);
        // (4 + 3) * 4 + 3 * 8
        assert_eq!(graph.memory_usage(), 52);
        assert_eq!(graph.memory_estimate_mb(), 0);
    }

    #[test]
    fn memory_estimate_truncates_to_megabytes() {
        let csr = CsrArrays {
            row_ptr: vec![0; 200_001],
            col_indices: vec![0; 200_000],
            values: vec![1.0; 200_000],
        };
        // 800_004 + 800_000 + 1_600_000 bytes
        assert_eq!(estimate_bytes(&csr), 3_200_004);
        assert_eq!(estimate_bytes(&csr) / BYTES_PER_MB, 3);
    }

    #[test]
    fn reload_replaces_state() {
        let mut graph = load(TRIANGLE, true);
        graph
            .load_from_reader(Cursor::new("0 5\n"), "second")
            .unwrap();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors(1), &[] as &[u32]);
    }

    #[test]
    fn failed_load_keeps_prior_state() {
        let mut graph = load(TRIANGLE, true);
        let err = graph
            .load(Path::new("/definitely/not/here.txt"))
            .unwrap_err();
        assert!(matches!(err, GraphError::FileOpen { .. }));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.neighbors(1), &[2]);
    }

    #[test]
    fn describe_reports_summary() {
        let graph = load(TRIANGLE, false);
        let summary = graph.describe();
        assert_eq!(
            summary,
            GraphSummary {
                node_count: 3,
                edge_count: 6,
                directed: false,
                memory_mb: 0,
            }
        );
        let text = summary.to_string();
        assert!(text.contains("Nodes:    3"));
        assert!(text.contains("Directed: no"));
    }

    #[test]
    fn emits_load_and_query_events() {
        let observer = Arc::new(RecordingObserver::default());
        let mut graph = CsrGraph::with_observer(GraphConfig::default(), observer.clone());
        graph.load_from_reader(Cursor::new(TRIANGLE), "mem").unwrap();
        graph.node_with_max_degree();

        let events = observer.events();
        assert!(matches!(&events[0], GraphEvent::LoadStarted { source } if source == "mem"));
        match &events[1] {
            GraphEvent::LoadCompleted {
                stats,
                node_count,
                edge_count,
                ..
            } => {
                assert_eq!(stats.parsed_edges, 4);
                assert_eq!(*node_count, 3);
                assert_eq!(*edge_count, 3);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(
            events[2],
            GraphEvent::MaxDegreeFound { node: 0, degree: 1 }
        );
    }

    #[test]
    fn emits_load_failed() {
        let observer = Arc::new(RecordingObserver::default());
        let mut graph = CsrGraph::with_observer(GraphConfig::default(), observer.clone());
        assert!(graph.load(Path::new("/missing/edges.txt")).is_err());
        assert!(matches!(
            observer.events().last(),
            Some(GraphEvent::LoadFailed { .. })
        ));
    }
}
