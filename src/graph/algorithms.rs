//! Traversal algorithms over CSR adjacency

use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::graph::{CsrGraph, GraphBackend};
use crate::observe::GraphEvent;

/// Visited nodes of a bounded BFS together with the edges among them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfsResult {
    pub start: usize,
    pub max_depth: u32,
    /// Nodes in discovery order
    pub nodes: Vec<u32>,
    pub edges: Vec<(u32, u32)>,
}

impl BfsResult {
    /// Run a BFS and collect the induced subgraph of the visited nodes
    pub fn collect(graph: &CsrGraph, start: usize, max_depth: u32) -> Self {
        let nodes = bfs(graph, start, max_depth);
        let edges = induced_edges(graph, &nodes);
        Self {
            start,
            max_depth,
            nodes,
            edges,
        }
    }
}

/// Bounded breadth-first traversal from `start`
///
/// Returns nodes in discovery order, each at most once. Nodes reached at
/// `max_depth` are reported but not expanded. An out-of-range start yields
/// an empty result.
pub fn bfs(graph: &CsrGraph, start: usize, max_depth: u32) -> Vec<u32> {
    let started = Instant::now();
    graph.emit(GraphEvent::BfsStarted { start, max_depth });

    let node_count = graph.node_count();
    if start >= node_count {
        graph.emit(GraphEvent::BfsInvalidStart { start, node_count });
        return Vec::new();
    }

    let mut visited = vec![false; node_count];
    let mut order = Vec::new();
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();

    visited[start] = true;
    order.push(start as u32);
    queue.push_back((start as u32, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for &neighbor in graph.outgoing_edges(current as usize) {
            let seen = &mut visited[neighbor as usize];
            if !*seen {
                *seen = true;
                order.push(neighbor);
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    graph.emit(GraphEvent::BfsCompleted {
        start,
        visited: order.len(),
        elapsed: started.elapsed(),
    });
    order
}

/// Every stored edge whose endpoints are both in `nodes`
///
/// Edges are grouped by source in the order sources appear in `nodes`;
/// ids outside the graph are ignored.
pub fn induced_edges(graph: &CsrGraph, nodes: &[u32]) -> Vec<(u32, u32)> {
    let mut member = vec![false; graph.node_count()];
    for &node in nodes {
        if let Some(slot) = member.get_mut(node as usize) {
            *slot = true;
        }
    }

    let mut expanded = vec![false; member.len()];
    let mut edges = Vec::new();
    for &src in nodes {
        let src_idx = src as usize;
        if !member.get(src_idx).copied().unwrap_or(false) || expanded[src_idx] {
            continue;
        }
        expanded[src_idx] = true;
        for &dst in graph.outgoing_edges(src_idx) {
            if member[dst as usize] {
                edges.push((src, dst));
            }
        }
    }
    edges
}
