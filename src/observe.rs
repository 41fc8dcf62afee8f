//! Observability hooks injected into a graph at construction

use std::time::Duration;

use crate::data::LoadStats;

/// Diagnostic events emitted by graph operations
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    LoadStarted {
        source: String,
    },
    LoadFailed {
        source: String,
        reason: String,
    },
    LoadCompleted {
        source: String,
        stats: LoadStats,
        node_count: usize,
        edge_count: usize,
        memory_mb: usize,
        elapsed: Duration,
    },
    BfsStarted {
        start: usize,
        max_depth: u32,
    },
    BfsInvalidStart {
        start: usize,
        node_count: usize,
    },
    BfsCompleted {
        start: usize,
        visited: usize,
        elapsed: Duration,
    },
    MaxDegreeFound {
        node: u32,
        degree: usize,
    },
}

/// Receiver for graph diagnostics
///
/// Implementations must be cheap; events are emitted synchronously on the
/// calling thread.
pub trait GraphObserver: Send + Sync {
    fn on_event(&self, event: &GraphEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl GraphObserver for LogObserver {
    fn on_event(&self, event: &GraphEvent) {
        match event {
            GraphEvent::LoadStarted { source } => {
                log::info!("Loading edge list: {}", source);
            }
            GraphEvent::LoadFailed { source, reason } => {
                log::warn!("Failed to load {}: {}", source, reason);
            }
            GraphEvent::LoadCompleted {
                source,
                stats,
                node_count,
                edge_count,
                memory_mb,
                elapsed,
            } => {
                log::info!(
                    "Loaded {}: {} nodes, {} edges in {}ms (~{} MB)",
                    source,
                    node_count,
                    edge_count,
                    elapsed.as_millis(),
                    memory_mb
                );
                log::debug!(
                    "{} lines read, {} comments, {} skipped, {} edges parsed before dedup",
                    stats.lines_read,
                    stats.comment_lines,
                    stats.skipped_lines,
                    stats.parsed_edges
                );
            }
            GraphEvent::BfsStarted { start, max_depth } => {
                log::debug!("Running BFS from node {} to depth {}", start, max_depth);
            }
            GraphEvent::BfsInvalidStart { start, node_count } => {
                log::warn!(
                    "Invalid BFS start node {} (graph has {} nodes)",
                    start,
                    node_count
                );
            }
            GraphEvent::BfsCompleted {
                start,
                visited,
                elapsed,
            } => {
                log::info!(
                    "BFS from node {} found {} nodes in {}us",
                    start,
                    visited,
                    elapsed.as_micros()
                );
            }
            GraphEvent::MaxDegreeFound { node, degree } => {
                log::info!("Node with max degree: {} (degree {})", node, degree);
            }
        }
    }
}

/// Discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl GraphObserver for NullObserver {
    fn on_event(&self, _event: &GraphEvent) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Collects every event for later assertions
    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<GraphEvent>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<GraphEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl GraphObserver for RecordingObserver {
        fn on_event(&self, event: &GraphEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }
}
