//! Configuration management for the CSR graph explorer

use serde::Serialize;

/// Construction-time settings for a graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphConfig {
    /// Whether edges are kept as given (`true`) or mirrored (`false`)
    pub directed: bool,

    /// Weight stored in the parallel `values` array for every edge
    pub default_weight: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            directed: true,
            default_weight: 1.0,
        }
    }
}

impl GraphConfig {
    /// Create a configuration with the given directedness and the default weight
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }

    /// Override the uniform edge weight
    pub fn with_default_weight(mut self, default_weight: f64) -> Self {
        self.default_weight = default_weight;
        self
    }
}
