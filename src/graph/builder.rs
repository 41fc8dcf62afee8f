//! CSR construction from staged edges

use crate::data::StagingEdges;
use crate::error::{GraphError, Result};

/// Finalized CSR arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsrArrays {
    /// Offset array: row_ptr[i]..row_ptr[i+1] is node i's edge range
    pub row_ptr: Vec<u32>,

    /// Concatenated destination ids, ascending within each node's range
    pub col_indices: Vec<u32>,

    /// Edge weights parallel to `col_indices`
    pub values: Vec<f64>,
}

impl CsrArrays {
    pub fn node_count(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }

    pub fn edge_count(&self) -> usize {
        self.col_indices.len()
    }
}

/// Builds CSR arrays with a single counting-sort pass
#[derive(Debug, Clone, Copy)]
pub struct CsrBuilder {
    default_weight: f64,
}

impl CsrBuilder {
    pub fn new(default_weight: f64) -> Self {
        Self { default_weight }
    }

    /// Consume the staging list and produce CSR arrays
    ///
    /// The staging edges are dropped as soon as the scatter finishes, so only
    /// one edge representation is alive once this returns.
    pub fn build(&self, staging: StagingEdges) -> Result<CsrArrays> {
        let StagingEdges { edges, node_count } = staging;
        let edge_count = edges.len();
        if edge_count > u32::MAX as usize {
            return Err(GraphError::TooManyEdges(edge_count));
        }

        // Count out-degree into row_ptr[src + 1]
        let mut row_ptr = vec![0u32; node_count + 1];
        for &(src, _) in &edges {
            row_ptr[src as usize + 1] += 1;
        }

        // Prefix sum turns counts into offsets
        for i in 1..=node_count {
            row_ptr[i] += row_ptr[i - 1];
        }

        let mut col_indices = vec![0u32; edge_count];
        let values = vec![self.default_weight; edge_count];

        // Per-node write cursor, starting at each node's offset
        let mut cursor = row_ptr[..node_count].to_vec();
        for &(src, dst) in &edges {
            let pos = &mut cursor[src as usize];
            col_indices[*pos as usize] = dst;
            *pos += 1;
        }

        drop(edges);

        Ok(CsrArrays {
            row_ptr,
            col_indices,
            values,
        })
    }
}
