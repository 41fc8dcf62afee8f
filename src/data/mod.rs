//! Input parsing for graph data

pub mod edge_list;

pub use edge_list::{EdgeListLoader, LoadStats, StagingEdges};
