//! Core library functions for the CSR graph explorer

pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod observe;
pub mod storage;
pub mod viz;

pub use config::GraphConfig;
pub use error::GraphError;
pub use graph::{BfsResult, CsrGraph, GraphBackend, GraphSummary};
pub use observe::{GraphEvent, GraphObserver, LogObserver, NullObserver};
