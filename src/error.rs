//! Error taxonomy for graph loading

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a graph
///
/// Query failures (out-of-range node ids) are not errors; they are reported
/// through `Option` or empty results.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("cannot open edge list {}: {}", .path.display(), .source)]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading edge list {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("too many edges: {0} exceeds the 32-bit index range")]
    TooManyEdges(usize),
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = GraphError::FileOpen {
            path: PathBuf::from("/tmp/missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "cannot open edge list /tmp/missing.txt: not found");

        let err = GraphError::TooManyEdges(5_000_000_000);
        assert!(err.to_string().contains("5000000000"));
    }
}
