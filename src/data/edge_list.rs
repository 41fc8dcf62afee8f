//! Plain-text edge list parsing
//!
//! One edge per line as `src dst`; lines starting with `#` or `%` are
//! comments. Anything else that does not start with two non-negative
//! integers is skipped, including lines that are not valid UTF-8.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Counters collected while parsing an edge list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub lines_read: usize,
    pub comment_lines: usize,
    pub skipped_lines: usize,
    /// Edge lines accepted, before mirroring and deduplication
    pub parsed_edges: usize,
}

/// Sorted, deduplicated directed edges awaiting CSR construction
///
/// Owned by the loader until handed to the builder by value.
#[derive(Debug, Default)]
pub struct StagingEdges {
    pub(crate) edges: Vec<(u32, u32)>,
    pub(crate) node_count: usize,
}

impl StagingEdges {
    /// Sort and deduplicate raw edges, deriving the node count from the max id
    pub fn from_raw(mut edges: Vec<(u32, u32)>) -> Self {
        let node_count = edges
            .iter()
            .map(|&(src, dst)| src.max(dst))
            .max()
            .map_or(0, |max_id| max_id as usize + 1);

        edges.sort_unstable();
        edges.dedup();

        Self { edges, node_count }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }
}

/// Reads edge lists into staging form
#[derive(Debug, Clone, Copy)]
pub struct EdgeListLoader {
    directed: bool,
}

impl EdgeListLoader {
    pub fn new(directed: bool) -> Self {
        Self { directed }
    }

    /// Open `path` and parse it
    pub fn load_path(&self, path: &Path) -> Result<(StagingEdges, LoadStats)> {
        let file = File::open(path).map_err(|source| GraphError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse_reader(BufReader::new(file))
            .map_err(|source| GraphError::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Parse an edge list from any buffered reader
    ///
    /// Lines are handled as raw bytes, so text in other encodings only makes
    /// the affected line malformed. Only I/O failures are errors.
    pub fn parse_reader<R: BufRead>(
        &self,
        mut reader: R,
    ) -> std::io::Result<(StagingEdges, LoadStats)> {
        let mut stats = LoadStats::default();
        let mut edges = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.lines_read += 1;

            let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
            match line.first() {
                None => continue,
                Some(b'#' | b'%') => {
                    stats.comment_lines += 1;
                    continue;
                }
                Some(_) => {}
            }

            let Some((src, dst)) = parse_edge(line) else {
                stats.skipped_lines += 1;
                continue;
            };

            stats.parsed_edges += 1;
            edges.push((src, dst));
            if !self.directed {
                edges.push((dst, src));
            }
        }

        Ok((StagingEdges::from_raw(edges), stats))
    }
}

/// Read two node ids from the start of a line
///
/// Each id is the leading run of digits after optional whitespace and `+`;
/// whatever follows the second id is ignored, so `1 2abc` reads as `(1, 2)`.
fn parse_edge(line: &[u8]) -> Option<(u32, u32)> {
    let (src, rest) = parse_id(line)?;
    let (dst, _) = parse_id(rest)?;
    Some((src, dst))
}

fn parse_id(bytes: &[u8]) -> Option<(u32, &[u8])> {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace())?;
    let bytes = &bytes[start..];
    let bytes = bytes.strip_prefix(b"+").unwrap_or(bytes);

    let len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }

    let mut id: u32 = 0;
    for &digit in &bytes[..len] {
        id = id.checked_mul(10)?.checked_add(u32::from(digit - b'0'))?;
    }
    Some((id, &bytes[len..]))
}
