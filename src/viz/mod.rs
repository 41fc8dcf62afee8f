//! Visualization export module

use anyhow::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::graph::{BfsResult, CsrGraph, GraphBackend};

/// Write the BFS subgraph as `bfs_<start>_d<depth>.graphml`
pub fn write_bfs_graphml(graph: &CsrGraph, result: &BfsResult, viz_dir: &Path) -> Result<PathBuf> {
    log::info!(
        "Writing GraphML for BFS from node {} ({} nodes, {} edges)",
        result.start,
        result.nodes.len(),
        result.edges.len()
    );

    fs::create_dir_all(viz_dir)?;

    let path = viz_dir.join(format!("bfs_{}_d{}.graphml", result.start, result.max_depth));
    let mut file = BufWriter::new(File::create(&path)?);
    write_graphml(&mut file, graph, result)?;
    file.flush()?;

    Ok(path)
}

/// Render a BFS subgraph as GraphML
pub fn write_graphml<W: Write>(out: &mut W, graph: &CsrGraph, result: &BfsResult) -> Result<()> {
    let edge_default = if graph.is_directed() { "directed" } else { "undirected" };

    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(out, "<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">")?;
    writeln!(out, "  <key id=\"root\" for=\"node\" attr.name=\"root\" attr.type=\"boolean\"/>")?;
    writeln!(out, "  <key id=\"degree\" for=\"node\" attr.name=\"degree\" attr.type=\"int\"/>")?;
    writeln!(out, "  <graph id=\"G\" edgedefault=\"{}\">", edge_default)?;

    for &node in &result.nodes {
        let is_root = node as usize == result.start;
        let degree = graph.degree(node as usize).unwrap_or(0);
        writeln!(out, "    <node id=\"n{}\">", node)?;
        writeln!(out, "      <data key=\"root\">{}</data>", is_root)?;
        writeln!(out, "      <data key=\"degree\">{}</data>", degree)?;
        writeln!(out, "    </node>")?;
    }

    for (edge_id, &(src, dst)) in result.edges.iter().enumerate() {
        writeln!(
            out,
            "    <edge id=\"e{}\" source=\"n{}\" target=\"n{}\"/>",
            edge_id, src, dst
        )?;
    }

    writeln!(out, "  </graph>")?;
    writeln!(out, "</graphml>")?;

    Ok(())
}
