//! Results persistence module

use anyhow::Result;
use serde_json::{json, to_string_pretty};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::graph::{BfsResult, CsrGraph, GraphBackend};

/// Degrees at or above this value share the last bucket
const MAX_DEGREE_BUCKET: usize = 100;

/// Save the graph summary and any BFS results to the specified directory
pub fn save_results(graph: &CsrGraph, bfs_results: &[BfsResult], output_dir: &Path) -> Result<()> {
    log::info!("Saving results to {}", output_dir.display());

    fs::create_dir_all(output_dir)?;

    save_summary(graph, output_dir)?;
    save_degree_distribution(graph, output_dir)?;

    for result in bfs_results {
        save_bfs_result(result, output_dir)?;
    }

    log::info!("Results saved successfully");

    Ok(())
}

/// Write `summary.json`
pub fn save_summary(graph: &CsrGraph, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("summary.json");
    let mut file = File::create(&path)?;

    let summary = graph.describe();
    let max_degree = graph
        .node_with_max_degree()
        .map(|node| json!({ "node": node, "degree": graph.degree(node as usize) }));

    let json = json!({
        "node_count": summary.node_count,
        "edge_count": summary.edge_count,
        "directed": summary.directed,
        "memory_mb": summary.memory_mb,
        "avg_degree": average_degree(graph),
        "max_degree": max_degree,
        "load_stats": graph.last_load_stats(),
        "config": graph.config(),
    });

    file.write_all(to_string_pretty(&json)?.as_bytes())?;

    Ok(path)
}

/// Write `degree_distribution.json` with buckets 0..=100
pub fn save_degree_distribution(graph: &CsrGraph, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join("degree_distribution.json");
    let mut file = File::create(&path)?;

    let stats = json!({
        "bucket_cap": MAX_DEGREE_BUCKET,
        "degree_distribution": degree_distribution(graph),
    });

    file.write_all(to_string_pretty(&stats)?.as_bytes())?;

    Ok(path)
}

/// Write `bfs_<start>_d<depth>.json`
pub fn save_bfs_result(result: &BfsResult, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(format!("bfs_{}_d{}.json", result.start, result.max_depth));
    let mut file = File::create(&path)?;

    file.write_all(to_string_pretty(result)?.as_bytes())?;

    Ok(path)
}

/// Count nodes per out-degree, capping at `MAX_DEGREE_BUCKET`
pub fn degree_distribution(graph: &CsrGraph) -> Vec<usize> {
    let mut buckets = vec![0; MAX_DEGREE_BUCKET + 1];
    for node in 0..graph.node_count() {
        let degree = graph.degree(node).unwrap_or(0);
        buckets[degree.min(MAX_DEGREE_BUCKET)] += 1;
    }
    buckets
}

fn average_degree(graph: &CsrGraph) -> f64 {
    if graph.node_count() == 0 {
        return 0.0;
    }
    graph.edge_count() as f64 / graph.node_count() as f64
}
