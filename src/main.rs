use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use rayon::prelude::*;

use csr_graph_explorer::graph::BfsResult;
use csr_graph_explorer::{storage, viz, CsrGraph, GraphBackend, GraphConfig};

#[derive(Parser, Debug)]
#[clap(
    name = "csr-graph-explorer",
    about = "Load a sparse edge list into CSR form and run structural queries"
)]
struct Cli {
    /// Path to input edge list (`src dst` per line)
    #[clap(long)]
    input: PathBuf,

    /// Mirror every edge instead of treating the list as directed
    #[clap(long)]
    undirected: bool,

    /// Start node for a bounded BFS (repeatable)
    #[clap(long = "bfs-start", allow_negative_numbers = true)]
    bfs_start: Vec<i64>,

    /// Maximum BFS depth (inclusive)
    #[clap(long, default_value = "2")]
    max_depth: u32,

    /// Node whose degree and neighbors should be printed (repeatable)
    #[clap(long, allow_negative_numbers = true)]
    degree: Vec<i64>,

    /// Report the node with the highest out-degree
    #[clap(long)]
    max_degree: bool,

    /// Directory for JSON reports and GraphML exports
    #[clap(long)]
    output_dir: Option<PathBuf>,

    /// Print the graph summary as JSON
    #[clap(long)]
    json: bool,

    /// Number of worker threads for BFS batches (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

/// Negative ids can never be valid; map them past the end of any graph
fn node_index(id: i64) -> usize {
    usize::try_from(id).unwrap_or(usize::MAX)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::debug!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let mut graph = CsrGraph::new(GraphConfig::new(!args.undirected));
    graph
        .load(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;

    let summary = graph.describe();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary);
    }

    if args.max_degree {
        match graph.node_with_max_degree() {
            Some(node) => println!(
                "Node with max degree: {} (degree {})",
                node,
                graph.degree(node as usize).unwrap_or(0)
            ),
            None => println!("Node with max degree: none (empty graph)"),
        }
    }

    for &id in &args.degree {
        let node = node_index(id);
        match graph.degree(node) {
            Some(degree) => println!(
                "Node {}: degree {} -> [{}]",
                id,
                degree,
                graph.neighbors(node).iter().join(", ")
            ),
            None => println!("Node {}: out of range", id),
        }
    }

    // Loaded graph is immutable, so BFS batches can share it across threads
    let results: Vec<BfsResult> = args
        .bfs_start
        .par_iter()
        .map(|&id| BfsResult::collect(&graph, node_index(id), args.max_depth))
        .collect();

    for (id, result) in args.bfs_start.iter().zip(&results) {
        if result.nodes.is_empty() {
            println!("BFS from {}: invalid start node", id);
            continue;
        }
        println!(
            "BFS from {} (depth {}): {} nodes, {} edges -> [{}]",
            id,
            result.max_depth,
            result.nodes.len(),
            result.edges.len(),
            result.nodes.iter().join(", ")
        );
    }

    if let Some(output_dir) = &args.output_dir {
        let valid: Vec<BfsResult> = results
            .into_iter()
            .filter(|r| !r.nodes.is_empty())
            .collect();

        storage::save_results(&graph, &valid, output_dir)?;

        let viz_dir = output_dir.join("visualizations");
        for result in &valid {
            viz::write_bfs_graphml(&graph, result, &viz_dir)?;
        }

        log::info!("Results saved to {}", output_dir.display());
    }

    Ok(())
}
