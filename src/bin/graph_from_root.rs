use clap::Parser;
use musictree::Config;
use musictree::graph::Direction;
use musictree::pipeline::extract_graph;
use std::path::PathBuf;
use anyhow::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "graph_from_root")]
#[command(about = "Extract the artists reachable from a root by following the mentions in its article")]
struct Args {
    /// Artist the neighbourhood starts from
    #[arg(long, default_value = "Bob Dylan")]
    root_node: String,

    /// Maximum number of hops from the root
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    depth: i64,

    /// Matrix file to read
    #[arg(long)]
    relative_path_matrix: Option<PathBuf>,

    /// Directory the edge list and node table are written to
    #[arg(long)]
    relative_path_graph_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    let config = Config::load()?;
    config.validate()?;
    let matrix_path = args.relative_path_matrix.unwrap_or_else(|| config.matrix_path());
    let graph_dir = args.relative_path_graph_csv.unwrap_or_else(|| config.paths.graph_dir.clone());

    log::info!("Root: {}, depth: {}", args.root_node, args.depth);
    let (neighborhood, files) = extract_graph(
        &matrix_path,
        &graph_dir,
        &args.root_node,
        args.depth,
        Direction::FromRoot,
    )
    .with_context(|| format!("Failed to extract the neighbourhood of {}", args.root_node))?;

    log::info!("Nodes: {} ({})", neighborhood.nodes.len(), files.nodes.display());
    log::info!("Edges: {} ({})", neighborhood.edges.len(), files.edges.display());

    Ok(())
}
