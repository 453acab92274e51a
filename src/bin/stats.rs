use clap::Parser;
use musictree::Config;
use musictree::matrix::{read_matrix, summarize};
use std::path::PathBuf;
use anyhow::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "stats")]
#[command(about = "Summarize the mention matrix")]
struct Args {
    /// Matrix file to read
    #[arg(long)]
    relative_path_matrix: Option<PathBuf>,

    /// How many of the most mentioned artists to list
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::load()?;
    config.validate()?;
    let matrix_path = args.relative_path_matrix.unwrap_or_else(|| config.matrix_path());

    let rows = read_matrix(&matrix_path)
        .with_context(|| format!("Failed to read {}", matrix_path.display()))?;
    let summary = summarize(&rows, args.top);

    println!("\n=== Mention Matrix Statistics ===\n");
    println!("Matrix: {}", matrix_path.display());
    println!("Artists: {}", summary.artists);
    println!("Artists mentioning nobody: {}", summary.silent_artists);
    println!("Links: {}", summary.links);
    println!("Total mentions: {}", summary.total_mentions);

    if summary.top.is_empty() {
        println!("\nNo mentions recorded.");
        return Ok(());
    }

    println!("\nMost mentioned artists:\n");
    println!("{:-<72}", "");
    println!("{:<40} {:>14} {:>14}", "Artist", "Mentions", "Mentioned by");
    println!("{:-<72}", "");
    for reach in &summary.top {
        println!(
            "{:<40} {:>14} {:>14}",
            reach.name, reach.incoming_total, reach.mentioned_by
        );
    }
    println!("{:-<72}", "");

    Ok(())
}
