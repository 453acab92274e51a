use clap::Parser;
use musictree::Config;
use musictree::pipeline::{build_matrix_from_csv, build_worker_pool, normalize_to_csv};
use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "build_matrix")]
#[command(about = "Normalize artist dumps into cleaned CSVs and build the mention matrix")]
struct Args {
    /// Directory holding the category folders of XML dumps
    #[arg(long)]
    relative_path_xml: Option<PathBuf>,

    /// Directory for the cleaned per-category CSVs
    #[arg(long)]
    relative_path_csv: Option<PathBuf>,

    /// Directory the matrix is written to
    #[arg(long)]
    relative_path_matrix: Option<PathBuf>,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Reuse the cleaned CSVs already in place
    #[arg(long)]
    skip_normalize: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(dir) = args.relative_path_xml {
        config.paths.xml_dir = dir;
    }
    if let Some(dir) = args.relative_path_csv {
        config.paths.csv_dir = dir;
    }
    if let Some(dir) = args.relative_path_matrix {
        config.paths.matrix_dir = dir;
    }
    if let Some(workers) = args.workers {
        config.pipeline.workers = workers;
    }
    config.validate()?;

    let pool = build_worker_pool(config.workers())?;
    log::info!("Using {} worker threads", pool.current_num_threads());

    let start = Instant::now();

    if args.skip_normalize {
        log::info!("Step 1/2: skipped, reusing {}", config.paths.csv_dir.display());
    } else {
        log::info!(
            "Step 1/2: normalizing {} into {}",
            config.paths.xml_dir.display(),
            config.paths.csv_dir.display()
        );
        let report = normalize_to_csv(
            &pool,
            &config.paths.xml_dir,
            &config.paths.csv_dir,
            config.pipeline.skip_category_pages,
        )
        .context("Normalization failed")?;
        if !report.warnings.is_empty() {
            log::warn!("{} dumps or articles were skipped", report.warnings.len());
        }
        if report.records_overridden > 0 {
            log::info!("{} duplicate titles resolved to the later dump", report.records_overridden);
        }
    }

    log::info!("Step 2/2: building mention matrix");
    let built = build_matrix_from_csv(&pool, &config.paths.csv_dir, &config.paths.matrix_dir)
        .context("Matrix build failed")?;

    log::info!("=== Matrix Complete ===");
    log::info!("Artists: {}", built.artists);
    log::info!("Links: {}", built.links);
    log::info!("Matrix: {}", built.matrix_path.display());
    log::info!("Time: {:?}", start.elapsed());
    if !built.warnings.is_empty() {
        log::warn!("{} cleaned inputs were skipped. Check logs above for details.", built.warnings.len());
    }

    Ok(())
}
