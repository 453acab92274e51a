//! Stage orchestration shared by the binaries.
//!
//! Normalizer → Builder → Extractor. The batch stages run on one fixed-size
//! worker pool; the extractor is sequential.

use std::path::{Path, PathBuf};

use crate::error::{MusictreeError, Result};
use crate::graph::{
    Direction, MentionGraph, Neighborhood, NeighborhoodFiles, extract_neighborhood,
    write_neighborhood,
};
use crate::ingest::{
    MarkupStripper, NormalizeReport, discover_dumps, normalize_corpus, read_category_csvs,
    write_category_csvs,
};
use crate::matrix::{MATRIX_FILE_NAME, build_mention_matrix, read_matrix, write_matrix};

/// Result of a matrix build from cleaned CSVs
#[derive(Debug, Default)]
pub struct MatrixBuildReport {
    pub matrix_path: PathBuf,
    pub artists: usize,
    pub links: usize,
    /// Cleaned CSV files or rows that could not be read.
    pub warnings: Vec<String>,
}

/// Fixed-size pool for the batch stages.
pub fn build_worker_pool(workers: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("musictree-worker-{}", i))
        .build()
        .map_err(|e| MusictreeError::Config(format!("cannot start worker pool: {}", e)))
}

/// Normalize every dump under `xml_dir` into per-category CSVs in `csv_dir`.
pub fn normalize_to_csv(
    pool: &rayon::ThreadPool,
    xml_dir: &Path,
    csv_dir: &Path,
    skip_category_pages: bool,
) -> Result<NormalizeReport> {
    let dumps = discover_dumps(xml_dir)?;
    if dumps.is_empty() {
        log::warn!("No dumps found in {}", xml_dir.display());
    }

    let stripper = MarkupStripper::new()?;
    let corpus = pool.install(|| normalize_corpus(&stripper, &dumps, skip_category_pages));

    write_category_csvs(csv_dir, &corpus.records)?;
    log::info!(
        "Normalized {} artists from {} dumps ({} failed, {} non-article pages, {} malformed)",
        corpus.records.len(),
        corpus.report.files_processed,
        corpus.report.files_failed,
        corpus.report.pages_skipped,
        corpus.report.records_malformed
    );

    Ok(corpus.report)
}

/// Scan the cleaned CSVs in `csv_dir` and write `matrix_dir/matrix.csv`.
pub fn build_matrix_from_csv(
    pool: &rayon::ThreadPool,
    csv_dir: &Path,
    matrix_dir: &Path,
) -> Result<MatrixBuildReport> {
    let loaded = read_category_csvs(csv_dir)?;
    log::info!("Loaded {} artist records from {}", loaded.records.len(), csv_dir.display());

    let rows = pool.install(|| build_mention_matrix(&loaded.records))?;

    let matrix_path = matrix_dir.join(MATRIX_FILE_NAME);
    write_matrix(&matrix_path, &rows)?;

    Ok(MatrixBuildReport {
        matrix_path,
        artists: rows.len(),
        links: rows.iter().map(|r| r.mentioned.len()).sum(),
        warnings: loaded.warnings,
    })
}

/// Load the matrix, extract one neighbourhood and write it to `graph_dir`.
///
/// Nothing is written when the root is unknown or the depth is negative.
pub fn extract_graph(
    matrix_path: &Path,
    graph_dir: &Path,
    root: &str,
    depth: i64,
    direction: Direction,
) -> Result<(Neighborhood, NeighborhoodFiles)> {
    if depth < 0 {
        return Err(MusictreeError::InvalidDepth(depth));
    }

    let rows = read_matrix(matrix_path)?;
    let graph = MentionGraph::from_rows(&rows)?;
    log::info!("Loaded matrix with {} artists from {}", graph.artist_count(), matrix_path.display());

    let neighborhood = extract_neighborhood(&graph, root, depth, direction)?;
    let files = write_neighborhood(graph_dir, &neighborhood)?;

    Ok((neighborhood, files))
}
