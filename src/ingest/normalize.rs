//! Raw article → [`ArtistRecord`] conversion.

use indexmap::IndexMap;
use rayon::prelude::*;
use std::path::Path;

use super::dump::{parse_dump, RawArticle};
use super::records::ArtistRecord;
use super::walker::DumpFile;
use super::wikitext::MarkupStripper;
use crate::error::{MusictreeError, Result};

/// Summary of a normalizer batch
#[derive(Debug, Default)]
pub struct NormalizeReport {
    pub files_processed: usize,
    pub files_failed: usize,
    /// Category and other non-article pages left out on purpose.
    pub pages_skipped: usize,
    /// Articles dropped as `MalformedRecord`.
    pub records_malformed: usize,
    /// Artists seen in more than one batch; the last batch kept the record.
    pub records_overridden: usize,
    pub warnings: Vec<String>,
}

/// Records produced from every dump, merged by name
#[derive(Debug, Default)]
pub struct NormalizedCorpus {
    pub records: Vec<ArtistRecord>,
    pub report: NormalizeReport,
}

/// Output of a single dump
#[derive(Debug, Default)]
struct DumpOutcome {
    records: Vec<ArtistRecord>,
    pages_skipped: usize,
    malformed: Vec<String>,
}

fn is_non_article(title: &str, namespace: Option<i64>) -> bool {
    title.contains("Category:") || namespace.is_some_and(|ns| ns != 0)
}

/// Turn one raw page into a record.
///
/// Returns `Ok(None)` for pages skipped on purpose (subcategory listings),
/// `MalformedRecord` when the title or body is missing.
pub fn normalize_article(
    stripper: &MarkupStripper,
    article: RawArticle,
    category: &str,
    source_path: &Path,
    skip_category_pages: bool,
) -> Result<Option<ArtistRecord>> {
    let malformed = |reason: &str| MusictreeError::MalformedRecord {
        source_path: source_path.to_path_buf(),
        reason: reason.to_string(),
    };

    let title = article
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| malformed("page has no title"))?;

    if skip_category_pages && is_non_article(title, article.namespace) {
        return Ok(None);
    }

    let text = article
        .text
        .as_deref()
        .ok_or_else(|| malformed(&format!("page '{}' has no text", title)))?;

    Ok(Some(ArtistRecord {
        name: title.to_string(),
        category: category.to_string(),
        body_text: stripper.strip(text),
    }))
}

fn normalize_dump(
    stripper: &MarkupStripper,
    dump: &DumpFile,
    skip_category_pages: bool,
) -> Result<DumpOutcome> {
    let content = std::fs::read_to_string(&dump.absolute_path)?;
    let articles = parse_dump(&content, &dump.relative_path)?;

    let results: Vec<Result<Option<ArtistRecord>>> = articles
        .into_par_iter()
        .map(|article| {
            normalize_article(
                stripper,
                article,
                &dump.category,
                Path::new(&dump.relative_path),
                skip_category_pages,
            )
        })
        .collect();

    let mut outcome = DumpOutcome::default();
    for result in results {
        match result {
            Ok(Some(record)) => outcome.records.push(record),
            Ok(None) => outcome.pages_skipped += 1,
            Err(e) => outcome.malformed.push(e.to_string()),
        }
    }

    Ok(outcome)
}

/// Normalize every dump, one task per article.
///
/// Must be called inside the worker pool that should run the tasks. A dump
/// that cannot be read or parsed is skipped with a warning. Records are merged
/// in dump order; an artist exported under several categories keeps the last
/// one seen.
pub fn normalize_corpus(
    stripper: &MarkupStripper,
    dumps: &[DumpFile],
    skip_category_pages: bool,
) -> NormalizedCorpus {
    let outcomes: Vec<Result<DumpOutcome>> = dumps
        .par_iter()
        .map(|dump| normalize_dump(stripper, dump, skip_category_pages))
        .collect();

    let mut report = NormalizeReport::default();
    let mut merged: IndexMap<String, ArtistRecord> = IndexMap::new();
    let total = dumps.len();

    for (idx, (dump, outcome)) in dumps.iter().zip(outcomes).enumerate() {
        log::info!("[{}/{}] Processed {}", idx + 1, total, dump.relative_path);

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Skipping dump {}: {}", dump.relative_path, e);
                report.files_failed += 1;
                report.warnings.push(format!("{}: {}", dump.relative_path, e));
                continue;
            }
        };

        report.files_processed += 1;
        report.pages_skipped += outcome.pages_skipped;
        report.records_malformed += outcome.malformed.len();
        for msg in outcome.malformed {
            log::warn!("{}", msg);
            report.warnings.push(msg);
        }

        for record in outcome.records {
            if let Some(previous) = merged.get(&record.name) {
                if previous.category != record.category {
                    log::debug!(
                        "{} re-exported under {} (was {})",
                        record.name,
                        record.category,
                        previous.category
                    );
                }
                report.records_overridden += 1;
            }
            merged.insert(record.name.clone(), record);
        }
    }

    NormalizedCorpus {
        records: merged.into_values().collect(),
        report,
    }
}
