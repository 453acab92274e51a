use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{MusictreeError, Result};

/// A cleaned article: the canonical artist name, its category and prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
    #[serde(rename = "ARTIST_NAME")]
    pub name: String,
    #[serde(rename = "ARTIST_CATEGORY")]
    pub category: String,
    #[serde(rename = "ARTIST_TEXT")]
    pub body_text: String,
}

/// Records read back from the cleaned CSV directory
#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub records: Vec<ArtistRecord>,
    /// One entry per unreadable file or row.
    pub warnings: Vec<String>,
}

/// File name used for a category's CSV. Path separators are not allowed in
/// file names and become `_`.
pub fn category_file_name(category: &str) -> String {
    let safe: String = category
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}.csv", safe)
}

/// Write one CSV per category into `dir`, rows sorted by artist name.
///
/// Returns the written paths in category order.
pub fn write_category_csvs(dir: &Path, records: &[ArtistRecord]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut by_category: BTreeMap<&str, Vec<&ArtistRecord>> = BTreeMap::new();
    for record in records {
        by_category.entry(record.category.as_str()).or_default().push(record);
    }

    let mut written = Vec::with_capacity(by_category.len());
    for (category, mut rows) in by_category {
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        let count = rows.len();

        let path = dir.join(category_file_name(category));
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        log::info!("Wrote {} ({} artists)", path.display(), count);
        written.push(path);
    }

    Ok(written)
}

/// Read every `*.csv` in `dir`, sorted by file name.
///
/// Unreadable files and rows are skipped and reported in `warnings`.
pub fn read_category_csvs(dir: &Path) -> Result<LoadedRecords> {
    if !dir.is_dir() {
        return Err(MusictreeError::Config(format!(
            "cleaned CSV directory does not exist: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|s| s.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut loaded = LoadedRecords::default();
    let total = paths.len();

    for (idx, path) in paths.iter().enumerate() {
        log::info!("[{}/{}] Reading {}", idx + 1, total, path.display());

        let mut reader = match csv::Reader::from_path(path) {
            Ok(reader) => reader,
            Err(e) => {
                let msg = format!("{}: {}", path.display(), e);
                log::warn!("Skipping unreadable CSV {}", msg);
                loaded.warnings.push(msg);
                continue;
            }
        };

        for (row_idx, row) in reader.deserialize::<ArtistRecord>().enumerate() {
            match row {
                Ok(record) if record.name.trim().is_empty() => {
                    let msg = format!("{} row {}: empty artist name", path.display(), row_idx + 1);
                    log::warn!("Skipping malformed row {}", msg);
                    loaded.warnings.push(msg);
                }
                Ok(record) => loaded.records.push(record),
                Err(e) => {
                    let msg = format!("{} row {}: {}", path.display(), row_idx + 1, e);
                    log::warn!("Skipping malformed row {}", msg);
                    loaded.warnings.push(msg);
                }
            }
        }
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(name: &str, category: &str, body: &str) -> ArtistRecord {
        ArtistRecord {
            name: name.to_string(),
            category: category.to_string(),
            body_text: body.to_string(),
        }
    }

    #[test]
    fn test_write_and_read_category_csvs() {
        let temp_dir = TempDir::new().unwrap();
        let records = vec![
            record("The Who", "musical_groups", "English band, \"loud\""),
            record("Bob Dylan", "singers", "Folk singer"),
            record("Boston (band)", "musical_groups", ""),
        ];

        let written = write_category_csvs(temp_dir.path(), &records).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("musical_groups.csv"));
        assert!(written[1].ends_with("singers.csv"));

        let header = std::fs::read_to_string(&written[1]).unwrap();
        assert!(header.starts_with("ARTIST_NAME,ARTIST_CATEGORY,ARTIST_TEXT"));

        let loaded = read_category_csvs(temp_dir.path()).unwrap();
        assert!(loaded.warnings.is_empty());
        let names: Vec<&str> = loaded.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Boston (band)", "The Who", "Bob Dylan"]);
        assert_eq!(loaded.records[1].body_text, "English band, \"loud\"");
        assert_eq!(loaded.records[0].body_text, "");
    }

    #[test]
    fn test_read_skips_malformed_rows() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("singers.csv"),
            "ARTIST_NAME,ARTIST_CATEGORY,ARTIST_TEXT\nBob Dylan,singers,Folk\nbroken row\n",
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let loaded = read_category_csvs(temp_dir.path()).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("row 2"));
    }

    #[test]
    fn test_read_skips_rows_without_name() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("singers.csv"),
            "ARTIST_NAME,ARTIST_CATEGORY,ARTIST_TEXT\nCher,singers,Sang with ABBA\nABBA,singers,Swedish\n,singers,orphan row\n  ,singers,blank\n",
        )
        .unwrap();

        let loaded = read_category_csvs(temp_dir.path()).unwrap();
        let names: Vec<&str> = loaded.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cher", "ABBA"]);
        assert_eq!(loaded.warnings.len(), 2);
        assert!(loaded.warnings[0].contains("row 3"));
        assert!(loaded.warnings[1].contains("empty artist name"));
    }

    #[test]
    fn test_category_file_name() {
        assert_eq!(category_file_name("singers"), "singers.csv");
        assert_eq!(category_file_name("a/b"), "a_b.csv");
    }
}
