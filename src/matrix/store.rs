//! Matrix persistence as `ARTIST_NAME,MENTIONED_ARTISTS,ARTIST_CATEGORY` CSV.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::MentionRow;
use crate::error::{MusictreeError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct MatrixCsvRow {
    #[serde(rename = "ARTIST_NAME")]
    artist_name: String,
    #[serde(rename = "MENTIONED_ARTISTS")]
    mentioned_artists: String,
    #[serde(rename = "ARTIST_CATEGORY")]
    artist_category: String,
}

/// Serialize a mention list as `[["name",count],...]`.
pub fn encode_mentions(mentioned: &[(String, u64)]) -> Result<String> {
    Ok(serde_json::to_string(mentioned)?)
}

/// Parse a mention list cell. An empty cell is an empty list.
pub fn decode_mentions(cell: &str) -> Result<Vec<(String, u64)>> {
    if cell.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mentioned: Vec<(String, u64)> = serde_json::from_str(cell)?;
    if let Some((name, _)) = mentioned.iter().find(|(_, count)| *count == 0) {
        return Err(MusictreeError::Parse(format!(
            "mention of '{}' has a zero count",
            name
        )));
    }

    Ok(mentioned)
}

/// Write the matrix, creating the parent directory if needed.
pub fn write_matrix(path: &Path, rows: &[MentionRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    // explicit header: an empty matrix still gets one
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(["ARTIST_NAME", "MENTIONED_ARTISTS", "ARTIST_CATEGORY"])?;
    for row in rows {
        writer.serialize(MatrixCsvRow {
            artist_name: row.artist_name.clone(),
            mentioned_artists: encode_mentions(&row.mentioned)?,
            artist_category: row.category.clone(),
        })?;
    }
    writer.flush()?;

    log::info!("Wrote matrix with {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Read a matrix written by [`write_matrix`]. Any bad row fails the read.
pub fn read_matrix(path: &Path) -> Result<Vec<MentionRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();

    for (idx, record) in reader.deserialize::<MatrixCsvRow>().enumerate() {
        let record = record?;
        let mentioned = decode_mentions(&record.mentioned_artists).map_err(|e| {
            MusictreeError::Parse(format!(
                "{} row {} ({}): {}",
                path.display(),
                idx + 1,
                record.artist_name,
                e
            ))
        })?;

        rows.push(MentionRow {
            artist_name: record.artist_name,
            mentioned,
            category: record.artist_category,
        });
    }

    Ok(rows)
}
