use rayon::prelude::*;

use super::{KnownArtistIndex, MentionMatcher, MentionRow};
use crate::error::Result;
use crate::ingest::ArtistRecord;

/// Scan one article for mentions of every other known artist.
pub fn scan_record(
    index: &KnownArtistIndex,
    matcher: &MentionMatcher,
    record: &ArtistRecord,
) -> MentionRow {
    let own_id = index.id(&record.name);

    let mentioned = matcher
        .count_mentions(&record.body_text, own_id)
        .into_iter()
        .map(|(id, count)| (index.name(id).to_string(), count))
        .collect();

    MentionRow {
        artist_name: record.name.clone(),
        mentioned,
        category: record.category.clone(),
    }
}

/// Scan every record against a prebuilt index and matcher, one task per record.
///
/// Runs on the current rayon pool. Rows come back in record order.
pub fn build_matrix(
    records: &[ArtistRecord],
    index: &KnownArtistIndex,
    matcher: &MentionMatcher,
) -> Vec<MentionRow> {
    records
        .par_iter()
        .map(|record| scan_record(index, matcher, record))
        .collect()
}

/// Build the index and matcher from `records`, then scan them all.
///
/// Fails with `DuplicateArtistName` before any scan starts if two records
/// share a name.
pub fn build_mention_matrix(records: &[ArtistRecord]) -> Result<Vec<MentionRow>> {
    let index = KnownArtistIndex::from_records(records)?;
    log::info!("Known artist index: {} names", index.len());

    let matcher = MentionMatcher::new(&index)?;
    let rows = build_matrix(records, &index, &matcher);

    let links: usize = rows.iter().map(|r| r.mentioned.len()).sum();
    log::info!("Scanned {} articles, {} distinct mention links", rows.len(), links);

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MusictreeError;

    fn record(name: &str, body: &str) -> ArtistRecord {
        ArtistRecord {
            name: name.to_string(),
            category: "singers".to_string(),
            body_text: body.to_string(),
        }
    }

    fn pairs(items: &[(&str, u64)]) -> Vec<(String, u64)> {
        items.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    fn small_corpus() -> Vec<ArtistRecord> {
        vec![
            record("Alpha", "Alpha toured with Beta twice: Beta, then Gamma opened."),
            record("Beta", "Beta admired Alpha."),
            record("Gamma", ""),
        ]
    }

    #[test]
    fn test_build_matrix_counts() {
        let rows = build_mention_matrix(&small_corpus()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].artist_name, "Alpha");
        assert_eq!(rows[0].mentioned, pairs(&[("Beta", 2), ("Gamma", 1)]));
        assert_eq!(rows[1].mentioned, pairs(&[("Alpha", 1)]));
        assert!(rows[2].mentioned.is_empty());
        assert_eq!(rows[2].category, "singers");
    }

    #[test]
    fn test_no_self_mentions() {
        let rows = build_mention_matrix(&small_corpus()).unwrap();
        for row in &rows {
            assert!(row.mentioned.iter().all(|(name, _)| name != &row.artist_name));
            assert!(row.mentioned.iter().all(|(_, count)| *count >= 1));
        }
    }

    #[test]
    fn test_longest_match_in_matrix() {
        let records = vec![
            record("Lennon", "A surname."),
            record("John Lennon", "Singer."),
            record("The Beatles", "Featured John Lennon."),
        ];
        let rows = build_mention_matrix(&records).unwrap();
        let beatles = rows.iter().find(|r| r.artist_name == "The Beatles").unwrap();
        assert_eq!(beatles.mentioned, pairs(&[("John Lennon", 1)]));
    }

    #[test]
    fn test_duplicate_names_are_fatal() {
        let records = vec![record("Cher", "a"), record("Cher", "b")];
        let err = build_mention_matrix(&records).unwrap_err();
        assert!(matches!(err, MusictreeError::DuplicateArtistName(ref n) if n == "Cher"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let first = build_mention_matrix(&small_corpus()).unwrap();
        let second = build_mention_matrix(&small_corpus()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_on_fixed_pool() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let rows = pool.install(|| build_mention_matrix(&small_corpus())).unwrap();
        assert_eq!(rows[0].mentioned, pairs(&[("Beta", 2), ("Gamma", 1)]));
    }
}
