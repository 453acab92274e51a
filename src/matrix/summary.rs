use std::collections::HashMap;

use super::MentionRow;

/// How widely an artist is referred to by other articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistReach {
    pub name: String,
    /// Sum of mention counts pointing at the artist.
    pub incoming_total: u64,
    /// Number of distinct artists whose article mentions this one.
    pub mentioned_by: usize,
}

/// Aggregate figures over a whole matrix
#[derive(Debug, Clone, Default)]
pub struct MatrixSummary {
    pub artists: usize,
    /// Artists whose article mentions nobody.
    pub silent_artists: usize,
    /// Distinct directed (source, target) pairs.
    pub links: usize,
    pub total_mentions: u64,
    /// Most mentioned artists, by incoming total then name.
    pub top: Vec<ArtistReach>,
}

pub fn summarize(rows: &[MentionRow], top_n: usize) -> MatrixSummary {
    let mut reach: HashMap<&str, (u64, usize)> = HashMap::new();
    let mut summary = MatrixSummary {
        artists: rows.len(),
        ..Default::default()
    };

    for row in rows {
        if row.mentioned.is_empty() {
            summary.silent_artists += 1;
        }
        summary.links += row.mentioned.len();
        for (target, count) in &row.mentioned {
            summary.total_mentions = summary.total_mentions.saturating_add(*count);
            let entry = reach.entry(target.as_str()).or_insert((0, 0));
            entry.0 = entry.0.saturating_add(*count);
            entry.1 += 1;
        }
    }

    let mut top: Vec<ArtistReach> = reach
        .into_iter()
        .map(|(name, (incoming_total, mentioned_by))| ArtistReach {
            name: name.to_string(),
            incoming_total,
            mentioned_by,
        })
        .collect();
    top.sort_by(|a, b| b.incoming_total.cmp(&a.incoming_total).then_with(|| a.name.cmp(&b.name)));
    top.truncate(top_n);
    summary.top = top;

    summary
}
