//! Whole-title mention search over article prose.

use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::BTreeMap;

use super::KnownArtistIndex;
use crate::error::{MusictreeError, Result};

/// A resolved mention: the index id of the artist and its byte span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mention {
    pub id: usize,
    pub start: usize,
    pub end: usize,
}

/// One automaton over every known name, shared read-only by all scans.
///
/// A candidate counts only when the characters on both sides of it are not
/// alphanumeric (or are the ends of the text). Among the candidates left, the
/// longest one starting at the leftmost position wins and scanning resumes
/// after it.
pub struct MentionMatcher {
    automaton: AhoCorasick,
}

impl MentionMatcher {
    pub fn new(index: &KnownArtistIndex) -> Result<Self> {
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(index.names())
            .map_err(|e| {
                MusictreeError::InvalidInput(format!("cannot build mention automaton: {}", e))
            })?;

        Ok(Self { automaton })
    }

    /// Non-overlapping mentions in text order.
    pub fn find_mentions(&self, text: &str) -> Vec<Mention> {
        let mut candidates: Vec<Mention> = self
            .automaton
            .find_overlapping_iter(text)
            .filter(|m| is_word_bounded(text, m.start(), m.end()))
            .map(|m| Mention {
                id: m.pattern().as_usize(),
                start: m.start(),
                end: m.end(),
            })
            .collect();

        // leftmost first, longest first at equal start
        candidates.sort_unstable_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut selected = Vec::new();
        let mut cursor = 0;
        for candidate in candidates {
            if candidate.start < cursor {
                continue;
            }
            cursor = candidate.end;
            selected.push(candidate);
        }

        selected
    }

    /// Mention counts per artist id, in id order. `exclude` (the article's own
    /// artist) still claims its spans but is not counted.
    pub fn count_mentions(&self, text: &str, exclude: Option<usize>) -> Vec<(usize, u64)> {
        let mut counts: BTreeMap<usize, u64> = BTreeMap::new();
        for mention in self.find_mentions(text) {
            if Some(mention.id) == exclude {
                continue;
            }
            *counts.entry(mention.id).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }
}

fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[end..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(names: &[&str]) -> (KnownArtistIndex, MentionMatcher) {
        let index = KnownArtistIndex::new(names.iter().copied()).unwrap();
        let matcher = MentionMatcher::new(&index).unwrap();
        (index, matcher)
    }

    fn named_counts(index: &KnownArtistIndex, counts: Vec<(usize, u64)>) -> Vec<(String, u64)> {
        counts
            .into_iter()
            .map(|(id, c)| (index.name(id).to_string(), c))
            .collect()
    }

    #[test]
    fn test_boundary_prevents_partial_words() {
        let (index, m) = matcher(&["Bo", "Bob", "Bono"]);
        let counts = m.count_mentions("Bono met Bob, then Bo. Bobby and Bonobo did not.", None);
        assert_eq!(
            named_counts(&index, counts),
            vec![("Bo".to_string(), 1), ("Bob".to_string(), 1), ("Bono".to_string(), 1)]
        );
    }

    #[test]
    fn test_longest_match_precedence() {
        let (index, m) = matcher(&["Lennon", "John Lennon"]);
        let counts = m.count_mentions("John Lennon was there.", None);
        assert_eq!(named_counts(&index, counts), vec![("John Lennon".to_string(), 1)]);

        let counts = m.count_mentions("John Lennon and later Lennon alone.", None);
        assert_eq!(
            named_counts(&index, counts),
            vec![("John Lennon".to_string(), 1), ("Lennon".to_string(), 1)]
        );
    }

    #[test]
    fn test_longest_candidate_rejected_by_boundary_falls_back() {
        let (index, m) = matcher(&["The Band", "The Bandits"]);
        // "The Bandits" is bounded, "The Band" inside it is not
        let counts = m.count_mentions("The Bandits; The Band.", None);
        assert_eq!(
            named_counts(&index, counts),
            vec![("The Band".to_string(), 1), ("The Bandits".to_string(), 1)]
        );
    }

    #[test]
    fn test_case_sensitive_exact_match() {
        let (index, m) = matcher(&["The Beatles"]);
        let counts = m.count_mentions("the Beatles and THE BEATLES and The Beatles", None);
        assert_eq!(named_counts(&index, counts), vec![("The Beatles".to_string(), 1)]);
    }

    #[test]
    fn test_disambiguated_titles_are_distinct() {
        let (index, m) = matcher(&["Boston", "Boston (band)"]);
        let counts = m.count_mentions("Boston (band) formed in Boston.", None);
        assert_eq!(
            named_counts(&index, counts),
            vec![("Boston".to_string(), 1), ("Boston (band)".to_string(), 1)]
        );
    }

    #[test]
    fn test_excluded_artist_claims_span() {
        let (index, m) = matcher(&["The Beatles", "Beatles"]);
        let own = index.id("The Beatles");
        let counts = m.count_mentions("The Beatles were the Beatles.", own);
        // the capitalised span belongs to the article's own artist
        assert_eq!(named_counts(&index, counts), vec![("Beatles".to_string(), 1)]);
    }

    #[test]
    fn test_unicode_boundaries() {
        let (index, m) = matcher(&["Björk", "Sigur Rós"]);
        let counts = m.count_mentions("Björk, Sigur Rós and Björkish fans; éBjörk", None);
        assert_eq!(
            named_counts(&index, counts),
            vec![("Björk".to_string(), 1), ("Sigur Rós".to_string(), 1)]
        );
    }

    #[test]
    fn test_mentions_in_text_order() {
        let (index, m) = matcher(&["ABBA", "Cher"]);
        let mentions = m.find_mentions("Cher sang ABBA songs; Cher again.");
        let ids: Vec<usize> = mentions.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![index.id("Cher").unwrap(), index.id("ABBA").unwrap(), index.id("Cher").unwrap()]);
        assert_eq!(mentions[0].start, 0);
        assert_eq!(mentions[0].end, 4);
    }

    #[test]
    fn test_empty_text() {
        let (_, m) = matcher(&["ABBA"]);
        assert!(m.count_mentions("", None).is_empty());
    }
}
