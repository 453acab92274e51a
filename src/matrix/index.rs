use std::collections::HashMap;

use crate::error::{MusictreeError, Result};
use crate::ingest::ArtistRecord;

/// The universe of artist names mentions are resolved against.
///
/// Names are kept sorted; a name's position is its id and doubles as the
/// pattern id of the [`super::MentionMatcher`] built over it. Immutable once
/// built.
#[derive(Debug, Clone)]
pub struct KnownArtistIndex {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl KnownArtistIndex {
    /// Build the index, failing on the first duplicated or empty name.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();

        if names.first().is_some_and(|n| n.is_empty()) {
            return Err(MusictreeError::InvalidInput(
                "artist names must not be empty".to_string(),
            ));
        }
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(MusictreeError::DuplicateArtistName(pair[0].clone()));
        }

        let ids = names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        Ok(Self { names, ids })
    }

    pub fn from_records(records: &[ArtistRecord]) -> Result<Self> {
        Self::new(records.iter().map(|r| r.name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: usize) -> &str {
        &self.names[id]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }
}
