//! Mention matrix: which known artists each article refers to, and how often.
//!
//! The matrix is directed and sparse. Each [`MentionRow`] lists the targets
//! an artist's article mentions at least once, never the artist itself.

mod index;
mod matcher;
mod builder;
mod store;
mod summary;

pub use index::KnownArtistIndex;
pub use matcher::{Mention, MentionMatcher};
pub use builder::{build_matrix, build_mention_matrix, scan_record};
pub use store::{decode_mentions, encode_mentions, read_matrix, write_matrix};
pub use summary::{ArtistReach, MatrixSummary, summarize};

use serde::{Deserialize, Serialize};

/// File name of the persisted matrix inside the matrix directory.
pub const MATRIX_FILE_NAME: &str = "matrix.csv";

/// One row of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRow {
    pub artist_name: String,
    /// `(target, count)` pairs, count ≥ 1, in index order of the targets.
    pub mentioned: Vec<(String, u64)>,
    pub category: String,
}
