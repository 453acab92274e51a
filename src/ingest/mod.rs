//! Corpus normalizer: raw export dumps → cleaned per-category artist CSVs.

pub mod walker;
pub mod dump;
pub mod wikitext;
pub mod records;
pub mod normalize;

pub use walker::{DumpFile, discover_dumps, extract_category};
pub use dump::{RawArticle, parse_dump};
pub use wikitext::{MarkupStripper, canonical_title};
pub use records::{ArtistRecord, LoadedRecords, read_category_csvs, write_category_csvs};
pub use normalize::{NormalizeReport, NormalizedCorpus, normalize_article, normalize_corpus};
