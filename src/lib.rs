pub mod config;
pub mod error;
pub mod ingest;
pub mod matrix;
pub mod graph;
pub mod pipeline;

pub use config::Config;
pub use error::{MusictreeError, Result};
pub use matrix::{MentionRow, build_mention_matrix};
pub use graph::{Direction, Neighborhood, extract_neighborhood};
