//! Neighbourhood graphs: depth-bounded BFS over the mention matrix.
//!
//! The matrix stays directed; the exported neighbourhood is undirected, with
//! both directions of a pair merged into one weighted edge.

mod traversal;
mod export;

pub use traversal::{MentionGraph, extract_neighborhood};
pub use export::{NeighborhoodFiles, edge_list_file_name, node_table_file_name, write_neighborhood};

use serde::{Deserialize, Serialize};

/// Which way mentions are followed from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Artists the root's article mentions, then the ones they mention, ...
    FromRoot,
    /// Artists whose article mentions the root, then the ones mentioning them, ...
    ToRoot,
}

impl Direction {
    /// Tag used in output file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            Direction::FromRoot => "fromRoot",
            Direction::ToRoot => "toRoot",
        }
    }
}

/// A visited artist with its degree inside the neighbourhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    /// Sum of the weights of the neighbourhood edges touching this node.
    pub degree: u64,
}

/// An undirected edge; `weight` merges both mention directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: u64,
}

/// Result of one extraction (one root, one depth, one direction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    pub root: String,
    pub depth: usize,
    pub direction: Direction,
    /// Visited artists in discovery order; the root comes first.
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
