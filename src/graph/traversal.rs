//! BFS neighbourhood extraction over the mention matrix.

use std::collections::{BTreeMap, HashMap, VecDeque};

use super::{Direction, GraphEdge, GraphNode, Neighborhood};
use crate::error::{MusictreeError, Result};
use crate::matrix::MentionRow;

/// Adjacency view of the matrix, in both directions.
///
/// Ids `0..row_count` are the row artists in row order; names that only ever
/// appear as mention targets get the ids after them.
#[derive(Debug, Clone)]
pub struct MentionGraph {
    names: Vec<String>,
    ids: HashMap<String, usize>,
    row_count: usize,
    outgoing: Vec<Vec<(usize, u64)>>,
    incoming: Vec<Vec<(usize, u64)>>,
}

impl MentionGraph {
    /// Build forward and reverse adjacency from the stored rows.
    pub fn from_rows(rows: &[MentionRow]) -> Result<Self> {
        let mut names = Vec::with_capacity(rows.len());
        let mut ids = HashMap::with_capacity(rows.len());

        for row in rows {
            if ids.insert(row.artist_name.clone(), names.len()).is_some() {
                return Err(MusictreeError::DuplicateArtistName(row.artist_name.clone()));
            }
            names.push(row.artist_name.clone());
        }
        let row_count = names.len();

        let mut outgoing = Vec::with_capacity(row_count);
        for row in rows {
            let mut targets = Vec::with_capacity(row.mentioned.len());
            for (target, count) in &row.mentioned {
                let id = match ids.get(target) {
                    Some(&id) => id,
                    None => {
                        let id = names.len();
                        ids.insert(target.clone(), id);
                        names.push(target.clone());
                        id
                    }
                };
                targets.push((id, *count));
            }
            outgoing.push(targets);
        }
        outgoing.resize(names.len(), Vec::new());

        let mut incoming = vec![Vec::new(); names.len()];
        for (source, targets) in outgoing.iter().enumerate() {
            for &(target, count) in targets {
                incoming[target].push((source, count));
            }
        }

        Ok(Self {
            names,
            ids,
            row_count,
            outgoing,
            incoming,
        })
    }

    /// Number of row artists.
    pub fn artist_count(&self) -> usize {
        self.row_count
    }

    /// Id of a row artist. Names seen only as targets are not artists.
    pub fn artist_id(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied().filter(|&id| id < self.row_count)
    }

    pub fn name(&self, id: usize) -> &str {
        &self.names[id]
    }

    /// Artists mentioned by `id`'s article.
    pub fn outgoing(&self, id: usize) -> &[(usize, u64)] {
        &self.outgoing[id]
    }

    /// Artists whose article mentions `id`.
    pub fn incoming(&self, id: usize) -> &[(usize, u64)] {
        &self.incoming[id]
    }

    fn neighbors(&self, id: usize, direction: Direction) -> &[(usize, u64)] {
        match direction {
            Direction::FromRoot => self.outgoing(id),
            Direction::ToRoot => self.incoming(id),
        }
    }
}

/// Extract the neighbourhood of `root` within `depth` hops.
///
/// Visiting follows `direction`; the edges are every matrix entry between two
/// visited artists regardless of direction, merged per pair. An edge's source
/// is whichever endpoint was discovered first.
pub fn extract_neighborhood(
    graph: &MentionGraph,
    root: &str,
    depth: i64,
    direction: Direction,
) -> Result<Neighborhood> {
    let max_depth = usize::try_from(depth).map_err(|_| MusictreeError::InvalidDepth(depth))?;
    let root_id = graph
        .artist_id(root)
        .ok_or_else(|| MusictreeError::RootNotFound(root.to_string()))?;

    // discovery rank of every visited id
    let mut rank: HashMap<usize, usize> = HashMap::new();
    let mut order = vec![root_id];
    let mut queue = VecDeque::new();

    rank.insert(root_id, 0);
    queue.push_back((root_id, 0));

    while let Some((id, level)) = queue.pop_front() {
        if level >= max_depth {
            continue;
        }

        for &(next, _) in graph.neighbors(id, direction) {
            if !rank.contains_key(&next) {
                rank.insert(next, order.len());
                order.push(next);
                queue.push_back((next, level + 1));
            }
        }
    }

    let mut merged: BTreeMap<(usize, usize), u64> = BTreeMap::new();
    for (source_rank, &id) in order.iter().enumerate() {
        for &(target, count) in graph.outgoing(id) {
            let Some(&target_rank) = rank.get(&target) else {
                continue;
            };
            if target_rank == source_rank {
                continue;
            }
            let key = (source_rank.min(target_rank), source_rank.max(target_rank));
            let weight = merged.entry(key).or_insert(0);
            *weight = weight.saturating_add(count);
        }
    }

    let mut degrees = vec![0u64; order.len()];
    let edges: Vec<GraphEdge> = merged
        .into_iter()
        .map(|((a, b), weight)| {
            degrees[a] = degrees[a].saturating_add(weight);
            degrees[b] = degrees[b].saturating_add(weight);
            GraphEdge {
                source: graph.name(order[a]).to_string(),
                target: graph.name(order[b]).to_string(),
                weight,
            }
        })
        .collect();

    let nodes = order
        .iter()
        .zip(degrees)
        .map(|(&id, degree)| GraphNode {
            name: graph.name(id).to_string(),
            degree,
        })
        .collect::<Vec<_>>();

    log::info!(
        "Neighbourhood of {} ({}, depth {}): {} artists, {} edges",
        root,
        direction.file_tag(),
        max_depth,
        nodes.len(),
        edges.len()
    );

    Ok(Neighborhood {
        root: root.to_string(),
        depth: max_depth,
        direction,
        nodes,
        edges,
    })
}
