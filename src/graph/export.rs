//! Edge list and node table output in a generic graph-import CSV layout.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{Direction, Neighborhood};
use crate::error::Result;

#[derive(Debug, Serialize)]
struct EdgeCsvRow<'a> {
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(rename = "Target")]
    target: &'a str,
    #[serde(rename = "Weight")]
    weight: u64,
}

#[derive(Debug, Serialize)]
struct NodeCsvRow<'a> {
    #[serde(rename = "Id")]
    id: &'a str,
    #[serde(rename = "Label")]
    label: &'a str,
    #[serde(rename = "Degree")]
    degree: u64,
}

/// Paths written for one neighbourhood
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborhoodFiles {
    pub edges: PathBuf,
    pub nodes: PathBuf,
}

fn file_stem(root: &str, direction: Direction, depth: usize) -> String {
    let compact: String = root
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}-{}-depth{}", compact, direction.file_tag(), depth)
}

/// `TheBeatles-toRoot-depth2.csv`
pub fn edge_list_file_name(root: &str, direction: Direction, depth: usize) -> String {
    format!("{}.csv", file_stem(root, direction, depth))
}

/// `TheBeatles-toRoot-depth2-nodes.csv`
pub fn node_table_file_name(root: &str, direction: Direction, depth: usize) -> String {
    format!("{}-nodes.csv", file_stem(root, direction, depth))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// Header is written by hand so that an empty table still carries it.
fn write_rows<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the edge list and node table into `dir`.
///
/// Both files are staged under temporary names and only renamed into place
/// once both are complete.
pub fn write_neighborhood(dir: &Path, neighborhood: &Neighborhood) -> Result<NeighborhoodFiles> {
    std::fs::create_dir_all(dir)?;

    let files = NeighborhoodFiles {
        edges: dir.join(edge_list_file_name(
            &neighborhood.root,
            neighborhood.direction,
            neighborhood.depth,
        )),
        nodes: dir.join(node_table_file_name(
            &neighborhood.root,
            neighborhood.direction,
            neighborhood.depth,
        )),
    };
    let edges_tmp = temp_path(&files.edges);
    let nodes_tmp = temp_path(&files.nodes);

    let staged = write_rows(
        &edges_tmp,
        &["Source", "Target", "Weight"],
        neighborhood.edges.iter().map(|e| EdgeCsvRow {
            source: &e.source,
            target: &e.target,
            weight: e.weight,
        }),
    )
    .and_then(|_| {
        write_rows(
            &nodes_tmp,
            &["Id", "Label", "Degree"],
            neighborhood.nodes.iter().map(|n| NodeCsvRow {
                id: &n.name,
                label: &n.name,
                degree: n.degree,
            }),
        )
    });

    if let Err(e) = staged {
        let _ = std::fs::remove_file(&edges_tmp);
        let _ = std::fs::remove_file(&nodes_tmp);
        return Err(e);
    }

    if let Err(e) = std::fs::rename(&edges_tmp, &files.edges) {
        let _ = std::fs::remove_file(&edges_tmp);
        let _ = std::fs::remove_file(&nodes_tmp);
        return Err(e.into());
    }
    // a lone edge list is not a valid output
    if let Err(e) = std::fs::rename(&nodes_tmp, &files.nodes) {
        let _ = std::fs::remove_file(&files.edges);
        let _ = std::fs::remove_file(&nodes_tmp);
        return Err(e.into());
    }

    log::info!(
        "Wrote {} edges to {} and {} nodes to {}",
        neighborhood.edges.len(),
        files.edges.display(),
        neighborhood.nodes.len(),
        files.nodes.display()
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphEdge, GraphNode};
    use tempfile::TempDir;

    #[test]
    fn test_file_names() {
        assert_eq!(
            edge_list_file_name("The Beatles", Direction::ToRoot, 2),
            "TheBeatles-toRoot-depth2.csv"
        );
        assert_eq!(
            node_table_file_name("AC/DC", Direction::FromRoot, 0),
            "AC_DC-fromRoot-depth0-nodes.csv"
        );
    }

    #[test]
    fn test_write_neighborhood() {
        let temp_dir = TempDir::new().unwrap();
        let neighborhood = Neighborhood {
            root: "Bob Dylan".to_string(),
            depth: 1,
            direction: Direction::FromRoot,
            nodes: vec![
                GraphNode { name: "Bob Dylan".to_string(), degree: 5 },
                GraphNode { name: "The Band".to_string(), degree: 5 },
            ],
            edges: vec![GraphEdge {
                source: "Bob Dylan".to_string(),
                target: "The Band".to_string(),
                weight: 5,
            }],
        };

        let out = temp_dir.path().join("graphs");
        let files = write_neighborhood(&out, &neighborhood).unwrap();
        assert!(files.edges.ends_with("BobDylan-fromRoot-depth1.csv"));

        let edges = std::fs::read_to_string(&files.edges).unwrap();
        assert_eq!(edges, "Source,Target,Weight\nBob Dylan,The Band,5\n");

        let nodes = std::fs::read_to_string(&files.nodes).unwrap();
        assert_eq!(nodes, "Id,Label,Degree\nBob Dylan,Bob Dylan,5\nThe Band,The Band,5\n");

        let leftovers: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failed_node_table_leaves_no_edge_list() {
        let temp_dir = TempDir::new().unwrap();
        let neighborhood = Neighborhood {
            root: "Cher".to_string(),
            depth: 1,
            direction: Direction::FromRoot,
            nodes: vec![GraphNode { name: "Cher".to_string(), degree: 0 }],
            edges: vec![],
        };

        // a non-empty directory where the node table should land makes the rename fail
        let blocker = temp_dir.path().join(node_table_file_name("Cher", Direction::FromRoot, 1));
        std::fs::create_dir_all(blocker.join("occupied")).unwrap();

        assert!(write_neighborhood(temp_dir.path(), &neighborhood).is_err());
        assert!(!temp_dir
            .path()
            .join(edge_list_file_name("Cher", Direction::FromRoot, 1))
            .exists());

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_isolated_root_has_header_only_edges() {
        let temp_dir = TempDir::new().unwrap();
        let neighborhood = Neighborhood {
            root: "Cher".to_string(),
            depth: 0,
            direction: Direction::ToRoot,
            nodes: vec![GraphNode { name: "Cher".to_string(), degree: 0 }],
            edges: vec![],
        };
        let files = write_neighborhood(temp_dir.path(), &neighborhood).unwrap();
        let edges = std::fs::read_to_string(&files.edges).unwrap();
        assert_eq!(edges, "Source,Target,Weight\n");
    }
}
