//! Reads semicolon-delimited edge and layout files into a [`Graph`].
//!
//! Edge files carry `from;to` integer columns, layout files `x;y` (plus `z`
//! for 3D) float columns. Row order in the layout file assigns node
//! indices. Both files are read concurrently and parsed once both arrive.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::LoadError;
use crate::models::{Edge, Graph, Position};

/// Field delimiter of edge and layout files.
pub const DELIMITER: u8 = b';';

/// Where a graph's two input files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSource {
    pub edges: PathBuf,
    pub layout: PathBuf,
}

impl GraphSource {
    pub fn new(edges: impl Into<PathBuf>, layout: impl Into<PathBuf>) -> Self {
        Self {
            edges: edges.into(),
            layout: layout.into(),
        }
    }

    /// Reads both files concurrently and builds a validated graph.
    pub async fn load<P: Position>(&self) -> Result<Graph<P>, LoadError> {
        load_graph(&self.edges, &self.layout).await
    }
}

/// Reads both files concurrently and builds a validated graph.
pub async fn load_graph<P: Position>(edges: &Path, layout: &Path) -> Result<Graph<P>, LoadError> {
    let (edge_bytes, layout_bytes) = tokio::try_join!(read_file(edges), read_file(layout))?;

    let edge_list = parse_edges(edges, &edge_bytes)?;
    let nodes = parse_layout::<P>(layout, &layout_bytes)?;
    tracing::debug!(
        edges = edge_list.len(),
        nodes = nodes.len(),
        "Parsed graph files"
    );

    Graph::new(edge_list, nodes)
}

async fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Header plus data rows of one delimited file.
struct Table<'a> {
    path: &'a Path,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl<'a> Table<'a> {
    fn read(path: &'a Path, bytes: &[u8]) -> Result<Self, LoadError> {
        let csv_err = |source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .trim(Trim::All)
            .from_reader(bytes);
        let headers = reader.headers().map_err(csv_err)?.clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;

        Ok(Self {
            path,
            headers,
            rows,
        })
    }

    fn column(&self, name: &str) -> Result<usize, LoadError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                path: self.path.to_path_buf(),
                column: name.to_string(),
            })
    }

    fn field<T: FromStr>(&self, row: usize, column: usize) -> Result<T, LoadError> {
        let raw = self.rows[row].get(column).unwrap_or_default();
        raw.parse().map_err(|_| LoadError::InvalidField {
            path: self.path.to_path_buf(),
            row,
            column: self.headers.get(column).unwrap_or_default().to_string(),
            value: raw.to_string(),
        })
    }
}

/// Parses an edge file's `from` and `to` columns.
pub fn parse_edges(path: &Path, bytes: &[u8]) -> Result<Vec<Edge>, LoadError> {
    let table = Table::read(path, bytes)?;
    let from = table.column("from")?;
    let to = table.column("to")?;

    (0..table.rows.len())
        .map(|row| Ok(Edge::new(table.field(row, from)?, table.field(row, to)?)))
        .collect()
}

/// Parses a layout file's coordinate columns; row `i` becomes node `i`.
pub fn parse_layout<P: Position>(path: &Path, bytes: &[u8]) -> Result<Vec<P>, LoadError> {
    let table = Table::read(path, bytes)?;
    let columns = P::AXES
        .iter()
        .map(|axis| table.column(axis))
        .collect::<Result<Vec<_>, _>>()?;

    (0..table.rows.len())
        .map(|row| {
            let components = columns
                .iter()
                .map(|&c| {
                    let value: f64 = table.field(row, c)?;
                    if value.is_finite() {
                        Ok(value)
                    } else {
                        Err(LoadError::InvalidField {
                            path: path.to_path_buf(),
                            row,
                            column: table.headers.get(c).unwrap_or_default().to_string(),
                            value: table.rows[row].get(c).unwrap_or_default().to_string(),
                        })
                    }
                })
                .collect::<Result<Vec<f64>, _>>()?;
            Ok(P::from_components(&components))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Point2, Point3};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_edges() {
        let edges = parse_edges(Path::new("e.csv"), b"from;to\n0;1\n1; 2\n").unwrap();
        assert_eq!(edges, vec![Edge::new(0, 1), Edge::new(1, 2)]);
    }

    #[test]
    fn test_parse_edges_columns_by_name() {
        let edges = parse_edges(Path::new("e.csv"), b"weight;to;from\n9;4;3\n").unwrap();
        assert_eq!(edges, vec![Edge::new(3, 4)]);
    }

    #[test]
    fn test_parse_edges_rejects_non_integer() {
        let err = parse_edges(Path::new("e.csv"), b"from;to\n0;1\n1;x\n").unwrap_err();
        match err {
            LoadError::InvalidField {
                row, column, value, ..
            } => {
                assert_eq!(row, 1);
                assert_eq!(column, "to");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_edges_rejects_negative_index() {
        assert!(matches!(
            parse_edges(Path::new("e.csv"), b"from;to\n-1;0\n"),
            Err(LoadError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_parse_layout_missing_column() {
        let err = parse_layout::<Point3>(Path::new("l.csv"), b"x;y\n0;0\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column, .. } if column == "z"));
    }

    #[test]
    fn test_parse_layout_rejects_ragged_row() {
        let err = parse_layout::<Point2>(Path::new("l.csv"), b"x;y\n0;0\n1\n").unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }

    #[test]
    fn test_parse_layout_rejects_nan() {
        let err = parse_layout::<Point2>(Path::new("l.csv"), b"x;y\nNaN;0\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { row: 0, .. }));
    }

    #[tokio::test]
    async fn test_load_graph() {
        let edges = write_file("from;to\n0;1\n1;2\n");
        let layout = write_file("x;y\n0;0\n1;0\n1;1\n");

        let graph: Graph<Point2> = load_graph(edges.path(), layout.path()).await.unwrap();
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.nodes()[2], Point2::new(1.0, 1.0));
    }

    #[tokio::test]
    async fn test_load_graph_out_of_range_edge() {
        let edges = write_file("from;to\n0;3\n");
        let layout = write_file("x;y\n0;0\n1;0\n1;1\n");

        let err = GraphSource::new(edges.path(), layout.path())
            .load::<Point2>()
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::EdgeOutOfRange { to: 3, .. }));
    }

    #[tokio::test]
    async fn test_load_graph_missing_file() {
        let layout = write_file("x;y\n0;0\n");
        let err = load_graph::<Point2>(Path::new("/nonexistent/edges.csv"), layout.path())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
