//! Maps graphs to declarative drawable primitives.
//!
//! Output follows the trace schema of plotly-style plotting surfaces: all
//! edges share one `lines` trace, with a `null` gap marker after each
//! segment so consecutive edges are not joined, and all nodes share one
//! `markers` trace. Building is pure; equal inputs give equal traces with
//! identical coordinate order, which frame comparisons rely on.

use serde::{Deserialize, Serialize};

use crate::models::{Dimensionality, Graph, Position};

/// Line appearance for the edge trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub width: f64,
    pub color: String,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: "#888".to_string(),
        }
    }
}

/// Marker appearance for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: String,
    pub size: f64,
}

impl MarkerStyle {
    pub fn new(color: impl Into<String>, size: f64) -> Self {
        Self {
            color: color.into(),
            size,
        }
    }
}

/// Style override for one node index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub index: usize,
    pub color: String,
    pub size: f64,
}

impl Highlight {
    pub fn new(index: usize, color: impl Into<String>, size: f64) -> Self {
        Self {
            index,
            color: color.into(),
            size,
        }
    }
}

/// The three seed nodes of the small demo graphs.
pub fn seed_highlights() -> Vec<Highlight> {
    vec![
        Highlight::new(0, "red", 8.0),
        Highlight::new(1, "#008f1f", 8.0),
        Highlight::new(2, "#2800c7", 8.0),
    ]
}

/// Everything the builder needs to know about appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStyle {
    pub edge: LineStyle,
    pub node: MarkerStyle,
    /// Per-index overrides; later entries win for a repeated index.
    pub highlights: Vec<Highlight>,
}

impl TraceStyle {
    pub fn new(edge: LineStyle, node: MarkerStyle) -> Self {
        Self {
            edge,
            node,
            highlights: Vec::new(),
        }
    }

    pub fn with_highlights(mut self, highlights: Vec<Highlight>) -> Self {
        self.highlights = highlights;
        self
    }

    fn marker_for(&self, index: usize) -> (&str, f64) {
        self.highlights
            .iter()
            .rev()
            .find(|h| h.index == index)
            .map(|h| (h.color.as_str(), h.size))
            .unwrap_or((self.node.color.as_str(), self.node.size))
    }
}

/// Trace type understood by the plotting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Scatter3d,
}

/// How a trace's points are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

/// One value for every point, or one value per point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerPoint<T> {
    Uniform(T),
    Each(Vec<T>),
}

/// Marker settings of a node trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub size: PerPoint<f64>,
    pub color: PerPoint<String>,
}

/// A renderer-agnostic drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub mode: TraceMode,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    pub hoverinfo: String,
}

impl Trace {
    /// Every numeric coordinate on axis `axis` (0 = x), gap markers skipped.
    pub fn axis_values(&self, axis: usize) -> impl Iterator<Item = f64> + '_ {
        let column = match axis {
            0 => Some(&self.x),
            1 => Some(&self.y),
            _ => self.z.as_ref(),
        };
        column.into_iter().flatten().filter_map(|v| *v)
    }
}

/// The edge trace and node trace of one graph state, serialized as a
/// two-element array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePair(pub Trace, pub Trace);

impl TracePair {
    pub fn edges(&self) -> &Trace {
        &self.0
    }

    pub fn nodes(&self) -> &Trace {
        &self.1
    }
}

type Column = Vec<Option<f64>>;

fn split_axes(mut columns: Vec<Column>) -> (Column, Column, Option<Column>) {
    let z = (columns.len() > 2).then(|| columns.remove(2));
    let y = columns.remove(1);
    let x = columns.remove(0);
    (x, y, z)
}

/// Builds the gap-marker edge trace: `(from, to, null)` per edge.
pub fn build_edge_trace<P: Position>(graph: &Graph<P>, style: &TraceStyle) -> Trace {
    let nodes = graph.nodes();
    let columns: Vec<Column> = (0..P::dims())
        .map(|axis| {
            graph
                .edges()
                .iter()
                .flat_map(|e| {
                    [
                        Some(nodes[e.from].component(axis)),
                        Some(nodes[e.to].component(axis)),
                        None,
                    ]
                })
                .collect()
        })
        .collect();
    let (x, y, z) = split_axes(columns);

    Trace {
        kind: if Dimensionality::of::<P>().is_spatial() {
            TraceKind::Scatter3d
        } else {
            TraceKind::Scatter
        },
        mode: TraceMode::Lines,
        x,
        y,
        z,
        line: Some(style.edge.clone()),
        marker: None,
        text: None,
        textposition: None,
        hoverinfo: "none".to_string(),
    }
}

/// Builds the node marker trace, applying highlight overrides by index.
pub fn build_node_trace<P: Position>(graph: &Graph<P>, style: &TraceStyle) -> Trace {
    let nodes = graph.nodes();
    let columns: Vec<Column> = (0..P::dims())
        .map(|axis| nodes.iter().map(|n| Some(n.component(axis))).collect())
        .collect();
    let (x, y, z) = split_axes(columns);

    let marker = if style.highlights.is_empty() {
        Marker {
            size: PerPoint::Uniform(style.node.size),
            color: PerPoint::Uniform(style.node.color.clone()),
        }
    } else {
        let (colors, sizes): (Vec<String>, Vec<f64>) = (0..nodes.len())
            .map(|i| {
                let (color, size) = style.marker_for(i);
                (color.to_string(), size)
            })
            .unzip();
        Marker {
            size: PerPoint::Each(sizes),
            color: PerPoint::Each(colors),
        }
    };

    let spatial = Dimensionality::of::<P>().is_spatial();
    let text = (0..nodes.len())
        .map(|i| {
            if spatial {
                i.to_string()
            } else {
                format!("Node {i}")
            }
        })
        .collect();

    Trace {
        kind: if spatial {
            TraceKind::Scatter3d
        } else {
            TraceKind::Scatter
        },
        mode: TraceMode::Markers,
        x,
        y,
        z,
        line: None,
        marker: Some(marker),
        text: Some(text),
        textposition: (!spatial).then(|| "top center".to_string()),
        hoverinfo: "text".to_string(),
    }
}

/// Edge and node traces for a graph as loaded.
pub fn build_traces<P: Position>(graph: &Graph<P>, style: &TraceStyle) -> TracePair {
    TracePair(build_edge_trace(graph, style), build_node_trace(graph, style))
}

/// Edge and node traces for a graph rotated by `theta` about `pivot`.
pub fn build_traces_at<P: Position>(
    graph: &Graph<P>,
    theta: f64,
    pivot: &P,
    style: &TraceStyle,
) -> TracePair {
    build_traces(&graph.rotated(theta, pivot), style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Point2, Point3};

    fn style() -> TraceStyle {
        TraceStyle::new(LineStyle::default(), MarkerStyle::new("#1f77b4", 5.0))
    }

    fn path_graph() -> Graph<Point2> {
        Graph::new(
            vec![Edge::new(0, 1), Edge::new(1, 2)],
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_edge_trace_uses_gap_markers() {
        let trace = build_edge_trace(&path_graph(), &style());
        assert_eq!(
            trace.x,
            vec![Some(0.0), Some(1.0), None, Some(1.0), Some(1.0), None]
        );
        assert_eq!(
            trace.y,
            vec![Some(0.0), Some(0.0), None, Some(0.0), Some(1.0), None]
        );
        assert!(trace.z.is_none());
        assert_eq!(trace.kind, TraceKind::Scatter);
        assert_eq!(trace.mode, TraceMode::Lines);
    }

    #[test]
    fn test_edge_trace_serializes_nulls() {
        let trace = build_edge_trace(&path_graph(), &style());
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["x"], serde_json::json!([0.0, 1.0, null, 1.0, 1.0, null]));
        assert_eq!(json["type"], "scatter");
        assert_eq!(json["hoverinfo"], "none");
        assert_eq!(json["line"]["color"], "#888");
        assert!(json.get("z").is_none());
    }

    #[test]
    fn test_node_trace_default_style() {
        let trace = build_node_trace(&path_graph(), &style());
        let marker = trace.marker.unwrap();
        assert_eq!(marker.size, PerPoint::Uniform(5.0));
        assert_eq!(marker.color, PerPoint::Uniform("#1f77b4".to_string()));
        assert_eq!(
            trace.text.unwrap(),
            vec!["Node 0".to_string(), "Node 1".to_string(), "Node 2".to_string()]
        );
        assert_eq!(trace.textposition.as_deref(), Some("top center"));
    }

    #[test]
    fn test_node_trace_highlights() {
        let style = style().with_highlights(vec![Highlight::new(1, "#008f1f", 8.0)]);
        let marker = build_node_trace(&path_graph(), &style).marker.unwrap();
        assert_eq!(marker.size, PerPoint::Each(vec![5.0, 8.0, 5.0]));
        assert_eq!(
            marker.color,
            PerPoint::Each(vec![
                "#1f77b4".to_string(),
                "#008f1f".to_string(),
                "#1f77b4".to_string()
            ])
        );
    }

    #[test]
    fn test_spatial_traces() {
        let graph = Graph::new(
            vec![Edge::new(1, 0)],
            vec![Point3::new(0.0, 1.0, 2.0), Point3::new(3.0, 4.0, 5.0)],
        )
        .unwrap();
        let pair = build_traces(&graph, &style());
        assert_eq!(pair.edges().kind, TraceKind::Scatter3d);
        assert_eq!(
            pair.edges().z,
            Some(vec![Some(5.0), Some(2.0), None])
        );
        assert_eq!(pair.nodes().text, Some(vec!["0".to_string(), "1".to_string()]));
        assert!(pair.nodes().textposition.is_none());
    }

    #[test]
    fn test_builder_is_deterministic() {
        let graph = path_graph();
        let pivot = Point2::new(0.5, 0.5);
        let a = build_traces_at(&graph, 1.3, &pivot, &style());
        let b = build_traces_at(&graph, 1.3, &pivot, &style());
        assert_eq!(a, b);
    }

    #[test]
    fn test_axis_values_skip_gaps() {
        let trace = build_edge_trace(&path_graph(), &style());
        let xs: Vec<f64> = trace.axis_values(0).collect();
        assert_eq!(xs, vec![0.0, 1.0, 1.0, 1.0]);
        assert_eq!(trace.axis_values(2).count(), 0);
    }
}
