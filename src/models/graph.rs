//! Edge lists and the validated graph they form with a node layout.

use serde::{Deserialize, Serialize};

use super::Position;
use crate::error::LoadError;

/// A directed link between two node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

impl Edge {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// Edges plus node positions for one visualization.
///
/// Node identity is the index into `nodes`. Every edge is checked against
/// the node count on construction, so traces can index without bounds
/// failures.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph<P> {
    edges: Vec<Edge>,
    nodes: Vec<P>,
}

impl<P: Position> Graph<P> {
    /// Validates that every edge endpoint is a node index.
    pub fn new(edges: Vec<Edge>, nodes: Vec<P>) -> Result<Self, LoadError> {
        let node_count = nodes.len();
        if let Some((row, edge)) = edges
            .iter()
            .enumerate()
            .find(|(_, e)| e.from >= node_count || e.to >= node_count)
        {
            return Err(LoadError::EdgeOutOfRange {
                row,
                from: edge.from,
                to: edge.to,
                node_count,
            });
        }

        Ok(Self { edges, nodes })
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn nodes(&self) -> &[P] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Copy of this graph with every node rotated by `theta` about `pivot`.
    pub fn rotated(&self, theta: f64, pivot: &P) -> Self {
        Self {
            edges: self.edges.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|n| n.rotated_about(theta, pivot))
                .collect(),
        }
    }
}
