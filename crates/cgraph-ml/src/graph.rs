//! Tensor graph built from engine arrays
//!
//! [`CircuitGraph`] is a directed graph over `num_nodes` dense node ids with
//! named f32 tensors attached to nodes (`ndata`) and edges (`edata`).

use crate::error::GraphError;
use cgraph_synth::GraphData;
use indexmap::IndexMap;
use petgraph::graph::{Graph, NodeIndex};
use serde::{Deserialize, Serialize};

/// Node attribute holding the feature matrix
pub const FEAT: &str = "feat";
/// Edge attribute holding inversion weights
pub const WEIGHT: &str = "w";

/// Dense row-major f32 tensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl Tensor {
    fn from_i32(shape: Vec<usize>, values: &[i32]) -> Self {
        Self {
            shape,
            data: values.iter().map(|&v| v as f32).collect(),
        }
    }

    /// Number of elements
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Row `i` of a 2-D tensor
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        match self.shape.as_slice() {
            [rows, cols] if i < *rows => self.data.get(i * cols..(i + 1) * cols),
            _ => None,
        }
    }
}

/// Directed graph with named node and edge tensors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitGraph {
    pub num_nodes: usize,
    pub src: Vec<u32>,
    pub dst: Vec<u32>,
    pub ndata: IndexMap<String, Tensor>,
    pub edata: IndexMap<String, Tensor>,
}

impl CircuitGraph {
    /// Validate engine arrays and wrap them.
    ///
    /// `feat` is always attached; `w` only when `with_weights` is set.
    pub fn from_graph_data(
        num_nodes: usize,
        data: &GraphData,
        with_weights: bool,
    ) -> Result<Self, GraphError> {
        let num_edges = data.edge_src.len();
        if data.edge_dst.len() != num_edges || data.edge_weight.len() != num_edges {
            return Err(GraphError::EdgeLengthMismatch {
                src: num_edges,
                dst: data.edge_dst.len(),
                weight: data.edge_weight.len(),
            });
        }
        if data.feature_dim == 0 {
            return Err(GraphError::EmptyFeatureDim);
        }
        if data.node_feat.len() != num_nodes * data.feature_dim {
            return Err(GraphError::FeatureLengthMismatch {
                len: data.node_feat.len(),
                num_nodes,
                feature_dim: data.feature_dim,
            });
        }

        let endpoint = |edge: usize, node: i32| -> Result<u32, GraphError> {
            match u32::try_from(node) {
                Ok(n) if (n as usize) < num_nodes => Ok(n),
                _ => Err(GraphError::NodeOutOfRange {
                    edge,
                    node: i64::from(node),
                    num_nodes,
                }),
            }
        };
        let src = data
            .edge_src
            .iter()
            .enumerate()
            .map(|(e, &n)| endpoint(e, n))
            .collect::<Result<Vec<_>, _>>()?;
        let dst = data
            .edge_dst
            .iter()
            .enumerate()
            .map(|(e, &n)| endpoint(e, n))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ndata = IndexMap::new();
        ndata.insert(
            FEAT.to_string(),
            Tensor::from_i32(vec![num_nodes, data.feature_dim], &data.node_feat),
        );
        let mut edata = IndexMap::new();
        if with_weights {
            edata.insert(
                WEIGHT.to_string(),
                Tensor::from_i32(vec![num_edges], &data.edge_weight),
            );
        }

        Ok(Self {
            num_nodes,
            src,
            dst,
            ndata,
            edata,
        })
    }

    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    /// Node feature matrix
    pub fn features(&self) -> Option<&Tensor> {
        self.ndata.get(FEAT)
    }

    /// Edge weights, present only for edge-weight inverter encoding
    pub fn weights(&self) -> Option<&Tensor> {
        self.edata.get(WEIGHT)
    }

    /// Edges as `(src, dst)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to a petgraph graph, edge weights carried when present
    pub fn to_petgraph(&self) -> Graph<(), Option<f32>> {
        let mut graph = Graph::with_capacity(self.num_nodes, self.num_edges());
        for _ in 0..self.num_nodes {
            graph.add_node(());
        }
        let weights = self.weights();
        for (e, (s, d)) in self.edges().enumerate() {
            let w = weights.and_then(|t| t.data.get(e).copied());
            graph.add_edge(NodeIndex::new(s as usize), NodeIndex::new(d as usize), w);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GraphData {
        // const, a, b, po, and(a, !b)
        GraphData {
            edge_src: vec![4, 1, 2],
            edge_dst: vec![3, 4, 4],
            edge_weight: vec![1, 1, -1],
            node_feat: vec![
                1, 0, 0, 0, //
                0, 1, 0, 0, //
                0, 1, 0, 0, //
                0, 0, 1, 0, //
                0, 0, 0, 1, //
            ],
            feature_dim: 4,
        }
    }

    #[test]
    fn test_build_with_weights() {
        let g = CircuitGraph::from_graph_data(5, &sample(), true).unwrap();
        assert_eq!(g.num_edges(), 3);
        let feat = g.features().unwrap();
        assert_eq!(feat.shape, vec![5, 4]);
        assert_eq!(feat.row(4), Some(&[0.0, 0.0, 0.0, 1.0][..]));
        let w = g.weights().unwrap();
        assert_eq!(w.shape, vec![3]);
        assert_eq!(w.data, vec![1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_build_without_weights() {
        let g = CircuitGraph::from_graph_data(5, &sample(), false).unwrap();
        assert!(g.weights().is_none());
        assert!(g.edata.is_empty());
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(4, 3), (1, 4), (2, 4)]);
    }

    #[test]
    fn test_reject_inconsistent_arrays() {
        let mut data = sample();
        data.edge_weight.pop();
        assert!(matches!(
            CircuitGraph::from_graph_data(5, &data, true),
            Err(GraphError::EdgeLengthMismatch { .. })
        ));

        assert!(matches!(
            CircuitGraph::from_graph_data(6, &sample(), true),
            Err(GraphError::FeatureLengthMismatch { .. })
        ));

        let mut data = sample();
        data.edge_src[0] = -3;
        assert_eq!(
            CircuitGraph::from_graph_data(5, &data, false),
            Err(GraphError::NodeOutOfRange {
                edge: 0,
                node: -3,
                num_nodes: 5
            })
        );

        let empty = GraphData::default();
        assert_eq!(
            CircuitGraph::from_graph_data(0, &empty, false),
            Err(GraphError::EmptyFeatureDim)
        );
    }

    #[test]
    fn test_petgraph_and_json() {
        let g = CircuitGraph::from_graph_data(5, &sample(), true).unwrap();
        let pg = g.to_petgraph();
        assert_eq!(pg.node_count(), 5);
        assert_eq!(pg.edge_count(), 3);
        assert_eq!(pg.edge_weights().filter(|w| **w == Some(-1.0)).count(), 1);

        let json = serde_json::to_string(&g).unwrap();
        let back: CircuitGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
