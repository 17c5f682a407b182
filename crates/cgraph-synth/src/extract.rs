//! Graph-data extraction
//!
//! Flattens a strashed network into COO edge arrays plus a one-hot node
//! feature matrix. Two conventions shape the output:
//!
//! - [`NodeTyping`] picks which object kinds get their own type id.
//! - [`InverterEncoding`] picks where fanin inversions are recorded.
//!
//! ```text
//!             Combinational  Sequential  CiCo
//! CONST1            0            0         0
//! PI                1            1         1
//! PO                2            2         2
//! BI                -            3         2
//! BO                -            4         1
//! NODE              3            6         4
//! LATCH             -            5         3
//! ```
//!
//! The feature width is the NODE id plus one, widened by two when inverter
//! counts are folded into the node type and by one when they are a feature.

use crate::error::{SynthError, SynthResult};
use crate::network::{Network, ObjKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Which structural roles a node may have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeTyping {
    /// Constant, PI, PO and AND nodes only
    Combinational,
    /// Also latch inputs, outputs and latches
    Sequential,
    /// Combinational input/output proxies instead of PI/PO/BI/BO
    CiCo,
}

impl NodeTyping {
    pub const ALL: [NodeTyping; 3] = [
        NodeTyping::Combinational,
        NodeTyping::Sequential,
        NodeTyping::CiCo,
    ];

    /// Numeric code used in version strings
    pub fn code(self) -> u32 {
        match self {
            NodeTyping::Combinational => 0,
            NodeTyping::Sequential => 1,
            NodeTyping::CiCo => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Type id for an object kind, `None` when the kind is not representable
    pub fn type_id(self, kind: ObjKind) -> Option<usize> {
        use NodeTyping::*;
        let id = match (kind, self) {
            (ObjKind::Const1, _) => 0,
            (ObjKind::Pi, _) => 1,
            (ObjKind::Po, _) => 2,
            (ObjKind::Bi, Sequential) => 3,
            (ObjKind::Bi, CiCo) => 2,
            (ObjKind::Bo, Sequential) => 4,
            (ObjKind::Bo, CiCo) => 1,
            (ObjKind::Node, Combinational) => 3,
            (ObjKind::Node, Sequential) => 6,
            (ObjKind::Node, CiCo) => 4,
            (ObjKind::Latch, Sequential) => 5,
            (ObjKind::Latch, CiCo) => 3,
            (ObjKind::Bi | ObjKind::Bo | ObjKind::Latch, Combinational) => return None,
        };
        Some(id)
    }
}

impl fmt::Display for NodeTyping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Where logical inversion is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InverterEncoding {
    /// Inverted-fanin count shifts the AND node's type id
    NodeType,
    /// Inverted-fanin count is an extra node feature column
    NodeFeature,
    /// Inversion is a `-1` edge weight
    EdgeWeight,
}

impl InverterEncoding {
    pub const ALL: [InverterEncoding; 3] = [
        InverterEncoding::NodeType,
        InverterEncoding::NodeFeature,
        InverterEncoding::EdgeWeight,
    ];

    pub fn code(self) -> u32 {
        match self {
            InverterEncoding::NodeType => 0,
            InverterEncoding::NodeFeature => 1,
            InverterEncoding::EdgeWeight => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Extra feature columns this encoding needs
    fn extra_columns(self) -> usize {
        match self {
            InverterEncoding::NodeType => 2,
            InverterEncoding::NodeFeature => 1,
            InverterEncoding::EdgeWeight => 0,
        }
    }
}

impl fmt::Display for InverterEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Raw arrays produced by [`graph_data`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    /// Edge sources
    pub edge_src: Vec<i32>,
    /// Edge destinations
    pub edge_dst: Vec<i32>,
    /// `1` for a plain edge, `-1` for an inverted one
    pub edge_weight: Vec<i32>,
    /// Row-major node features, `num_rows * feature_dim` entries
    pub node_feat: Vec<i32>,
    /// Columns per feature row
    pub feature_dim: usize,
}

impl GraphData {
    pub fn num_edges(&self) -> usize {
        self.edge_src.len()
    }

    /// Number of feature rows
    pub fn num_rows(&self) -> usize {
        if self.feature_dim == 0 {
            0
        } else {
            self.node_feat.len() / self.feature_dim
        }
    }

    /// Feature row of one node
    pub fn row(&self, node: usize) -> Option<&[i32]> {
        let start = node.checked_mul(self.feature_dim)?;
        self.node_feat.get(start..start + self.feature_dim)
    }

    fn push_edge(&mut self, src: usize, dst: usize, inverted: bool) {
        self.edge_src.push(src as i32);
        self.edge_dst.push(dst as i32);
        self.edge_weight.push(if inverted { -1 } else { 1 });
    }
}

/// Extract graph arrays from a strashed network
pub fn graph_data(
    ntk: &Network,
    typing: NodeTyping,
    inverter: InverterEncoding,
) -> SynthResult<GraphData> {
    if !ntk.is_strashed() {
        return Err(SynthError::NotStrashed);
    }

    let node_type = typing
        .type_id(ObjKind::Node)
        .ok_or_else(|| SynthError::UnexpectedObject {
            kind: ObjKind::Node.to_string(),
            typing: typing.code(),
        })?;
    let feature_dim = node_type + 1 + inverter.extra_columns();

    let mut data = GraphData {
        feature_dim,
        ..Default::default()
    };
    data.node_feat.reserve(ntk.num_objects() * feature_dim);

    for (id, obj) in ntk.iter_objects() {
        let mut tid = typing
            .type_id(obj.kind)
            .ok_or_else(|| SynthError::UnexpectedObject {
                kind: obj.kind.to_string(),
                typing: typing.code(),
            })?;
        let mut ninv = 0;

        if obj.is_node() {
            for f in &obj.fanins {
                data.push_edge(f.id.index(), id.index(), f.complemented);
            }
            ninv = obj.num_complemented();
            if inverter == InverterEncoding::NodeType {
                tid += ninv;
            }
        } else if obj.kind.is_co() {
            if obj.fanins.len() != 1 {
                return Err(SynthError::BadFaninCount {
                    kind: obj.kind.to_string(),
                    id: id.index(),
                    count: obj.fanins.len(),
                });
            }
            // Output inversion is not encoded on the edge
            data.push_edge(obj.fanins[0].id.index(), id.index(), false);
        }

        let row = data.node_feat.len();
        data.node_feat.resize(row + feature_dim, 0);
        data.node_feat[row + tid] = 1;
        if inverter == InverterEncoding::NodeFeature {
            data.node_feat[row + feature_dim - 1] = ninv as i32;
        }
    }

    debug!(
        "graph data t={} i={}: {} rows x {} features, {} edges",
        typing,
        inverter,
        data.num_rows(),
        feature_dim,
        data.num_edges()
    );

    Ok(data)
}
