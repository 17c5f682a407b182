//! Graph version codes
//!
//! A version is written `t.i`: the integer part picks the node-typing
//! convention and the first decimal digit picks the inverter encoding.

use crate::error::{AdapterError, AdapterResult};
use cgraph_synth::{InverterEncoding, NodeTyping};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decoded `(t, i)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphVersion {
    pub typing: NodeTyping,
    pub inverter: InverterEncoding,
}

impl GraphVersion {
    pub fn new(typing: NodeTyping, inverter: InverterEncoding) -> Self {
        Self { typing, inverter }
    }

    /// Decode `t = floor(ver)`, `i = floor(ver * 10) mod 10`
    pub fn from_code(ver: f64) -> AdapterResult<Self> {
        if !ver.is_finite() || ver < 0.0 {
            return Err(AdapterError::InvalidVersion(ver.to_string()));
        }
        let t = ver.floor();
        let i = (ver * 10.0).floor() % 10.0;
        if t > 2.0 || i > 2.0 {
            return Err(AdapterError::InvalidVersion(ver.to_string()));
        }
        Self::from_parts(t as u32, i as u32)
    }

    /// Build from explicit convention codes
    pub fn from_parts(t: u32, i: u32) -> AdapterResult<Self> {
        match (NodeTyping::from_code(t), InverterEncoding::from_code(i)) {
            (Some(typing), Some(inverter)) => Ok(Self { typing, inverter }),
            _ => Err(AdapterError::InvalidVersion(format!("{t}.{i}"))),
        }
    }

    /// The `t + i/10` code this version decodes from
    pub fn code(self) -> f64 {
        f64::from(self.typing.code()) + f64::from(self.inverter.code()) / 10.0
    }

    /// Whether the built graph carries the `w` edge attribute
    pub fn has_edge_weights(self) -> bool {
        self.inverter == InverterEncoding::EdgeWeight
    }
}

impl Default for GraphVersion {
    fn default() -> Self {
        Self::new(NodeTyping::Combinational, InverterEncoding::NodeType)
    }
}

impl fmt::Display for GraphVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.typing.code(), self.inverter.code())
    }
}

impl FromStr for GraphVersion {
    type Err = AdapterError;

    fn from_str(s: &str) -> AdapterResult<Self> {
        let ver: f64 = s
            .trim()
            .parse()
            .map_err(|_| AdapterError::InvalidVersion(s.to_string()))?;
        Self::from_code(ver)
    }
}
