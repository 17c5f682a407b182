//! Network statistics queries

use crate::error::{SynthError, SynthResult};
use crate::network::Network;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size and depth of the current network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtkStats {
    /// Whether the network is a strashed AIG
    pub is_aig: bool,
    pub inputs: usize,
    pub outputs: usize,
    pub latches: usize,
    /// AND node count
    pub nodes: usize,
    /// Total fanin edges over AND nodes
    pub edges: usize,
    /// Maximum logic level
    pub levels: u32,
}

impl fmt::Display for NtkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "i/o = {}/{}  lat = {}  {} = {}  edge = {}  lev = {}",
            self.inputs,
            self.outputs,
            self.latches,
            if self.is_aig { "and" } else { "nd" },
            self.nodes,
            self.edges,
            self.levels
        )
    }
}

/// Gate counts when the AIG is written out as AND/OR/NOT gates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YosysStats {
    pub and_gates: usize,
    pub or_gates: usize,
    pub not_gates: usize,
}

impl fmt::Display for YosysStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "and = {}  or = {}  not = {}",
            self.and_gates, self.or_gates, self.not_gates
        )
    }
}

/// Area and delay after standard-cell mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SclStats {
    pub area: f64,
    pub delay: f64,
}

/// Compute [`NtkStats`] for any network
pub fn ntk_stats(ntk: &Network) -> SynthResult<NtkStats> {
    Ok(NtkStats {
        is_aig: ntk.is_strashed(),
        inputs: ntk.num_pis(),
        outputs: ntk.num_pos(),
        latches: ntk.num_latches(),
        nodes: ntk.num_nodes(),
        edges: ntk.iter_nodes().map(|(_, o)| o.fanins.len()).sum(),
        levels: ntk.depth()?,
    })
}

/// Count AND/OR/NOT gates of a strashed network.
///
/// An AND node whose first fanout is an output read through an inversion is
/// counted as an OR of the complemented fanins; every other AND node stays
/// an AND. Inverters are counted on the fanins each gate actually needs.
pub fn yosys_stats(ntk: &Network) -> SynthResult<YosysStats> {
    if !ntk.is_strashed() {
        return Err(SynthError::NotStrashed);
    }
    ntk.check_structure()?;

    let fanouts = ntk.fanouts();
    let mut stats = YosysStats::default();

    for (id, obj) in ntk.iter_nodes() {
        let ninv = obj.num_complemented();
        let inverted_output = fanouts[id.index()]
            .first()
            .and_then(|&fo| ntk.obj(fo))
            .filter(|fo| fo.kind.is_co())
            .and_then(|fo| fo.fanin0())
            .is_some_and(|f| f.complemented);

        if inverted_output {
            stats.or_gates += 1;
            stats.not_gates += 2 - ninv;
        } else {
            stats.and_gates += 1;
            stats.not_gates += ninv;
        }
    }

    Ok(stats)
}
