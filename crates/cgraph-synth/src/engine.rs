//! Engine contract
//!
//! Everything the adapter needs from a synthesis engine goes through the
//! [`Engine`] trait: a textual command executor, the graph-data extraction
//! primitive and a handful of statistics queries. [`crate::AigSession`] is
//! the in-process implementation shipped with this crate.

use crate::error::{SynthError, SynthResult};
use crate::extract::{GraphData, InverterEncoding, NodeTyping};
use crate::stats::{NtkStats, SclStats, YosysStats};
use std::fmt;
use std::time::Duration;

/// Outcome of one executed command string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecStatus {
    /// Wall-clock time spent executing
    pub elapsed: Duration,
    /// Whether every sub-command succeeded
    pub success: bool,
}

impl ExecStatus {
    pub fn ok(elapsed: Duration) -> Self {
        Self {
            elapsed,
            success: true,
        }
    }

    pub fn failed(elapsed: Duration) -> Self {
        Self {
            elapsed,
            success: false,
        }
    }
}

impl fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {:.3}s",
            if self.success { "ok" } else { "failed" },
            self.elapsed.as_secs_f64()
        )
    }
}

/// A synthesis engine session holding one current network
pub trait Engine {
    /// Execute a command string in the engine's command language.
    ///
    /// Failures are reported through [`ExecStatus::success`], not as errors.
    fn execute(&mut self, command: &str) -> ExecStatus;

    /// Extract edge arrays and node features from the current network
    fn graph_data(
        &mut self,
        typing: NodeTyping,
        inverter: InverterEncoding,
    ) -> SynthResult<GraphData>;

    /// Object count of the current network, zero when none is loaded
    fn num_nodes(&self) -> usize;

    fn ntk_stats(&self) -> SynthResult<NtkStats>;

    fn yosys_stats(&self) -> SynthResult<YosysStats>;

    /// Area and delay after standard-cell mapping
    fn scl_stats(&self) -> SynthResult<SclStats> {
        Err(SynthError::Unsupported(
            "standard-cell statistics require a mapped network".to_string(),
        ))
    }
}
