//! cgraph synthesis engine - AIG networks and graph-data extraction
//!
//! This crate handles:
//! - The object-list network model (constants, PIs, POs, latches, AND nodes)
//! - Reading AIGER (ASCII and binary) and BLIF files
//! - Structural hashing and cleanup
//! - Flattening a strashed network into edge arrays and node features
//! - Size, depth and gate-count statistics
//!
//! The [`Engine`] trait is the seam the adapter drives; [`AigSession`] is the
//! in-process implementation.

pub mod aiger;
pub mod blif;
pub mod commands;
pub mod engine;
pub mod error;
pub mod extract;
pub mod network;
pub mod session;
pub mod stats;
pub mod strash;

pub use aiger::read_aiger;
pub use blif::read_blif;
pub use commands::Command;
pub use engine::{Engine, ExecStatus};
pub use error::{SynthError, SynthResult};
pub use extract::{graph_data, GraphData, InverterEncoding, NodeTyping};
pub use network::{Fanin, Network, NetworkKind, ObjId, ObjKind};
pub use session::AigSession;
pub use stats::{ntk_stats, yosys_stats, NtkStats, SclStats, YosysStats};
pub use strash::{cleanup, strash};
