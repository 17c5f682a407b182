//! Circuit-graph adapter for graph-learning pipelines
//!
//! This crate sits between a synthesis [`Engine`](cgraph_synth::Engine) and
//! a graph-learning pipeline:
//!
//! - **Graph building**: decode a `t.i` version code, extract the engine's
//!   edge and feature arrays, wrap them in a [`CircuitGraph`]
//! - **Command formatting**: render option maps into engine command strings
//! - **Loading**: read a circuit file followed by a structural check
//!
//! # Example
//!
//! ```ignore
//! use cgraph_ml::{AdapterConfig, CircuitGraphAdapter};
//! use cgraph_synth::AigSession;
//!
//! let mut adapter = CircuitGraphAdapter::open(AigSession::new(), AdapterConfig::default());
//! adapter.load_file("design.blif");
//! let graph = adapter.build_graph(1.2)?;
//! ```

pub mod adapter;
pub mod command;
pub mod config;
pub mod error;
pub mod graph;
pub mod options;
pub mod version;

pub use adapter::CircuitGraphAdapter;
pub use command::{load_command, render};
pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterResult, GraphError};
pub use graph::{CircuitGraph, Tensor};
pub use options::{CommandOptions, KeywordValue, OptionPolicy, OptionValue};
pub use version::GraphVersion;
