//! Error types for the circuit-graph adapter

use cgraph_synth::SynthError;
use thiserror::Error;

/// Result type for adapter operations
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Errors raised while assembling a tensor graph from engine arrays
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Source, destination and weight arrays differ in length
    #[error("Edge arrays differ in length: src={src}, dst={dst}, weight={weight}")]
    EdgeLengthMismatch {
        src: usize,
        dst: usize,
        weight: usize,
    },

    /// Feature matrix does not hold one row per node
    #[error("Feature matrix has {len} entries, expected {num_nodes} x {feature_dim}")]
    FeatureLengthMismatch {
        len: usize,
        num_nodes: usize,
        feature_dim: usize,
    },

    /// Edge endpoint outside `[0, num_nodes)`
    #[error("Edge {edge} references node {node}, graph has {num_nodes} nodes")]
    NodeOutOfRange {
        edge: usize,
        node: i64,
        num_nodes: usize,
    },

    #[error("Feature dimension is zero")]
    EmptyFeatureDim,
}

/// Errors that can occur in adapter operations
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Version code outside the supported `t.i` range
    #[error("Invalid graph version: {0}")]
    InvalidVersion(String),

    /// Keyword whose name is neither all-uppercase nor all-lowercase
    #[error("Unrecognized option: {0}")]
    UnrecognizedOption(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Engine error: {0}")]
    Engine(#[from] SynthError),

    /// Failed to read or parse an adapter config file
    #[error("Invalid configuration: {0}")]
    Config(String),
}
