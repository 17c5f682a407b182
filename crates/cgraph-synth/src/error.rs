//! Error types for the in-process engine

use thiserror::Error;

/// Result type for engine operations
pub type SynthResult<T> = std::result::Result<T, SynthError>;

/// Errors raised by the engine while reading, transforming or querying a network
#[derive(Debug, Error)]
pub enum SynthError {
    /// I/O error reading a circuit file
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed circuit file
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// File extension not recognized by any reader
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// No network has been read yet
    #[error("No current network")]
    NoNetwork,

    /// Operation requires a structurally hashed network
    #[error("Unexpected network type: network is not strashed")]
    NotStrashed,

    /// Node-typing or inverter convention outside the supported range
    #[error("Unexpected graph version: t={typing}, i={inverter}")]
    InvalidVersion { typing: u32, inverter: u32 },

    /// Object kind has no type id under the requested convention
    #[error("Unexpected node type {kind} under node typing {typing}")]
    UnexpectedObject { kind: String, typing: u32 },

    /// Combinational output with a fanin count other than one
    #[error("{kind} node {id} has {count} fanin")]
    BadFaninCount {
        kind: String,
        id: usize,
        count: usize,
    },

    /// Cycle through AND nodes only
    #[error("Combinational cycle through object {0}")]
    CombinationalCycle(usize),

    /// Reference to an object that does not exist
    #[error("Dangling reference to object {0}")]
    DanglingReference(usize),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown flag -{flag} for command {command}")]
    UnknownFlag { command: String, flag: String },

    #[error("Missing argument for command {0}")]
    MissingArgument(String),

    /// Query not available on this engine
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for SynthError {
    fn from(e: std::io::Error) -> Self {
        SynthError::Io(e.to_string())
    }
}

impl SynthError {
    /// Shorthand for a parse error at a given line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        SynthError::Parse {
            line,
            message: message.into(),
        }
    }
}
