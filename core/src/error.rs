use thiserror::Error;

/// Result alias for graph construction and extraction.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Structural violations. Heterogeneous or missing properties never
/// produce one of these; absent values resolve to the sentinel instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node Identifier was submitted twice. Raised before any edge is read.
    #[error("duplicate node identifier '{id}' at record {position} (first seen at record {first})")]
    DuplicateIdentifier {
        id: String,
        first: usize,
        position: usize,
    },

    /// An edge names an endpoint that is not in the node set.
    #[error("edge {position} ({source_id} -> {target_id}, '{edge_type}') references unknown node '{missing}'")]
    DanglingReference {
        position: usize,
        source_id: String,
        target_id: String,
        edge_type: String,
        missing: String,
    },

    /// An extraction or lookup named an Identifier the graph does not hold.
    #[error("node '{0}' not found")]
    UnknownNode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid or unparsable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid direction '{0}': use 'outgoing', 'incoming', or 'both'")]
    InvalidDirection(String),

    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}
