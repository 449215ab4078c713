use thiserror::Error;

/// Error type for graph store operations.
///
/// Duplicate node or edge inserts are not represented here: they are silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("schema error: {0}")]
    SchemaError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("codec error: {0}")]
    CodecError(String),
    #[error("backend error: {0}")]
    BackendError(String),
    #[error("graph store is closed")]
    Closed,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl GraphError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        GraphError::ConnectionError(msg.into())
    }

    pub fn schema<T: Into<String>>(msg: T) -> Self {
        GraphError::SchemaError(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GraphError::NotFound(msg.into())
    }

    pub fn codec<T: Into<String>>(msg: T) -> Self {
        GraphError::CodecError(msg.into())
    }

    pub fn backend<T: Into<String>>(msg: T) -> Self {
        GraphError::BackendError(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        GraphError::InvalidInput(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NotFound(_))
    }
}
