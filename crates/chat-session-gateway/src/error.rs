//! Gateway error types.

use thiserror::Error;

/// Gateway error type.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The bridge connection a reply was bound for is gone
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type alias using GatewayError.
pub type GatewayResult<T> = Result<T, GatewayError>;
