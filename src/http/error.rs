//! Errors raised while serving a connection.

use thiserror::Error;

/// Failure of the response path.
///
/// Peer mistakes never show up here: malformed requests and unknown paths are
/// answered with 500/404. These variants are either transport failures or
/// misuse of the response builder.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("unknown HTTP status code {0}")]
    UnknownStatusCode(u16),

    #[error("header `{name}` cannot be written on the wire")]
    InvalidHeader { name: String },

    #[error("connection I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
