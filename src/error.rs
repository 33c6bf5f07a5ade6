//! Error types for the Jellyfin client.

use thiserror::Error;

/// Errors that can occur when talking to a Jellyfin server.
#[derive(Error, Debug)]
pub enum JellyfinError {
    /// Discovery found no reachable server for the given URL
    #[error("no available servers found")]
    NoServersFound,

    /// Invalid server URL
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server is offline or unreachable
    #[error("server unreachable: {0}")]
    ServerUnreachable(String),

    /// Server rejected the credentials
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Server returned an error response
    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse a server response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Episode record carries no media sources
    #[error("episode {item_id} has no media sources")]
    MissingMediaSources { item_id: String },

    /// Episode record carries no user playback data
    #[error("episode {item_id} has no user playback data")]
    MissingUserData { item_id: String },
}

/// Result type for Jellyfin client operations.
pub type Result<T> = std::result::Result<T, JellyfinError>;
