//! Error types for the devsolo-core library.

use thiserror::Error;

/// Result type alias for dev-solo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reclaiming a port or launching the dev server.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured port is not a positive integer in range.
    #[error("Invalid DEV_PORT value: {0}")]
    InvalidPort(String),

    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// Failed to signal a process.
    #[error("Failed to kill process {pid}: {reason}")]
    KillFailed { pid: u32, reason: String },

    /// Permission denied for an operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The dev server could not be started.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Platform not supported.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),
}
