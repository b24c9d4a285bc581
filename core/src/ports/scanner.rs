//! Listener scanner port (interface).

use crate::domain::ListenerSet;
use crate::error::Result;

/// Port for discovering which processes listen on a TCP port.
///
/// Implementations handle platform-specific details (lsof, ss, netstat).
pub trait ListenerScannerPort: Send + Sync {
    /// PIDs currently in the LISTEN state on `port`.
    ///
    /// An error means the query could not be answered, not that the port
    /// is busy.
    fn list_listeners(&self, port: u16)
        -> impl std::future::Future<Output = Result<ListenerSet>> + Send;
}
