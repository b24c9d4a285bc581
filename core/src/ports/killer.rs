//! Process killer port (interface).

use crate::error::Result;

/// Port for terminating processes.
///
/// Implementations handle platform-specific signal delivery.
pub trait ProcessKillerPort: Send + Sync {
    /// Send a termination request to `pid`.
    ///
    /// If `force` is true the request cannot be ignored (SIGKILL), otherwise
    /// it is a cooperative request (SIGTERM). Returning does not mean the
    /// process is gone.
    fn terminate(&self, pid: u32, force: bool)
        -> impl std::future::Future<Output = Result<()>> + Send;
}
