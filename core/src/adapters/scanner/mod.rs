//! Listener scanner adapters.
//!
//! Platform-specific implementations of the listener query.

#[cfg(unix)]
mod lsof;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "windows")]
mod windows;

mod utils;

use crate::domain::ListenerSet;
use crate::error::Result;
use crate::ports::ListenerScannerPort;

/// The listener scanner for the current platform.
///
/// - macOS: `lsof`
/// - Linux: `lsof`, falling back to `ss` when `lsof` is not installed
/// - Windows: `netstat -ano`
pub struct ListenerScanner {
    #[cfg(unix)]
    lsof: lsof::LsofScanner,

    #[cfg(target_os = "linux")]
    ss: linux::SsScanner,

    #[cfg(target_os = "windows")]
    inner: windows::NetstatScanner,
}

impl ListenerScanner {
    /// Create a new listener scanner for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            lsof: lsof::LsofScanner::new(),

            #[cfg(target_os = "linux")]
            ss: linux::SsScanner::new(),

            #[cfg(target_os = "windows")]
            inner: windows::NetstatScanner::new(),
        }
    }

    /// PIDs listening on `port`.
    #[cfg(target_os = "linux")]
    pub async fn scan(&self, port: u16) -> Result<ListenerSet> {
        match self.lsof.scan(port).await {
            Err(lsof::LsofError::NotInstalled) => {
                tracing::debug!(port, "lsof not installed, falling back to ss");
                self.ss.scan(port).await
            }
            other => other.map_err(Into::into),
        }
    }

    /// PIDs listening on `port`.
    #[cfg(all(unix, not(target_os = "linux")))]
    pub async fn scan(&self, port: u16) -> Result<ListenerSet> {
        self.lsof.scan(port).await.map_err(Into::into)
    }

    /// PIDs listening on `port`.
    #[cfg(target_os = "windows")]
    pub async fn scan(&self, port: u16) -> Result<ListenerSet> {
        self.inner.scan(port).await
    }

    /// PIDs listening on `port`.
    #[cfg(not(any(unix, windows)))]
    pub async fn scan(&self, _port: u16) -> Result<ListenerSet> {
        Err(crate::error::Error::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }
}

impl Default for ListenerScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerScannerPort for ListenerScanner {
    async fn list_listeners(&self, port: u16) -> Result<ListenerSet> {
        self.scan(port).await
    }
}
