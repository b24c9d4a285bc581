//! Windows listener query using netstat.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::ListenerSet;
use crate::error::{Error, Result};

use super::utils::Utils;

/// Windows-specific scanner running `netstat -ano`.
pub struct NetstatScanner;

impl NetstatScanner {
    pub fn new() -> Self {
        Self
    }

    pub async fn scan(&self, port: u16) -> Result<ListenerSet> {
        let output = Command::new("netstat")
            .arg("-ano")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("netstat -ano: {}", e)))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "netstat -ano failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let pids = Utils::parse_netstat_listeners(&stdout, port);
        debug!(port, count = pids.len(), "netstat listener query");
        Ok(pids)
    }
}

impl Default for NetstatScanner {
    fn default() -> Self {
        Self::new()
    }
}
