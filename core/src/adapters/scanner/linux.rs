//! Linux listener query using ss.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::ListenerSet;
use crate::error::{Error, Result};

use super::utils::Utils;

/// Linux-specific scanner running `ss -Htlnp`.
pub struct SsScanner;

impl SsScanner {
    pub fn new() -> Self {
        Self
    }

    pub async fn scan(&self, port: u16) -> Result<ListenerSet> {
        let output = Command::new("ss")
            .args(["-Htlnp"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run ss: {}", e)))?;

        if !output.status.success() {
            return Err(Error::CommandFailed(format!(
                "ss exited with status {}",
                output.status
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in ss output: {}", e)))?;

        let pids = Utils::parse_ss_listeners(&stdout, port);
        debug!(port, count = pids.len(), "ss listener query");
        Ok(pids)
    }
}

impl Default for SsScanner {
    fn default() -> Self {
        Self::new()
    }
}
