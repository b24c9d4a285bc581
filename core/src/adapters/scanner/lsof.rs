//! Listener query using `lsof`.

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::ListenerSet;
use crate::error::Error;

use super::utils::Utils;

/// Failure modes of an `lsof` run.
#[derive(Debug)]
pub enum LsofError {
    /// `lsof` is not on the PATH.
    NotInstalled,
    /// `lsof` could not be run or produced unusable output.
    Failed(String),
}

impl From<LsofError> for Error {
    fn from(err: LsofError) -> Self {
        match err {
            LsofError::NotInstalled => Error::CommandFailed("lsof is not installed".to_string()),
            LsofError::Failed(reason) => Error::CommandFailed(reason),
        }
    }
}

/// Scanner running `lsof -tiTCP:<port> -sTCP:LISTEN`.
pub struct LsofScanner {
    program: String,
}

impl LsofScanner {
    pub fn new() -> Self {
        Self {
            program: "lsof".to_string(),
        }
    }

    #[cfg(test)]
    fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    pub async fn scan(&self, port: u16) -> Result<ListenerSet, LsofError> {
        let output = Command::new(&self.program)
            .arg(format!("-tiTCP:{}", port))
            .arg("-sTCP:LISTEN")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => LsofError::NotInstalled,
                _ => LsofError::Failed(format!("Failed to run lsof: {}", e)),
            })?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| LsofError::Failed(format!("Invalid UTF-8 in lsof output: {}", e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);

        debug!(port, status = ?output.status.code(), "lsof listener query");
        Utils::classify_lsof_output(output.status.success(), &stdout, &stderr)
            .map_err(|reason| LsofError::Failed(format!("lsof failed: {}", reason)))
    }
}

impl Default for LsofScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_lsof_is_not_installed() {
        let scanner = LsofScanner::with_program("/nonexistent/lsof");
        assert!(matches!(scanner.scan(4977).await, Err(LsofError::NotInstalled)));
    }

    #[tokio::test]
    async fn test_failing_tool_is_an_error_not_an_empty_set() {
        // `ls` rejects lsof's flags: non-zero exit, empty stdout, message on stderr.
        let scanner = LsofScanner::with_program("ls");
        match scanner.scan(4977).await {
            Err(LsofError::Failed(reason)) => assert!(reason.starts_with("lsof failed: ")),
            other => panic!("expected a failed query, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_query_maps_to_command_failed() {
        let err: Error = LsofError::Failed("lsof failed: boom".to_string()).into();
        assert_eq!(err.to_string(), "Command execution failed: lsof failed: boom");
    }
}
