//! Process termination adapter.
//!
//! - Unix: SIGTERM (graceful) or SIGKILL (force) through `kill(2)`
//! - Windows: `taskkill /PID xxx` or `taskkill /PID xxx /F`

use tracing::debug;

use crate::error::{Error, Result};
use crate::ports::ProcessKillerPort;

/// Sends termination requests to processes by PID.
#[derive(Debug, Default)]
pub struct SignalKiller;

impl SignalKiller {
    pub fn new() -> Self {
        Self
    }

    #[cfg(unix)]
    async fn send(&self, pid: u32, force: bool) -> Result<()> {
        use nix::errno::Errno;
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        // 0 and negative values address process groups, never a single listener.
        let raw = match i32::try_from(pid) {
            Ok(raw) if raw > 0 => raw,
            _ => {
                return Err(Error::KillFailed {
                    pid,
                    reason: "not a single-process PID".to_string(),
                })
            }
        };

        let signal = if force { Signal::SIGKILL } else { Signal::SIGTERM };
        debug!(pid, signal = signal.as_str(), "Sending signal to process");

        kill(Pid::from_raw(raw), signal).map_err(|errno| match errno {
            Errno::EPERM => Error::PermissionDenied(format!("cannot signal process {}", pid)),
            Errno::ESRCH => Error::KillFailed {
                pid,
                reason: "no such process".to_string(),
            },
            other => Error::KillFailed {
                pid,
                reason: other.desc().to_string(),
            },
        })
    }

    #[cfg(windows)]
    async fn send(&self, pid: u32, force: bool) -> Result<()> {
        use tokio::process::Command;

        debug!(pid, force, "Executing taskkill");

        let mut cmd = Command::new("taskkill");
        cmd.arg("/PID").arg(pid.to_string());
        if force {
            cmd.arg("/F");
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run taskkill: {}", e)))?;

        if output.status.success() {
            return Ok(());
        }

        let combined = format!(
            "{} {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if combined.contains("Access is denied") {
            return Err(Error::PermissionDenied(format!("cannot terminate process {}", pid)));
        }

        Err(Error::KillFailed {
            pid,
            reason: combined.trim().to_string(),
        })
    }

    #[cfg(not(any(unix, windows)))]
    async fn send(&self, _pid: u32, _force: bool) -> Result<()> {
        Err(Error::UnsupportedPlatform(std::env::consts::OS.to_string()))
    }
}

impl ProcessKillerPort for SignalKiller {
    async fn terminate(&self, pid: u32, force: bool) -> Result<()> {
        self.send(pid, force).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refuses_group_pids() {
        let killer = SignalKiller::new();
        assert!(matches!(
            killer.terminate(0, true).await,
            Err(Error::KillFailed { pid: 0, .. })
        ));
        assert!(matches!(
            killer.terminate(u32::MAX, true).await,
            Err(Error::KillFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_terminates_child_process() {
        let mut child = tokio::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .unwrap();
        let pid = child.id().unwrap();

        SignalKiller::new().terminate(pid, false).await.unwrap();

        let status = child.wait().await.unwrap();
        let outcome = crate::domain::ExitOutcome::from(status);
        assert_eq!(outcome.signal.as_deref(), Some("SIGTERM"));
    }
}
