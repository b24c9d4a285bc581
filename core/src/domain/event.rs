//! Progress events emitted while reclaiming the port and running the server.

use std::fmt;
use std::sync::Arc;

use super::{format_pids, ExitOutcome, ListenerSet};

/// Callback receiving every [`DevEvent`] in order.
pub type EventSink = Arc<dyn Fn(&DevEvent) + Send + Sync>;

/// A step of the reclaim-then-launch sequence worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevEvent {
    /// The configuration failed validation; nothing else happens.
    ConfigRejected { reason: String },
    /// The port this run will own.
    TargetPort { port: u16 },
    /// Processes found listening on the port; graceful signals follow.
    ListenersFound { port: u16, pids: ListenerSet },
    /// Processes survived the settle delay and get a forceful signal.
    ForcingKill { pids: ListenerSet },
    /// The port is still busy at the start of a retry.
    StillBusy {
        attempt: u32,
        max_attempts: u32,
        pids: ListenerSet,
    },
    /// The listener query failed.
    ProbeFailed { port: u16, reason: String },
    /// The port is confirmed free.
    PortFree { port: u16, host: String },
    /// The port could not be freed.
    PortBusy { port: u16 },
    /// The dev server command line about to run.
    Spawning { command_line: String },
    /// The dev server could not be started.
    SpawnFailed { reason: String },
    /// The dev server terminated.
    ServerExited { outcome: ExitOutcome },
}

impl DevEvent {
    /// Whether the event reports a failure (printed on stderr).
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            DevEvent::ConfigRejected { .. }
                | DevEvent::PortBusy { .. }
                | DevEvent::SpawnFailed { .. }
        )
    }
}

impl fmt::Display for DevEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevEvent::ConfigRejected { reason } => f.write_str(reason),
            DevEvent::TargetPort { port } => write!(f, "Target port: {}", port),
            DevEvent::ListenersFound { port, pids } => {
                write!(f, "Found listener(s) on {}: {}", port, format_pids(pids))
            }
            DevEvent::ForcingKill { pids } => {
                write!(f, "Forcing SIGKILL for: {}", format_pids(pids))
            }
            DevEvent::StillBusy {
                attempt,
                max_attempts,
                pids,
            } => {
                if pids.is_empty() {
                    write!(
                        f,
                        "Attempt {}/{}: port state unknown, re-checking...",
                        attempt, max_attempts
                    )
                } else {
                    write!(
                        f,
                        "Attempt {}/{}: port still busy ({}), re-killing...",
                        attempt,
                        max_attempts,
                        format_pids(pids)
                    )
                }
            }
            DevEvent::ProbeFailed { port, reason } => {
                write!(f, "Could not query listeners on {}: {}", port, reason)
            }
            DevEvent::PortFree { port, host } => {
                write!(f, "Port {} is free. Launching dev server (host={})...", port, host)
            }
            DevEvent::PortBusy { port } => {
                write!(f, "Could not free port {} after retries. Aborting.", port)
            }
            DevEvent::Spawning { command_line } => write!(f, "Spawn: {}", command_line),
            DevEvent::SpawnFailed { reason } => write!(f, "Failed to start dev server: {}", reason),
            DevEvent::ServerExited { outcome } => write!(f, "Dev server exited {}", outcome),
        }
    }
}
