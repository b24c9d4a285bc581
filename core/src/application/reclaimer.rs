//! Port reclamation service.
//!
//! Guarantees that, when it reports success, nothing listens on the target
//! port. Owners are asked to stop (SIGTERM), given a settle delay, then
//! killed (SIGKILL). Retries are bounded so an external actor that keeps
//! re-binding the port cannot hang the run.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::{DevEvent, EventSink, ListenerSet, Probe, ProbePolicy};
use crate::ports::{ListenerScannerPort, ProcessKillerPort};

use super::silent_sink;

/// Wait between the graceful signal and the re-check that decides on SIGKILL.
pub const KILL_SETTLE_DELAY: Duration = Duration::from_millis(400);

/// Wait after each reclaim attempt before checking the port again.
pub const RETRY_DELAY: Duration = Duration::from_millis(300);

/// Frees a TCP port by terminating whatever listens on it.
pub struct PortReclaimer<S: ListenerScannerPort, K: ProcessKillerPort> {
    scanner: S,
    killer: K,
    policy: ProbePolicy,
    events: EventSink,
}

impl<S: ListenerScannerPort, K: ProcessKillerPort> PortReclaimer<S, K> {
    /// Create a fail-open reclaimer that reports nothing.
    pub fn new(scanner: S, killer: K) -> Self {
        Self {
            scanner,
            killer,
            policy: ProbePolicy::default(),
            events: silent_sink(),
        }
    }

    pub fn with_policy(mut self, policy: ProbePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    fn emit(&self, event: DevEvent) {
        (self.events)(&event);
    }

    /// Query the OS once, keeping "unknown" apart from "empty".
    pub async fn probe(&self, port: u16) -> Probe {
        match self.scanner.list_listeners(port).await {
            Ok(pids) => Probe::Listeners(pids),
            Err(e) => {
                warn!(port, error = %e, "Listener query failed");
                self.emit(DevEvent::ProbeFailed {
                    port,
                    reason: e.to_string(),
                });
                Probe::Unknown(e.to_string())
            }
        }
    }

    /// PIDs listening on `port`.
    ///
    /// Never fails: a query error yields the empty set.
    pub async fn listening_process_ids(&self, port: u16) -> ListenerSet {
        self.probe(port).await.pids()
    }

    /// Terminate every listener on `port`.
    ///
    /// Sends SIGTERM to all listeners, waits [`KILL_SETTLE_DELAY`], then sends
    /// SIGKILL to the ones still listening. Returns false when there was
    /// nothing to terminate.
    pub async fn kill_listeners(&self, port: u16) -> bool {
        let pids = self.listening_process_ids(port).await;
        if pids.is_empty() {
            return false;
        }

        self.emit(DevEvent::ListenersFound {
            port,
            pids: pids.clone(),
        });
        self.signal_all(&pids, false).await;

        sleep(KILL_SETTLE_DELAY).await;

        let still = self.listening_process_ids(port).await;
        if !still.is_empty() {
            self.emit(DevEvent::ForcingKill {
                pids: still.clone(),
            });
            self.signal_all(&still, true).await;
        }

        true
    }

    // Signal failures are ignored; the next listener query is authoritative.
    async fn signal_all(&self, pids: &ListenerSet, force: bool) {
        for &pid in pids {
            if let Err(e) = self.killer.terminate(pid, force).await {
                debug!(pid, force, error = %e, "Termination request failed");
            }
        }
    }

    /// Make sure `port` is free, retrying up to `max_attempts` times.
    ///
    /// Each attempt that finds the port busy runs [`Self::kill_listeners`] and
    /// waits [`RETRY_DELAY`]. One final check after the last attempt decides
    /// the result.
    pub async fn ensure_free(&self, port: u16, max_attempts: u32) -> bool {
        for attempt in 1..=max_attempts {
            let probe = self.probe(port).await;
            if self.policy.is_free(&probe) {
                return true;
            }

            self.emit(DevEvent::StillBusy {
                attempt,
                max_attempts,
                pids: probe.pids(),
            });
            self.kill_listeners(port).await;
            sleep(RETRY_DELAY).await;
        }

        let probe = self.probe(port).await;
        self.policy.is_free(&probe)
    }

    /// Initial kill pass followed by [`Self::ensure_free`].
    pub async fn reclaim(&self, port: u16, max_attempts: u32) -> bool {
        self.kill_listeners(port).await;
        self.ensure_free(port, max_attempts).await
    }
}
