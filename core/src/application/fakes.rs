//! Scripted stand-ins for the OS, shared by the application tests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::domain::{DevEvent, EventSink, ExitOutcome, ListenerSet};
use crate::error::{Error, Result};
use crate::ports::{LaunchSpec, ListenerScannerPort, ProcessKillerPort, ProcessSpawnerPort};

/// How a fake listener reacts to termination requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Stops listening `after` the graceful signal; SIGKILL is immediate.
    ExitsOnTerm { after: Duration },
    /// Only SIGKILL stops it.
    IgnoresTerm,
    /// Ignores SIGTERM; after SIGKILL a new process binds the port again.
    Rebinds,
    /// Every signal fails (e.g. permission denied) and it keeps listening.
    Unkillable,
}

struct Listener {
    behavior: Behavior,
    exit_at: Option<Instant>,
}

#[derive(Default)]
struct HostState {
    listeners: BTreeMap<u32, Listener>,
    scans: u32,
    failing_scans: u32,
    signals: Vec<(u32, bool)>,
}

impl HostState {
    fn reap(&mut self) {
        let now = Instant::now();
        self.listeners
            .retain(|_, l| l.exit_at.map_or(true, |at| at > now));
    }

    fn next_pid(&self) -> u32 {
        self.listeners.keys().next_back().map_or(1000, |pid| pid + 1)
    }
}

/// One port worth of fake listeners, implementing both OS ports.
#[derive(Clone, Default)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(self, pid: u32, behavior: Behavior) -> Self {
        self.state.lock().listeners.insert(
            pid,
            Listener {
                behavior,
                exit_at: None,
            },
        );
        self
    }

    /// Make the next `count` listener queries fail.
    pub fn failing_scans(self, count: u32) -> Self {
        self.state.lock().failing_scans = count;
        self
    }

    pub fn scans(&self) -> u32 {
        self.state.lock().scans
    }

    /// Every termination request as `(pid, force)`, in order.
    pub fn signals(&self) -> Vec<(u32, bool)> {
        self.state.lock().signals.clone()
    }

    pub fn forced(&self) -> Vec<u32> {
        self.signals()
            .into_iter()
            .filter(|(_, force)| *force)
            .map(|(pid, _)| pid)
            .collect()
    }

    /// Current listeners, without counting as a query.
    pub fn pids(&self) -> ListenerSet {
        let mut state = self.state.lock();
        state.reap();
        state.listeners.keys().copied().collect()
    }
}

impl ListenerScannerPort for FakeHost {
    async fn list_listeners(&self, _port: u16) -> Result<ListenerSet> {
        let mut state = self.state.lock();
        state.scans += 1;

        if state.failing_scans > 0 {
            state.failing_scans -= 1;
            return Err(Error::CommandFailed("lsof is not installed".to_string()));
        }

        state.reap();
        Ok(state.listeners.keys().copied().collect())
    }
}

impl ProcessKillerPort for FakeHost {
    async fn terminate(&self, pid: u32, force: bool) -> Result<()> {
        let mut state = self.state.lock();
        state.signals.push((pid, force));
        state.reap();

        let Some(behavior) = state.listeners.get(&pid).map(|l| l.behavior) else {
            return Err(Error::KillFailed {
                pid,
                reason: "no such process".to_string(),
            });
        };

        match (behavior, force) {
            (Behavior::Unkillable, _) => {
                return Err(Error::PermissionDenied(format!("cannot signal process {}", pid)))
            }
            (Behavior::ExitsOnTerm { after }, false) => {
                if let Some(listener) = state.listeners.get_mut(&pid) {
                    listener.exit_at.get_or_insert(Instant::now() + after);
                }
            }
            (Behavior::IgnoresTerm | Behavior::Rebinds, false) => {}
            (Behavior::Rebinds, true) => {
                state.listeners.remove(&pid);
                let next = state.next_pid().max(pid + 1);
                state.listeners.insert(
                    next,
                    Listener {
                        behavior: Behavior::Rebinds,
                        exit_at: None,
                    },
                );
            }
            (_, true) => {
                state.listeners.remove(&pid);
            }
        }

        Ok(())
    }
}

/// Spawner that records launch specs and returns a canned outcome.
#[derive(Clone)]
pub struct FakeSpawner {
    launches: Arc<Mutex<Vec<LaunchSpec>>>,
    outcome: Option<ExitOutcome>,
}

impl FakeSpawner {
    pub fn exiting_with(outcome: ExitOutcome) -> Self {
        Self {
            launches: Arc::new(Mutex::new(Vec::new())),
            outcome: Some(outcome),
        }
    }

    /// Spawner whose program cannot be found.
    pub fn missing() -> Self {
        Self {
            launches: Arc::new(Mutex::new(Vec::new())),
            outcome: None,
        }
    }

    pub fn launches(&self) -> Vec<LaunchSpec> {
        self.launches.lock().clone()
    }
}

impl ProcessSpawnerPort for FakeSpawner {
    async fn run(&self, spec: &LaunchSpec) -> Result<ExitOutcome> {
        self.launches.lock().push(spec.clone());
        self.outcome.clone().ok_or_else(|| Error::Spawn {
            program: spec.program.clone(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}

/// Collects emitted events for assertions.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<DevEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sink(&self) -> EventSink {
        let events = Arc::clone(&self.events);
        Arc::new(move |event: &DevEvent| events.lock().push(event.clone()))
    }

    pub fn events(&self) -> Vec<DevEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&DevEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }
}
