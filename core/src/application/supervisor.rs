//! Whole-run orchestration: validate, reclaim, confirm, launch, mirror exit.

use tracing::debug;

use crate::config::DevConfig;
use crate::domain::{DevEvent, EventSink};
use crate::error::Result;
use crate::ports::{ListenerScannerPort, ProcessKillerPort, ProcessSpawnerPort};

use super::{silent_sink, PortReclaimer, ServerLauncher};

/// Exit code for an invalid config, an unreclaimable port or a failed spawn.
const FAILURE: i32 = 1;

/// Stages of one run, in order. `Exited` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Reclaiming,
    Confirming,
    Launching,
    Running,
    Exited,
}

/// Drives one reclaim-then-launch run and computes the process exit code.
pub struct Supervisor<S, K, P>
where
    S: ListenerScannerPort,
    K: ProcessKillerPort,
    P: ProcessSpawnerPort,
{
    reclaimer: PortReclaimer<S, K>,
    launcher: ServerLauncher<P>,
    events: EventSink,
}

impl<S, K, P> Supervisor<S, K, P>
where
    S: ListenerScannerPort,
    K: ProcessKillerPort,
    P: ProcessSpawnerPort,
{
    pub fn new(scanner: S, killer: K, spawner: P) -> Self {
        Self {
            reclaimer: PortReclaimer::new(scanner, killer),
            launcher: ServerLauncher::new(spawner),
            events: silent_sink(),
        }
    }

    /// Route events from every stage to `events`.
    pub fn with_events(self, events: EventSink) -> Self {
        Self {
            reclaimer: self.reclaimer.with_events(events.clone()),
            launcher: self.launcher.with_events(events.clone()),
            events,
        }
    }

    /// Run to completion and return the exit code for this process.
    ///
    /// `config` is the validation result; an error ends the run with exit
    /// code 1 before any listener query or signal.
    pub async fn run(self, config: Result<DevConfig>) -> i32 {
        let Self {
            reclaimer,
            launcher,
            events,
        } = self;
        let emit = |event: DevEvent| events(&event);

        enter(Stage::Validating);
        let config = match config {
            Ok(config) => config,
            Err(e) => {
                emit(DevEvent::ConfigRejected {
                    reason: e.to_string(),
                });
                enter(Stage::Exited);
                return FAILURE;
            }
        };

        let port = config.port;
        let reclaimer = reclaimer.with_policy(config.probe_policy);

        enter(Stage::Reclaiming);
        emit(DevEvent::TargetPort { port });
        reclaimer.kill_listeners(port).await;

        enter(Stage::Confirming);
        if !reclaimer.ensure_free(port, config.max_attempts).await {
            emit(DevEvent::PortBusy { port });
            enter(Stage::Exited);
            return FAILURE;
        }
        emit(DevEvent::PortFree {
            port,
            host: config.host.clone(),
        });

        enter(Stage::Launching);
        let spec = launcher.launch_spec(&config);

        enter(Stage::Running);
        let code = match launcher.launch(&spec).await {
            Ok(outcome) => outcome.exit_code(),
            Err(e) => {
                emit(DevEvent::SpawnFailed {
                    reason: e.to_string(),
                });
                FAILURE
            }
        };

        enter(Stage::Exited);
        code
    }
}

fn enter(stage: Stage) {
    debug!(?stage, "Entering stage");
}
