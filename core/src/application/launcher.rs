//! Dev server launch service.

use tracing::info;

use crate::config::DevConfig;
use crate::domain::{DevEvent, EventSink, ExitOutcome};
use crate::error::Result;
use crate::ports::{LaunchSpec, ProcessSpawnerPort};

use super::silent_sink;

/// Variables forcing colored output even though stdio is inherited.
pub const COLOR_ENV: [(&str, &str); 2] = [("FORCE_COLOR", "1"), ("ASTRO_FORCE_COLOR", "1")];

/// Starts exactly one dev server bound to the configured host and port.
///
/// The server runs in strict-port mode, so a port taken between reclamation
/// and bind makes it fail instead of hopping to another port. Nothing here
/// retries.
pub struct ServerLauncher<P: ProcessSpawnerPort> {
    spawner: P,
    events: EventSink,
}

impl<P: ProcessSpawnerPort> ServerLauncher<P> {
    pub fn new(spawner: P) -> Self {
        Self {
            spawner,
            events: silent_sink(),
        }
    }

    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Command line for `config`: the server command followed by
    /// `--port <port> --strictPort --host <host>`.
    pub fn launch_spec(&self, config: &DevConfig) -> LaunchSpec {
        let mut args = config.server.args.clone();
        args.extend([
            "--port".to_string(),
            config.port.to_string(),
            "--strictPort".to_string(),
            "--host".to_string(),
            config.host.clone(),
        ]);

        LaunchSpec {
            program: config.server.program.clone(),
            args,
            env: COLOR_ENV
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Run the server described by `spec` until it exits.
    pub async fn launch(&self, spec: &LaunchSpec) -> Result<ExitOutcome> {
        (self.events)(&DevEvent::Spawning {
            command_line: spec.command_line(),
        });

        let outcome = self.spawner.run(spec).await?;
        info!(code = ?outcome.code, signal = ?outcome.signal, "Dev server exited");

        (self.events)(&DevEvent::ServerExited {
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fakes::{EventLog, FakeSpawner};
    use crate::config::ServerCommand;

    #[test]
    fn test_launch_spec_is_strict() {
        let launcher = ServerLauncher::new(FakeSpawner::exiting_with(ExitOutcome::exited(0)));
        let spec = launcher.launch_spec(&DevConfig::default());

        assert_eq!(spec.program, "npx");
        assert_eq!(
            spec.args,
            ["astro", "dev", "--port", "4977", "--strictPort", "--host", "127.0.0.1"]
        );
        assert!(spec.env.contains(&("FORCE_COLOR".to_string(), "1".to_string())));
        assert!(spec.env.contains(&("ASTRO_FORCE_COLOR".to_string(), "1".to_string())));
        assert_eq!(
            spec.command_line(),
            "npx astro dev --port 4977 --strictPort --host 127.0.0.1"
        );
    }

    #[test]
    fn test_launch_spec_custom_server() {
        let launcher = ServerLauncher::new(FakeSpawner::exiting_with(ExitOutcome::exited(0)));
        let config = DevConfig {
            port: 8080,
            host: "0.0.0.0".to_string(),
            ..DevConfig::default()
        }
        .with_server(ServerCommand::new("vite", Vec::<String>::new()));

        let spec = launcher.launch_spec(&config);
        assert_eq!(spec.command_line(), "vite --port 8080 --strictPort --host 0.0.0.0");
    }

    #[tokio::test]
    async fn test_launch_reports_exit() {
        let spawner = FakeSpawner::exiting_with(ExitOutcome::exited(2));
        let log = EventLog::new();
        let launcher = ServerLauncher::new(spawner.clone()).with_events(log.sink());

        let spec = launcher.launch_spec(&DevConfig::default());
        let outcome = launcher.launch(&spec).await.unwrap();

        assert_eq!(outcome.exit_code(), 2);
        assert_eq!(spawner.launches(), vec![spec]);
        assert_eq!(
            log.events().last(),
            Some(&DevEvent::ServerExited {
                outcome: ExitOutcome::exited(2)
            })
        );
    }
}
