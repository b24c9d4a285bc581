//! Child process adapter built on `tokio::process`.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::ExitOutcome;
use crate::error::{Error, Result};
use crate::ports::{LaunchSpec, ProcessSpawnerPort};

/// Runs the dev server with the parent's stdin, stdout and stderr.
#[derive(Debug, Default)]
pub struct TokioSpawner;

impl TokioSpawner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &LaunchSpec) -> Command {
        // npx and friends are .cmd shims on Windows and need the shell.
        #[cfg(windows)]
        let mut command = {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(&spec.program);
            command
        };

        #[cfg(not(windows))]
        let mut command = Command::new(&spec.program);

        command
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }
}

impl ProcessSpawnerPort for TokioSpawner {
    async fn run(&self, spec: &LaunchSpec) -> Result<ExitOutcome> {
        let mut child = Self::command(spec).spawn().map_err(|source| Error::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        debug!(pid = ?child.id(), program = %spec.program, "Dev server started");

        let status = child.wait().await?;
        Ok(ExitOutcome::from(status))
    }
}
