//! Process spawner port (interface).

use serde::{Deserialize, Serialize};

use crate::domain::ExitOutcome;
use crate::error::Result;

/// Fully resolved command line for the dev server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Variables set on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

impl LaunchSpec {
    /// Shell-like rendering for diagnostics, e.g. `npx astro dev --port 4977`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Port for running a child process to completion.
pub trait ProcessSpawnerPort: Send + Sync {
    /// Start the process with inherited stdio and wait for it to exit.
    fn run(&self, spec: &LaunchSpec)
        -> impl std::future::Future<Output = Result<ExitOutcome>> + Send;
}
