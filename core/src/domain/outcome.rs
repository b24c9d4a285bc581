//! Exit outcome of the launched dev server.

use std::fmt;
use std::process::ExitStatus;

use serde::{Deserialize, Serialize};

/// How the child process terminated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExitOutcome {
    /// Exit code, absent when the child was killed by a signal.
    pub code: Option<i32>,
    /// Signal name such as `SIGTERM`, absent for a normal exit.
    pub signal: Option<String>,
}

impl ExitOutcome {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn signaled(signal: impl Into<String>) -> Self {
        Self {
            code: None,
            signal: Some(signal.into()),
        }
    }

    /// Exit code this process should adopt.
    ///
    /// A child that died from a signal carries no code and maps to 0.
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(0)
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal().map(signal_name)
        };

        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

#[cfg(unix)]
fn signal_name(raw: i32) -> String {
    match nix::sys::signal::Signal::try_from(raw) {
        Ok(signal) => signal.as_str().to_string(),
        Err(_) => format!("SIG{}", raw),
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "code={}", code)?,
            None => f.write_str("code=none")?,
        }
        write!(f, " sig={}", self.signal.as_deref().unwrap_or(""))
    }
}
