//! Runtime configuration for the launcher and the feed.
//!
//! `DevConfig` is built once at startup from the environment (`DEV_PORT`,
//! `DEV_HOST`) and then passed explicitly to the reclaimer and the launcher.
//! Nothing reads the environment after that point.

use serde::{Deserialize, Serialize};

use crate::domain::ProbePolicy;
use crate::error::{Error, Result};

/// Environment variable holding the target port.
pub const PORT_ENV: &str = "DEV_PORT";

/// Environment variable holding the bind host.
pub const HOST_ENV: &str = "DEV_HOST";

/// Port used when `DEV_PORT` is unset.
pub const DEFAULT_PORT: u16 = 4977;

/// IPv4 loopback; an IPv6-only bind breaks `127.0.0.1` clients on some hosts.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Reclaim attempts made before giving up on the port.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

// ============================================================================
// ServerCommand
// ============================================================================

/// Program and leading arguments that start the dev server.
///
/// The launcher appends `--port`, `--strictPort` and `--host` to `args`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ServerCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for ServerCommand {
    fn default() -> Self {
        Self::new("npx", ["astro", "dev"])
    }
}

// ============================================================================
// DevConfig
// ============================================================================

/// Immutable settings for one reclaim-then-launch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevConfig {
    /// Port the dev server must bind, with no fallback.
    pub port: u16,
    /// Bind address passed to the dev server.
    pub host: String,
    /// Interpretation of a failed listener query.
    #[serde(default)]
    pub probe_policy: ProbePolicy,
    /// Reclaim attempts before the run aborts.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// The dev server to launch.
    #[serde(default)]
    pub server: ServerCommand,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            probe_policy: ProbePolicy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            server: ServerCommand::default(),
        }
    }
}

impl DevConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    ///
    /// Empty values count as unset. The port is validated here, before any
    /// other component sees the config.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_ENV).filter(|v| !v.is_empty()) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let host = lookup(HOST_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Ok(Self {
            port,
            host,
            ..Self::default()
        })
    }

    pub fn with_probe_policy(mut self, policy: ProbePolicy) -> Self {
        self.probe_policy = policy;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_server(mut self, server: ServerCommand) -> Self {
        self.server = server;
        self
    }
}

/// Parse a port value.
///
/// Accepts any numeric form with an integral value in `1..=65535`, so
/// `" 5000 "` and `"5000.0"` are fine while `"0"`, `"-1"`, `"50.5"` and
/// `"abc"` are rejected.
pub fn parse_port(raw: &str) -> Result<u16> {
    let invalid = || Error::InvalidPort(raw.to_string());

    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value.fract() != 0.0 || value <= 0.0 || value > f64::from(u16::MAX) {
        return Err(invalid());
    }

    Ok(value as u16)
}

// ============================================================================
// SiteConfig
// ============================================================================

/// Site constants consumed by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Deployed origin, e.g. `https://example.github.io`.
    pub site: String,
    /// Base path the site is served under, e.g. `/badware`.
    pub base: String,
    pub title: String,
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: "https://johngithubby.github.io".to_string(),
            base: "/badware".to_string(),
            title: "Astro Blog".to_string(),
            description: "Welcome to my website!".to_string(),
        }
    }
}
