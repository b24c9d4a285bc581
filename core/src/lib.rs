//! dev-solo Core Library
//!
//! Keeps exactly one development server on a fixed TCP port.
//! Provides functionality to:
//! - Find the processes listening on a port
//! - Terminate them (gracefully, then forcefully) within bounded retries
//! - Launch the dev server in strict-port mode and mirror its exit status
//! - Render the blog's RSS feed
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure data models and progress events
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: OS implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! - macOS: `lsof` and `kill(2)`
//! - Linux: `lsof` (or `ss` when lsof is missing) and `kill(2)`
//! - Windows: `netstat` and `taskkill`

// Hexagonal architecture layers
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod error;
pub mod feed;

// Re-export domain types (primary API)
pub use domain::{DevEvent, EventSink, ExitOutcome, ListenerSet, Probe, ProbePolicy};

// Re-export other commonly used types
pub use adapters::{ListenerScanner, SignalKiller, TokioSpawner};
pub use application::{PortReclaimer, ServerLauncher, Stage, Supervisor};
pub use config::{DevConfig, ServerCommand, SiteConfig};
pub use error::{Error, Result};
pub use feed::{build_feed, ContentEntry, Feed, FeedItem, PostData};
pub use ports::LaunchSpec;

/// Prefix of every user-facing progress line.
pub const LOG_PREFIX: &str = "[dev:solo]";

/// Supervisor wired to the real OS adapters.
pub fn platform_supervisor() -> Supervisor<ListenerScanner, SignalKiller, TokioSpawner> {
    Supervisor::new(
        ListenerScanner::new(),
        SignalKiller::new(),
        TokioSpawner::new(),
    )
}

/// Reclaimer wired to the real OS adapters.
pub fn platform_reclaimer() -> PortReclaimer<ListenerScanner, SignalKiller> {
    PortReclaimer::new(ListenerScanner::new(), SignalKiller::new())
}
