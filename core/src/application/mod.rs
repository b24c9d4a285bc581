//! Application layer - Use case services.
//!
//! Services are thin orchestrators that:
//! - Accept domain types and a validated `DevConfig` as inputs
//! - Use ports (traits) for every OS interaction
//! - Report progress as `DevEvent`s instead of printing

mod launcher;
mod reclaimer;
mod supervisor;

#[cfg(test)]
mod fakes;

pub use launcher::{ServerLauncher, COLOR_ENV};
pub use reclaimer::{PortReclaimer, KILL_SETTLE_DELAY, RETRY_DELAY};
pub use supervisor::{Stage, Supervisor};

use std::sync::Arc;

use crate::domain::{DevEvent, EventSink};

/// Sink that drops every event.
pub(crate) fn silent_sink() -> EventSink {
    Arc::new(|_: &DevEvent| {})
}
