//! Domain layer - Pure data models.
//!
//! This module contains the runtime concepts the reclaimer and launcher pass
//! around. These types have no I/O dependencies and can be tested in isolation.

mod event;
mod listener;
mod outcome;

// Re-export all domain types
pub use event::{DevEvent, EventSink};
pub use listener::{format_pids, ListenerSet, Probe, ProbePolicy};
pub use outcome::ExitOutcome;
