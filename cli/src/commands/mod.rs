//! Subcommand implementations.

pub mod feed;
pub mod free;
pub mod serve;
pub mod status;

use std::sync::Arc;

use devsolo_core::{DevEvent, EventSink, LOG_PREFIX};

/// Print events as `[dev:solo]` lines; failures go to stderr.
pub fn printer() -> EventSink {
    Arc::new(|event: &DevEvent| {
        if event.is_error() {
            eprintln!("{} {}", LOG_PREFIX, event);
        } else {
            println!("{} {}", LOG_PREFIX, event);
        }
    })
}

/// Report an invalid configuration the same way the supervisor does.
pub fn reject(error: &devsolo_core::Error) -> i32 {
    eprintln!("{} {}", LOG_PREFIX, error);
    1
}
