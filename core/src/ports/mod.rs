//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces the application layer uses to touch
//! the OS. Implementations live in `adapters`; tests swap in fakes.

mod killer;
mod scanner;
mod spawner;

pub use killer::ProcessKillerPort;
pub use scanner::ListenerScannerPort;
pub use spawner::{LaunchSpec, ProcessSpawnerPort};
