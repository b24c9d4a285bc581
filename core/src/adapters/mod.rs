//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with the operating system.

pub mod killer;
pub mod scanner;
pub mod spawner;

// Re-export main types for convenience
pub use killer::SignalKiller;
pub use scanner::ListenerScanner;
pub use spawner::TokioSpawner;
