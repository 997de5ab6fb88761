//! Device channel layer for the Jrk link.
//!
//! Provides the two file descriptors the event loop multiplexes over:
//! - [`SerialChannel`]: the raw, non-blocking duplex byte channel to the
//!   motor controller (a serial-over-USB CDC ACM device).
//! - [`WakeSignal`]: a level-triggered cross-thread wake descriptor used
//!   solely to interrupt the blocking wait for cooperative shutdown.
//!
//! This is the lowest layer of jrklink. Everything else builds on top of
//! these two types.

pub mod error;

#[cfg(unix)]
pub mod serial;
#[cfg(unix)]
pub mod wake;

pub use error::{ChannelError, Result};

#[cfg(unix)]
pub use serial::SerialChannel;
#[cfg(unix)]
pub use wake::WakeSignal;
