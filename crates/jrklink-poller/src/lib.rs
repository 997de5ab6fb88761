//! Command/response correlator for the Jrk motor controller link.
//!
//! One [`Poller`] owns the serial channel, a wake signal, and the
//! pending-request FIFO. Request operations are callable from any thread;
//! a single dedicated thread runs [`Poller::run`], which blocks in
//! `poll(2)` over the channel and the wake signal, drains reply frames,
//! correlates each to the oldest outstanding request, and reports the
//! decoded reading as a line of text.

pub mod error;

#[cfg(unix)]
pub mod poller;

pub use error::{PollerError, Result};

#[cfg(unix)]
pub use poller::{OutputHook, Poller};
