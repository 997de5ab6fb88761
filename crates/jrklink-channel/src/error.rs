use std::path::PathBuf;

/// Errors that can occur opening or tearing down channel resources.
///
/// Runtime read/write failures are surfaced as plain [`std::io::Error`]
/// at the call site; this enum covers construction, which is the only
/// place a hard failure propagates to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// Failed to open the device path.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The device could not be switched to raw mode (not a terminal-like
    /// device, or termios configuration failed).
    #[error("failed to set raw mode on {path}: {source}")]
    RawMode {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the wake-signal pipe.
    #[error("failed to create wake signal: {0}")]
    Wake(std::io::Error),

    /// An I/O error occurred on the channel.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
