use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use nix::sys::termios::{self, LocalFlags, SetArg};
use tracing::info;

use crate::error::{ChannelError, Result};

/// Raw non-blocking serial channel to the motor controller.
///
/// Opened for simultaneous read/write without acquiring controlling-terminal
/// semantics. Canonical line buffering, echo, and signal-generating control
/// characters are disabled at open — the link carries raw binary protocol
/// bytes, not text. Both the raw-mode and non-blocking configuration are
/// fixed once at open.
///
/// The read path is intended for a single event-loop thread; writes may come
/// from any thread provided the caller serializes them (the poller does this
/// under its send lock). The descriptor is closed exactly once, on drop.
pub struct SerialChannel {
    file: File,
    path: PathBuf,
}

impl SerialChannel {
    /// Open the device path and switch it to raw mode.
    ///
    /// Fails if the path cannot be opened for read/write or is not a
    /// terminal-like device. Nothing about this error is recoverable from
    /// the caller's side short of picking another device.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK | libc::O_NOCTTY)
            .open(&path)
            .map_err(|e| ChannelError::Open {
                path: path.clone(),
                source: e,
            })?;

        set_raw(&file).map_err(|e| ChannelError::RawMode {
            path: path.clone(),
            source: e,
        })?;

        info!(?path, fd = file.as_raw_fd(), "opened serial channel");

        Ok(Self { file, path })
    }

    /// Non-blocking read.
    ///
    /// `ErrorKind::WouldBlock` is the normal "no more data right now"
    /// signal, not a failure.
    pub fn read(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        (&self.file).read(buf)
    }

    /// Non-blocking write. Returns the number of bytes accepted.
    ///
    /// Short writes are for the caller to log; this layer does not retry.
    pub fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        (&self.file).write(buf)
    }

    /// The device path this channel was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsFd for SerialChannel {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl std::fmt::Debug for SerialChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialChannel")
            .field("path", &self.path)
            .field("fd", &self.file.as_raw_fd())
            .finish()
    }
}

/// Disable canonical buffering, echo, and signal characters.
fn set_raw(file: &File) -> std::io::Result<()> {
    let mut term = termios::tcgetattr(file).map_err(std::io::Error::from)?;
    term.local_flags.remove(
        LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ECHOE | LocalFlags::ISIG,
    );
    termios::tcsetattr(file, SetArg::TCSANOW, &term).map_err(std::io::Error::from)?;
    Ok(())
}
