use std::fs::File;
use std::io::{ErrorKind, Write};
use std::os::fd::{AsFd, BorrowedFd, FromRawFd, OwnedFd};

use tracing::trace;

use crate::error::{ChannelError, Result};

/// Cross-thread wake signal for the event loop.
///
/// A non-blocking pipe pair: raising writes one byte to the write end,
/// making the read end level-triggered readable for `poll(2)`. The event
/// loop never reads the payload — readiness alone carries the information,
/// so the signal stays raised until the poller exits. Both descriptors are
/// closed exactly once, on drop.
pub struct WakeSignal {
    rx: OwnedFd,
    tx: File,
}

impl WakeSignal {
    /// Create the pipe pair, non-blocking and close-on-exec on both ends.
    pub fn new() -> Result<Self> {
        let mut fds = [0i32; 2];
        // SAFETY: `fds` is a valid writable array of two ints; pipe2 fills
        // both slots on success and touches neither on failure.
        let rc = unsafe { libc::pipe2(fds.as_mut_ptr(), libc::O_CLOEXEC | libc::O_NONBLOCK) };
        if rc != 0 {
            return Err(ChannelError::Wake(std::io::Error::last_os_error()));
        }
        // SAFETY: pipe2 succeeded, so both descriptors are open and owned by
        // this process; each raw fd is wrapped exactly once.
        let rx = unsafe { OwnedFd::from_raw_fd(fds[0]) };
        let tx = unsafe { File::from_raw_fd(fds[1]) };
        Ok(Self { rx, tx })
    }

    /// Raise the signal. Callable from any thread, any number of times.
    ///
    /// A full pipe means a wake is already pending, which satisfies the
    /// caller's request just as well as a fresh byte would.
    pub fn raise(&self) -> std::io::Result<()> {
        match (&self.tx).write(&[1u8]) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                trace!("wake signal already pending");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

impl AsFd for WakeSignal {
    /// The readiness descriptor to hand to the multiplexer.
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.rx.as_fd()
    }
}

impl std::fmt::Debug for WakeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WakeSignal").finish_non_exhaustive()
    }
}
