use std::collections::VecDeque;
use std::io::{ErrorKind, Write};
use std::os::fd::AsFd;
use std::path::Path;
use std::sync::Mutex;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::{debug, error, info, warn};

use jrklink_channel::{SerialChannel, WakeSignal};
use jrklink_proto::{decode_reply, encode_target, opcode, reply_word, Reading};

use crate::error::Result;

/// Side effect fired on the event-loop thread after a drain cycle, letting
/// an embedding UI redraw itself. Must not block, or it stalls all further
/// polling.
pub type OutputHook = Box<dyn Fn() + Send + Sync>;

/// Command/response correlator for one Jrk device.
///
/// Correlation is strict FIFO: the device answers requests in the order
/// they were sent on the one physical channel, so the oldest outstanding
/// opcode interprets the next arriving frame. There is no request
/// identifier on the wire and no timeout — if the device ever reorders or
/// drops a reply, correlation desynchronizes until the queue drains. That
/// is an accepted property of the wire protocol, not a recoverable
/// condition.
///
/// All request operations are callable from any thread. [`Poller::run`]
/// must be called exactly once, on a thread dedicated to it.
pub struct Poller {
    channel: SerialChannel,
    wake: WakeSignal,
    /// Pending-request FIFO. Holding this lock also serializes every
    /// channel write, so a send (write + enqueue) is atomic with respect
    /// to other senders and to the event loop's read + dequeue.
    pending: Mutex<VecDeque<u8>>,
    /// Report sink for decoded replies; stdout unless overridden.
    output: Mutex<Box<dyn Write + Send>>,
    hook: Option<OutputHook>,
}

impl Poller {
    /// Open the device and create the wake signal.
    ///
    /// Fails atomically: if the wake signal cannot be created, the freshly
    /// opened channel is closed before the error propagates.
    pub fn open(path: impl AsRef<Path>, hook: Option<OutputHook>) -> Result<Self> {
        let channel = SerialChannel::open(path)?;
        let wake = WakeSignal::new()?;
        Ok(Self {
            channel,
            wake,
            pending: Mutex::new(VecDeque::new()),
            output: Mutex::new(Box::new(std::io::stdout())),
            hook,
        })
    }

    /// Replace the report sink (stdout by default).
    pub fn with_output(mut self, sink: impl Write + Send + 'static) -> Self {
        self.output = Mutex::new(Box::new(sink));
        self
    }

    /// The device path this poller is attached to.
    pub fn path(&self) -> &Path {
        self.channel.path()
    }

    // Read queries, each an atomic send + enqueue.

    pub fn read_input(&self) {
        self.send_query(opcode::READ_INPUT);
    }

    pub fn read_feedback(&self) {
        self.send_query(opcode::READ_FEEDBACK);
    }

    pub fn read_target(&self) {
        self.send_query(opcode::READ_TARGET);
    }

    pub fn read_scaled_feedback(&self) {
        self.send_query(opcode::READ_SCALED_FEEDBACK);
    }

    pub fn read_error_sum(&self) {
        self.send_query(opcode::READ_ERROR_SUM);
    }

    pub fn read_duty_cycle_target(&self) {
        self.send_query(opcode::READ_DUTY_CYCLE_TARGET);
    }

    pub fn read_duty_cycle(&self) {
        self.send_query(opcode::READ_DUTY_CYCLE);
    }

    pub fn read_current(&self) {
        self.send_query(opcode::READ_CURRENT);
    }

    pub fn read_errors(&self) {
        self.send_query(opcode::READ_ERRORS);
    }

    /// Send the compact 12-bit target encoding. Fire-and-forget: the
    /// device sends no reply, so nothing is enqueued.
    ///
    /// An out-of-range target is logged and dropped before any bytes are
    /// written; the channel is untouched.
    pub fn set_target(&self, target: u16) {
        let frame = match encode_target(target) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, "ignoring set-target request");
                return;
            }
        };
        let _pending = self.pending.lock().expect("pending queue lock poisoned");
        self.write_command(&frame);
    }

    /// Turn the motor off. Fire-and-forget, no enqueue, but still
    /// serialized with every other channel write.
    pub fn motor_off(&self) {
        let _pending = self.pending.lock().expect("pending queue lock poisoned");
        self.write_command(&[opcode::MOTOR_OFF]);
    }

    /// Ask the event loop to stop. Callable from any thread, any number of
    /// times; does not block waiting for the loop to actually exit.
    /// Callers needing confirmation join the loop thread.
    pub fn stop_polling(&self) {
        if let Err(err) = self.wake.raise() {
            error!(error = %err, "failed raising wake signal");
        }
    }

    /// Run the event loop until [`Poller::stop_polling`] is observed.
    ///
    /// Call once, on a dedicated thread. The only suspension point is the
    /// `poll(2)` wait across the channel and the wake signal; transient
    /// read errors end the current drain cycle but never the loop.
    pub fn run(&self) {
        info!("event loop running");
        loop {
            let mut fds = [
                PollFd::new(
                    self.channel.as_fd(),
                    PollFlags::POLLIN | PollFlags::POLLPRI,
                ),
                PollFd::new(self.wake.as_fd(), PollFlags::POLLIN),
            ];
            match poll(&mut fds, PollTimeout::NONE) {
                Ok(_) => {}
                Err(Errno::EINTR) => continue,
                Err(errno) => {
                    error!(%errno, "poll failed");
                    continue;
                }
            }
            // The wake payload is never read; readiness is the message.
            if fds[1].revents().is_some_and(|r| !r.is_empty()) {
                debug!("wake signal observed, stopping");
                break;
            }
            if fds[0].revents().is_some_and(|r| !r.is_empty()) {
                self.drain();
            }
        }
        info!("event loop stopped");
    }

    /// One drain cycle: read 2-byte reply frames until the channel runs
    /// dry, correlating and reporting each. The pending lock is held for
    /// the whole cycle so no send can interleave mid-reply.
    fn drain(&self) {
        let mut pending = self.pending.lock().expect("pending queue lock poisoned");
        let clean = loop {
            let mut frame = [0u8; 2];
            match self.channel.read(&mut frame) {
                Ok(2) => {
                    let mut output = self.output.lock().expect("output sink lock poisoned");
                    correlate(&mut pending, frame, &mut **output);
                }
                Ok(0) => {
                    warn!("end of file on device channel");
                    break false;
                }
                Ok(n) => {
                    warn!(bytes = n, "short reply read, discarding");
                    break false;
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => break true,
                Err(err) => {
                    error!(error = %err, "error reading device channel");
                    break false;
                }
            }
        };
        drop(pending);
        if clean {
            if let Some(hook) = &self.hook {
                hook();
            }
        }
    }

    /// Write one query opcode and record it as outstanding.
    fn send_query(&self, op: u8) {
        let mut pending = self.pending.lock().expect("pending queue lock poisoned");
        self.write_command(&[op]);
        // Enqueue even after a failed write: the lenient write policy means
        // the command may still have reached the device.
        pending.push_back(op);
    }

    /// Write command bytes, logging short or failed writes without
    /// escalating them. Callers proceed optimistically.
    fn write_command(&self, bytes: &[u8]) {
        match self.channel.write(bytes) {
            Ok(n) if n == bytes.len() => {}
            Ok(n) => error!(wrote = n, expected = bytes.len(), "short write to device"),
            Err(err) => error!(error = %err, "error writing command to device"),
        }
    }
}

/// Correlate one reply frame with the oldest outstanding request and
/// report the decoded reading.
///
/// A frame with nothing outstanding, or against an opcode the query table
/// does not know, is a protocol anomaly: warned and discarded, never
/// fatal.
fn correlate(pending: &mut VecDeque<u8>, frame: [u8; 2], out: &mut dyn Write) {
    let word = reply_word(frame);
    let Some(op) = pending.pop_front() else {
        warn!(word, "no outstanding command for reply");
        return;
    };
    match decode_reply(op, word) {
        Ok(reading) => emit(&reading, out),
        Err(err) => warn!(error = %err, "discarding reply frame"),
    }
}

fn emit(reading: &Reading, out: &mut dyn Write) {
    if let Err(err) = writeln!(out, "{reading}").and_then(|()| out.flush()) {
        error!(error = %err, "failed writing report line");
    }
}
