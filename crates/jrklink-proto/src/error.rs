/// Errors that can occur encoding requests or decoding replies.
///
/// None of these is fatal to the poller: an out-of-range target aborts the
/// operation before any bytes are written, and an unexpected opcode on
/// dequeue discards the frame. Callers log and continue.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtoError {
    /// The set-target argument does not fit the 12-bit wire encoding.
    #[error("target {target} out of range 0..=4095")]
    TargetOutOfRange { target: u16 },

    /// A reply was dequeued against an opcode the query table does not know.
    #[error("unexpected reply for opcode {opcode:#04x}")]
    UnexpectedOpcode { opcode: u8 },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
