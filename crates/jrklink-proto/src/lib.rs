//! Wire codec for the Jrk serial command/response protocol.
//!
//! Every read query and the motor-off command is a single opcode byte; the
//! one parameterized command packs a 12-bit target into two bytes. Every
//! reply is exactly two bytes, a little-endian 16-bit word whose meaning
//! depends on which query it answers — raw unsigned, two's-complement
//! signed, or a set of error-flag bits.
//!
//! Pure functions and tables only; no I/O happens in this crate.

pub mod codec;
pub mod error;
pub mod flags;
pub mod opcode;

pub use codec::{decode_reply, encode_target, reply_word, Reading};
pub use error::{ProtoError, Result};
pub use flags::ErrorFlags;
pub use opcode::{lookup, DecodePolicy, QueryDescriptor, MAX_TARGET, MOTOR_OFF, QUERIES};
