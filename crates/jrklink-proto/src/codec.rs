use std::fmt;

use crate::error::{ProtoError, Result};
use crate::flags::ErrorFlags;
use crate::opcode::{lookup, DecodePolicy, MAX_TARGET, SET_TARGET_BASE};

/// Encode the compact 12-bit target for the set-target command.
///
/// Wire format (bit-exact):
///
/// ```text
/// ┌──────────────────────────┬──────────────────────┐
/// │ byte0                    │ byte1                │
/// │ 0xC0 | (target & 0x1F)   │ (target >> 5) & 0x7F │
/// └──────────────────────────┴──────────────────────┘
/// ```
///
/// Targets above [`MAX_TARGET`] are rejected before any bytes exist, so a
/// bad argument can never reach the channel.
pub fn encode_target(target: u16) -> Result<[u8; 2]> {
    if target > MAX_TARGET {
        return Err(ProtoError::TargetOutOfRange { target });
    }
    Ok([
        SET_TARGET_BASE | (target & 0x1F) as u8,
        ((target >> 5) & 0x7F) as u8,
    ])
}

/// Assemble a 2-byte reply frame into its little-endian 16-bit word.
pub fn reply_word(frame: [u8; 2]) -> u16 {
    u16::from_le_bytes(frame)
}

/// A decoded reply, ready for line-oriented reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// Raw unsigned reading (position, input, feedback, current).
    Word { label: &'static str, value: u16 },
    /// Signed reading (duty cycles, integral error sum).
    Signed { label: &'static str, value: i16 },
    /// Error-status flag word.
    Errors(ErrorFlags),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Word { label, value } => write!(f, "{label} is {value}"),
            Reading::Signed { label, value } => write!(f, "{label} is {value}"),
            Reading::Errors(flags) => write!(f, "Error bits: {flags}"),
        }
    }
}

/// Decode a reply word according to the policy of the opcode it answers.
///
/// The opcode comes from the pending-request queue, never from the wire —
/// replies carry no identification of their own. An opcode outside the
/// query table means the queue and the device have diverged; the caller
/// logs it and discards the frame.
pub fn decode_reply(opcode: u8, word: u16) -> Result<Reading> {
    let desc = lookup(opcode).ok_or(ProtoError::UnexpectedOpcode { opcode })?;
    Ok(match desc.policy {
        DecodePolicy::Unsigned => Reading::Word {
            label: desc.label,
            value: word,
        },
        DecodePolicy::Signed => Reading::Signed {
            label: desc.label,
            value: word as i16,
        },
        DecodePolicy::Flags => Reading::Errors(ErrorFlags::from_word(word)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{
        QUERIES, READ_DUTY_CYCLE, READ_ERRORS, READ_ERROR_SUM, READ_FEEDBACK, READ_TARGET,
    };

    #[test]
    fn target_low_bits_land_in_byte0() {
        let frame = encode_target(16).unwrap();
        assert_eq!(frame[0], 0xC0 | (16 & 0x1F));
        assert_eq!(frame[1], 0x00);
    }

    #[test]
    fn target_boundaries_encode() {
        assert_eq!(encode_target(0).unwrap(), [0xC0, 0x00]);
        assert_eq!(encode_target(31).unwrap(), [0xDF, 0x00]);
        assert_eq!(encode_target(32).unwrap(), [0xC0, 0x01]);
        assert_eq!(encode_target(4095).unwrap(), [0xDF, 0x7F]);
    }

    #[test]
    fn out_of_range_target_rejected() {
        let err = encode_target(4096).unwrap_err();
        assert_eq!(err, ProtoError::TargetOutOfRange { target: 4096 });
        assert!(encode_target(u16::MAX).is_err());
    }

    #[test]
    fn byte0_recovers_from_any_valid_target() {
        for target in [0u16, 1, 31, 32, 100, 2048, 4095] {
            let frame = encode_target(target).unwrap();
            assert_eq!(frame[0], 0xC0 | (target & 0x1F) as u8);
            assert_eq!(frame[1], ((target >> 5) & 0x7F) as u8);
        }
    }

    #[test]
    fn reply_word_is_little_endian() {
        assert_eq!(reply_word([0x10, 0x00]), 16);
        assert_eq!(reply_word([0xFF, 0x00]), 255);
        assert_eq!(reply_word([0x00, 0x01]), 256);
        assert_eq!(reply_word([0xFF, 0xFF]), 65535);
    }

    #[test]
    fn unsigned_readings_report_the_raw_word() {
        let reading = decode_reply(READ_TARGET, 16).unwrap();
        assert_eq!(reading.to_string(), "Target is 16");

        let reading = decode_reply(READ_FEEDBACK, 255).unwrap();
        assert_eq!(reading.to_string(), "Feedback is 255");
    }

    #[test]
    fn signed_readings_reinterpret_the_same_bits() {
        let reading = decode_reply(READ_DUTY_CYCLE, 0xFFFF).unwrap();
        assert_eq!(
            reading,
            Reading::Signed {
                label: "Duty cycle",
                value: -1
            }
        );
        assert_eq!(reading.to_string(), "Duty cycle is -1");

        let reading = decode_reply(READ_ERROR_SUM, 0x8000).unwrap();
        assert_eq!(reading.to_string(), "Error sum is -32768");
    }

    #[test]
    fn error_readings_render_flag_names() {
        let reading = decode_reply(READ_ERRORS, 0x0002).unwrap();
        assert_eq!(reading.to_string(), "Error bits: NoPower");

        let reading = decode_reply(READ_ERRORS, 0x0000).unwrap();
        assert_eq!(reading.to_string(), "Error bits: NoError");
    }

    #[test]
    fn every_table_entry_decodes_by_its_own_policy() {
        for desc in QUERIES {
            let reading = decode_reply(desc.opcode, 0xFFFF).unwrap();
            match desc.policy {
                DecodePolicy::Unsigned => {
                    assert_eq!(reading.to_string(), format!("{} is 65535", desc.label));
                }
                DecodePolicy::Signed => {
                    assert_eq!(reading.to_string(), format!("{} is -1", desc.label));
                }
                DecodePolicy::Flags => {
                    assert!(matches!(reading, Reading::Errors(_)));
                }
            }
        }
    }

    #[test]
    fn unknown_opcode_is_an_error() {
        let err = decode_reply(0x42, 0).unwrap_err();
        assert_eq!(err, ProtoError::UnexpectedOpcode { opcode: 0x42 });
        assert_eq!(err.to_string(), "unexpected reply for opcode 0x42");
    }
}
