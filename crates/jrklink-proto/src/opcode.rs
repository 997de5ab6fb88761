//! Query opcodes and the descriptor table.
//!
//! One entry per read query the device answers. The table is the single
//! source of truth: the poller's request operations, the reply decoder,
//! and the tests all drive off it rather than matching on raw bytes.

/// Read the raw input value.
pub const READ_INPUT: u8 = 0xA1;
/// Read the feedback value.
pub const READ_FEEDBACK: u8 = 0xA3;
/// Read the current target.
pub const READ_TARGET: u8 = 0xA5;
/// Read the scaled feedback value.
pub const READ_SCALED_FEEDBACK: u8 = 0xA7;
/// Read the PID integral error sum (signed).
pub const READ_ERROR_SUM: u8 = 0xA9;
/// Read the duty cycle target (signed).
pub const READ_DUTY_CYCLE_TARGET: u8 = 0xAB;
/// Read the applied duty cycle (signed).
pub const READ_DUTY_CYCLE: u8 = 0xAD;
/// Read the motor current reading.
pub const READ_CURRENT: u8 = 0xAF;
/// Read the error-status flag word.
pub const READ_ERRORS: u8 = 0xB5;

/// Motor-off command byte. Fire-and-forget; the device sends no reply.
pub const MOTOR_OFF: u8 = 0xFF;

/// Base byte of the 2-byte compact target encoding.
pub const SET_TARGET_BASE: u8 = 0xC0;

/// Highest target value the 12-bit wire encoding can carry.
pub const MAX_TARGET: u16 = 4095;

/// How the 2-byte reply word is interpreted for a given query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Raw unsigned 16-bit word.
    Unsigned,
    /// Two's-complement signed 16-bit word.
    Signed,
    /// Error-status bit flags.
    Flags,
}

/// One entry of the query table: wire byte, decode policy, report label.
#[derive(Debug, Clone, Copy)]
pub struct QueryDescriptor {
    pub opcode: u8,
    pub policy: DecodePolicy,
    pub label: &'static str,
}

/// Every read query the device answers, in opcode order.
pub const QUERIES: &[QueryDescriptor] = &[
    QueryDescriptor {
        opcode: READ_INPUT,
        policy: DecodePolicy::Unsigned,
        label: "Input",
    },
    QueryDescriptor {
        opcode: READ_FEEDBACK,
        policy: DecodePolicy::Unsigned,
        label: "Feedback",
    },
    QueryDescriptor {
        opcode: READ_TARGET,
        policy: DecodePolicy::Unsigned,
        label: "Target",
    },
    QueryDescriptor {
        opcode: READ_SCALED_FEEDBACK,
        policy: DecodePolicy::Unsigned,
        label: "Scaled feedback",
    },
    QueryDescriptor {
        opcode: READ_ERROR_SUM,
        policy: DecodePolicy::Signed,
        label: "Error sum",
    },
    QueryDescriptor {
        opcode: READ_DUTY_CYCLE_TARGET,
        policy: DecodePolicy::Signed,
        label: "Duty cycle target",
    },
    QueryDescriptor {
        opcode: READ_DUTY_CYCLE,
        policy: DecodePolicy::Signed,
        label: "Duty cycle",
    },
    QueryDescriptor {
        opcode: READ_CURRENT,
        policy: DecodePolicy::Unsigned,
        label: "Current",
    },
    QueryDescriptor {
        opcode: READ_ERRORS,
        policy: DecodePolicy::Flags,
        label: "Error bits",
    },
];

/// Look up the descriptor for a wire opcode.
pub fn lookup(opcode: u8) -> Option<&'static QueryDescriptor> {
    QUERIES.iter().find(|d| d.opcode == opcode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_no_duplicate_opcodes() {
        for (i, a) in QUERIES.iter().enumerate() {
            for b in &QUERIES[i + 1..] {
                assert_ne!(a.opcode, b.opcode, "{} and {}", a.label, b.label);
            }
        }
    }

    #[test]
    fn lookup_finds_every_table_entry() {
        for desc in QUERIES {
            let found = lookup(desc.opcode).expect("table entry should resolve");
            assert_eq!(found.label, desc.label);
        }
    }

    #[test]
    fn lookup_rejects_commands_and_strays() {
        assert!(lookup(MOTOR_OFF).is_none());
        assert!(lookup(SET_TARGET_BASE).is_none());
        assert!(lookup(0x00).is_none());
    }

    #[test]
    fn signed_policies_cover_duty_cycle_and_error_sum() {
        for opcode in [READ_ERROR_SUM, READ_DUTY_CYCLE_TARGET, READ_DUTY_CYCLE] {
            assert_eq!(lookup(opcode).unwrap().policy, DecodePolicy::Signed);
        }
        assert_eq!(lookup(READ_ERRORS).unwrap().policy, DecodePolicy::Flags);
    }
}
