//! # Wire Contract Tests
//!
//! This crate provides "golden" tests for the mailbox wire format to ensure
//! it doesn't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: Every byte offset is written out as data
//! - **Testability first**: Contract tests fail when a layout changes
//! - **Mechanism not policy**: Define what must be stable, not how to use it
//!
//! ## Structure
//!
//! Each message family has a module with contract tests that verify:
//! - Tag values
//! - Enum codes
//! - Header sizes and field offsets
//! - Trailing field handling

pub mod config;
pub mod keypad;
pub mod sentinels;
pub mod text;
pub mod watchdog;

/// Common test helpers for contract validation
pub mod test_helpers {
    use ipc::{TypedMessage, WireMessage};
    use std::fmt::Debug;

    /// Verifies a message encodes to exactly the expected bytes
    pub fn verify_frame_contract(message: &dyn WireMessage, expected: &[u8]) {
        let frame = message.serialize();
        assert_eq!(
            frame.as_bytes(),
            expected,
            "Wire layout changed for {}: expected {:?}, got {:?}",
            message.tag(),
            expected,
            frame.as_bytes()
        );
        assert_eq!(
            frame.first_byte(),
            Some(message.tag().code()),
            "First byte is not the tag of {}",
            message.tag()
        );
    }

    /// Verifies golden bytes decode to the expected message
    pub fn verify_decode_contract<M>(bytes: &[u8], expected: &M)
    where
        M: TypedMessage + PartialEq + Debug,
    {
        let decoded = M::deserialize(bytes)
            .unwrap_or_else(|e| panic!("Golden frame {:?} no longer decodes: {}", bytes, e));
        assert_eq!(&decoded, expected, "Golden frame {:?} decodes differently", bytes);
    }

    /// Native-endian encoding of a 4-byte field
    pub fn ne_u32(value: u32) -> [u8; 4] {
        value.to_ne_bytes()
    }
}
