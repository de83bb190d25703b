//! RFID and string message contract tests
//!
//! Both carry a single text field that fills the frame after the tag byte.

// ===== Tag Values =====
const RFID_TAG: u8 = 5;
const STRING_TAG: u8 = 6;

// ===== Contract Tests =====
