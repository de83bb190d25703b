//! Keypad message contract tests
//!
//! These tests define the stable layout of keypad password and command frames.

use ipc::{KeypadCommand, WireTag};

// ===== Tag Values =====
const KEYPAD_PASSWORD_TAG: u8 = 3;
const KEYPAD_COMMAND_TAG: u8 = 4;

// ===== Command Codes =====
const COMMAND_NONE: u8 = 0;
const COMMAND_ADD_USER: u8 = 1;
const COMMAND_REMOVE_USER: u8 = 2;

/// Command codes as they appear at offset 1 of a command frame
pub const COMMAND_CODES: [(KeypadCommand, u8); 3] = [
    (KeypadCommand::None, COMMAND_NONE),
    (KeypadCommand::AddUser, COMMAND_ADD_USER),
    (KeypadCommand::RemoveUser, COMMAND_REMOVE_USER),
];

/// Returns the tags of the keypad family
pub fn keypad_tags() -> [(WireTag, u8); 2] {
    [
        (WireTag::KeypadPassword, KEYPAD_PASSWORD_TAG),
        (WireTag::KeypadCommand, KEYPAD_COMMAND_TAG),
    ]
}

// ===== Contract Tests =====
