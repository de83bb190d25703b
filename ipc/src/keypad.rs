//! Keypad messages: entered passwords and user-management commands

use crate::codec::{self, KeypadCommandHeader, TagHeader};
use crate::{FrameBuffer, ProtocolError, TypedMessage, WireMessage, WireString, WireTag};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Password typed on the keypad
///
/// Layout: `tag | password…` (password fills the rest of the frame and must
/// be UTF-8).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeypadPasswordMessage {
    password: String,
}

impl KeypadPasswordMessage {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl WireMessage for KeypadPasswordMessage {
    fn tag(&self) -> WireTag {
        Self::TAG
    }

    fn serialize(&self) -> FrameBuffer {
        codec::encode_frame(&TagHeader::new(Self::TAG), self.password.as_bytes())
    }

    /// The password itself is masked.
    fn describe(&self) -> String {
        format!(
            "KeypadPasswordMessage - password: {}",
            "*".repeat(self.password.chars().count())
        )
    }
}

impl TypedMessage for KeypadPasswordMessage {
    const TAG: WireTag = WireTag::KeypadPassword;

    fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError> {
        let (_, password) = codec::split_frame::<TagHeader>(Self::TAG, frame)?;
        Ok(Self {
            password: codec::decode_text("password", password)?,
        })
    }
}

/// User-management command issued from the keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum KeypadCommand {
    #[default]
    None = 0,
    AddUser = 1,
    RemoveUser = 2,
}

impl KeypadCommand {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(KeypadCommand::None),
            1 => Ok(KeypadCommand::AddUser),
            2 => Ok(KeypadCommand::RemoveUser),
            value => Err(ProtocolError::InvalidField {
                field: "command",
                value,
            }),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            KeypadCommand::None => "None",
            KeypadCommand::AddUser => "AddUser",
            KeypadCommand::RemoveUser => "RemoveUser",
        }
    }
}

impl fmt::Display for KeypadCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keypad command with free-form parameters
///
/// Layout: `tag | command (1) | parameters…`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeypadCommandMessage {
    command: KeypadCommand,
    parameters: WireString,
}

impl KeypadCommandMessage {
    pub fn new(command: KeypadCommand, parameters: impl Into<WireString>) -> Self {
        Self {
            command,
            parameters: parameters.into(),
        }
    }

    /// Creates a command without parameters
    pub fn bare(command: KeypadCommand) -> Self {
        Self::new(command, WireString::new())
    }

    pub fn command(&self) -> KeypadCommand {
        self.command
    }

    pub fn parameters(&self) -> &WireString {
        &self.parameters
    }
}

impl WireMessage for KeypadCommandMessage {
    fn tag(&self) -> WireTag {
        Self::TAG
    }

    fn serialize(&self) -> FrameBuffer {
        let header = KeypadCommandHeader {
            tag: Self::TAG.code(),
            command: self.command.code(),
        };
        codec::encode_frame(&header, self.parameters.as_bytes())
    }

    fn describe(&self) -> String {
        format!(
            "KeypadCommandMessage - command: {} parameters: {}",
            self.command, self.parameters
        )
    }
}

impl TypedMessage for KeypadCommandMessage {
    const TAG: WireTag = WireTag::KeypadCommand;

    fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError> {
        let (header, parameters) = codec::split_frame::<KeypadCommandHeader>(Self::TAG, frame)?;
        Ok(Self {
            command: KeypadCommand::from_code(header.command)?,
            parameters: parameters.into(),
        })
    }
}
