//! Free-form text messages

use crate::codec::{self, TagHeader};
use crate::{FrameBuffer, ProtocolError, TypedMessage, WireMessage, WireString, WireTag};

/// Arbitrary text
///
/// Layout: `tag | text…`. Only the bytes after the tag are text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StringMessage {
    text: WireString,
}

impl StringMessage {
    pub fn new(text: impl Into<WireString>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &WireString {
        &self.text
    }
}

impl WireMessage for StringMessage {
    fn tag(&self) -> WireTag {
        Self::TAG
    }

    fn serialize(&self) -> FrameBuffer {
        codec::encode_frame(&TagHeader::new(Self::TAG), self.text.as_bytes())
    }

    fn describe(&self) -> String {
        format!("StringMessage - message: {}", self.text)
    }
}

impl TypedMessage for StringMessage {
    const TAG: WireTag = WireTag::StringMsg;

    fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError> {
        let (_, text) = codec::split_frame::<TagHeader>(Self::TAG, frame)?;
        Ok(Self { text: text.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_excludes_tag_byte() {
        let message = StringMessage::new("status ok");
        let decoded = StringMessage::deserialize(message.serialize().as_bytes()).unwrap();
        assert_eq!(decoded.text(), "status ok");
    }

    #[test]
    fn test_text_with_control_bytes() {
        let message = StringMessage::new("\u{6}\u{0}\u{7}");
        assert_eq!(
            StringMessage::deserialize(message.serialize().as_bytes()),
            Ok(message)
        );
    }

    #[test]
    fn test_text_need_not_be_utf8() {
        let frame = [WireTag::StringMsg.code(), 0xc3, 0x28];
        let decoded = StringMessage::deserialize(&frame).unwrap();
        assert_eq!(decoded.text().as_bytes(), &[0xc3, 0x28]);
        assert_eq!(decoded.serialize().as_bytes(), &frame);
    }
}
