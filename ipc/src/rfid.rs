//! RFID reader messages

use crate::codec::{self, TagHeader};
use crate::{FrameBuffer, ProtocolError, TypedMessage, WireMessage, WireString, WireTag};

/// UUID of a card presented to an RFID reader
///
/// Layout: `tag | uuid…`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RfidMessage {
    uuid: WireString,
}

impl RfidMessage {
    pub fn new(uuid: impl Into<WireString>) -> Self {
        Self { uuid: uuid.into() }
    }

    pub fn uuid(&self) -> &WireString {
        &self.uuid
    }
}

impl WireMessage for RfidMessage {
    fn tag(&self) -> WireTag {
        Self::TAG
    }

    fn serialize(&self) -> FrameBuffer {
        codec::encode_frame(&TagHeader::new(Self::TAG), self.uuid.as_bytes())
    }

    fn describe(&self) -> String {
        format!("RFIDMessage - UUID: {}", self.uuid)
    }
}

impl TypedMessage for RfidMessage {
    const TAG: WireTag = WireTag::Rfid;

    fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError> {
        let (_, uuid) = codec::split_frame::<TagHeader>(Self::TAG, frame)?;
        Ok(Self { uuid: uuid.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfid_roundtrip() {
        let message = RfidMessage::new("04:A2:19:6B:11");
        let frame = message.serialize();
        assert_eq!(frame.as_bytes()[0], WireTag::Rfid.code());
        assert_eq!(frame.len(), 1 + "04:A2:19:6B:11".len());
        assert_eq!(RfidMessage::deserialize(frame.as_bytes()), Ok(message));
    }

    #[test]
    fn test_rfid_rejects_other_tag() {
        let frame = crate::StringMessage::new("04").serialize();
        assert!(matches!(
            RfidMessage::deserialize(frame.as_bytes()),
            Err(ProtocolError::TagMismatch { .. })
        ));
    }

    #[test]
    fn test_rfid_keeps_raw_card_id() {
        let frame = [WireTag::Rfid.code(), 0x04, 0xA2, 0xFF, 0x19];
        let decoded = RfidMessage::deserialize(&frame).unwrap();
        assert_eq!(decoded.uuid().as_bytes(), &[0x04, 0xA2, 0xFF, 0x19]);
        assert!(decoded.uuid().to_str().is_err());
        assert_eq!(decoded.serialize().as_bytes(), &frame);
    }

    #[test]
    fn test_rfid_describe() {
        assert_eq!(RfidMessage::new("abc").describe(), "RFIDMessage - UUID: abc");
    }
}
