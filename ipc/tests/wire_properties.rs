//! Property tests for frame encoding and decoding

use core_types::{MailboxRef, ProcessId};
use ipc::{
    ActionOnFailure, DataMessage, Envelope, KeypadCommand, KeypadCommandMessage,
    KeypadPasswordMessage, MessageClass, RfidMessage, SlotSettings, StringMessage, TypedMessage,
    WatchdogMessage, WireMessage, WireTag,
};
use proptest::prelude::*;

fn any_class() -> impl Strategy<Value = MessageClass> {
    (0u8..14).prop_map(|code| MessageClass::ALL[usize::from(code)])
}

fn any_action() -> impl Strategy<Value = ActionOnFailure> {
    prop_oneof![Just(ActionOnFailure::ResetOnly), Just(ActionOnFailure::KillAll)]
}

fn any_command() -> impl Strategy<Value = KeypadCommand> {
    prop_oneof![
        Just(KeypadCommand::None),
        Just(KeypadCommand::AddUser),
        Just(KeypadCommand::RemoveUser)
    ]
}

proptest! {
    #[test]
    fn test_watchdog_fields_survive_the_wire(
        name in proptest::collection::vec(any::<u8>(), 0..40),
        base_ttl: u32,
        timeout_ms: u32,
        pid: u32,
        on_failure in any_action(),
        class in any_class(),
    ) {
        let message = WatchdogMessage::new(
            name.clone(),
            SlotSettings::new(base_ttl, timeout_ms),
            ProcessId::new(pid),
            on_failure,
            class,
        );
        let frame = message.serialize();
        prop_assert_eq!(frame.len(), 15 + name.len());
        prop_assert_eq!(WatchdogMessage::deserialize(frame.as_bytes()), Ok(message));
    }

    #[test]
    fn test_keypad_command_parameters_survive_the_wire(
        command in any_command(),
        parameters in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let message = KeypadCommandMessage::new(command, parameters);
        prop_assert_eq!(
            KeypadCommandMessage::deserialize(message.serialize().as_bytes()),
            Ok(message)
        );
    }

    #[test]
    fn test_opaque_trailing_bytes_survive_the_wire(bytes in any::<Vec<u8>>()) {
        let rfid = RfidMessage::new(bytes.clone());
        prop_assert_eq!(rfid.serialize().len(), 1 + bytes.len());
        prop_assert_eq!(RfidMessage::deserialize(rfid.serialize().as_bytes()), Ok(rfid));

        let text = StringMessage::new(bytes.clone());
        let decoded = StringMessage::deserialize(text.serialize().as_bytes()).unwrap();
        prop_assert_eq!(decoded.text().as_bytes(), &bytes[..]);

        let mut envelope = Envelope::from_frame(text.serialize(), MailboxRef::new("/sender"));
        prop_assert_eq!(envelope.decode_tag(), Ok(WireTag::StringMsg));
        prop_assert!(envelope.open().is_ok());
    }

    #[test]
    fn test_unpack_consumes_envelope_exactly_once(text in ".{0,64}", sender in "/[a-z]{1,12}") {
        let message = StringMessage::new(text.clone());
        let mut envelope = Envelope::from_frame(message.serialize(), MailboxRef::new(sender.clone()));
        prop_assert_eq!(envelope.decode_tag(), Ok(WireTag::StringMsg));

        let received = StringMessage::unpack(&mut envelope).unwrap();
        prop_assert_eq!(received.text(), text.as_str());
        prop_assert_eq!(received.source().name(), sender.as_str());
        prop_assert!(!envelope.has_buffer());
        prop_assert!(StringMessage::unpack(&mut envelope).is_err());
    }

    #[test]
    fn test_arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let _ = DataMessage::deserialize(&bytes);
        let _ = Envelope::from_frame(bytes.into(), MailboxRef::unspecified()).open();
    }

    #[test]
    fn test_text_messages_keep_their_tag(text in ".{0,32}") {
        let frames = [
            (WireTag::KeypadPassword, KeypadPasswordMessage::new(text.clone()).serialize()),
            (WireTag::Rfid, RfidMessage::new(text.clone()).serialize()),
            (WireTag::StringMsg, StringMessage::new(text.clone()).serialize()),
        ];
        for (tag, frame) in frames {
            prop_assert_eq!(frame.first_byte(), Some(tag.code()));
            prop_assert_eq!(&frame.as_bytes()[1..], text.as_bytes());
            let decoded = DataMessage::deserialize(frame.as_bytes()).unwrap();
            prop_assert_eq!(decoded.tag(), tag);
        }
    }
}
