//! Buffer Ownership Tests
//!
//! Validates that a received frame is decoded exactly once and that its
//! bytes are never reachable through the envelope afterwards.

use core_types::MailboxRef;
use ipc::{
    DataMessage, Inbound, KeypadCommand, KeypadCommandMessage, KeypadPasswordMessage,
    ProtocolError, RfidMessage, TypedMessage,
};
use kernel_api::ReceiveOptions;
use mailbox::MailboxError;
use tests_resilience::TestNetwork;

/// Test: unpacking moves the bytes out of the envelope
///
/// This validates that:
/// 1. The typed message carries the decoded fields and the sender
/// 2. The envelope reports no buffer afterwards
/// 3. Dropping the envelope leaves the typed message intact
#[test]
fn test_unpack_transfers_ownership() {
    let network = TestNetwork::new().unwrap();
    let mut sender = network.mailbox("/keypad").unwrap();
    let mut receiver = network.mailbox("/door").unwrap();

    sender
        .send(
            &MailboxRef::new("/door"),
            &KeypadCommandMessage::new(KeypadCommand::AddUser, "alice"),
        )
        .unwrap();

    let mut envelope = receiver.receive(ReceiveOptions::NonBlocking).unwrap();
    let received = KeypadCommandMessage::unpack(&mut envelope).unwrap();

    assert!(!envelope.has_buffer());
    assert!(envelope.is_released());
    assert_eq!(envelope.raw_bytes(), None);
    drop(envelope);

    assert_eq!(received.command(), KeypadCommand::AddUser);
    assert_eq!(received.parameters(), "alice");
    assert_eq!(received.source(), &MailboxRef::new("/keypad"));
}

/// Test: a second unpack of the same envelope is a reported precondition failure
#[test]
fn test_double_unpack_is_rejected() {
    let network = TestNetwork::new().unwrap();
    let mut sender = network.mailbox("/keypad").unwrap();
    let mut receiver = network.mailbox("/door").unwrap();

    sender
        .send(&MailboxRef::new("/door"), &KeypadPasswordMessage::new("0420"))
        .unwrap();
    let mut envelope = receiver.receive(ReceiveOptions::NonBlocking).unwrap();

    receiver
        .unpack::<KeypadPasswordMessage>(&mut envelope)
        .unwrap();
    let error = receiver
        .unpack::<KeypadPasswordMessage>(&mut envelope)
        .unwrap_err();
    assert_eq!(error, MailboxError::Protocol(ProtocolError::AlreadyReleased));
    assert!(!error.is_corruption());
    assert!(network.dumps().unwrap().is_empty());
}

/// Test: unpacking into the wrong type leaves the envelope untouched
#[test]
fn test_wrong_type_keeps_envelope() {
    let network = TestNetwork::new().unwrap();
    let mut sender = network.mailbox("/rfid").unwrap();
    let mut receiver = network.mailbox("/door").unwrap();

    sender
        .send(&MailboxRef::new("/door"), &RfidMessage::new("04:A2"))
        .unwrap();
    let mut envelope = receiver.receive(ReceiveOptions::NonBlocking).unwrap();
    let size = envelope.size();

    assert!(matches!(
        receiver.unpack::<KeypadPasswordMessage>(&mut envelope),
        Err(MailboxError::Protocol(ProtocolError::TagMismatch { .. }))
    ));
    assert_eq!(envelope.size(), size);

    let rfid = receiver.unpack::<RfidMessage>(&mut envelope).unwrap();
    assert_eq!(rfid.uuid(), "04:A2");
}

/// Test: dispatch on tag consumes the envelope like unpack does
#[test]
fn test_open_consumes_envelope() {
    let network = TestNetwork::new().unwrap();
    let mut sender = network.mailbox("/keypad").unwrap();
    let mut receiver = network.mailbox("/door").unwrap();

    sender
        .send(
            &MailboxRef::new("/door"),
            &DataMessage::from(KeypadPasswordMessage::new("0420")),
        )
        .unwrap();
    let mut envelope = receiver.receive(ReceiveOptions::NonBlocking).unwrap();

    match receiver.open_envelope(&mut envelope).unwrap() {
        Inbound::Message(received) => match received.message() {
            DataMessage::KeypadPassword(password) => assert_eq!(password.password(), "0420"),
            other => panic!("Expected a password, got {:?}", other),
        },
        other => panic!("Expected a data message, got {:?}", other),
    }
    assert!(!envelope.has_buffer());
    assert_eq!(
        receiver.open_envelope(&mut envelope),
        Err(MailboxError::Protocol(ProtocolError::AlreadyReleased))
    );
}
