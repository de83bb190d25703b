//! Watchdog supervision vocabulary
//!
//! Cooperating processes register with a watchdog process, kick it
//! periodically while healthy, and take part in start/stop, sync and
//! terminate rounds. This module defines only the messages carrying that
//! protocol; what the watchdog does on receipt is up to its own state machine.
//!
//! ## Wire layout
//!
//! ```text
//! offset  size  field
//! 0       1     tag (Watchdog)
//! 1       1     message class
//! 2       4     settings.base_ttl     (native-endian u32)
//! 6       4     settings.timeout_ms   (native-endian u32)
//! 10      4     PID                   (native-endian u32)
//! 14      1     action on failure
//! 15      …     name (rest of frame, opaque bytes)
//! ```
//!
//! ## Request/reply pairing
//!
//! Replies carry no correlation id. They are matched to requests by the
//! peer identity of the envelope only, see [`RequestLedger`].

use crate::codec::{self, NeU32, WatchdogHeader};
use crate::{FrameBuffer, ProtocolError, TypedMessage, WireMessage, WireString, WireTag};
use core_types::{MailboxRef, ProcessId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Verb of a watchdog message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageClass {
    RegisterRequest = 0,
    RegisterReply = 1,
    UnregisterRequest = 2,
    UnregisterReply = 3,
    UpdateSettings = 4,
    Kick = 5,
    Start = 6,
    Stop = 7,
    SyncRequest = 8,
    SyncBroadcast = 9,
    TerminateRequest = 10,
    TerminateBroadcast = 11,
    /// Wildcard used by receivers filtering on class
    Any = 12,
    #[default]
    None = 13,
}

impl MessageClass {
    /// Every class in wire-code order
    pub const ALL: [MessageClass; 14] = [
        MessageClass::RegisterRequest,
        MessageClass::RegisterReply,
        MessageClass::UnregisterRequest,
        MessageClass::UnregisterReply,
        MessageClass::UpdateSettings,
        MessageClass::Kick,
        MessageClass::Start,
        MessageClass::Stop,
        MessageClass::SyncRequest,
        MessageClass::SyncBroadcast,
        MessageClass::TerminateRequest,
        MessageClass::TerminateBroadcast,
        MessageClass::Any,
        MessageClass::None,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(ProtocolError::InvalidField {
                field: "message_class",
                value: code,
            })
    }

    pub const fn name(self) -> &'static str {
        match self {
            MessageClass::RegisterRequest => "REGISTER_REQUEST",
            MessageClass::RegisterReply => "REGISTER_REPLY",
            MessageClass::UnregisterRequest => "UNREGISTER_REQUEST",
            MessageClass::UnregisterReply => "UNREGISTER_REPLY",
            MessageClass::UpdateSettings => "UPDATE_SETTINGS",
            MessageClass::Kick => "KICK",
            MessageClass::Start => "START",
            MessageClass::Stop => "STOP",
            MessageClass::SyncRequest => "SYNC_REQUEST",
            MessageClass::SyncBroadcast => "SYNC_BROADCAST",
            MessageClass::TerminateRequest => "TERMINATE_REQUEST",
            MessageClass::TerminateBroadcast => "TERMINATE_BROADCAST",
            MessageClass::Any => "ANY",
            MessageClass::None => "NONE",
        }
    }

    /// Checks whether the sender expects an answer
    pub const fn is_request(self) -> bool {
        self.expected_reply().is_some()
    }

    /// Checks whether this answers a point-to-point request
    pub const fn is_reply(self) -> bool {
        matches!(
            self,
            MessageClass::RegisterReply | MessageClass::UnregisterReply
        )
    }

    /// Checks whether this is sent to every registered process
    pub const fn is_broadcast(self) -> bool {
        matches!(
            self,
            MessageClass::SyncBroadcast | MessageClass::TerminateBroadcast
        )
    }

    /// Returns the class that answers this request
    pub const fn expected_reply(self) -> Option<MessageClass> {
        match self {
            MessageClass::RegisterRequest => Some(MessageClass::RegisterReply),
            MessageClass::UnregisterRequest => Some(MessageClass::UnregisterReply),
            MessageClass::SyncRequest => Some(MessageClass::SyncBroadcast),
            MessageClass::TerminateRequest => Some(MessageClass::TerminateBroadcast),
            _ => None,
        }
    }
}

impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the watchdog does when a registered process stops kicking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ActionOnFailure {
    /// Restart only the failed process
    #[default]
    ResetOnly = 0,
    /// Kill every supervised process
    KillAll = 1,
}

impl ActionOnFailure {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, ProtocolError> {
        match code {
            0 => Ok(ActionOnFailure::ResetOnly),
            1 => Ok(ActionOnFailure::KillAll),
            value => Err(ProtocolError::InvalidField {
                field: "action_on_failure",
                value,
            }),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ActionOnFailure::ResetOnly => "RESET_ONLY",
            ActionOnFailure::KillAll => "KILL_ALL",
        }
    }
}

impl fmt::Display for ActionOnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-process slot configuration held by the watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SlotSettings {
    /// Number of missed timeouts tolerated before the failure action runs
    pub base_ttl: u32,
    /// Expected kick interval in milliseconds
    pub timeout_ms: u32,
}

impl SlotSettings {
    pub const fn new(base_ttl: u32, timeout_ms: u32) -> Self {
        Self {
            base_ttl,
            timeout_ms,
        }
    }
}

/// A watchdog protocol message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchdogMessage {
    name: WireString,
    class: MessageClass,
    settings: SlotSettings,
    pid: ProcessId,
    on_failure: ActionOnFailure,
}

impl WatchdogMessage {
    /// Creates a fully specified message (registration, settings update)
    pub fn new(
        name: impl Into<WireString>,
        settings: SlotSettings,
        pid: ProcessId,
        on_failure: ActionOnFailure,
        class: MessageClass,
    ) -> Self {
        Self {
            name: name.into(),
            class,
            settings,
            pid,
            on_failure,
        }
    }

    /// Creates a message naming a slot, with default settings (kick, unregister)
    pub fn named(name: impl Into<WireString>, class: MessageClass) -> Self {
        Self {
            name: name.into(),
            class,
            ..Self::default()
        }
    }

    /// Creates an anonymous message of the given class (sync, terminate)
    pub fn of_class(class: MessageClass) -> Self {
        Self {
            class,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &WireString {
        &self.name
    }

    pub fn class(&self) -> MessageClass {
        self.class
    }

    pub fn settings(&self) -> SlotSettings {
        self.settings
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn on_failure(&self) -> ActionOnFailure {
        self.on_failure
    }

    fn header(&self) -> WatchdogHeader {
        WatchdogHeader {
            tag: Self::TAG.code(),
            class: self.class.code(),
            base_ttl: NeU32::new(self.settings.base_ttl),
            timeout_ms: NeU32::new(self.settings.timeout_ms),
            pid: NeU32::new(self.pid.as_u32()),
            on_failure: self.on_failure.code(),
        }
    }
}

impl WireMessage for WatchdogMessage {
    fn tag(&self) -> WireTag {
        Self::TAG
    }

    fn serialize(&self) -> FrameBuffer {
        codec::encode_frame(&self.header(), self.name.as_bytes())
    }

    fn describe(&self) -> String {
        format!(
            "WatchdogMessage - from: {}\n\tPID: {}\n\tType: {}\n\tOn failure: {}\n\tSettings:\n\t\tBaseTTL: {}\n\t\tTimeout: {} ms",
            self.name,
            self.pid,
            self.class,
            self.on_failure,
            self.settings.base_ttl,
            self.settings.timeout_ms
        )
    }
}

impl TypedMessage for WatchdogMessage {
    const TAG: WireTag = WireTag::Watchdog;

    fn decode_frame(frame: &[u8]) -> Result<Self, ProtocolError> {
        let (header, name) = codec::split_frame::<WatchdogHeader>(Self::TAG, frame)?;
        Ok(Self {
            name: name.into(),
            class: MessageClass::from_code(header.class)?,
            settings: SlotSettings::new(header.base_ttl.get(), header.timeout_ms.get()),
            pid: ProcessId::new(header.pid.get()),
            on_failure: ActionOnFailure::from_code(header.on_failure)?,
        })
    }
}

/// Failure to pair a watchdog reply with a request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("{0} does not expect a reply")]
    NotARequest(MessageClass),

    #[error("No outstanding request to {peer} awaits {reply}")]
    Unsolicited { peer: MailboxRef, reply: MessageClass },

    /// More than one request to the same peer awaits this reply class;
    /// sender identity alone cannot tell them apart
    #[error("{pending} outstanding requests to {peer} await {reply}")]
    Ambiguous {
        peer: MailboxRef,
        reply: MessageClass,
        pending: usize,
    },
}

/// Outstanding watchdog requests, keyed by peer
///
/// Records each request sent to a peer and matches replies from that peer
/// back to it. Ambiguity is reported, never guessed.
#[derive(Debug, Default)]
pub struct RequestLedger {
    outstanding: HashMap<MailboxRef, Vec<MessageClass>>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request sent to `peer`
    pub fn record(&mut self, peer: MailboxRef, request: MessageClass) -> Result<(), CorrelationError> {
        if !request.is_request() {
            return Err(CorrelationError::NotARequest(request));
        }
        self.outstanding.entry(peer).or_default().push(request);
        Ok(())
    }

    /// Matches a reply from `peer`, returning the request it answers
    pub fn resolve(
        &mut self,
        peer: &MailboxRef,
        reply: MessageClass,
    ) -> Result<MessageClass, CorrelationError> {
        let unsolicited = || CorrelationError::Unsolicited {
            peer: peer.clone(),
            reply,
        };
        let pending = self.outstanding.get_mut(peer).ok_or_else(unsolicited)?;

        let matching: Vec<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, request)| request.expected_reply() == Some(reply))
            .map(|(index, _)| index)
            .collect();

        let request = match matching.as_slice() {
            [] => return Err(unsolicited()),
            [index] => pending.remove(*index),
            _ => {
                return Err(CorrelationError::Ambiguous {
                    peer: peer.clone(),
                    reply,
                    pending: matching.len(),
                })
            }
        };

        if pending.is_empty() {
            self.outstanding.remove(peer);
        }
        Ok(request)
    }

    /// Drops every request outstanding for `peer`
    pub fn forget(&mut self, peer: &MailboxRef) -> usize {
        self.outstanding.remove(peer).map_or(0, |pending| pending.len())
    }

    /// Number of requests outstanding for `peer`
    pub fn outstanding(&self, peer: &MailboxRef) -> usize {
        self.outstanding.get(peer).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kick() -> WatchdogMessage {
        WatchdogMessage::new(
            "workerA",
            SlotSettings::new(5, 2000),
            ProcessId::new(1234),
            ActionOnFailure::ResetOnly,
            MessageClass::Kick,
        )
    }

    #[test]
    fn test_kick_roundtrip() {
        let message = kick();
        let decoded = WatchdogMessage::deserialize(message.serialize().as_bytes()).unwrap();
        assert_eq!(decoded.name(), "workerA");
        assert_eq!(decoded.class(), MessageClass::Kick);
        assert_eq!(decoded.settings(), SlotSettings::new(5, 2000));
        assert_eq!(decoded.pid(), ProcessId::new(1234));
        assert_eq!(decoded.on_failure(), ActionOnFailure::ResetOnly);
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_header_offsets() {
        let frame = kick().serialize();
        let bytes = frame.as_bytes();
        assert_eq!(bytes.len(), 15 + "workerA".len());
        assert_eq!(bytes[0], WireTag::Watchdog.code());
        assert_eq!(bytes[1], MessageClass::Kick.code());
        assert_eq!(&bytes[2..6], &5u32.to_ne_bytes());
        assert_eq!(&bytes[6..10], &2000u32.to_ne_bytes());
        assert_eq!(&bytes[10..14], &1234u32.to_ne_bytes());
        assert_eq!(bytes[14], ActionOnFailure::ResetOnly.code());
        assert_eq!(&bytes[15..], b"workerA");
    }

    #[test]
    fn test_class_only_constructor_keeps_class() {
        let message = WatchdogMessage::of_class(MessageClass::TerminateBroadcast);
        assert_eq!(message.class(), MessageClass::TerminateBroadcast);
        assert_eq!(message.name(), "");
        let decoded = WatchdogMessage::deserialize(message.serialize().as_bytes()).unwrap();
        assert_eq!(decoded.class(), MessageClass::TerminateBroadcast);
        assert_eq!(message.serialize().len(), 15);
    }

    #[test]
    fn test_named_constructor_defaults() {
        let message = WatchdogMessage::named("logger", MessageClass::UnregisterRequest);
        assert_eq!(message.pid(), ProcessId::new(0));
        assert_eq!(message.settings(), SlotSettings::default());
        assert_eq!(message.on_failure(), ActionOnFailure::ResetOnly);
    }

    #[test]
    fn test_default_message() {
        let message = WatchdogMessage::default();
        assert_eq!(message.class(), MessageClass::None);
    }

    #[test]
    fn test_name_need_not_be_utf8() {
        let mut bytes = WatchdogMessage::of_class(MessageClass::Kick)
            .serialize()
            .into_vec();
        bytes.extend_from_slice(&[b'w', 0xE9]);
        let decoded = WatchdogMessage::deserialize(&bytes).unwrap();
        assert_eq!(decoded.name().as_bytes(), &[b'w', 0xE9]);
        assert_eq!(decoded.class(), MessageClass::Kick);
        assert_eq!(decoded.serialize().as_bytes(), &bytes[..]);
    }

    #[test]
    fn test_invalid_class_byte() {
        let mut bytes = kick().serialize().into_vec();
        bytes[1] = 14;
        assert_eq!(
            WatchdogMessage::deserialize(&bytes),
            Err(ProtocolError::InvalidField {
                field: "message_class",
                value: 14,
            })
        );
    }

    #[test]
    fn test_invalid_failure_action_byte() {
        let mut bytes = kick().serialize().into_vec();
        bytes[14] = 2;
        assert_eq!(
            WatchdogMessage::deserialize(&bytes),
            Err(ProtocolError::InvalidField {
                field: "action_on_failure",
                value: 2,
            })
        );
    }

    #[test]
    fn test_truncated_header() {
        let bytes = kick().serialize().into_vec();
        assert_eq!(
            WatchdogMessage::deserialize(&bytes[..10]),
            Err(ProtocolError::Truncated {
                tag: WireTag::Watchdog,
                needed: 15,
                actual: 10,
            })
        );
    }

    #[test]
    fn test_class_codes_and_names() {
        for (index, class) in MessageClass::ALL.iter().enumerate() {
            assert_eq!(class.code() as usize, index);
            assert_eq!(MessageClass::from_code(class.code()), Ok(*class));
        }
        assert_eq!(MessageClass::Kick.to_string(), "KICK");
        assert_eq!(MessageClass::TerminateBroadcast.name(), "TERMINATE_BROADCAST");
        assert_eq!(ActionOnFailure::KillAll.to_string(), "KILL_ALL");
    }

    #[test]
    fn test_request_reply_pairs() {
        assert_eq!(
            MessageClass::RegisterRequest.expected_reply(),
            Some(MessageClass::RegisterReply)
        );
        assert_eq!(
            MessageClass::SyncRequest.expected_reply(),
            Some(MessageClass::SyncBroadcast)
        );
        assert!(MessageClass::TerminateRequest.is_request());
        assert!(!MessageClass::Kick.is_request());
        assert!(MessageClass::UnregisterReply.is_reply());
        assert!(MessageClass::SyncBroadcast.is_broadcast());
        assert!(!MessageClass::SyncBroadcast.is_reply());
    }

    #[test]
    fn test_describe_mentions_fields() {
        let description = kick().describe();
        assert!(description.contains("workerA"));
        assert!(description.contains("KICK"));
        assert!(description.contains("RESET_ONLY"));
        assert!(description.contains("2000 ms"));
    }

    #[test]
    fn test_ledger_resolves_single_request() {
        let watchdog = MailboxRef::new("/watchdog");
        let mut ledger = RequestLedger::new();
        ledger
            .record(watchdog.clone(), MessageClass::RegisterRequest)
            .unwrap();
        assert_eq!(ledger.outstanding(&watchdog), 1);

        assert_eq!(
            ledger.resolve(&watchdog, MessageClass::RegisterReply),
            Ok(MessageClass::RegisterRequest)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_ledger_reports_ambiguity() {
        let watchdog = MailboxRef::new("/watchdog");
        let mut ledger = RequestLedger::new();
        ledger
            .record(watchdog.clone(), MessageClass::RegisterRequest)
            .unwrap();
        ledger
            .record(watchdog.clone(), MessageClass::RegisterRequest)
            .unwrap();

        assert_eq!(
            ledger.resolve(&watchdog, MessageClass::RegisterReply),
            Err(CorrelationError::Ambiguous {
                peer: watchdog.clone(),
                reply: MessageClass::RegisterReply,
                pending: 2,
            })
        );
        assert_eq!(ledger.outstanding(&watchdog), 2);
    }

    #[test]
    fn test_ledger_distinguishes_reply_classes() {
        let watchdog = MailboxRef::new("/watchdog");
        let mut ledger = RequestLedger::new();
        ledger
            .record(watchdog.clone(), MessageClass::RegisterRequest)
            .unwrap();
        ledger
            .record(watchdog.clone(), MessageClass::SyncRequest)
            .unwrap();

        assert_eq!(
            ledger.resolve(&watchdog, MessageClass::SyncBroadcast),
            Ok(MessageClass::SyncRequest)
        );
        assert_eq!(ledger.outstanding(&watchdog), 1);
    }

    #[test]
    fn test_ledger_unsolicited_and_not_a_request() {
        let watchdog = MailboxRef::new("/watchdog");
        let mut ledger = RequestLedger::new();
        assert!(matches!(
            ledger.resolve(&watchdog, MessageClass::RegisterReply),
            Err(CorrelationError::Unsolicited { .. })
        ));
        assert_eq!(
            ledger.record(watchdog.clone(), MessageClass::Kick),
            Err(CorrelationError::NotARequest(MessageClass::Kick))
        );
        ledger
            .record(watchdog.clone(), MessageClass::TerminateRequest)
            .unwrap();
        assert_eq!(ledger.forget(&watchdog), 1);
        assert!(ledger.is_empty());
    }
}
