//! Watchdog message contract tests
//!
//! These tests define the stable layout of watchdog frames and the codes of
//! the supervision vocabulary.

use ipc::{ActionOnFailure, MessageClass};

// ===== Tag Value =====
const WATCHDOG_TAG: u8 = 7;

// ===== Header Layout =====
const OFFSET_CLASS: usize = 1;
const OFFSET_BASE_TTL: usize = 2;
const OFFSET_TIMEOUT_MS: usize = 6;
const OFFSET_PID: usize = 10;
const OFFSET_ON_FAILURE: usize = 14;
const HEADER_LEN: usize = 15;

/// Message class codes, in wire order
pub const CLASS_CODES: [(MessageClass, u8, &str); 14] = [
    (MessageClass::RegisterRequest, 0, "REGISTER_REQUEST"),
    (MessageClass::RegisterReply, 1, "REGISTER_REPLY"),
    (MessageClass::UnregisterRequest, 2, "UNREGISTER_REQUEST"),
    (MessageClass::UnregisterReply, 3, "UNREGISTER_REPLY"),
    (MessageClass::UpdateSettings, 4, "UPDATE_SETTINGS"),
    (MessageClass::Kick, 5, "KICK"),
    (MessageClass::Start, 6, "START"),
    (MessageClass::Stop, 7, "STOP"),
    (MessageClass::SyncRequest, 8, "SYNC_REQUEST"),
    (MessageClass::SyncBroadcast, 9, "SYNC_BROADCAST"),
    (MessageClass::TerminateRequest, 10, "TERMINATE_REQUEST"),
    (MessageClass::TerminateBroadcast, 11, "TERMINATE_BROADCAST"),
    (MessageClass::Any, 12, "ANY"),
    (MessageClass::None, 13, "NONE"),
];

/// Failure action codes
pub const ACTION_CODES: [(ActionOnFailure, u8, &str); 2] = [
    (ActionOnFailure::ResetOnly, 0, "RESET_ONLY"),
    (ActionOnFailure::KillAll, 1, "KILL_ALL"),
];

// ===== Contract Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use core_types::ProcessId;
    use ipc::{SlotSettings, TypedMessage, WatchdogMessage, WireMessage, WireTag};

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
    fn test_watchdog_tag_value() {
        assert_eq!(WireTag::Watchdog.code(), WATCHDOG_TAG);
    }

    #[test]
    fn test_class_codes_and_names() {
        for (class, code, name) in CLASS_CODES {
            assert_eq!(class.code(), code, "Class code changed for {}", name);
            assert_eq!(class.name(), name);
        }
    }

    #[test]
    fn test_action_codes_and_names() {
        for (action, code, name) in ACTION_CODES {
            assert_eq!(action.code(), code, "Action code changed for {}", name);
            assert_eq!(action.name(), name);
        }
    }

    #[test]
    fn test_kick_contract() {
        let mut golden = vec![WATCHDOG_TAG, 5];
        golden.extend_from_slice(&ne_u32(5));
        golden.extend_from_slice(&ne_u32(2000));
        golden.extend_from_slice(&ne_u32(1234));
        golden.push(0);
        golden.extend_from_slice(b"workerA");

        verify_frame_contract(&kick(), &golden);
        verify_decode_contract(&golden, &kick());
    }

    #[test]
    fn test_header_offsets() {
        let message = WatchdogMessage::new(
            "w",
            SlotSettings::new(0x0102_0304, 0x0506_0708),
            ProcessId::new(0x0A0B_0C0D),
            ActionOnFailure::KillAll,
            MessageClass::UpdateSettings,
        );
        let frame = message.serialize();
        let bytes = frame.as_bytes();

        assert_eq!(bytes[OFFSET_CLASS], 4);
        assert_eq!(
            bytes[OFFSET_BASE_TTL..OFFSET_TIMEOUT_MS],
            ne_u32(0x0102_0304)
        );
        assert_eq!(bytes[OFFSET_TIMEOUT_MS..OFFSET_PID], ne_u32(0x0506_0708));
        assert_eq!(bytes[OFFSET_PID..OFFSET_ON_FAILURE], ne_u32(0x0A0B_0C0D));
        assert_eq!(bytes[OFFSET_ON_FAILURE], 1);
        assert_eq!(&bytes[HEADER_LEN..], b"w");
    }

    #[test]
    fn test_header_length() {
        let frame = WatchdogMessage::of_class(MessageClass::SyncRequest).serialize();
        assert_eq!(frame.len(), HEADER_LEN);
        assert_eq!(
            WatchdogMessage::deserialize(frame.as_bytes())
                .unwrap()
                .class(),
            MessageClass::SyncRequest
        );
    }
}
