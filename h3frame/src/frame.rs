//! HTTP/3 frame types and the records produced for fully parsed frames.

use bytes::Bytes;

/// Push identifier carried by PUSH_PROMISE, CANCEL_PUSH and MAX_PUSH_ID.
pub type PushId = u64;

pub const DATA: u64 = 0x00;
pub const HEADERS: u64 = 0x01;
pub const CANCEL_PUSH: u64 = 0x03;
pub const SETTINGS: u64 = 0x04;
pub const PUSH_PROMISE: u64 = 0x05;
pub const GOAWAY: u64 = 0x07;
pub const MAX_PUSH_ID: u64 = 0x0d;
/// PRIORITY_UPDATE as defined by draft-ietf-httpbis-priority-01.
pub const PRIORITY_UPDATE: u64 = 0x0f;
pub const ACCEPT_CH: u64 = 0x89;
/// PRIORITY_UPDATE for request streams, draft-ietf-httpbis-priority-02.
pub const PRIORITY_UPDATE_REQUEST_STREAM: u64 = 0x0f0700;

/// Frame type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Data,
    Headers,
    CancelPush,
    Settings,
    PushPromise,
    GoAway,
    MaxPushId,
    PriorityUpdate,
    PriorityUpdateRequestStream,
    AcceptCh,
    /// Unknown or reserved (grease) type, with its raw tag.
    Unknown(u64),
}

impl From<u64> for FrameType {
    fn from(v: u64) -> Self {
        match v {
            DATA => FrameType::Data,
            HEADERS => FrameType::Headers,
            CANCEL_PUSH => FrameType::CancelPush,
            SETTINGS => FrameType::Settings,
            PUSH_PROMISE => FrameType::PushPromise,
            GOAWAY => FrameType::GoAway,
            MAX_PUSH_ID => FrameType::MaxPushId,
            PRIORITY_UPDATE => FrameType::PriorityUpdate,
            PRIORITY_UPDATE_REQUEST_STREAM => FrameType::PriorityUpdateRequestStream,
            ACCEPT_CH => FrameType::AcceptCh,
            other => FrameType::Unknown(other),
        }
    }
}

/// How the decoder handles the payload of a frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStrategy {
    /// Payload is forwarded to the visitor in chunks as it arrives.
    Streamed,
    /// A push id varint, then a streamed header block.
    PushPromise,
    /// Payload is accumulated and parsed as a unit once complete.
    Buffered,
}

impl FrameType {
    /// Wire value of the type tag.
    pub fn value(&self) -> u64 {
        match self {
            FrameType::Data => DATA,
            FrameType::Headers => HEADERS,
            FrameType::CancelPush => CANCEL_PUSH,
            FrameType::Settings => SETTINGS,
            FrameType::PushPromise => PUSH_PROMISE,
            FrameType::GoAway => GOAWAY,
            FrameType::MaxPushId => MAX_PUSH_ID,
            FrameType::PriorityUpdate => PRIORITY_UPDATE,
            FrameType::PriorityUpdateRequestStream => PRIORITY_UPDATE_REQUEST_STREAM,
            FrameType::AcceptCh => ACCEPT_CH,
            FrameType::Unknown(v) => *v,
        }
    }

    pub fn payload_strategy(&self) -> PayloadStrategy {
        match self {
            FrameType::Data | FrameType::Headers | FrameType::Unknown(_) => {
                PayloadStrategy::Streamed
            }
            FrameType::PushPromise => PayloadStrategy::PushPromise,
            FrameType::CancelPush
            | FrameType::Settings
            | FrameType::GoAway
            | FrameType::MaxPushId
            | FrameType::PriorityUpdate
            | FrameType::PriorityUpdateRequestStream
            | FrameType::AcceptCh => PayloadStrategy::Buffered,
        }
    }

    /// HTTP/3 reserves types of the form `0x1f * N + 0x21` for greasing.
    pub fn is_reserved(&self) -> bool {
        match self {
            FrameType::Unknown(v) => *v >= 0x21 && (*v - 0x21) % 0x1f == 0,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelPushFrame {
    pub push_id: PushId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPushIdFrame {
    pub push_id: PushId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoAwayFrame {
    /// Stream id or push id, depending on the sender's role.
    pub id: u64,
}

/// SETTINGS parameters in wire order.
///
/// Duplicate identifiers are preserved; rejecting them is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsFrame {
    pub values: Vec<(u64, u64)>,
}

impl SettingsFrame {
    /// Value of the last occurrence of `identifier`.
    pub fn get(&self, identifier: u64) -> Option<u64> {
        self.values
            .iter()
            .rev()
            .find(|(id, _)| *id == identifier)
            .map(|(_, value)| *value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityUpdateFrame {
    /// Stream id (or push id) whose priority is being updated.
    pub prioritized_element_id: u64,
    /// Priority Field Value, an opaque structured-field string.
    pub priority_field_value: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptChEntry {
    pub origin: Bytes,
    pub value: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptChFrame {
    pub entries: Vec<AcceptChEntry>,
}
