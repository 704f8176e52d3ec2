//! Decoder configuration and tunable limits.
//!
//! Frames whose payload is buffered before parsing are capped so that a
//! peer cannot make the decoder hold an unbounded amount of memory. Frames
//! streamed straight to the visitor need no cap.

use serde::{Deserialize, Serialize};

use crate::frame::FrameType;
use crate::varint;

/// Default cap for buffered frames with variable-size payloads (1 MiB).
pub const DEFAULT_MAX_BUFFERED_FRAME_SIZE: u64 = 1024 * 1024;

/// Configuration for [`HttpDecoder`](crate::HttpDecoder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum SETTINGS payload length (default: 1 MiB).
    pub max_settings_frame_size: u64,

    /// Maximum PRIORITY_UPDATE payload length, both wire variants
    /// (default: 1 MiB).
    pub max_priority_update_frame_size: u64,

    /// Maximum ACCEPT_CH payload length (default: 1 MiB).
    pub max_accept_ch_frame_size: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_settings_frame_size: DEFAULT_MAX_BUFFERED_FRAME_SIZE,
            max_priority_update_frame_size: DEFAULT_MAX_BUFFERED_FRAME_SIZE,
            max_accept_ch_frame_size: DEFAULT_MAX_BUFFERED_FRAME_SIZE,
        }
    }
}

impl DecoderConfig {
    /// Largest declared payload length accepted for `frame_type`.
    pub fn max_frame_length(&self, frame_type: FrameType) -> u64 {
        match frame_type {
            // A single varint.
            FrameType::CancelPush | FrameType::GoAway | FrameType::MaxPushId => {
                varint::MAX_LEN as u64
            }
            FrameType::Settings => self.max_settings_frame_size,
            FrameType::PriorityUpdate | FrameType::PriorityUpdateRequestStream => {
                self.max_priority_update_frame_size
            }
            FrameType::AcceptCh => self.max_accept_ch_frame_size,
            FrameType::Data
            | FrameType::Headers
            | FrameType::PushPromise
            | FrameType::Unknown(_) => u64::MAX,
        }
    }

    /// Validate the configuration.
    ///
    /// Returns `Ok(())` if valid, or a list of error messages if invalid.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("max_settings_frame_size", self.max_settings_frame_size),
            ("max_priority_update_frame_size", self.max_priority_update_frame_size),
            ("max_accept_ch_frame_size", self.max_accept_ch_frame_size),
        ] {
            if value == 0 {
                errors.push(format!("decoder.{} must be greater than 0", name));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
