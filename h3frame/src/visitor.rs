//! Callbacks through which the decoder reports frames.

use crate::error::Error;
use crate::frame::{
    AcceptChFrame, CancelPushFrame, GoAwayFrame, MaxPushIdFrame, PriorityUpdateFrame, PushId,
    SettingsFrame,
};

/// Receiver of frame lifecycle events.
///
/// Every method except [`on_error`](Visitor::on_error) returns `true` to
/// keep decoding within the current [`process_input`] call and `false` to
/// pause it. A paused decoder resumes when `process_input` is called again
/// with the unconsumed remainder of the input.
///
/// `*_frame_start` methods are called once the frame header is complete.
/// `header_length` counts the length and type fields (and nothing else).
/// Implementations must not call back into the decoder that invoked them.
///
/// [`process_input`]: crate::HttpDecoder::process_input
pub trait Visitor {
    /// Called exactly once, when decoding fails. No further events follow.
    fn on_error(&mut self, error: &Error);

    fn on_cancel_push_frame_start(&mut self, header_length: u64) -> bool;
    fn on_cancel_push_frame(&mut self, frame: &CancelPushFrame) -> bool;

    fn on_max_push_id_frame_start(&mut self, header_length: u64) -> bool;
    fn on_max_push_id_frame(&mut self, frame: &MaxPushIdFrame) -> bool;

    fn on_goaway_frame_start(&mut self, header_length: u64) -> bool;
    fn on_goaway_frame(&mut self, frame: &GoAwayFrame) -> bool;

    fn on_settings_frame_start(&mut self, header_length: u64) -> bool;
    fn on_settings_frame(&mut self, frame: &SettingsFrame) -> bool;

    fn on_data_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool;
    /// Part of a DATA payload. May be called several times per frame;
    /// `payload` is never empty.
    fn on_data_frame_payload(&mut self, payload: &[u8]) -> bool;
    fn on_data_frame_end(&mut self) -> bool;

    fn on_headers_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool;
    /// Part of a HEADERS payload. May be called several times per frame;
    /// `payload` is never empty.
    fn on_headers_frame_payload(&mut self, payload: &[u8]) -> bool;
    fn on_headers_frame_end(&mut self) -> bool;

    fn on_push_promise_frame_start(&mut self, header_length: u64) -> bool;
    /// Called exactly once per valid PUSH_PROMISE, before any header block
    /// bytes. `push_id_length` is the width of the push id field and
    /// `header_block_length` the number of header block bytes that follow.
    fn on_push_promise_frame_push_id(
        &mut self,
        push_id: PushId,
        push_id_length: u64,
        header_block_length: u64,
    ) -> bool;
    /// Part of the header block. `payload` is never empty.
    fn on_push_promise_frame_payload(&mut self, payload: &[u8]) -> bool;
    fn on_push_promise_frame_end(&mut self) -> bool;

    /// Called for both PRIORITY_UPDATE wire variants.
    fn on_priority_update_frame_start(&mut self, header_length: u64) -> bool;
    fn on_priority_update_frame(&mut self, frame: &PriorityUpdateFrame) -> bool;

    fn on_accept_ch_frame_start(&mut self, header_length: u64) -> bool;
    fn on_accept_ch_frame(&mut self, frame: &AcceptChFrame) -> bool;

    /// Frame type might be reserved; implementations should ignore it.
    fn on_unknown_frame_start(
        &mut self,
        frame_type: u64,
        header_length: u64,
        payload_length: u64,
    ) -> bool;
    /// `payload` is never empty.
    fn on_unknown_frame_payload(&mut self, payload: &[u8]) -> bool;
    fn on_unknown_frame_end(&mut self) -> bool;
}
