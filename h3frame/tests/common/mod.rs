//! Recording visitor shared by the integration tests.

#![allow(dead_code)]

use h3frame::{
    AcceptChFrame, CancelPushFrame, Error, ErrorCode, GoAwayFrame, HttpDecoder, MaxPushIdFrame,
    PriorityUpdateFrame, PushId, SettingsFrame, Visitor,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Error(ErrorCode, String),
    CancelPushStart(u64),
    CancelPush(CancelPushFrame),
    MaxPushIdStart(u64),
    MaxPushId(MaxPushIdFrame),
    GoAwayStart(u64),
    GoAway(GoAwayFrame),
    SettingsStart(u64),
    Settings(SettingsFrame),
    DataStart(u64, u64),
    DataPayload(Vec<u8>),
    DataEnd,
    HeadersStart(u64, u64),
    HeadersPayload(Vec<u8>),
    HeadersEnd,
    PushPromiseStart(u64),
    PushPromisePushId(PushId, u64, u64),
    PushPromisePayload(Vec<u8>),
    PushPromiseEnd,
    PriorityUpdateStart(u64),
    PriorityUpdate(PriorityUpdateFrame),
    AcceptChStart(u64),
    AcceptCh(AcceptChFrame),
    UnknownStart(u64, u64, u64),
    UnknownPayload(Vec<u8>),
    UnknownEnd,
}

/// Records every event. Returns `false` from every callback while `pause`
/// is set.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    pub pause: bool,
}

impl Recorder {
    pub fn pausing() -> Self {
        Self {
            events: Vec::new(),
            pause: true,
        }
    }

    fn record(&mut self, event: Event) -> bool {
        self.events.push(event);
        !self.pause
    }
}

impl Visitor for Recorder {
    fn on_error(&mut self, error: &Error) {
        self.events
            .push(Event::Error(error.code(), error.detail().to_string()));
    }

    fn on_cancel_push_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::CancelPushStart(header_length))
    }

    fn on_cancel_push_frame(&mut self, frame: &CancelPushFrame) -> bool {
        self.record(Event::CancelPush(*frame))
    }

    fn on_max_push_id_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::MaxPushIdStart(header_length))
    }

    fn on_max_push_id_frame(&mut self, frame: &MaxPushIdFrame) -> bool {
        self.record(Event::MaxPushId(*frame))
    }

    fn on_goaway_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::GoAwayStart(header_length))
    }

    fn on_goaway_frame(&mut self, frame: &GoAwayFrame) -> bool {
        self.record(Event::GoAway(*frame))
    }

    fn on_settings_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::SettingsStart(header_length))
    }

    fn on_settings_frame(&mut self, frame: &SettingsFrame) -> bool {
        self.record(Event::Settings(frame.clone()))
    }

    fn on_data_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool {
        self.record(Event::DataStart(header_length, payload_length))
    }

    fn on_data_frame_payload(&mut self, payload: &[u8]) -> bool {
        assert!(!payload.is_empty());
        self.record(Event::DataPayload(payload.to_vec()))
    }

    fn on_data_frame_end(&mut self) -> bool {
        self.record(Event::DataEnd)
    }

    fn on_headers_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool {
        self.record(Event::HeadersStart(header_length, payload_length))
    }

    fn on_headers_frame_payload(&mut self, payload: &[u8]) -> bool {
        assert!(!payload.is_empty());
        self.record(Event::HeadersPayload(payload.to_vec()))
    }

    fn on_headers_frame_end(&mut self) -> bool {
        self.record(Event::HeadersEnd)
    }

    fn on_push_promise_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::PushPromiseStart(header_length))
    }

    fn on_push_promise_frame_push_id(
        &mut self,
        push_id: PushId,
        push_id_length: u64,
        header_block_length: u64,
    ) -> bool {
        self.record(Event::PushPromisePushId(
            push_id,
            push_id_length,
            header_block_length,
        ))
    }

    fn on_push_promise_frame_payload(&mut self, payload: &[u8]) -> bool {
        assert!(!payload.is_empty());
        self.record(Event::PushPromisePayload(payload.to_vec()))
    }

    fn on_push_promise_frame_end(&mut self) -> bool {
        self.record(Event::PushPromiseEnd)
    }

    fn on_priority_update_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::PriorityUpdateStart(header_length))
    }

    fn on_priority_update_frame(&mut self, frame: &PriorityUpdateFrame) -> bool {
        self.record(Event::PriorityUpdate(frame.clone()))
    }

    fn on_accept_ch_frame_start(&mut self, header_length: u64) -> bool {
        self.record(Event::AcceptChStart(header_length))
    }

    fn on_accept_ch_frame(&mut self, frame: &AcceptChFrame) -> bool {
        self.record(Event::AcceptCh(frame.clone()))
    }

    fn on_unknown_frame_start(
        &mut self,
        frame_type: u64,
        header_length: u64,
        payload_length: u64,
    ) -> bool {
        self.record(Event::UnknownStart(frame_type, header_length, payload_length))
    }

    fn on_unknown_frame_payload(&mut self, payload: &[u8]) -> bool {
        assert!(!payload.is_empty());
        self.record(Event::UnknownPayload(payload.to_vec()))
    }

    fn on_unknown_frame_end(&mut self) -> bool {
        self.record(Event::UnknownEnd)
    }
}

/// Merges consecutive payload chunks of the same kind, so event streams
/// can be compared regardless of how the input was split.
pub fn coalesce(events: &[Event]) -> Vec<Event> {
    let mut out: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        let merged = match (out.last_mut(), event) {
            (Some(Event::DataPayload(acc)), Event::DataPayload(more))
            | (Some(Event::HeadersPayload(acc)), Event::HeadersPayload(more))
            | (Some(Event::PushPromisePayload(acc)), Event::PushPromisePayload(more))
            | (Some(Event::UnknownPayload(acc)), Event::UnknownPayload(more)) => {
                acc.extend_from_slice(more);
                true
            }
            _ => false,
        };
        if !merged {
            out.push(event.clone());
        }
    }
    out
}

/// Feeds `data` in one call. Returns the events and bytes consumed.
pub fn decode_all(data: &[u8]) -> (Vec<Event>, usize) {
    let mut recorder = Recorder::default();
    let consumed = HttpDecoder::new(&mut recorder).process_input(data);
    (recorder.events, consumed)
}

/// Feeds `data` in pieces ending at each of `splits` (ascending offsets).
/// Stops feeding once the decoder reports an error.
pub fn decode_split(data: &[u8], splits: &[usize]) -> (Vec<Event>, usize) {
    let mut recorder = Recorder::default();
    let mut consumed = 0;
    {
        let mut decoder = HttpDecoder::new(&mut recorder);
        let mut start = 0;
        for end in splits.iter().copied().chain(std::iter::once(data.len())) {
            let end = end.clamp(start, data.len());
            consumed += decoder.process_input(&data[start..end]);
            if decoder.error().is_error() {
                break;
            }
            start = end;
        }
    }
    (recorder.events, consumed)
}
