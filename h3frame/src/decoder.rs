//! Incremental HTTP/3 frame decoder.
//!
//! Input may be split at any byte. Frame headers and push ids that arrive
//! in pieces are assembled in small fixed buffers; DATA, HEADERS, the
//! PUSH_PROMISE header block and unknown frames are streamed to the visitor
//! as they arrive; the remaining frame types are accumulated and parsed as
//! a unit once the whole payload is present.

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::config::DecoderConfig;
use crate::error::{Error, ErrorCode, Result};
use crate::frame::{FrameType, PayloadStrategy, SettingsFrame};
use crate::parse;
use crate::reader::Reader;
use crate::varint;
use crate::visitor::Visitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingFrameLength,
    ReadingFrameType,
    ReadingFramePayload,
    FinishParsing,
    Error,
}

/// A varint field that may arrive split across several inputs.
///
/// `filled + (len - filled)` stays equal to the field width until the field
/// is complete, at which point both counters return to zero.
#[derive(Debug, Default)]
struct VarIntField {
    buf: [u8; varint::MAX_LEN],
    /// Width of the field in progress, 0 when none is.
    len: usize,
    filled: usize,
}

impl VarIntField {
    fn in_progress(&self) -> bool {
        self.len != 0
    }

    /// Consumes bytes of the field from `reader`.
    ///
    /// Returns the value and the field width once the field is complete,
    /// `None` if `reader` ran out first.
    fn read(&mut self, reader: &mut Reader<'_>) -> Option<(u64, usize)> {
        if !self.in_progress() {
            let len = reader.peek_varint_len()?;
            if reader.remaining() >= len {
                return reader.read_varint().map(|value| (value, len));
            }
            self.len = len;
        }

        let bytes = reader.read_at_most((self.len - self.filled) as u64);
        self.buf[self.filled..self.filled + bytes.len()].copy_from_slice(bytes);
        self.filled += bytes.len();
        if self.filled < self.len {
            return None;
        }

        let decoded = varint::decode(&self.buf[..self.len]);
        self.len = 0;
        self.filled = 0;
        decoded
    }
}

/// Decoder for the HTTP/3 frames carried on one stream.
///
/// The visitor is borrowed for the lifetime of the decoder and receives
/// every event synchronously from within [`process_input`].
///
/// [`process_input`]: HttpDecoder::process_input
pub struct HttpDecoder<'v, V: Visitor + ?Sized> {
    visitor: &'v mut V,
    config: DecoderConfig,
    state: State,
    current_frame_type: FrameType,
    current_length_field_length: usize,
    current_type_field_length: usize,
    current_frame_length: u64,
    remaining_frame_length: u64,
    length_field: VarIntField,
    type_field: VarIntField,
    push_id_field: VarIntField,
    /// Partial payload of a buffered frame type.
    buffer: BytesMut,
    error: Option<Error>,
}

impl<'v, V: Visitor + ?Sized> HttpDecoder<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self::with_config(visitor, DecoderConfig::default())
    }

    pub fn with_config(visitor: &'v mut V, config: DecoderConfig) -> Self {
        Self {
            visitor,
            config,
            state: State::ReadingFrameLength,
            current_frame_type: FrameType::Data,
            current_length_field_length: 0,
            current_type_field_length: 0,
            current_frame_length: 0,
            remaining_frame_length: 0,
            length_field: VarIntField::default(),
            type_field: VarIntField::default(),
            push_id_field: VarIntField::default(),
            buffer: BytesMut::new(),
            error: None,
        }
    }

    /// Processes `data`, invoking visitor methods until the input is
    /// exhausted, a visitor method returns `false`, or an error occurs.
    ///
    /// Returns the number of bytes consumed. Paused processing resumes when
    /// this is called again with the unconsumed remainder. After an error
    /// nothing is consumed; callers should check [`error`](Self::error)
    /// instead of calling again.
    pub fn process_input(&mut self, data: &[u8]) -> usize {
        if self.state == State::Error {
            return 0;
        }

        let mut reader = Reader::new(data);
        let mut continue_processing = true;
        while continue_processing && (!reader.is_empty() || self.state == State::FinishParsing) {
            continue_processing = match self.state {
                State::ReadingFrameLength => self.read_frame_length(&mut reader),
                State::ReadingFrameType => self.read_frame_type(&mut reader),
                State::ReadingFramePayload => self.read_frame_payload(&mut reader),
                State::FinishParsing => self.finish_parsing(),
                State::Error => false,
            };
        }

        reader.consumed()
    }

    /// [`ErrorCode::NoError`] unless and until `on_error` has been called.
    pub fn error(&self) -> ErrorCode {
        self.error
            .as_ref()
            .map_or(ErrorCode::NoError, |error| error.code())
    }

    /// Detail message of the error, empty if there is none.
    pub fn error_detail(&self) -> &str {
        self.error.as_ref().map_or("", |error| error.detail())
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// True if the input processed so far ends on a frame boundary.
    pub fn at_frame_boundary(&self) -> bool {
        self.state == State::ReadingFrameLength && !self.length_field.in_progress()
    }

    pub fn visitor(&self) -> &V {
        &*self.visitor
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    fn read_frame_length(&mut self, reader: &mut Reader<'_>) -> bool {
        let Some((length, width)) = self.length_field.read(reader) else {
            return true;
        };
        self.current_frame_length = length;
        self.current_length_field_length = width;
        self.state = State::ReadingFrameType;
        true
    }

    /// Reads the type field, checks the declared length against the type's
    /// ceiling, and announces the frame.
    fn read_frame_type(&mut self, reader: &mut Reader<'_>) -> bool {
        let Some((frame_type, width)) = self.type_field.read(reader) else {
            return true;
        };
        self.current_frame_type = FrameType::from(frame_type);
        self.current_type_field_length = width;

        let frame_type = self.current_frame_type;
        let payload_length = self.current_frame_length;
        if payload_length > self.config.max_frame_length(frame_type) {
            self.raise_error(Error::protocol(
                ErrorCode::HttpFrameTooLarge,
                "Frame is too large.",
            ));
            return false;
        }
        // A PUSH_PROMISE must at least carry a push id.
        if frame_type == FrameType::PushPromise && payload_length == 0 {
            self.raise_error(Error::frame("Corrupt PUSH_PROMISE frame."));
            return false;
        }

        let header_length =
            (self.current_length_field_length + self.current_type_field_length) as u64;
        trace!(
            frame_type = frame_type.value(),
            header_length,
            payload_length,
            "frame header complete"
        );

        self.remaining_frame_length = payload_length;
        self.state = if payload_length == 0 {
            State::FinishParsing
        } else {
            State::ReadingFramePayload
        };

        let visitor = &mut *self.visitor;
        match frame_type {
            FrameType::Data => visitor.on_data_frame_start(header_length, payload_length),
            FrameType::Headers => visitor.on_headers_frame_start(header_length, payload_length),
            FrameType::CancelPush => visitor.on_cancel_push_frame_start(header_length),
            FrameType::Settings => visitor.on_settings_frame_start(header_length),
            FrameType::PushPromise => visitor.on_push_promise_frame_start(header_length),
            FrameType::GoAway => visitor.on_goaway_frame_start(header_length),
            FrameType::MaxPushId => visitor.on_max_push_id_frame_start(header_length),
            FrameType::PriorityUpdate | FrameType::PriorityUpdateRequestStream => {
                visitor.on_priority_update_frame_start(header_length)
            }
            FrameType::AcceptCh => visitor.on_accept_ch_frame_start(header_length),
            FrameType::Unknown(value) => {
                visitor.on_unknown_frame_start(value, header_length, payload_length)
            }
        }
    }

    fn read_frame_payload(&mut self, reader: &mut Reader<'_>) -> bool {
        debug_assert!(self.remaining_frame_length > 0);
        match self.current_frame_type.payload_strategy() {
            PayloadStrategy::Streamed => self.stream_payload(reader),
            PayloadStrategy::PushPromise => self.read_push_promise_payload(reader),
            PayloadStrategy::Buffered => self.buffer_or_parse_payload(reader),
        }
    }

    /// Hands as much of the current payload as `reader` holds to the
    /// visitor, without copying.
    fn stream_payload(&mut self, reader: &mut Reader<'_>) -> bool {
        let payload = reader.read_at_most(self.remaining_frame_length);
        if payload.is_empty() {
            return true;
        }
        self.remaining_frame_length -= payload.len() as u64;
        if self.remaining_frame_length == 0 {
            self.state = State::FinishParsing;
        }

        let visitor = &mut *self.visitor;
        match self.current_frame_type {
            FrameType::Data => visitor.on_data_frame_payload(payload),
            FrameType::Headers => visitor.on_headers_frame_payload(payload),
            FrameType::PushPromise => visitor.on_push_promise_frame_payload(payload),
            FrameType::Unknown(_) => visitor.on_unknown_frame_payload(payload),
            other => unreachable!("{:?} payload is not streamed", other),
        }
    }

    fn read_push_promise_payload(&mut self, reader: &mut Reader<'_>) -> bool {
        let reading_push_id = self.push_id_field.in_progress()
            || self.remaining_frame_length == self.current_frame_length;

        if reading_push_id {
            if !self.push_id_field.in_progress() {
                let Some(width) = reader.peek_varint_len() else {
                    return true;
                };
                if width as u64 > self.remaining_frame_length {
                    self.raise_error(Error::frame("Unable to read PUSH_PROMISE push_id."));
                    return false;
                }
            }

            let before = reader.consumed();
            let push_id = self.push_id_field.read(reader);
            self.remaining_frame_length -= (reader.consumed() - before) as u64;
            let Some((push_id, push_id_length)) = push_id else {
                return true;
            };

            if self.remaining_frame_length == 0 {
                self.state = State::FinishParsing;
            }
            let header_block_length = self.current_frame_length - push_id_length as u64;
            if !self.visitor.on_push_promise_frame_push_id(
                push_id,
                push_id_length as u64,
                header_block_length,
            ) {
                return false;
            }
        }

        self.stream_payload(reader)
    }

    /// Accumulates the payload of a buffered frame type and parses it once
    /// complete. Parses straight out of `reader` when it already holds the
    /// whole payload.
    fn buffer_or_parse_payload(&mut self, reader: &mut Reader<'_>) -> bool {
        if self.buffer.is_empty() && reader.remaining() as u64 >= self.remaining_frame_length {
            let payload = reader.read_at_most(self.remaining_frame_length);
            self.remaining_frame_length = 0;
            return self.parse_entire_payload(payload);
        }

        let chunk = reader.read_at_most(self.remaining_frame_length);
        self.buffer.extend_from_slice(chunk);
        self.remaining_frame_length -= chunk.len() as u64;
        if self.remaining_frame_length > 0 {
            return true;
        }

        let mut payload = std::mem::take(&mut self.buffer);
        let continue_processing = self.parse_entire_payload(&payload);
        payload.clear();
        self.buffer = payload;
        continue_processing
    }

    /// Parses a complete buffered payload and reports the frame.
    fn parse_entire_payload(&mut self, payload: &[u8]) -> bool {
        debug_assert_eq!(payload.len() as u64, self.current_frame_length);
        self.state = State::ReadingFrameLength;

        let visitor = &mut *self.visitor;
        let result = match self.current_frame_type {
            FrameType::CancelPush => {
                parse::parse_cancel_push(payload).map(|frame| visitor.on_cancel_push_frame(&frame))
            }
            FrameType::MaxPushId => {
                parse::parse_max_push_id(payload).map(|frame| visitor.on_max_push_id_frame(&frame))
            }
            FrameType::GoAway => {
                parse::parse_goaway(payload).map(|frame| visitor.on_goaway_frame(&frame))
            }
            FrameType::Settings => {
                parse::parse_settings(payload).map(|frame| visitor.on_settings_frame(&frame))
            }
            FrameType::PriorityUpdate | FrameType::PriorityUpdateRequestStream => {
                parse::parse_priority_update(payload)
                    .map(|frame| visitor.on_priority_update_frame(&frame))
            }
            FrameType::AcceptCh => {
                parse::parse_accept_ch(payload).map(|frame| visitor.on_accept_ch_frame(&frame))
            }
            other => unreachable!("{:?} payload is not buffered", other),
        };

        match result {
            Ok(continue_processing) => continue_processing,
            Err(error) => {
                self.raise_error(error);
                false
            }
        }
    }

    /// Signals the end of a fully consumed frame.
    ///
    /// Buffered frame types only get here with an empty payload.
    fn finish_parsing(&mut self) -> bool {
        debug_assert_eq!(self.remaining_frame_length, 0);
        if self.current_frame_type.payload_strategy() == PayloadStrategy::Buffered {
            return self.parse_entire_payload(&[]);
        }

        self.state = State::ReadingFrameLength;
        let visitor = &mut *self.visitor;
        match self.current_frame_type {
            FrameType::Data => visitor.on_data_frame_end(),
            FrameType::Headers => visitor.on_headers_frame_end(),
            FrameType::PushPromise => visitor.on_push_promise_frame_end(),
            FrameType::Unknown(_) => visitor.on_unknown_frame_end(),
            other => unreachable!("{:?} has no end event", other),
        }
    }

    fn raise_error(&mut self, error: Error) {
        debug!(code = %error.code(), detail = error.detail(), "HTTP/3 frame decoding failed");
        self.state = State::Error;
        self.visitor.on_error(&error);
        self.error = Some(error);
    }
}

/// Decodes one complete SETTINGS frame (header and payload) from `data`.
///
/// Applies the same structural rules as the streaming decoder, and also
/// rejects any bytes following the frame. Intended for SETTINGS frames
/// that are known to be complete, such as a cached copy.
pub fn decode_settings(data: &[u8]) -> Result<SettingsFrame> {
    let result = decode_settings_frame(data);
    if let Err(ref error) = result {
        debug!(%error, "Unable to decode SETTINGS frame");
    }
    result
}

fn decode_settings_frame(data: &[u8]) -> Result<SettingsFrame> {
    let mut reader = Reader::new(data);
    let length = reader
        .read_varint()
        .ok_or_else(|| Error::frame("Unable to read frame length."))?;
    let frame_type = reader
        .read_varint()
        .ok_or_else(|| Error::frame("Unable to read frame type."))?;
    if FrameType::from(frame_type) != FrameType::Settings {
        return Err(Error::frame(format!("Invalid frame type {:#x}.", frame_type)));
    }
    if length > DecoderConfig::default().max_frame_length(FrameType::Settings) {
        return Err(Error::protocol(
            ErrorCode::HttpFrameTooLarge,
            "Frame is too large.",
        ));
    }

    let payload = usize::try_from(length)
        .ok()
        .and_then(|length| reader.read_bytes(length))
        .ok_or_else(|| Error::frame("Unable to read SETTINGS frame payload."))?;
    if !reader.is_empty() {
        return Err(Error::frame("Superfluous data after SETTINGS frame."));
    }
    parse::parse_settings(payload)
}
