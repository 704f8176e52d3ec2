//! Frame serialization in the `length || type || payload` layout.
//!
//! The decoder never needs these; they exist to produce input for tests,
//! benchmarks and tools.

use bytes::{BufMut, BytesMut};

use crate::frame::{
    self, AcceptChFrame, CancelPushFrame, GoAwayFrame, MaxPushIdFrame, PriorityUpdateFrame,
    PushId, SettingsFrame,
};
use crate::varint;

/// Writes a frame header followed by `payload`.
pub fn write_frame(frame_type: u64, payload: &[u8], buf: &mut BytesMut) {
    write_header(frame_type, payload.len() as u64, buf);
    buf.put_slice(payload);
}

/// Writes only a frame header; the caller supplies `payload_length` bytes.
pub fn write_header(frame_type: u64, payload_length: u64, buf: &mut BytesMut) {
    varint::encode_buf(payload_length, buf);
    varint::encode_buf(frame_type, buf);
}

pub fn write_data(payload: &[u8], buf: &mut BytesMut) {
    write_frame(frame::DATA, payload, buf);
}

pub fn write_headers(field_section: &[u8], buf: &mut BytesMut) {
    write_frame(frame::HEADERS, field_section, buf);
}

pub fn write_push_promise(push_id: PushId, field_section: &[u8], buf: &mut BytesMut) {
    let length = varint::encoded_len(push_id) + field_section.len();
    write_header(frame::PUSH_PROMISE, length as u64, buf);
    varint::encode_buf(push_id, buf);
    buf.put_slice(field_section);
}

fn write_single_varint(frame_type: u64, value: u64, buf: &mut BytesMut) {
    write_header(frame_type, varint::encoded_len(value) as u64, buf);
    varint::encode_buf(value, buf);
}

pub fn write_cancel_push(frame: &CancelPushFrame, buf: &mut BytesMut) {
    write_single_varint(frame::CANCEL_PUSH, frame.push_id, buf);
}

pub fn write_max_push_id(frame: &MaxPushIdFrame, buf: &mut BytesMut) {
    write_single_varint(frame::MAX_PUSH_ID, frame.push_id, buf);
}

pub fn write_goaway(frame: &GoAwayFrame, buf: &mut BytesMut) {
    write_single_varint(frame::GOAWAY, frame.id, buf);
}

pub fn write_settings(frame: &SettingsFrame, buf: &mut BytesMut) {
    let mut payload = BytesMut::new();
    for (id, value) in &frame.values {
        varint::encode_buf(*id, &mut payload);
        varint::encode_buf(*value, &mut payload);
    }
    write_frame(frame::SETTINGS, &payload, buf);
}

/// Writes a PRIORITY_UPDATE under `frame_type`, which selects the wire
/// variant ([`frame::PRIORITY_UPDATE`] or
/// [`frame::PRIORITY_UPDATE_REQUEST_STREAM`]).
pub fn write_priority_update(frame_type: u64, frame: &PriorityUpdateFrame, buf: &mut BytesMut) {
    let mut payload = BytesMut::new();
    varint::encode_buf(frame.prioritized_element_id, &mut payload);
    payload.put_slice(&frame.priority_field_value);
    write_frame(frame_type, &payload, buf);
}

pub fn write_accept_ch(frame: &AcceptChFrame, buf: &mut BytesMut) {
    let mut payload = BytesMut::new();
    for entry in &frame.entries {
        varint::encode_buf(entry.origin.len() as u64, &mut payload);
        payload.put_slice(&entry.origin);
        varint::encode_buf(entry.value.len() as u64, &mut payload);
        payload.put_slice(&entry.value);
    }
    write_frame(frame::ACCEPT_CH, &payload, buf);
}
