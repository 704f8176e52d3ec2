//! Parsers for frame payloads that are decoded as a unit.
//!
//! Each parser takes the complete payload of one frame and either returns
//! the structured record or a [`ErrorCode::HttpFrameError`]. The payload
//! must be consumed exactly: truncated fields and trailing bytes are both
//! rejected.
//!
//! [`ErrorCode::HttpFrameError`]: crate::error::ErrorCode::HttpFrameError

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::frame::{
    AcceptChEntry, AcceptChFrame, CancelPushFrame, GoAwayFrame, MaxPushIdFrame,
    PriorityUpdateFrame, SettingsFrame,
};
use crate::reader::Reader;

/// Reads a payload that is exactly one varint.
fn parse_single_varint(payload: &[u8], frame_name: &str, field: &str) -> Result<u64> {
    let mut reader = Reader::new(payload);
    let value = reader
        .read_varint()
        .ok_or_else(|| Error::frame(format!("Unable to read {} {}.", frame_name, field)))?;
    if !reader.is_empty() {
        return Err(Error::frame(format!(
            "Superfluous data in {} frame.",
            frame_name
        )));
    }
    Ok(value)
}

pub fn parse_cancel_push(payload: &[u8]) -> Result<CancelPushFrame> {
    let push_id = parse_single_varint(payload, "CANCEL_PUSH", "push_id")?;
    Ok(CancelPushFrame { push_id })
}

pub fn parse_max_push_id(payload: &[u8]) -> Result<MaxPushIdFrame> {
    let push_id = parse_single_varint(payload, "MAX_PUSH_ID", "push_id")?;
    Ok(MaxPushIdFrame { push_id })
}

pub fn parse_goaway(payload: &[u8]) -> Result<GoAwayFrame> {
    let id = parse_single_varint(payload, "GOAWAY", "ID")?;
    Ok(GoAwayFrame { id })
}

/// Parses a sequence of (identifier, value) varint pairs.
///
/// Duplicate identifiers are not rejected here.
pub fn parse_settings(payload: &[u8]) -> Result<SettingsFrame> {
    let mut reader = Reader::new(payload);
    let mut frame = SettingsFrame::default();
    while !reader.is_empty() {
        let id = reader
            .read_varint()
            .ok_or_else(|| Error::frame("Unable to read setting identifier."))?;
        let value = reader
            .read_varint()
            .ok_or_else(|| Error::frame("Unable to read setting value."))?;
        frame.values.push((id, value));
    }
    Ok(frame)
}

/// Parses either PRIORITY_UPDATE variant; both share one payload layout.
pub fn parse_priority_update(payload: &[u8]) -> Result<PriorityUpdateFrame> {
    let mut reader = Reader::new(payload);
    let prioritized_element_id = reader
        .read_varint()
        .ok_or_else(|| Error::frame("Unable to read prioritized element id."))?;
    let priority_field_value = Bytes::copy_from_slice(reader.read_remaining());
    Ok(PriorityUpdateFrame {
        prioritized_element_id,
        priority_field_value,
    })
}

pub fn parse_accept_ch(payload: &[u8]) -> Result<AcceptChFrame> {
    let mut reader = Reader::new(payload);
    let mut frame = AcceptChFrame::default();
    while !reader.is_empty() {
        let origin = reader
            .read_length_prefixed()
            .ok_or_else(|| Error::frame("Unable to read ACCEPT_CH origin."))?;
        let value = reader
            .read_length_prefixed()
            .ok_or_else(|| Error::frame("Unable to read ACCEPT_CH value."))?;
        frame.entries.push(AcceptChEntry {
            origin: Bytes::copy_from_slice(origin),
            value: Bytes::copy_from_slice(value),
        });
    }
    Ok(frame)
}
