//! HTTP/3 frame decoding for quicd.
//!
//! This crate turns the bytes of one HTTP/3 stream into frame events
//! delivered to a [`Visitor`]. Input may be fragmented arbitrarily across
//! [`HttpDecoder::process_input`] calls, and any visitor callback can pause
//! decoding; a later call resumes exactly where the previous one stopped.
//!
//! Frame semantics (ordering rules, duplicate settings and so on) are left
//! to the caller. The decoder only checks that frames are structurally
//! valid. Any structural failure is terminal for the decoder.
//!
//! # Example
//!
//! ```rust,ignore
//! use h3frame::{HttpDecoder, Visitor};
//!
//! let mut visitor = MyVisitor::default();
//! let mut decoder = HttpDecoder::new(&mut visitor);
//! let consumed = decoder.process_input(&stream_bytes);
//! if decoder.error().is_error() {
//!     close_stream(decoder.error().h3_code(), decoder.error_detail());
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod encode;
pub mod error;
pub mod frame;
pub mod parse;
pub mod reader;
pub mod varint;
pub mod visitor;

pub use config::DecoderConfig;
pub use decoder::{decode_settings, HttpDecoder};
pub use error::{Error, ErrorCode, Result};
pub use frame::{
    AcceptChEntry, AcceptChFrame, CancelPushFrame, FrameType, GoAwayFrame, MaxPushIdFrame,
    PayloadStrategy, PriorityUpdateFrame, PushId, SettingsFrame,
};
pub use visitor::Visitor;
