//! Visitor that prints one line per decoder event.

use std::fmt;
use std::io::{self, Write};

use h3frame::{
    AcceptChFrame, CancelPushFrame, Error, GoAwayFrame, MaxPushIdFrame, PriorityUpdateFrame,
    PushId, SettingsFrame, Visitor,
};

const PREVIEW_BYTES: usize = 16;

/// Writes events to `out`. A failed write pauses the decoder; the error is
/// kept until [`take_io_error`](PrintingVisitor::take_io_error).
pub struct PrintingVisitor<W> {
    out: W,
    io_error: Option<io::Error>,
}

impl<W: Write> PrintingVisitor<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            io_error: None,
        }
    }

    pub fn failed(&self) -> bool {
        self.io_error.is_some()
    }

    pub fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) -> bool {
        if self.io_error.is_some() {
            return false;
        }
        match self.out.write_fmt(args).and_then(|_| self.out.write_all(b"\n")) {
            Ok(()) => true,
            Err(e) => {
                self.io_error = Some(e);
                false
            }
        }
    }

    fn payload(&mut self, kind: &str, payload: &[u8]) -> bool {
        self.emit(format_args!(
            "{} payload {} bytes: {}",
            kind,
            payload.len(),
            Preview(payload)
        ))
    }
}

struct Preview<'a>(&'a [u8]);

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter().take(PREVIEW_BYTES) {
            write!(f, "{:02x}", b)?;
        }
        if self.0.len() > PREVIEW_BYTES {
            write!(f, "..")?;
        }
        Ok(())
    }
}

impl<W: Write> Visitor for PrintingVisitor<W> {
    fn on_error(&mut self, error: &Error) {
        self.emit(format_args!(
            "ERROR {} (h3 code {:#06x}): {}",
            error.code(),
            error.code().h3_code(),
            error.detail()
        ));
    }

    fn on_cancel_push_frame_start(&mut self, header_length: u64) -> bool {
        self.emit(format_args!("CANCEL_PUSH start header_length={}", header_length))
    }

    fn on_cancel_push_frame(&mut self, frame: &CancelPushFrame) -> bool {
        self.emit(format_args!("CANCEL_PUSH push_id={}", frame.push_id))
    }

    fn on_max_push_id_frame_start(&mut self, header_length: u64) -> bool {
        self.emit(format_args!("MAX_PUSH_ID start header_length={}", header_length))
    }

    fn on_max_push_id_frame(&mut self, frame: &MaxPushIdFrame) -> bool {
        self.emit(format_args!("MAX_PUSH_ID push_id={}", frame.push_id))
    }

    fn on_goaway_frame_start(&mut self, header_length: u64) -> bool {
        self.emit(format_args!("GOAWAY start header_length={}", header_length))
    }

    fn on_goaway_frame(&mut self, frame: &GoAwayFrame) -> bool {
        self.emit(format_args!("GOAWAY id={}", frame.id))
    }

    fn on_settings_frame_start(&mut self, header_length: u64) -> bool {
        self.emit(format_args!("SETTINGS start header_length={}", header_length))
    }

    fn on_settings_frame(&mut self, frame: &SettingsFrame) -> bool {
        if !self.emit(format_args!("SETTINGS {} entries", frame.values.len())) {
            return false;
        }
        for (id, value) in &frame.values {
            if !self.emit(format_args!("  {:#x} = {}", id, value)) {
                return false;
            }
        }
        true
    }

    fn on_data_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool {
        self.emit(format_args!(
            "DATA start header_length={} payload_length={}",
            header_length, payload_length
        ))
    }

    fn on_data_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.payload("DATA", payload)
    }

    fn on_data_frame_end(&mut self) -> bool {
        self.emit(format_args!("DATA end"))
    }

    fn on_headers_frame_start(&mut self, header_length: u64, payload_length: u64) -> bool {
        self.emit(format_args!(
            "HEADERS start header_length={} payload_length={}",
            header_length, payload_length
        ))
    }

    fn on_headers_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.payload("HEADERS", payload)
    }

    fn on_headers_frame_end(&mut self) -> bool {
        self.emit(format_args!("HEADERS end"))
    }

    fn on_push_promise_frame_start(&mut self, header_length: u64) -> bool {
        self.emit(format_args!("PUSH_PROMISE start header_length={}", header_length))
    }

    fn on_push_promise_frame_push_id(
        &mut self,
        push_id: PushId,
        push_id_length: u64,
        header_block_length: u64,
    ) -> bool {
        self.emit(format_args!(
            "PUSH_PROMISE push_id={} push_id_length={} header_block_length={}",
            push_id, push_id_length, header_block_length
        ))
    }

    fn on_push_promise_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.payload("PUSH_PROMISE", payload)
    }

    fn on_push_promise_frame_end(&mut self) -> bool {
        self.emit(format_args!("PUSH_PROMISE end"))
    }

    fn on_priority_update_frame_start(&mut self, header_length: u64) -> bool {
        self.emit(format_args!("PRIORITY_UPDATE start header_length={}", header_length))
    }

    fn on_priority_update_frame(&mut self, frame: &PriorityUpdateFrame) -> bool {
        self.emit(format_args!(
            "PRIORITY_UPDATE element={} value={:?}",
            frame.prioritized_element_id,
            String::from_utf8_lossy(&frame.priority_field_value)
        ))
    }

    fn on_accept_ch_frame_start(&mut self, header_length: u64) -> bool {
        self.emit(format_args!("ACCEPT_CH start header_length={}", header_length))
    }

    fn on_accept_ch_frame(&mut self, frame: &AcceptChFrame) -> bool {
        if !self.emit(format_args!("ACCEPT_CH {} entries", frame.entries.len())) {
            return false;
        }
        for entry in &frame.entries {
            if !self.emit(format_args!(
                "  {:?} = {:?}",
                String::from_utf8_lossy(&entry.origin),
                String::from_utf8_lossy(&entry.value)
            )) {
                return false;
            }
        }
        true
    }

    fn on_unknown_frame_start(
        &mut self,
        frame_type: u64,
        header_length: u64,
        payload_length: u64,
    ) -> bool {
        self.emit(format_args!(
            "UNKNOWN({:#x}) start header_length={} payload_length={}",
            frame_type, header_length, payload_length
        ))
    }

    fn on_unknown_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.payload("UNKNOWN", payload)
    }

    fn on_unknown_frame_end(&mut self) -> bool {
        self.emit(format_args!("UNKNOWN end"))
    }
}
