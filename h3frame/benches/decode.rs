//! Frame decoding throughput benchmarks.
//!
//! Compares feeding a request stream in one call against feeding it in small
//! chunks, which forces the partial-field and accumulation paths.

use bytes::BytesMut;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use h3frame::encode::*;
use h3frame::*;

/// Visitor that touches every event and never pauses.
#[derive(Default)]
struct CountingVisitor {
    frames: u64,
    payload_bytes: u64,
}

impl Visitor for CountingVisitor {
    fn on_error(&mut self, _error: &Error) {}
    fn on_cancel_push_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_cancel_push_frame(&mut self, _frame: &CancelPushFrame) -> bool {
        self.frames += 1;
        true
    }
    fn on_max_push_id_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_max_push_id_frame(&mut self, _frame: &MaxPushIdFrame) -> bool {
        self.frames += 1;
        true
    }
    fn on_goaway_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_goaway_frame(&mut self, _frame: &GoAwayFrame) -> bool {
        self.frames += 1;
        true
    }
    fn on_settings_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_settings_frame(&mut self, frame: &SettingsFrame) -> bool {
        self.frames += frame.values.len() as u64;
        true
    }
    fn on_data_frame_start(&mut self, _header_length: u64, _payload_length: u64) -> bool {
        true
    }
    fn on_data_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.payload_bytes += payload.len() as u64;
        true
    }
    fn on_data_frame_end(&mut self) -> bool {
        self.frames += 1;
        true
    }
    fn on_headers_frame_start(&mut self, _header_length: u64, _payload_length: u64) -> bool {
        true
    }
    fn on_headers_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.payload_bytes += payload.len() as u64;
        true
    }
    fn on_headers_frame_end(&mut self) -> bool {
        self.frames += 1;
        true
    }
    fn on_push_promise_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_push_promise_frame_push_id(&mut self, _id: PushId, _len: u64, _block: u64) -> bool {
        true
    }
    fn on_push_promise_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.payload_bytes += payload.len() as u64;
        true
    }
    fn on_push_promise_frame_end(&mut self) -> bool {
        self.frames += 1;
        true
    }
    fn on_priority_update_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_priority_update_frame(&mut self, _frame: &PriorityUpdateFrame) -> bool {
        self.frames += 1;
        true
    }
    fn on_accept_ch_frame_start(&mut self, _header_length: u64) -> bool {
        true
    }
    fn on_accept_ch_frame(&mut self, _frame: &AcceptChFrame) -> bool {
        self.frames += 1;
        true
    }
    fn on_unknown_frame_start(&mut self, _ty: u64, _header: u64, _payload: u64) -> bool {
        true
    }
    fn on_unknown_frame_payload(&mut self, payload: &[u8]) -> bool {
        self.payload_bytes += payload.len() as u64;
        true
    }
    fn on_unknown_frame_end(&mut self) -> bool {
        self.frames += 1;
        true
    }
}

fn request_stream() -> BytesMut {
    let mut buf = BytesMut::new();
    write_settings(
        &SettingsFrame {
            values: vec![(0x01, 4096), (0x06, 16384), (0x07, 100)],
        },
        &mut buf,
    );
    write_headers(&[0u8; 120], &mut buf);
    for _ in 0..64 {
        write_data(&[0xab; 1200], &mut buf);
    }
    write_frame(0x21, b"grease", &mut buf);
    write_headers(&[0u8; 40], &mut buf);
    buf
}

fn bench_decode(c: &mut Criterion) {
    let stream = request_stream();
    let mut group = c.benchmark_group("http_decoder");
    group.throughput(Throughput::Bytes(stream.len() as u64));

    for chunk_size in [1usize, 7, 64, 1350, stream.len()] {
        group.bench_with_input(
            BenchmarkId::new("chunked", chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut visitor = CountingVisitor::default();
                    let mut decoder = HttpDecoder::new(&mut visitor);
                    for chunk in stream.chunks(chunk_size) {
                        decoder.process_input(black_box(chunk));
                    }
                    black_box(visitor.payload_bytes)
                });
            },
        );
    }

    group.finish();
}

fn bench_decode_settings(c: &mut Criterion) {
    let mut buf = BytesMut::new();
    write_settings(
        &SettingsFrame {
            values: (0..32).map(|i| (i, i * 1000)).collect(),
        },
        &mut buf,
    );

    c.bench_function("decode_settings", |b| {
        b.iter(|| decode_settings(black_box(&buf)))
    });
}

criterion_group!(benches, bench_decode, bench_decode_settings);
criterion_main!(benches);
