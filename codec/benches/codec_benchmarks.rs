//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Benchmarks for chat codec performance

use bytes::BytesMut;
use chatter_codec::{ChatCodec, InboundEvent, OutboundLine};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use tokio_util::codec::{Decoder, Encoder};

fn transcript(lines: usize) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"SUBMITNAME\nNAMEACCEPTED bench\n");
    for i in 0..lines {
        if i % 10 == 0 {
            data.extend_from_slice(format!("SYSTEM user{} has joined\n", i).as_bytes());
        } else {
            data.extend_from_slice(format!("MESSAGE user{}: hello number {}\n", i % 7, i).as_bytes());
        }
    }
    data
}

fn bench_decode_transcript(c: &mut Criterion) {
    let data = transcript(1000);
    let mut group = c.benchmark_group("decode_transcript");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("1000_lines", |b| {
        b.iter(|| {
            let mut codec = ChatCodec::new();
            let mut buffer = BytesMut::from(&data[..]);
            let mut count = 0;
            while let Some(event) = codec.decode(&mut buffer).unwrap() {
                black_box(&event);
                count += 1;
            }
            count
        });
    });

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    group.bench_function("message", |b| {
        b.iter(|| InboundEvent::classify(black_box("MESSAGE alice: how is everyone")));
    });

    group.bench_function("unrecognized", |b| {
        b.iter(|| InboundEvent::classify(black_box("PING 1234567890")));
    });

    group.finish();
}

fn bench_encode_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_line");

    group.bench_function("short_line", |b| {
        let mut codec = ChatCodec::new();
        let mut buffer = BytesMut::with_capacity(1024);
        let line = OutboundLine::new("hello everyone").unwrap();

        b.iter(|| {
            buffer.clear();
            codec.encode(black_box(&line), &mut buffer).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_decode_transcript,
    bench_classify,
    bench_encode_line
);
criterion_main!(benches);
