// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Gradient fill and audio block throughput

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use framebound::core::audio::{AudioPipeline, BackpressurePolicy, MemoryQueue, OscillatorState};
use framebound::core::render::render_gradient;
use framebound::core::surface::SurfaceBuffer;
use std::hint::black_box;

fn bench_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_gradient");

    for (width, height) in [(640u32, 480u32), (1280, 720), (1920, 1080)] {
        let mut buffer = SurfaceBuffer::new(width, height).unwrap();
        group.throughput(Throughput::Bytes(buffer.len_bytes() as u64));

        let mut offset = 0i32;
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &(width, height),
            |b, _| {
                b.iter(|| {
                    offset = offset.wrapping_add(3);
                    render_gradient(black_box(&mut buffer), offset, -offset);
                });
            },
        );
    }

    group.finish();
}

fn bench_audio_fill(c: &mut Criterion) {
    let mut osc = OscillatorState::new(48_000, 256.0, 3000);
    let mut pipeline = AudioPipeline::new(BackpressurePolicy::default());
    let mut queue = MemoryQueue::new(48_000 * 2);

    // One 60 Hz tick's worth of stereo frames
    c.bench_function("fill_and_enqueue_800", |b| {
        b.iter(|| {
            pipeline
                .fill_and_enqueue(&mut osc, black_box(800), &mut queue)
                .unwrap();
            queue.drain(usize::MAX);
        });
    });
}

criterion_group!(benches, bench_gradient, bench_audio_fill);
criterion_main!(benches);
