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

//! Audio synthesis and queuing
//!
//! Once per tick the pipeline asks its [`BackpressurePolicy`] how many stereo
//! frames to produce, pulls them from the oscillator and appends them to the
//! device queue.

use super::oscillator::OscillatorState;
use super::AudioQueue;
use crate::core::error::{FrameError, Result};
use serde::{Deserialize, Serialize};

/// Output channels (mono source duplicated to a stereo sink)
pub const CHANNELS: usize = 2;

/// Bytes per stereo frame of `i16` samples
pub const BYTES_PER_FRAME: usize = CHANNELS * std::mem::size_of::<i16>();

/// How many frames to request each tick
///
/// A session uses exactly one policy; the loop never switches between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackpressurePolicy {
    /// Keep `1 / latency_divisor` seconds queued, requesting the shortfall
    LatencyTarget { latency_divisor: u32 },
    /// One video frame's worth of audio every tick
    FixedChunk { frames_per_second: u32 },
}

impl Default for BackpressurePolicy {
    fn default() -> Self {
        Self::LatencyTarget { latency_divisor: 15 }
    }
}

impl BackpressurePolicy {
    /// Number of stereo frames to synthesize this tick
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Output sample rate in Hz
    /// * `queued_bytes` - Bytes currently waiting in the device queue
    ///
    /// # Example
    ///
    /// ```
    /// use framebound::core::audio::BackpressurePolicy;
    ///
    /// let policy = BackpressurePolicy::LatencyTarget { latency_divisor: 15 };
    /// // 48000 / 15 = 3200 frames target, 1000 frames (4000 bytes) queued
    /// assert_eq!(policy.frames_to_request(48_000, 4000), 2200);
    /// ```
    pub fn frames_to_request(&self, sample_rate: u32, queued_bytes: usize) -> usize {
        match *self {
            Self::LatencyTarget { latency_divisor } => {
                let target_bytes =
                    sample_rate as usize * BYTES_PER_FRAME / latency_divisor.max(1) as usize;
                target_bytes.saturating_sub(queued_bytes) / BYTES_PER_FRAME
            }
            Self::FixedChunk { frames_per_second } => {
                sample_rate as usize / frames_per_second.max(1) as usize
            }
        }
    }

    /// Reject policies that would divide by zero
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::LatencyTarget { latency_divisor: 0 } => Err(FrameError::Config(
                "latency_divisor must be greater than 0".to_string(),
            )),
            Self::FixedChunk {
                frames_per_second: 0,
            } => Err(FrameError::Config(
                "frames_per_second must be greater than 0".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Audio synthesis and queuing pipeline
///
/// # Example
///
/// ```
/// use framebound::core::audio::{
///     AudioPipeline, AudioQueue, BackpressurePolicy, MemoryQueue, OscillatorState,
/// };
///
/// let mut osc = OscillatorState::new(48_000, 256.0, 3000);
/// let mut queue = MemoryQueue::new(48_000 * 2);
/// let mut pipeline = AudioPipeline::new(BackpressurePolicy::default());
///
/// let frames = pipeline.fill_and_enqueue(&mut osc, 800, &mut queue).unwrap();
/// assert_eq!(frames, 800);
/// assert_eq!(queue.queued_bytes(), 800 * 4);
/// ```
pub struct AudioPipeline {
    /// Session backpressure policy
    policy: BackpressurePolicy,
    /// Interleaved scratch block, reused across ticks
    scratch: Vec<i16>,
    /// Frames enqueued since creation
    frames_enqueued: u64,
}

impl AudioPipeline {
    pub fn new(policy: BackpressurePolicy) -> Self {
        Self {
            policy,
            scratch: Vec::new(),
            frames_enqueued: 0,
        }
    }

    pub fn policy(&self) -> BackpressurePolicy {
        self.policy
    }

    pub fn frames_enqueued(&self) -> u64 {
        self.frames_enqueued
    }

    /// Generate `sample_count` stereo frames and append them to `queue`
    ///
    /// A zero count is a no-op: nothing is enqueued and the phase does not
    /// move.
    ///
    /// # Returns
    ///
    /// Number of frames enqueued
    ///
    /// # Errors
    ///
    /// `AllocationFailure` if the scratch block cannot grow, or whatever the
    /// queue reports. On error the oscillator is left as it was.
    pub fn fill_and_enqueue(
        &mut self,
        oscillator: &mut OscillatorState,
        sample_count: usize,
        queue: &mut dyn AudioQueue,
    ) -> Result<usize> {
        if sample_count == 0 {
            return Ok(0);
        }

        let len = sample_count * CHANNELS;
        self.scratch.clear();
        self.scratch.try_reserve(len).map_err(|e| {
            FrameError::AllocationFailure(format!("{} frame audio block: {}", sample_count, e))
        })?;

        // Rejected blocks must not move the phase
        let checkpoint = oscillator.clone();
        for _ in 0..sample_count {
            let value = oscillator.next_sample();
            self.scratch.push(value); // left
            self.scratch.push(value); // right
        }

        if let Err(e) = queue.enqueue(&self.scratch) {
            *oscillator = checkpoint;
            return Err(e);
        }
        self.frames_enqueued += sample_count as u64;
        Ok(sample_count)
    }

    /// Ask the policy for this tick's frame count, then fill and enqueue
    pub fn tick(
        &mut self,
        oscillator: &mut OscillatorState,
        queue: &mut dyn AudioQueue,
    ) -> Result<usize> {
        let count = self
            .policy
            .frames_to_request(oscillator.sample_rate(), queue.queued_bytes());
        self.fill_and_enqueue(oscillator, count, queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::MemoryQueue;

    /// Queue that records every call
    #[derive(Default)]
    struct RecordingQueue {
        calls: usize,
        samples: Vec<i16>,
    }

    impl AudioQueue for RecordingQueue {
        fn queued_bytes(&self) -> usize {
            self.samples.len() * std::mem::size_of::<i16>()
        }

        fn enqueue(&mut self, samples: &[i16]) -> Result<()> {
            self.calls += 1;
            self.samples.extend_from_slice(samples);
            Ok(())
        }
    }

    #[test]
    fn test_zero_sample_fill_is_noop() {
        let mut osc = OscillatorState::new(48_000, 256.0, 3000);
        let mut queue = RecordingQueue::default();
        let mut pipeline = AudioPipeline::new(BackpressurePolicy::default());

        assert_eq!(pipeline.fill_and_enqueue(&mut osc, 0, &mut queue).unwrap(), 0);
        assert_eq!(queue.calls, 0);
        assert_eq!(osc.phase(), 0.0);
        assert_eq!(osc.running_sample_index(), 0);
    }

    #[test]
    fn test_stereo_duplication() {
        let mut osc = OscillatorState::new(48_000, 256.0, 3000);
        let mut queue = RecordingQueue::default();
        let mut pipeline = AudioPipeline::new(BackpressurePolicy::default());

        pipeline.fill_and_enqueue(&mut osc, 500, &mut queue).unwrap();
        assert_eq!(queue.calls, 1);
        assert_eq!(queue.samples.len(), 1000);
        for frame in queue.samples.chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(queue.samples.iter().any(|&s| s != 0));
    }

    #[test]
    fn test_split_fills_match_single_fill() {
        let mut pipeline = AudioPipeline::new(BackpressurePolicy::default());

        let mut osc_a = OscillatorState::new(48_000, 256.0, 3000);
        let mut single = RecordingQueue::default();
        pipeline.fill_and_enqueue(&mut osc_a, 1700, &mut single).unwrap();

        let mut osc_b = OscillatorState::new(48_000, 256.0, 3000);
        let mut split = RecordingQueue::default();
        pipeline.fill_and_enqueue(&mut osc_b, 613, &mut split).unwrap();
        pipeline.fill_and_enqueue(&mut osc_b, 1087, &mut split).unwrap();

        assert_eq!(single.samples, split.samples);
        assert_eq!(osc_a.phase(), osc_b.phase());
        assert_eq!(pipeline.frames_enqueued(), 3400);
    }

    #[test]
    fn test_rejected_fill_keeps_phase_continuous() {
        let mut osc = OscillatorState::new(48_000, 256.0, 3000);
        let mut queue = MemoryQueue::new(2000);
        let mut pipeline = AudioPipeline::new(BackpressurePolicy::default());

        pipeline.fill_and_enqueue(&mut osc, 800, &mut queue).unwrap();
        let phase = osc.phase();
        let index = osc.running_sample_index();

        // 1600 + 1600 samples exceeds the 2000 sample queue
        assert!(pipeline.fill_and_enqueue(&mut osc, 800, &mut queue).is_err());
        assert_eq!(osc.phase(), phase);
        assert_eq!(osc.running_sample_index(), index);
        assert_eq!(pipeline.frames_enqueued(), 800);

        // The next accepted block continues exactly where the last one ended
        let mut played = queue.drain(usize::MAX);
        pipeline.fill_and_enqueue(&mut osc, 100, &mut queue).unwrap();
        played.extend(queue.drain(usize::MAX));

        let mut reference = OscillatorState::new(48_000, 256.0, 3000);
        let expected: Vec<i16> = (0..900)
            .flat_map(|_| {
                let value = reference.next_sample();
                [value, value]
            })
            .collect();
        assert_eq!(played, expected);
    }

    #[test]
    fn test_latency_target_requests_shortfall() {
        let policy = BackpressurePolicy::LatencyTarget { latency_divisor: 15 };
        // 48000 * 4 / 15 = 12800 bytes = 3200 frames
        assert_eq!(policy.frames_to_request(48_000, 0), 3200);
        assert_eq!(policy.frames_to_request(48_000, 12_000), 200);
        assert_eq!(policy.frames_to_request(48_000, 12_800), 0);
        assert_eq!(policy.frames_to_request(48_000, 50_000), 0);
    }

    #[test]
    fn test_fixed_chunk_ignores_queue_depth() {
        let policy = BackpressurePolicy::FixedChunk {
            frames_per_second: 60,
        };
        assert_eq!(policy.frames_to_request(48_000, 0), 800);
        assert_eq!(policy.frames_to_request(48_000, 1_000_000), 800);
    }

    #[test]
    fn test_policy_validation() {
        assert!(BackpressurePolicy::default().validate().is_ok());
        assert!(BackpressurePolicy::LatencyTarget { latency_divisor: 0 }
            .validate()
            .is_err());
        assert!(BackpressurePolicy::FixedChunk {
            frames_per_second: 0
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_tick_tops_up_to_target() {
        let mut osc = OscillatorState::new(48_000, 256.0, 3000);
        let mut queue = MemoryQueue::new(48_000 * 2);
        let mut pipeline = AudioPipeline::new(BackpressurePolicy::default());

        assert_eq!(pipeline.tick(&mut osc, &mut queue).unwrap(), 3200);
        // Queue full to target, nothing more this tick
        assert_eq!(pipeline.tick(&mut osc, &mut queue).unwrap(), 0);

        // Device consumes 800 frames, next tick replaces exactly those
        queue.drain(800 * CHANNELS);
        assert_eq!(pipeline.tick(&mut osc, &mut queue).unwrap(), 800);
        assert_eq!(queue.queued_bytes(), 3200 * BYTES_PER_FRAME);
    }
}
