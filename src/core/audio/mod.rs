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

//! Audio synthesis and output
//!
//! - [`OscillatorState`]: continuous-phase sine source
//! - [`AudioPipeline`]: per-tick synthesis driven by a [`BackpressurePolicy`]
//! - [`AudioQueue`]: the outbound FIFO, either [`MemoryQueue`] or the `cpal`
//!   backed [`AudioBackend`] (feature `audio`)
//!
//! Samples are interleaved stereo `i16`.

#[cfg(feature = "audio")]
mod backend;
mod oscillator;
mod pipeline;

#[cfg(feature = "audio")]
pub use backend::AudioBackend;
pub use oscillator::{OscillatorState, MIN_TONE_HZ};
pub use pipeline::{AudioPipeline, BackpressurePolicy, BYTES_PER_FRAME, CHANNELS};

use crate::core::error::{FrameError, Result};
use std::collections::VecDeque;

/// Outbound audio FIFO
///
/// The pipeline only appends and queries depth; consumption belongs to the
/// device.
pub trait AudioQueue {
    /// Bytes currently queued and not yet played
    fn queued_bytes(&self) -> usize;

    /// Append interleaved samples
    ///
    /// Either the whole block is accepted or none of it is.
    fn enqueue(&mut self, samples: &[i16]) -> Result<()>;
}

impl<Q: AudioQueue + ?Sized> AudioQueue for Box<Q> {
    fn queued_bytes(&self) -> usize {
        (**self).queued_bytes()
    }

    fn enqueue(&mut self, samples: &[i16]) -> Result<()> {
        (**self).enqueue(samples)
    }
}

/// Bounded in-memory audio queue
///
/// Used for headless runs and tests; [`drain`](Self::drain) plays the part
/// of the device.
#[derive(Debug)]
pub struct MemoryQueue {
    samples: VecDeque<i16>,
    /// Maximum number of queued samples
    capacity: usize,
}

impl MemoryQueue {
    /// Create a queue holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity,
        }
    }

    /// Remove up to `count` samples from the front, as the device would
    pub fn drain(&mut self, count: usize) -> Vec<i16> {
        let count = count.min(self.samples.len());
        self.samples.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl AudioQueue for MemoryQueue {
    fn queued_bytes(&self) -> usize {
        self.samples.len() * std::mem::size_of::<i16>()
    }

    fn enqueue(&mut self, samples: &[i16]) -> Result<()> {
        if self.samples.len() + samples.len() > self.capacity {
            return Err(FrameError::AllocationFailure(format!(
                "audio queue full ({} + {} > {} samples)",
                self.samples.len(),
                samples.len(),
                self.capacity
            )));
        }
        self.samples.extend(samples.iter().copied());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_queue_fifo() {
        let mut queue = MemoryQueue::new(8);
        queue.enqueue(&[1, 2, 3, 4]).unwrap();
        assert_eq!(queue.queued_bytes(), 8);
        assert_eq!(queue.drain(2), vec![1, 2]);
        queue.enqueue(&[5, 6]).unwrap();
        assert_eq!(queue.drain(10), vec![3, 4, 5, 6]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_memory_queue_rejects_overflow_whole() {
        let mut queue = MemoryQueue::new(4);
        queue.enqueue(&[1, 2, 3]).unwrap();
        assert!(matches!(
            queue.enqueue(&[4, 5]),
            Err(FrameError::AllocationFailure(_))
        ));
        assert_eq!(queue.len(), 3);
    }
}
