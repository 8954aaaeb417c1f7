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

//! cpal audio output
//!
//! The frame loop appends to a shared FIFO; the cpal callback pops from it on
//! the device thread and plays silence on underrun.

use super::{AudioQueue, CHANNELS};
use crate::core::error::{FrameError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type SharedQueue = Arc<Mutex<VecDeque<i16>>>;

/// Audio output backend
///
/// Owns the output stream; dropping it stops playback.
pub struct AudioBackend {
    /// Samples waiting for the device
    queue: SharedQueue,
    /// Maximum queued samples
    capacity: usize,
    /// Output sample rate in Hz
    sample_rate: u32,
    _stream: cpal::Stream,
}

impl AudioBackend {
    /// Open the default output device as a stereo stream at `sample_rate`
    ///
    /// The queue holds up to one second of audio.
    ///
    /// # Errors
    ///
    /// `DeviceUnavailable` if there is no output device or the stream cannot
    /// be built or started.
    pub fn new(sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        log::info!("Audio host: {:?}", host.id());

        let device = host
            .default_output_device()
            .ok_or_else(|| FrameError::DeviceUnavailable("no audio output device".to_string()))?;
        if let Ok(name) = device.name() {
            log::info!("Audio device: {}", name);
        }

        let default_config = device
            .default_output_config()
            .map_err(|e| FrameError::DeviceUnavailable(format!("no output config: {}", e)))?;

        let config = cpal::StreamConfig {
            channels: CHANNELS as cpal::ChannelCount,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity = sample_rate as usize * CHANNELS;
        let queue: SharedQueue = Arc::new(Mutex::new(VecDeque::with_capacity(capacity)));

        let stream = match default_config.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, queue.clone()),
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, queue.clone()),
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, queue.clone()),
            format => {
                return Err(FrameError::DeviceUnavailable(format!(
                    "unsupported sample format {:?}",
                    format
                )))
            }
        }?;

        stream
            .play()
            .map_err(|e| FrameError::DeviceUnavailable(format!("failed to start stream: {}", e)))?;

        log::info!(
            "Audio stream started: {} Hz, {} channels",
            sample_rate,
            CHANNELS
        );

        Ok(Self {
            queue,
            capacity,
            sample_rate,
            _stream: stream,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        queue: SharedQueue,
    ) -> Result<cpal::Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<i16>,
    {
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let mut underrun = false;
                    match queue.lock() {
                        Ok(mut queue) => {
                            for out in data.iter_mut() {
                                let sample = queue.pop_front().unwrap_or_else(|| {
                                    underrun = true;
                                    0
                                });
                                *out = T::from_sample(sample);
                            }
                        }
                        Err(_) => {
                            for out in data.iter_mut() {
                                *out = T::from_sample(0i16);
                            }
                        }
                    }
                    if underrun {
                        log::trace!("Audio underrun ({} samples requested)", data.len());
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| FrameError::DeviceUnavailable(format!("failed to build stream: {}", e)))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioQueue for AudioBackend {
    fn queued_bytes(&self) -> usize {
        self.queue
            .lock()
            .map(|q| q.len() * std::mem::size_of::<i16>())
            .unwrap_or(0)
    }

    fn enqueue(&mut self, samples: &[i16]) -> Result<()> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| FrameError::DeviceUnavailable("audio queue poisoned".to_string()))?;

        if queue.len() + samples.len() > self.capacity {
            return Err(FrameError::AllocationFailure(format!(
                "audio queue full ({} + {} > {} samples)",
                queue.len(),
                samples.len(),
                self.capacity
            )));
        }
        queue.extend(samples.iter().copied());
        Ok(())
    }
}
