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

//! Frame-loop orchestrator
//!
//! [`FrameLoop`] owns every piece of per-session state (surface, oscillator,
//! input history, control scalars, timing) and sequences one tick:
//!
//! 1. Drain queued platform events (quit ends the tick immediately, resizes
//!    complete synchronously)
//! 2. Sample input and apply the deltas
//! 3. Render the gradient
//! 4. Synthesize and enqueue audio
//! 5. Present the surface
//! 6. Record timing
//!
//! Platform callbacks never touch the surface directly: they
//! [`push_event`](FrameLoop::push_event) and the next tick handles the event
//! before rendering, so render and present in one tick always see the same
//! buffer.
//!
//! # State Machine
//!
//! ```text
//! Uninitialized --start()--> Running --quit/close--> Terminated
//! ```

use crate::core::audio::{AudioPipeline, AudioQueue, OscillatorState};
use crate::core::config::LoopConfig;
use crate::core::control::ControlState;
use crate::core::error::Result;
use crate::core::frame_timer::{FrameStats, FrameTimer};
use crate::core::input::{ControlAction, ControllerSlot, InputSampler, KeyEvent};
use crate::core::render::render_gradient;
use crate::core::surface::{PresentBackend, SurfaceManager};
use std::collections::VecDeque;


/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Uninitialized,
    Running,
    Terminated,
}

/// Event delivered by the platform between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    /// Application-level quit request
    Quit,
    /// The window was closed
    CloseRequested,
    /// The window's drawable area changed
    Resized { width: u32, height: u32 },
    FocusGained,
    FocusLost,
    Key(KeyEvent),
}

/// Frame-loop orchestrator
///
/// # Example
///
/// ```
/// use framebound::core::audio::MemoryQueue;
/// use framebound::core::frame_loop::{FrameLoop, LoopState, PlatformEvent};
/// use framebound::core::surface::MemoryPresenter;
/// use framebound::core::LoopConfig;
///
/// let mut frame_loop = FrameLoop::new(
///     LoopConfig::default(),
///     MemoryPresenter::new(),
///     Some(MemoryQueue::new(48_000 * 2)),
/// )
/// .unwrap();
///
/// assert_eq!(frame_loop.start(), LoopState::Running);
/// assert_eq!(frame_loop.tick(&[]), LoopState::Running);
///
/// frame_loop.push_event(PlatformEvent::Quit);
/// assert_eq!(frame_loop.tick(&[]), LoopState::Terminated);
/// ```
pub struct FrameLoop<B: PresentBackend, Q: AudioQueue> {
    /// Lifecycle state
    state: LoopState,
    /// Session configuration
    config: LoopConfig,
    /// Pixel memory and presentation handle
    surface: SurfaceManager<B>,
    /// Audio device queue, `None` when no device could be opened
    audio_queue: Option<Q>,
    /// Synthesis and backpressure
    pipeline: AudioPipeline,
    /// Tone generator
    oscillator: OscillatorState,
    /// Edge detection history
    sampler: InputSampler,
    /// Offsets and tone
    control: ControlState,
    /// Tick timing
    timer: FrameTimer,
    /// Events waiting for the next tick
    events: VecDeque<PlatformEvent>,
    /// Ticks whose present was skipped
    skipped_presents: u64,
}

impl<B: PresentBackend, Q: AudioQueue> FrameLoop<B, Q> {
    /// Create an orchestrator in the `Uninitialized` state
    ///
    /// Passing `None` for `audio_queue` runs the loop silently.
    ///
    /// # Errors
    ///
    /// `Config` if the configuration fails validation.
    pub fn new(config: LoopConfig, backend: B, audio_queue: Option<Q>) -> Result<Self> {
        config.validate()?;

        if audio_queue.is_none() {
            log::warn!("No audio queue, running silent");
        }

        Ok(Self {
            state: LoopState::Uninitialized,
            surface: SurfaceManager::new(backend),
            audio_queue,
            pipeline: AudioPipeline::new(config.backpressure),
            oscillator: OscillatorState::new(
                config.sample_rate,
                config.tone_hz,
                config.tone_volume,
            ),
            sampler: InputSampler::new(),
            control: ControlState::new(config.tone_hz),
            timer: FrameTimer::new(config.target_fps),
            events: VecDeque::new(),
            skipped_presents: 0,
            config,
        })
    }

    /// Allocate the initial surface and enter `Running`
    ///
    /// A failed allocation does not stop the loop; presentation is skipped
    /// until a resize succeeds.
    pub fn start(&mut self) -> LoopState {
        if self.state != LoopState::Uninitialized {
            log::warn!("start() called in state {:?}", self.state);
            return self.state;
        }

        self.handle_resize(self.config.width, self.config.height);
        self.state = LoopState::Running;
        log::info!(
            "Frame loop running: {}x{}, {} fps, {:?}",
            self.config.width,
            self.config.height,
            self.config.target_fps,
            self.pipeline.policy()
        );
        self.state
    }

    /// Queue a platform event for the next tick
    ///
    /// Events arriving outside `Running` are dropped.
    pub fn push_event(&mut self, event: PlatformEvent) {
        if self.state != LoopState::Running {
            log::debug!("Dropping {:?} in state {:?}", event, self.state);
            return;
        }
        self.events.push_back(event);
    }

    /// Run one tick
    ///
    /// # Arguments
    ///
    /// * `controllers` - This tick's controller slots; missing slots count as
    ///   detached
    ///
    /// # Returns
    ///
    /// The state after the tick. Ticks outside `Running` do nothing.
    pub fn tick(&mut self, controllers: &[ControllerSlot]) -> LoopState {
        if self.state != LoopState::Running {
            return self.state;
        }

        // 1. Events
        while let Some(event) = self.events.pop_front() {
            match event {
                PlatformEvent::Quit | PlatformEvent::CloseRequested => {
                    log::info!("{:?}, terminating", event);
                    return self.terminate();
                }
                PlatformEvent::Resized { width, height } => self.handle_resize(width, height),
                PlatformEvent::FocusGained => log::debug!("Window gained focus"),
                PlatformEvent::FocusLost => {
                    log::debug!("Window lost focus");
                    self.sampler.release_all_keys();
                }
                PlatformEvent::Key(key_event) => {
                    self.sampler.key_event(key_event);
                }
            }
        }

        // 2. Input
        let deltas = self.sampler.sample(controllers);
        if deltas.contains(ControlAction::Quit) {
            log::info!("Quit requested from input, terminating");
            return self.terminate();
        }
        self.control.apply(&deltas);

        // 3. Render
        if let Some(buffer) = self.surface.buffer_mut() {
            render_gradient(buffer, self.control.x_offset(), self.control.y_offset());
        }

        // 4. Audio
        self.synthesize_audio();

        // 5. Present
        self.present();

        // 6. Timing
        let stats = self.timer.tick();
        log::trace!(
            "{:.2}ms/f, {:.1}f/s, {:.2}mc/f",
            stats.frame_time_ms,
            stats.fps,
            stats.mega_cycles
        );

        self.state
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        log::debug!("Window resized: ({} x {})", width, height);
        if let Err(e) = self.surface.resize(width, height) {
            if self.surface.is_valid() {
                log::warn!("Resize to {}x{} failed, keeping previous surface: {}", width, height, e);
            } else {
                log::warn!("Resize to {}x{} failed, presentation disabled: {}", width, height, e);
            }
        }
    }

    fn synthesize_audio(&mut self) {
        let Some(queue) = self.audio_queue.as_mut() else {
            return;
        };

        self.oscillator.set_tone_hz(self.control.tone_hz());
        self.oscillator.set_amplitude(if self.control.is_muted() {
            0
        } else {
            self.config.tone_volume
        });

        match self.pipeline.tick(&mut self.oscillator, queue) {
            Ok(frames) => log::trace!("Queued {} audio frames", frames),
            Err(e) => log::warn!("Audio fill skipped: {}", e),
        }
    }

    fn present(&mut self) {
        if !self.surface.is_valid() {
            self.skipped_presents += 1;
            log::trace!("No valid surface, present skipped");
            return;
        }
        if let Err(e) = self.surface.present() {
            self.skipped_presents += 1;
            log::error!("Present failed, frame skipped: {}", e);
        }
    }

    fn terminate(&mut self) -> LoopState {
        self.events.clear();
        self.state = LoopState::Terminated;
        log::info!(
            "Frame loop terminated after {} ticks",
            self.timer.frame_count()
        );
        self.state
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    pub fn oscillator(&self) -> &OscillatorState {
        &self.oscillator
    }

    pub fn surface(&self) -> &SurfaceManager<B> {
        &self.surface
    }

    pub fn audio_queue(&self) -> Option<&Q> {
        self.audio_queue.as_ref()
    }

    /// Device side of the audio queue (headless runs drain it here)
    pub fn audio_queue_mut(&mut self) -> Option<&mut Q> {
        self.audio_queue.as_mut()
    }

    pub fn frame_timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn last_stats(&self) -> FrameStats {
        self.timer.last_stats()
    }

    /// Ticks that ran without presenting
    pub fn skipped_presents(&self) -> u64 {
        self.skipped_presents
    }
}
