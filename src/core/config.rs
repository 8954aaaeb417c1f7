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

//! Frame loop configuration
//!
//! Loaded from TOML; any field left out takes its default.
//!
//! ```toml
//! width = 1280
//! height = 720
//! tone_hz = 440.0
//! tick_mode = "continuous"
//!
//! [backpressure]
//! kind = "latency_target"
//! latency_divisor = 15
//! ```

use crate::core::audio::BackpressurePolicy;
use crate::core::error::{FrameError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the event loop schedules ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    /// Wake at every frame deadline, input or not (needed for audio)
    #[default]
    Continuous,
    /// Block until the platform delivers an event, tick once per wake
    OnEvent,
}

/// Frame loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Initial window width in pixels
    pub width: u32,
    /// Initial window height in pixels
    pub height: u32,
    /// Target ticks per second
    pub target_fps: u32,
    /// Audio sample rate in Hz
    pub sample_rate: u32,
    /// Base tone frequency in Hz
    pub tone_hz: f32,
    /// Peak sample amplitude
    pub tone_volume: i16,
    /// Audio queue refill policy for the whole session
    pub backpressure: BackpressurePolicy,
    /// Event loop scheduling
    pub tick_mode: TickMode,
    /// Open an audio device at all
    pub audio_enabled: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            target_fps: 60,
            sample_rate: 48_000,
            tone_hz: 256.0,
            tone_volume: 3000,
            backpressure: BackpressurePolicy::default(),
            tick_mode: TickMode::default(),
            audio_enabled: true,
        }
    }
}

impl LoopConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents).map_err(|e| {
            FrameError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| FrameError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.target_fps == 0 {
            return Err(FrameError::Config(
                "target_fps must be greater than 0".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(FrameError::Config(
                "sample_rate must be greater than 0".to_string(),
            ));
        }
        if !self.tone_hz.is_finite() || self.tone_hz <= 0.0 {
            return Err(FrameError::Config(format!(
                "tone_hz must be positive, got {}",
                self.tone_hz
            )));
        }
        self.backpressure.validate()
    }
}
