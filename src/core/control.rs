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

//! Per-tick simulation scalars

use crate::core::audio::MIN_TONE_HZ;
use crate::core::input::{ControlAction, ControlDeltas};

/// Scalars driven by input and read by the renderer and audio pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Horizontal scroll (wraps)
    x_offset: i32,
    /// Vertical scroll (wraps)
    y_offset: i32,
    /// Tone with the sticks centred
    base_tone_hz: f32,
    /// Current stick-driven offset from the base tone
    tone_offset_hz: f32,
    /// Audio amplitude forced to 0
    muted: bool,
}

impl ControlState {
    pub fn new(base_tone_hz: f32) -> Self {
        Self {
            x_offset: 0,
            y_offset: 0,
            base_tone_hz,
            tone_offset_hz: 0.0,
            muted: false,
        }
    }

    /// Apply one tick of input
    ///
    /// Discrete actions run first, so a reset in the same tick as stick
    /// movement keeps that tick's movement. `Quit` is left to the caller.
    pub fn apply(&mut self, deltas: &ControlDeltas) {
        for action in &deltas.actions {
            match action {
                ControlAction::ResetOffsets => {
                    self.x_offset = 0;
                    self.y_offset = 0;
                }
                ControlAction::ToggleMute => {
                    self.muted = !self.muted;
                    log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
                }
                ControlAction::Quit => {}
            }
        }

        self.x_offset = self.x_offset.wrapping_add(deltas.x_offset);
        self.y_offset = self.y_offset.wrapping_add(deltas.y_offset);
        self.tone_offset_hz = deltas.tone_offset_hz;
    }

    #[inline(always)]
    pub fn x_offset(&self) -> i32 {
        self.x_offset
    }

    #[inline(always)]
    pub fn y_offset(&self) -> i32 {
        self.y_offset
    }

    /// Effective tone, never below [`MIN_TONE_HZ`]
    pub fn tone_hz(&self) -> f32 {
        (self.base_tone_hz + self.tone_offset_hz).max(MIN_TONE_HZ)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(x: i32, y: i32, tone: f32, actions: Vec<ControlAction>) -> ControlDeltas {
        ControlDeltas {
            x_offset: x,
            y_offset: y,
            tone_offset_hz: tone,
            actions,
        }
    }

    #[test]
    fn test_offsets_accumulate() {
        let mut control = ControlState::new(256.0);
        control.apply(&deltas(3, -2, 0.0, vec![]));
        control.apply(&deltas(3, -2, 0.0, vec![]));
        assert_eq!((control.x_offset(), control.y_offset()), (6, -4));
    }

    #[test]
    fn test_offsets_wrap() {
        let mut control = ControlState::new(256.0);
        control.apply(&deltas(i32::MAX, 0, 0.0, vec![]));
        control.apply(&deltas(1, 0, 0.0, vec![]));
        assert_eq!(control.x_offset(), i32::MIN);
    }

    #[test]
    fn test_tone_override_is_not_cumulative() {
        let mut control = ControlState::new(256.0);
        control.apply(&deltas(0, 0, 100.0, vec![]));
        assert_eq!(control.tone_hz(), 356.0);
        control.apply(&deltas(0, 0, 100.0, vec![]));
        assert_eq!(control.tone_hz(), 356.0);
        control.apply(&deltas(0, 0, 0.0, vec![]));
        assert_eq!(control.tone_hz(), 256.0);
    }

    #[test]
    fn test_tone_floor() {
        let mut control = ControlState::new(256.0);
        control.apply(&deltas(0, 0, -1000.0, vec![]));
        assert_eq!(control.tone_hz(), MIN_TONE_HZ);
    }

    #[test]
    fn test_reset_and_mute() {
        let mut control = ControlState::new(256.0);
        control.apply(&deltas(50, 60, 0.0, vec![]));
        control.apply(&deltas(
            1,
            1,
            0.0,
            vec![ControlAction::ResetOffsets, ControlAction::ToggleMute],
        ));
        assert_eq!((control.x_offset(), control.y_offset()), (1, 1));
        assert!(control.is_muted());

        control.apply(&deltas(0, 0, 0.0, vec![ControlAction::ToggleMute]));
        assert!(!control.is_muted());
    }
}
