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

//! Sine oscillator with continuous phase

use std::f64::consts::TAU;

/// Lowest tone the oscillator accepts, in Hz
pub const MIN_TONE_HZ: f32 = 20.0;

/// Sine oscillator state
///
/// Phase is kept in `[0, 2π)` by wrapping after each step. It is never
/// reset; changing the tone only changes the increment applied from the next
/// sample onward, so the waveform stays continuous across frequency changes
/// and across calls.
///
/// # Example
///
/// ```
/// use framebound::core::audio::OscillatorState;
///
/// let mut osc = OscillatorState::new(48_000, 256.0, 3000);
/// assert_eq!(osc.next_sample(), 0); // sin(0)
/// assert!(osc.phase() > 0.0);
/// assert_eq!(osc.running_sample_index(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct OscillatorState {
    /// Output sample rate in Hz
    sample_rate: u32,
    /// Tone frequency in Hz
    tone_hz: f32,
    /// Peak amplitude
    amplitude: i16,
    /// Samples per wave cycle (`sample_rate / tone_hz`)
    wave_period: f64,
    /// Current phase in radians, `[0, 2π)`
    phase: f64,
    /// Samples generated since creation
    running_sample_index: u64,
}

impl OscillatorState {
    /// Create an oscillator at phase 0
    ///
    /// `tone_hz` below [`MIN_TONE_HZ`] is raised to it.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is 0
    pub fn new(sample_rate: u32, tone_hz: f32, amplitude: i16) -> Self {
        assert!(sample_rate > 0, "sample_rate must be greater than 0");
        let mut osc = Self {
            sample_rate,
            tone_hz: MIN_TONE_HZ,
            amplitude,
            wave_period: 0.0,
            phase: 0.0,
            running_sample_index: 0,
        };
        osc.set_tone_hz(tone_hz);
        osc
    }

    /// Change the tone frequency, effective from the next sample
    pub fn set_tone_hz(&mut self, tone_hz: f32) {
        let tone_hz = if tone_hz.is_finite() {
            tone_hz.max(MIN_TONE_HZ)
        } else {
            MIN_TONE_HZ
        };
        if tone_hz != self.tone_hz || self.wave_period == 0.0 {
            self.tone_hz = tone_hz;
            self.wave_period = self.sample_rate as f64 / tone_hz as f64;
        }
    }

    pub fn set_amplitude(&mut self, amplitude: i16) {
        self.amplitude = amplitude;
    }

    /// Produce the next mono sample and advance the phase
    #[inline]
    pub fn next_sample(&mut self) -> i16 {
        let value = (self.phase.sin() * self.amplitude as f64) as i16;
        self.phase = (self.phase + self.phase_increment()).rem_euclid(TAU);
        self.running_sample_index += 1;
        value
    }

    /// Phase advance per sample, `2π / wave_period`
    #[inline(always)]
    pub fn phase_increment(&self) -> f64 {
        TAU / self.wave_period
    }

    #[inline(always)]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn tone_hz(&self) -> f32 {
        self.tone_hz
    }

    pub fn amplitude(&self) -> i16 {
        self.amplitude
    }

    pub fn wave_period(&self) -> f64 {
        self.wave_period
    }

    /// Diagnostic count of generated samples
    pub fn running_sample_index(&self) -> u64 {
        self.running_sample_index
    }
}
