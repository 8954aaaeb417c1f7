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

//! Frame timing module
//!
//! Measures each tick with a high-resolution clock and the CPU cycle counter,
//! and tells the event loop when the next tick is due. The measurements are
//! observational only; nothing in the tick depends on them.

use std::time::{Duration, Instant};

/// Read the CPU timestamp counter
///
/// Returns 0 on targets without one.
#[inline(always)]
pub fn read_cycle_counter() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        // SAFETY: rdtsc has no preconditions and is available on every x86_64 CPU
        unsafe { std::arch::x86_64::_rdtsc() }
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        0
    }
}

/// Measurements for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Wall time since the previous tick, in milliseconds
    pub frame_time_ms: f32,
    /// Most recent frames-per-second reading (updated about once a second)
    pub fps: f32,
    /// CPU cycles since the previous tick, in millions
    pub mega_cycles: f32,
}

/// Frame timer
///
/// Tracks the previous tick's instant and cycle counter, and paces ticks at
/// the target rate.
///
/// # Example
///
/// ```
/// use framebound::core::FrameTimer;
///
/// let mut timer = FrameTimer::new(60);
/// let stats = timer.tick();
/// assert_eq!(timer.frame_count(), 1);
/// assert!(stats.frame_time_ms >= 0.0);
/// ```
pub struct FrameTimer {
    /// Target time between ticks
    target_frame_time: Duration,
    /// Time of the previous tick
    last_frame: Instant,
    /// Cycle counter at the previous tick
    last_cycles: u64,
    /// Total number of ticks recorded
    frame_count: u64,
    /// Current FPS (frames per second)
    fps: f32,
    /// Statistics of the most recent tick
    last_stats: FrameStats,
    /// Time when FPS calculation started
    fps_start: Instant,
    /// Frames since last FPS calculation
    fps_frame_count: u64,
}

impl FrameTimer {
    /// Create a new FrameTimer
    ///
    /// # Panics
    ///
    /// Panics if `target_fps` is 0
    pub fn new(target_fps: u32) -> Self {
        assert!(target_fps > 0, "target_fps must be greater than 0");
        let target_frame_time = Duration::from_nanos(1_000_000_000 / target_fps as u64);
        let now = Instant::now();

        Self {
            target_frame_time,
            last_frame: now,
            last_cycles: read_cycle_counter(),
            frame_count: 0,
            fps: 0.0,
            last_stats: FrameStats::default(),
            fps_start: now,
            fps_frame_count: 0,
        }
    }

    /// Record the end of a tick
    ///
    /// FPS is recomputed approximately once per second for a stable reading.
    pub fn tick(&mut self) -> FrameStats {
        let now = Instant::now();
        let cycles = read_cycle_counter();
        let elapsed = now.duration_since(self.last_frame);

        self.frame_count += 1;
        self.fps_frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_start);
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_start = now;
        }

        self.last_stats = FrameStats {
            frame_time_ms: elapsed.as_secs_f32() * 1000.0,
            fps: self.fps,
            mega_cycles: cycles.wrapping_sub(self.last_cycles) as f32 / 1_000_000.0,
        };

        self.last_frame = now;
        self.last_cycles = cycles;
        self.last_stats
    }

    /// True once the target frame time has passed since the previous tick
    #[inline(always)]
    pub fn should_run_frame(&self) -> bool {
        Instant::now().duration_since(self.last_frame) >= self.target_frame_time
    }

    /// Instant the next tick is due
    #[inline(always)]
    pub fn next_frame_instant(&self) -> Instant {
        self.last_frame + self.target_frame_time
    }

    #[inline(always)]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline(always)]
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    #[inline(always)]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_frame_timer_new() {
        let timer = FrameTimer::new(60);
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.last_stats(), FrameStats::default());
        assert_eq!(timer.frame_count(), 0);
    }

    #[test]
    fn test_frame_timer_tick() {
        let mut timer = FrameTimer::new(60);

        // Wait a bit to ensure measurable time
        thread::sleep(Duration::from_millis(20));

        let stats = timer.tick();
        assert_eq!(timer.frame_count(), 1);
        assert!(stats.frame_time_ms >= 20.0);
        assert_eq!(timer.last_stats(), stats);
    }

    #[test]
    fn test_frame_timer_pacing() {
        let mut timer = FrameTimer::new(60);
        let before = Instant::now();
        timer.tick();
        assert!(timer.next_frame_instant() >= before + Duration::from_millis(16));

        thread::sleep(Duration::from_millis(20));
        assert!(timer.should_run_frame());
    }

    #[test]
    fn test_frame_timer_fps_calculation() {
        let mut timer = FrameTimer::new(60);

        // 17ms * 60 = 1020ms, past the one second window
        for _ in 0..60 {
            thread::sleep(Duration::from_millis(17));
            timer.tick();
        }

        assert!(timer.fps() > 0.0);
        assert_eq!(timer.frame_count(), 60);
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_cycle_counter_advances() {
        let a = read_cycle_counter();
        thread::sleep(Duration::from_millis(1));
        assert!(read_cycle_counter() > a);
    }

    #[test]
    #[should_panic(expected = "target_fps must be greater than 0")]
    fn test_zero_fps_panics() {
        let _ = FrameTimer::new(0);
    }
}
