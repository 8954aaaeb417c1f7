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

//! Host-memory presentation backend
//!
//! Used for headless runs and tests. Each handle is a byte copy of the last
//! presented frame.

use super::PresentBackend;
use crate::core::error::{FrameError, Result};

/// Presentation handle backed by host memory
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl MemoryHandle {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes of the most recent upload
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Presentation backend that keeps frames in host memory
///
/// # Example
///
/// ```
/// use framebound::core::surface::{MemoryPresenter, SurfaceManager};
///
/// let mut surface = SurfaceManager::new(MemoryPresenter::new());
/// surface.resize(64, 32).unwrap();
/// surface.present().unwrap();
/// assert_eq!(surface.backend().presented_frames(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryPresenter {
    /// Largest handle (in pixels) that can be created, `None` for no limit
    max_pixels: Option<u64>,
    /// Handles created so far
    handles_created: u64,
    /// Frames presented so far
    presented_frames: u64,
    /// Dimensions of the last presented frame
    last_presented: Option<(u32, u32)>,
}

impl MemoryPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a presenter that refuses handles larger than `max_pixels`
    ///
    /// Stands in for a device that runs out of texture memory.
    pub fn with_limit(max_pixels: u64) -> Self {
        Self {
            max_pixels: Some(max_pixels),
            ..Self::default()
        }
    }

    pub fn handles_created(&self) -> u64 {
        self.handles_created
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    pub fn last_presented(&self) -> Option<(u32, u32)> {
        self.last_presented
    }
}

impl PresentBackend for MemoryPresenter {
    type Handle = MemoryHandle;

    fn create_handle(&mut self, width: u32, height: u32) -> Result<MemoryHandle> {
        let pixels = width as u64 * height as u64;
        if let Some(max) = self.max_pixels {
            if pixels > max {
                return Err(FrameError::AllocationFailure(format!(
                    "{}x{} handle exceeds {} pixel limit",
                    width, height, max
                )));
            }
        }

        self.handles_created += 1;
        Ok(MemoryHandle {
            width,
            height,
            pixels: vec![0; pixels as usize * 4],
        })
    }

    fn present(&mut self, handle: &mut MemoryHandle, pixels: &[u8], pitch: usize) -> Result<()> {
        if pitch != handle.width as usize * 4 || pixels.len() != handle.pixels.len() {
            return Err(FrameError::InvalidDimensions {
                width: (pitch / 4) as u32,
                height: (pixels.len() / pitch.max(1)) as u32,
            });
        }

        handle.pixels.copy_from_slice(pixels);
        self.presented_frames += 1;
        self.last_presented = Some((handle.width, handle.height));
        Ok(())
    }
}
