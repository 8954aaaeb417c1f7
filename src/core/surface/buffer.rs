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

//! CPU-side pixel memory
//!
//! Pixels are packed 32-bit values stored in native byte order. On the
//! little-endian targets we present from, a pixel `0x00RRGGBB` lands in
//! memory as `BB GG RR 00`, which is exactly the `Bgra8Unorm` layout.

use crate::core::error::{FrameError, Result};

/// Owned pixel buffer with row stride invariants
///
/// The buffer always satisfies:
/// - `pitch == width * BYTES_PER_PIXEL`
/// - byte length `== pitch * height`
///
/// All accessors are bounds-checked; there is no way to reach memory outside
/// `[0, pitch * height)`.
///
/// # Example
///
/// ```
/// use framebound::core::surface::SurfaceBuffer;
///
/// let mut buffer = SurfaceBuffer::new(4, 2).unwrap();
/// assert_eq!(buffer.pitch(), 16);
/// assert!(buffer.set_pixel(3, 1, 0x0000_FF00));
/// assert_eq!(buffer.pixel(3, 1), Some(0x0000_FF00));
/// assert_eq!(buffer.pixel(4, 1), None);
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceBuffer {
    /// Packed pixels, row-major, `width * height` entries
    pixels: Vec<u32>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
}

impl SurfaceBuffer {
    /// Bytes per packed pixel
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Allocate a zero-filled buffer
    ///
    /// # Errors
    ///
    /// - `InvalidDimensions` if either dimension is zero
    /// - `AllocationFailure` if the memory cannot be reserved
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions { width, height });
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                FrameError::AllocationFailure(format!("{}x{} pixel count overflows", width, height))
            })?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|e| {
            FrameError::AllocationFailure(format!("{}x{} pixel buffer: {}", width, height, e))
        })?;
        pixels.resize(len, 0);

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    #[inline(always)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes
    #[inline(always)]
    pub fn pitch(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }

    /// Total size of the pixel memory in bytes
    #[inline(always)]
    pub fn len_bytes(&self) -> usize {
        self.pitch() * self.height as usize
    }

    /// Read one pixel, `None` outside the buffer
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel, returns false (and writes nothing) outside the buffer
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = value;
                true
            }
            None => false,
        }
    }

    /// Borrow one row of pixels
    pub fn row(&self, y: u32) -> Option<&[u32]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// Mutably borrow one row of pixels
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u32]> {
        if y >= self.height {
            return None;
        }
        let width = self.width as usize;
        let start = y as usize * width;
        Some(&mut self.pixels[start..start + width])
    }

    /// Iterate over all rows, top to bottom
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u32> {
        self.pixels.chunks_exact_mut(self.width as usize)
    }

    /// All pixels, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel memory as bytes, ready for upload with `pitch()` as the row stride
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buffer = SurfaceBuffer::new(640, 480).unwrap();
        assert_eq!(buffer.width(), 640);
        assert_eq!(buffer.height(), 480);
        assert_eq!(buffer.pitch(), 640 * 4);
        assert_eq!(buffer.len_bytes(), 640 * 4 * 480);
        assert_eq!(buffer.as_bytes().len(), buffer.len_bytes());
        assert!(buffer.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            SurfaceBuffer::new(0, 10),
            Err(FrameError::InvalidDimensions {
                width: 0,
                height: 10
            })
        ));
        assert!(matches!(
            SurfaceBuffer::new(10, 0),
            Err(FrameError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut buffer = SurfaceBuffer::new(8, 4).unwrap();
        assert_eq!(buffer.pixel(8, 0), None);
        assert_eq!(buffer.pixel(0, 4), None);
        assert!(!buffer.set_pixel(8, 0, 1));
        assert!(buffer.row(4).is_none());
        assert!(buffer.row_mut(4).is_none());
        assert!(buffer.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_rows_match_pitch() {
        let mut buffer = SurfaceBuffer::new(5, 3).unwrap();
        let rows: Vec<usize> = buffer.rows_mut().map(|row| row.len()).collect();
        assert_eq!(rows, vec![5, 5, 5]);

        buffer.row_mut(2).unwrap()[4] = 0xABCD;
        assert_eq!(buffer.pixel(4, 2), Some(0xABCD));
        assert_eq!(buffer.row(2).unwrap()[4], 0xABCD);
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn test_byte_layout_is_bgrx() {
        let mut buffer = SurfaceBuffer::new(1, 1).unwrap();
        buffer.set_pixel(0, 0, 0x0033_2211);
        assert_eq!(buffer.as_bytes(), &[0x11, 0x22, 0x33, 0x00]);
    }
}
