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

//! Scrolling gradient fill
//!
//! # Pixel Format
//!
//! ```text
//! Register:  xx RR GG BB   (0x00RRGGBB)
//! Memory:    BB GG RR xx   (little-endian)
//! ```
//!
//! Blue follows the column, green follows the row, red and padding are 0.

use crate::core::surface::SurfaceBuffer;

/// Pack one gradient pixel
///
/// Offsets wrap, so any `i32` scroll position is valid; only the low 8 bits
/// of `x + x_offset` and `y + y_offset` matter.
///
/// # Example
///
/// ```
/// use framebound::core::render::gradient_pixel;
///
/// assert_eq!(gradient_pixel(0, 0, 0, 0), 0);
/// assert_eq!(gradient_pixel(255, 1, 1, 0), 0x0000_0100);
/// assert_eq!(gradient_pixel(0, 0, -1, -1), 0x0000_FFFF);
/// ```
#[inline(always)]
pub fn gradient_pixel(x: u32, y: u32, x_offset: i32, y_offset: i32) -> u32 {
    let blue = (x as i32).wrapping_add(x_offset) as u8;
    let green = (y as i32).wrapping_add(y_offset) as u8;
    let red = 0u8;

    ((red as u32) << 16) | ((green as u32) << 8) | blue as u32
}

/// Fill every pixel of `buffer` with the gradient at the given scroll offsets
///
/// Pure function of the buffer dimensions and the two offsets: calling it
/// twice with the same inputs produces the same memory.
pub fn render_gradient(buffer: &mut SurfaceBuffer, x_offset: i32, y_offset: i32) {
    for (y, row) in buffer.rows_mut().enumerate() {
        let y = y as u32;
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = gradient_pixel(x as u32, y, x_offset, y_offset);
        }
    }
}
