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

//! Presentation surface management
//!
//! The surface is the CPU-writable [`SurfaceBuffer`] plus a device-presentable
//! handle of the same dimensions. [`SurfaceManager`] owns both and only ever
//! swaps them as a pair, so a render or present can never observe memory and
//! handle disagreeing in size.
//!
//! # Lifecycle
//!
//! | State   | Entered by                        | `present()`          |
//! |---------|-----------------------------------|----------------------|
//! | Invalid | construction                      | `Err(SurfaceInvalid)`|
//! | Valid   | first successful `resize()`       | uploads + presents   |
//!
//! A failed resize leaves the previous pair in place, or the manager invalid
//! if there was none.

mod buffer;
mod memory;

#[cfg(test)]
mod tests;

pub use buffer::SurfaceBuffer;
pub use memory::{MemoryHandle, MemoryPresenter};

use crate::core::error::{FrameError, Result};

/// Platform side of the surface: creates handles and puts pixels on screen
pub trait PresentBackend {
    /// Device-visible counterpart of a [`SurfaceBuffer`]
    type Handle;

    /// Create a handle for a `width` x `height` surface
    ///
    /// # Errors
    ///
    /// `AllocationFailure` if the device cannot back a handle of that size.
    fn create_handle(&mut self, width: u32, height: u32) -> Result<Self::Handle>;

    /// Upload `pixels` (rows of `pitch` bytes) into `handle` and schedule it
    /// for on-screen presentation
    fn present(&mut self, handle: &mut Self::Handle, pixels: &[u8], pitch: usize) -> Result<()>;
}

/// Memory and handle, always created and released together
struct Surface<H> {
    buffer: SurfaceBuffer,
    handle: H,
}

/// Presentation surface manager
///
/// Exclusively owns the pixel memory and its presentation handle. The only
/// mutating entry points are [`resize`](Self::resize) and
/// [`present`](Self::present); rendering goes through
/// [`buffer_mut`](Self::buffer_mut), which cannot change dimensions.
pub struct SurfaceManager<B: PresentBackend> {
    /// Platform presentation backend
    backend: B,
    /// Current memory/handle pair, `None` until a resize succeeds
    current: Option<Surface<B::Handle>>,
    /// Number of successful resizes
    generation: u64,
}

impl<B: PresentBackend> SurfaceManager<B> {
    /// Create an empty (invalid) surface manager
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
            generation: 0,
        }
    }

    /// Recreate memory and handle for new dimensions
    ///
    /// The new pair is fully built before the old one is released, so on
    /// error the previous state (valid or not) is untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidDimensions` if either dimension is zero
    /// - `AllocationFailure` if memory or handle creation fails
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let buffer = SurfaceBuffer::new(width, height)?;
        let handle = self.backend.create_handle(width, height)?;

        if let Some(old) = self.current.replace(Surface { buffer, handle }) {
            log::debug!(
                "Released {}x{} surface",
                old.buffer.width(),
                old.buffer.height()
            );
        }
        self.generation += 1;

        log::debug!("Surface resized to {}x{}", width, height);
        Ok(())
    }

    /// Upload the current memory into the handle and present it
    ///
    /// # Errors
    ///
    /// `SurfaceInvalid` if no resize has succeeded yet, otherwise whatever the
    /// backend reports.
    pub fn present(&mut self) -> Result<()> {
        let surface = self.current.as_mut().ok_or(FrameError::SurfaceInvalid)?;
        let pitch = surface.buffer.pitch();
        self.backend
            .present(&mut surface.handle, surface.buffer.as_bytes(), pitch)
    }

    /// True once a resize has succeeded
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    /// Current dimensions, `None` while invalid
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.current
            .as_ref()
            .map(|s| (s.buffer.width(), s.buffer.height()))
    }

    pub fn buffer(&self) -> Option<&SurfaceBuffer> {
        self.current.as_ref().map(|s| &s.buffer)
    }

    pub fn buffer_mut(&mut self) -> Option<&mut SurfaceBuffer> {
        self.current.as_mut().map(|s| &mut s.buffer)
    }

    pub fn handle(&self) -> Option<&B::Handle> {
        self.current.as_ref().map(|s| &s.handle)
    }

    /// Number of successful resizes so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
