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

//! wgpu presentation backend
//!
//! The presentation handle is a GPU texture the size of the pixel buffer.
//! Presenting uploads the buffer into it, copies it into the acquired
//! surface texture and presents.

use super::RenderContext;
use crate::core::error::{FrameError, Result};
use crate::core::surface::PresentBackend;

/// GPU-side copy of the pixel buffer
pub struct GpuHandle {
    texture: wgpu::Texture,
    width: u32,
    height: u32,
}

impl GpuHandle {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Whether `format` stores red in the first byte
fn needs_swizzle(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb
    )
}

/// Reorder `B G R X` pixels to `R G B X`
fn swizzle_bgrx_to_rgbx(src: &[u8], dst: &mut Vec<u8>) {
    dst.clear();
    dst.reserve(src.len());
    for px in src.chunks_exact(4) {
        dst.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
}

/// [`PresentBackend`] over a wgpu window surface
pub struct WgpuPresenter {
    context: RenderContext,
    /// Upload staging for formats that need a swizzle
    staging: Vec<u8>,
}

impl WgpuPresenter {
    pub fn new(context: RenderContext) -> Self {
        if needs_swizzle(context.format()) {
            log::debug!("Surface is {:?}, swizzling on upload", context.format());
        }
        Self {
            context,
            staging: Vec::new(),
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Acquire the next surface texture
    ///
    /// `Ok(None)` means the frame should be skipped.
    fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.context.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                // Reconfigure the surface to the current size and skip this frame
                self.context.reconfigure();
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout while acquiring frame");
                Ok(None)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(FrameError::AllocationFailure(
                "Surface out of memory while acquiring frame".to_string(),
            )),
            Err(e) => {
                log::error!("Unexpected surface error: {:?}", e);
                Ok(None)
            }
        }
    }
}

impl PresentBackend for WgpuPresenter {
    type Handle = GpuHandle;

    fn create_handle(&mut self, width: u32, height: u32) -> Result<GpuHandle> {
        let max = self.context.max_dimension();
        if width > max || height > max {
            return Err(FrameError::AllocationFailure(format!(
                "{}x{} exceeds the device texture limit of {}",
                width, height, max
            )));
        }

        let device = &self.context.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("framebound surface"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.context.format(),
            usage: wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());

        if let Some(e) = out_of_memory.or(validation) {
            return Err(FrameError::AllocationFailure(format!(
                "{}x{} surface texture: {}",
                width, height, e
            )));
        }

        // Only reconfigure once the new texture exists
        self.context.resize(width, height);

        Ok(GpuHandle {
            texture,
            width,
            height,
        })
    }

    fn present(&mut self, handle: &mut GpuHandle, pixels: &[u8], pitch: usize) -> Result<()> {
        let expected = pitch * handle.height as usize;
        if pitch != handle.width as usize * 4 || pixels.len() != expected {
            return Err(FrameError::InvalidDimensions {
                width: handle.width,
                height: handle.height,
            });
        }

        let data = if needs_swizzle(self.context.format()) {
            swizzle_bgrx_to_rgbx(pixels, &mut self.staging);
            self.staging.as_slice()
        } else {
            pixels
        };

        let extent = wgpu::Extent3d {
            width: handle.width,
            height: handle.height,
            depth_or_array_layers: 1,
        };
        self.context.queue.write_texture(
            handle.texture.as_image_copy(),
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(pitch as u32),
                rows_per_image: Some(handle.height),
            },
            extent,
        );

        let Some(output) = self.acquire()? else {
            return Ok(());
        };

        // The surface can lag the handle by a frame during a live resize
        let copy_size = wgpu::Extent3d {
            width: handle.width.min(output.texture.width()),
            height: handle.height.min(output.texture.height()),
            depth_or_array_layers: 1,
        };

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Present Encoder"),
                });
        encoder.copy_texture_to_texture(
            handle.texture.as_image_copy(),
            output.texture.as_image_copy(),
            copy_size,
        );
        self.context
            .queue
            .submit(std::iter::once(encoder.finish()));

        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swizzle_formats() {
        assert!(!needs_swizzle(wgpu::TextureFormat::Bgra8Unorm));
        assert!(!needs_swizzle(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert!(needs_swizzle(wgpu::TextureFormat::Rgba8Unorm));
        assert!(needs_swizzle(wgpu::TextureFormat::Rgba8UnormSrgb));
    }

    #[test]
    fn test_swizzle_bgrx_to_rgbx() {
        // 0x0000_3412 = green 0x34, blue 0x12
        let pixels: [u32; 2] = [0x0000_3412, 0x0000_FF01];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);

        let mut out = vec![0xAA; 3];
        swizzle_bgrx_to_rgbx(bytes, &mut out);
        assert_eq!(out, vec![0x00, 0x34, 0x12, 0x00, 0x00, 0xFF, 0x01, 0x00]);
    }
}
