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

//! wgpu rendering context
//!
//! Owns the GPU device, queue and window surface. The surface is configured
//! as a copy destination so the CPU pixel buffer can be blitted straight into
//! it without a render pass.

use crate::core::error::{FrameError, Result};
use std::sync::Arc;
use winit::window::Window;

/// Surface formats the CPU buffer can be copied into, best first
///
/// The buffer is `B G R X` in memory, so `Bgra8Unorm` takes it unchanged;
/// the `Rgba8` formats need a swizzle on upload.
const PREFERRED_FORMATS: [wgpu::TextureFormat; 4] = [
    wgpu::TextureFormat::Bgra8Unorm,
    wgpu::TextureFormat::Rgba8Unorm,
    wgpu::TextureFormat::Bgra8UnormSrgb,
    wgpu::TextureFormat::Rgba8UnormSrgb,
];

/// wgpu rendering context
pub struct RenderContext {
    /// wgpu device for creating GPU resources
    pub device: wgpu::Device,
    /// Command queue for submitting GPU commands
    pub queue: wgpu::Queue,
    /// Surface for presenting to the window
    pub surface: wgpu::Surface<'static>,
    /// Surface configuration (format, size, present mode, etc.)
    pub surface_config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Create a new rendering context
    ///
    /// # Errors
    ///
    /// `SubsystemInitFailure` if no adapter or device is available, or the
    /// surface supports none of the byte-order formats the buffer can be
    /// copied into.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use winit::window::Window;
    /// use framebound::frontend::renderer::RenderContext;
    ///
    /// async fn create_context(window: Arc<Window>) {
    ///     let context = RenderContext::new(&window).await.unwrap();
    /// }
    /// ```
    pub async fn new(window: &Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).map_err(|e| {
            FrameError::SubsystemInitFailure(format!("Failed to create surface: {}", e))
        })?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| {
                FrameError::SubsystemInitFailure(format!(
                    "Failed to find suitable GPU adapter: {}",
                    e
                ))
            })?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("framebound device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| {
                FrameError::SubsystemInitFailure(format!("Failed to create device: {}", e))
            })?;

        let surface_caps = surface.get_capabilities(&adapter);

        let surface_format = PREFERRED_FORMATS
            .iter()
            .copied()
            .find(|f| surface_caps.formats.contains(f))
            .ok_or_else(|| {
                FrameError::SubsystemInitFailure(format!(
                    "No 8-bit BGRA/RGBA surface format in {:?}",
                    surface_caps.formats
                ))
            })?;

        if !surface_caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(FrameError::SubsystemInitFailure(
                "Surface cannot be used as a copy destination".to_string(),
            ));
        }

        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::Opaque)
        {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo, // V-sync
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        log::info!(
            "Initialized wgpu context: {}x{}, format: {:?}",
            surface_config.width,
            surface_config.height,
            surface_format
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
        })
    }

    /// Reconfigure the surface to a new size
    ///
    /// Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.surface_config.width = new_width;
            self.surface_config.height = new_height;
            self.surface.configure(&self.device, &self.surface_config);
            log::debug!("Resized surface to {}x{}", new_width, new_height);
        }
    }

    /// Reconfigure at the current size (after `Outdated`/`Lost`)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    #[inline(always)]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// Largest texture edge the device accepts
    #[inline(always)]
    pub fn max_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}
