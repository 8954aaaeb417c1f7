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

//! framebound application
//!
//! Bridges winit to the core frame loop: window events become
//! [`PlatformEvent`]s, `about_to_wait` drives ticks, and the wgpu presenter
//! and cpal device are wired in as the loop's collaborators.

use crate::core::audio::AudioQueue;
use crate::core::config::{LoopConfig, TickMode};
use crate::core::error::{FrameError, Result};
use crate::core::frame_loop::{FrameLoop, LoopState, PlatformEvent};
use crate::core::input::KeyEvent;
use crate::frontend::input::{translate_key, KeyboardPad};
use crate::frontend::renderer::{RenderContext, WgpuPresenter};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

type WindowLoop = FrameLoop<WgpuPresenter, Box<dyn AudioQueue>>;

/// framebound application
///
/// # Example
///
/// ```no_run
/// use winit::event_loop::EventLoop;
/// use framebound::core::LoopConfig;
/// use framebound::frontend::Application;
///
/// let event_loop = EventLoop::new().unwrap();
/// let mut app = Application::new(LoopConfig::default());
/// event_loop.run_app(&mut app).unwrap();
/// ```
pub struct Application {
    /// Session configuration
    config: LoopConfig,
    /// The application window
    window: Option<Arc<Window>>,
    /// Core loop, created once the window exists
    frame_loop: Option<WindowLoop>,
    /// Keyboard-emulated controller in slot 0
    pad: KeyboardPad,
    /// Bootstrap failure that ended the event loop
    init_error: Option<FrameError>,
}

impl Application {
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            window: None,
            frame_loop: None,
            pad: KeyboardPad::new(),
            init_error: None,
        }
    }

    /// Error that stopped startup, if any
    pub fn init_error(&self) -> Option<&FrameError> {
        self.init_error.as_ref()
    }

    /// Loop state, `None` before the window exists
    pub fn state(&self) -> Option<LoopState> {
        self.frame_loop.as_ref().map(FrameLoop::state)
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("framebound")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.width,
                self.config.height,
            ))
            .with_resizable(true);

        let window = Arc::new(event_loop.create_window(window_attributes).map_err(|e| {
            FrameError::SubsystemInitFailure(format!("Failed to create window: {}", e))
        })?);

        let render_context = pollster::block_on(RenderContext::new(&window))?;
        let presenter = WgpuPresenter::new(render_context);

        let audio = open_audio(&self.config);
        let mut frame_loop = FrameLoop::new(self.config.clone(), presenter, audio)?;
        frame_loop.start();

        self.window = Some(window);
        self.frame_loop = Some(frame_loop);
        log::info!("Application initialized successfully");
        Ok(())
    }

    fn push_event(&mut self, event: PlatformEvent) {
        if let Some(frame_loop) = &mut self.frame_loop {
            frame_loop.push_event(event);
        }
    }
}

/// Open the audio device, or run silent
fn open_audio(config: &LoopConfig) -> Option<Box<dyn AudioQueue>> {
    if !config.audio_enabled {
        log::info!("Audio disabled in config");
        return None;
    }

    #[cfg(feature = "audio")]
    {
        match crate::core::audio::AudioBackend::new(config.sample_rate) {
            Ok(backend) => Some(Box::new(backend)),
            Err(e) => {
                log::warn!("Audio unavailable: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "audio"))]
    {
        log::info!("Built without the audio feature");
        None
    }
}

impl ApplicationHandler for Application {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.init_error.is_some() {
            return;
        }

        if let Err(e) = self.initialize(event_loop) {
            log::error!("Startup failed: {}", e);
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.push_event(PlatformEvent::CloseRequested),
            WindowEvent::Resized(size) => self.push_event(PlatformEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(true) => self.push_event(PlatformEvent::FocusGained),
            WindowEvent::Focused(false) => {
                self.pad.release_all();
                self.push_event(PlatformEvent::FocusLost);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    let pressed = event.state.is_pressed();
                    self.pad.handle_keyboard(key_code, pressed);

                    if let Some(key) = translate_key(key_code) {
                        self.push_event(PlatformEvent::Key(KeyEvent {
                            key,
                            is_down: pressed,
                            repeat: event.repeat,
                        }));
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(frame_loop) = &mut self.frame_loop else {
            return;
        };
        let controllers = [self.pad.slot()];

        let state = match self.config.tick_mode {
            TickMode::Continuous => {
                let state = if frame_loop.frame_timer().should_run_frame() {
                    frame_loop.tick(&controllers)
                } else {
                    frame_loop.state()
                };
                // Wake up at the next frame time
                event_loop.set_control_flow(ControlFlow::WaitUntil(
                    frame_loop.frame_timer().next_frame_instant(),
                ));
                state
            }
            TickMode::OnEvent => {
                let state = frame_loop.tick(&controllers);
                event_loop.set_control_flow(ControlFlow::Wait);
                state
            }
        };

        if state == LoopState::Terminated {
            log::info!("Exiting application");
            event_loop.exit();
        }
    }
}
