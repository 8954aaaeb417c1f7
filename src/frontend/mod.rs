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

//! Frontend module
//!
//! Window and device integration for the frame loop. It uses winit for window
//! management and events, wgpu to put the CPU pixel buffer on screen, and
//! cpal (through [`crate::core::audio`]) for sound.
//!
//! # Architecture
//!
//! - [`Application`]: winit event handler that owns the window and drives the loop
//! - [`renderer`]: wgpu context and presentation backend
//! - [`input`]: key translation and the keyboard-emulated controller
//!
//! # Example
//!
//! ```no_run
//! use winit::event_loop::EventLoop;
//! use framebound::core::LoopConfig;
//! use framebound::frontend::Application;
//!
//! let event_loop = EventLoop::new().unwrap();
//! let mut app = Application::new(LoopConfig::default());
//! event_loop.run_app(&mut app).unwrap();
//! ```

pub mod app;
pub mod input;
pub mod renderer;

pub use app::Application;
pub use input::{InputConfig, KeyboardPad};
pub use renderer::{RenderContext, WgpuPresenter};
