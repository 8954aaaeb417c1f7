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

//! framebound: a frame-paced software renderer with a synthesized tone
//!
//! Every tick the loop reads input, paints a scrolling gradient into a CPU
//! pixel buffer, tops up an audio queue with a continuous sine wave and
//! presents the buffer to the window.
//!
//! # Architecture
//!
//! - [`core`]: platform-independent loop, surface, audio, input and timing
//! - [`frontend`]: winit/wgpu/cpal integration
//!
//! # Example
//!
//! ```
//! use framebound::core::audio::MemoryQueue;
//! use framebound::core::frame_loop::{FrameLoop, LoopState};
//! use framebound::core::surface::MemoryPresenter;
//! use framebound::core::LoopConfig;
//!
//! let mut frame_loop = FrameLoop::new(
//!     LoopConfig::default(),
//!     MemoryPresenter::new(),
//!     Some(MemoryQueue::new(48_000 * 2)),
//! )?;
//! frame_loop.start();
//! assert_eq!(frame_loop.tick(&[]), LoopState::Running);
//! # Ok::<(), framebound::FrameError>(())
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`] which is an alias for
//! `Result<T, FrameError>`.

pub mod core;
pub mod frontend;

// Re-export commonly used types
pub use core::error::{FrameError, Result};
