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

//! Platform-independent core
//!
//! Nothing in here talks to a window system or audio device directly; those
//! sit behind [`surface::PresentBackend`] and [`audio::AudioQueue`].

pub mod audio;
pub mod config;
pub mod control;
pub mod error;
pub mod frame_loop;
pub mod frame_timer;
pub mod input;
pub mod render;
pub mod surface;

pub use config::{LoopConfig, TickMode};
pub use error::{FrameError, Result};
pub use frame_timer::{FrameStats, FrameTimer};
