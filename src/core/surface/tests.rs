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

//! Unit tests for SurfaceManager

use super::*;
use crate::core::render::render_gradient;

#[test]
fn test_new_manager_is_invalid() {
    let mut surface = SurfaceManager::new(MemoryPresenter::new());
    assert!(!surface.is_valid());
    assert_eq!(surface.dimensions(), None);
    assert!(surface.buffer().is_none());
    assert!(matches!(surface.present(), Err(FrameError::SurfaceInvalid)));
    assert_eq!(surface.backend().presented_frames(), 0);
}

#[test]
fn test_resize_creates_matching_pair() {
    let mut surface = SurfaceManager::new(MemoryPresenter::new());
    surface.resize(640, 480).unwrap();

    assert!(surface.is_valid());
    assert_eq!(surface.dimensions(), Some((640, 480)));

    let buffer = surface.buffer().unwrap();
    assert_eq!(buffer.pitch(), 640 * SurfaceBuffer::BYTES_PER_PIXEL);
    assert_eq!(buffer.len_bytes(), 640 * 4 * 480);

    let handle = surface.handle().unwrap();
    assert_eq!((handle.width(), handle.height()), (640, 480));
    assert_eq!(surface.generation(), 1);
}

#[test]
fn test_resize_rejects_zero_dimensions() {
    let mut surface = SurfaceManager::new(MemoryPresenter::new());
    surface.resize(320, 200).unwrap();

    let result = surface.resize(0, 200);
    assert!(matches!(result, Err(FrameError::InvalidDimensions { .. })));
    assert_eq!(surface.dimensions(), Some((320, 200)));
    assert_eq!(surface.backend().handles_created(), 1);
}

#[test]
fn test_failed_resize_keeps_previous_state() {
    let mut surface = SurfaceManager::new(MemoryPresenter::with_limit(640 * 480));
    surface.resize(640, 480).unwrap();
    render_gradient(surface.buffer_mut().unwrap(), 3, 7);

    let result = surface.resize(1280, 720);
    assert!(matches!(result, Err(FrameError::AllocationFailure(_))));

    // Old memory and handle are still paired and intact
    assert_eq!(surface.dimensions(), Some((640, 480)));
    let handle = surface.handle().unwrap();
    assert_eq!((handle.width(), handle.height()), (640, 480));
    assert_eq!(surface.buffer().unwrap().pixel(0, 0), Some((7 << 8) | 3));
    assert!(surface.present().is_ok());
    assert_eq!(surface.generation(), 1);
}

#[test]
fn test_failed_first_resize_stays_invalid() {
    let mut surface = SurfaceManager::new(MemoryPresenter::with_limit(100));
    assert!(surface.resize(640, 480).is_err());
    assert!(!surface.is_valid());
    assert!(matches!(surface.present(), Err(FrameError::SurfaceInvalid)));

    // A later resize that fits recovers
    surface.resize(10, 10).unwrap();
    assert!(surface.present().is_ok());
}

#[test]
fn test_present_uploads_current_memory() {
    let mut surface = SurfaceManager::new(MemoryPresenter::new());
    surface.resize(4, 2).unwrap();
    render_gradient(surface.buffer_mut().unwrap(), 0, 0);
    surface.present().unwrap();

    let expected = surface.buffer().unwrap().as_bytes().to_vec();
    assert_eq!(surface.handle().unwrap().pixels(), expected.as_slice());
    assert_eq!(surface.backend().last_presented(), Some((4, 2)));
}

#[test]
fn test_resize_640x480_to_1280x720_renders_full_frame() {
    let mut surface = SurfaceManager::new(MemoryPresenter::new());
    surface.resize(640, 480).unwrap();
    render_gradient(surface.buffer_mut().unwrap(), 0, 0);
    surface.present().unwrap();

    surface.resize(1280, 720).unwrap();
    let buffer = surface.buffer_mut().unwrap();
    assert_eq!(buffer.pixels().len(), 1280 * 720);
    render_gradient(buffer, 10, 20);

    // Every pixel in the larger frame was written, including beyond 640x480
    let buffer = surface.buffer().unwrap();
    for y in [0u32, 479, 480, 719] {
        for x in [0u32, 639, 640, 1279] {
            let expected = (((y + 20) % 256) << 8) | ((x + 10) % 256);
            assert_eq!(buffer.pixel(x, y), Some(expected), "pixel ({}, {})", x, y);
        }
    }
    assert_eq!(buffer.pixel(1280, 0), None);
    assert_eq!(buffer.pixel(0, 720), None);

    surface.present().unwrap();
    assert_eq!(surface.backend().last_presented(), Some((1280, 720)));
    assert_eq!(
        surface.handle().unwrap().pixels().len(),
        1280 * 720 * SurfaceBuffer::BYTES_PER_PIXEL
    );
}
