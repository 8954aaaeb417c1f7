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

//! Error types for the frame loop
//!
//! Only a quit signal ends the running loop. Everything in here is either
//! recoverable inside the loop (allocation and device errors degrade the
//! affected subsystem for a tick) or raised during bootstrap, outside of it.

use thiserror::Error;

/// Errors raised by the frame loop and its subsystems
#[derive(Debug, Error)]
pub enum FrameError {
    /// Surface memory, presentation handle or audio buffer could not be allocated
    ///
    /// Recoverable: the next successful resize restores presentation.
    #[error("Allocation failure: {0}")]
    AllocationFailure(String),

    /// Audio device or controller could not be opened
    ///
    /// The loop degrades to silent or no-input operation.
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Platform bootstrap failed (window, GPU adapter, event loop)
    #[error("Subsystem initialization failed: {0}")]
    SubsystemInitFailure(String),

    /// Resize requested with a zero dimension
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Surface has no valid memory/handle pair to present
    #[error("Surface is not valid (no successful resize yet)")]
    SurfaceInvalid,

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for frame loop operations
pub type Result<T> = std::result::Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FrameError::InvalidDimensions {
            width: 0,
            height: 480,
        };
        assert_eq!(err.to_string(), "Invalid surface dimensions: 0x480");

        let err = FrameError::AllocationFailure("texture 99999x1".to_string());
        assert_eq!(err.to_string(), "Allocation failure: texture 99999x1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FrameError = io.into();
        assert!(matches!(err, FrameError::Io(_)));
    }
}
