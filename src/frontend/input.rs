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

//! Keyboard input for the window frontend
//!
//! Two jobs:
//!
//! - [`translate_key`] turns winit key codes into the core's [`Key`] so the
//!   loop's own hotkeys (Escape, R, M) work
//! - [`KeyboardPad`] emulates controller slot 0 from held keys, with the
//!   bindings read from `input.toml`

use crate::core::error::{FrameError, Result};
use crate::core::input::{ControllerSlot, Key, PadButtons, PadState};
use serde::de::{value::StrDeserializer, IntoDeserializer};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

/// Stick value for a fully held direction key
pub const FULL_DEFLECTION: i16 = i16::MAX;

/// What a key does on the emulated pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadBinding {
    StickUp,
    StickDown,
    StickLeft,
    StickRight,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Back,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

impl PadBinding {
    /// Digital button for this binding, `None` for stick directions
    pub fn button(self) -> Option<PadButtons> {
        match self {
            Self::StickUp | Self::StickDown | Self::StickLeft | Self::StickRight => None,
            Self::DpadUp => Some(PadButtons::UP),
            Self::DpadDown => Some(PadButtons::DOWN),
            Self::DpadLeft => Some(PadButtons::LEFT),
            Self::DpadRight => Some(PadButtons::RIGHT),
            Self::Start => Some(PadButtons::START),
            Self::Back => Some(PadButtons::BACK),
            Self::LeftShoulder => Some(PadButtons::LEFT_SHOULDER),
            Self::RightShoulder => Some(PadButtons::RIGHT_SHOULDER),
            Self::A => Some(PadButtons::A),
            Self::B => Some(PadButtons::B),
            Self::X => Some(PadButtons::X),
            Self::Y => Some(PadButtons::Y),
        }
    }
}

/// Keyboard bindings as saved to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Key name (winit `KeyCode` variant) to binding
    pub key_mapping: HashMap<String, PadBinding>,
}

impl InputConfig {
    /// Create default configuration
    pub fn default_config() -> Self {
        let mut key_mapping = HashMap::new();

        // Stick
        key_mapping.insert(keycode_to_string(KeyCode::KeyW), PadBinding::StickUp);
        key_mapping.insert(keycode_to_string(KeyCode::ArrowUp), PadBinding::StickUp);
        key_mapping.insert(keycode_to_string(KeyCode::KeyS), PadBinding::StickDown);
        key_mapping.insert(keycode_to_string(KeyCode::ArrowDown), PadBinding::StickDown);
        key_mapping.insert(keycode_to_string(KeyCode::KeyA), PadBinding::StickLeft);
        key_mapping.insert(keycode_to_string(KeyCode::ArrowLeft), PadBinding::StickLeft);
        key_mapping.insert(keycode_to_string(KeyCode::KeyD), PadBinding::StickRight);
        key_mapping.insert(keycode_to_string(KeyCode::ArrowRight), PadBinding::StickRight);

        // Buttons
        key_mapping.insert(keycode_to_string(KeyCode::Enter), PadBinding::Start);
        key_mapping.insert(keycode_to_string(KeyCode::Backspace), PadBinding::Back);
        key_mapping.insert(keycode_to_string(KeyCode::Space), PadBinding::A);
        key_mapping.insert(keycode_to_string(KeyCode::KeyQ), PadBinding::LeftShoulder);
        key_mapping.insert(keycode_to_string(KeyCode::KeyE), PadBinding::RightShoulder);

        Self { key_mapping }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| FrameError::Config(format!("failed to parse {}: {}", path, e)))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &str) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| FrameError::Config(format!("failed to serialize input config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Convert KeyCode to a string representation for serialization
fn keycode_to_string(key: KeyCode) -> String {
    format!("{:?}", key)
}

/// Convert string representation back to KeyCode
///
/// Accepts every name [`keycode_to_string`] produces: the `Debug` and serde
/// names of `KeyCode` variants are the same.
fn string_to_keycode(s: &str) -> Option<KeyCode> {
    let deserializer: StrDeserializer<'_, serde::de::value::Error> = s.into_deserializer();
    KeyCode::deserialize(deserializer).ok()
}

/// Core key for a winit key code
///
/// Keys the loop never looks at translate to `None`.
pub fn translate_key(key: KeyCode) -> Option<Key> {
    match key {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::KeyM => Some(Key::M),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        _ => None,
    }
}

/// Keyboard-emulated controller
///
/// Tracks which bound keys are held and turns them into a [`PadState`] each
/// tick. Opposing stick keys cancel out.
pub struct KeyboardPad {
    /// Keyboard to binding mapping
    key_mapping: HashMap<KeyCode, PadBinding>,
    /// Bound keys currently held
    held: HashSet<KeyCode>,
    /// Configuration path
    config_path: String,
}

impl KeyboardPad {
    /// Create a pad with bindings from `input.toml`, or defaults
    pub fn new() -> Self {
        Self::with_config_path("input.toml")
    }

    /// Create a pad with bindings from `config_path`
    ///
    /// A missing or unreadable file falls back to the default bindings.
    pub fn with_config_path(config_path: &str) -> Self {
        let config = InputConfig::load(config_path).unwrap_or_else(|e| {
            log::info!("Using default input config (failed to load: {})", e);
            InputConfig::default_config()
        });
        Self::from_config(&config, config_path)
    }

    /// Create a pad from an in-memory configuration
    pub fn from_config(config: &InputConfig, config_path: &str) -> Self {
        let mut key_mapping = HashMap::new();
        for (key_str, &binding) in &config.key_mapping {
            if let Some(key) = string_to_keycode(key_str) {
                key_mapping.insert(key, binding);
            } else {
                log::warn!("Unknown key code in config: {}", key_str);
            }
        }

        Self {
            key_mapping,
            held: HashSet::new(),
            config_path: config_path.to_string(),
        }
    }

    /// Record a key press or release
    ///
    /// # Returns
    ///
    /// The binding the key is mapped to, if any
    pub fn handle_keyboard(&mut self, key: KeyCode, pressed: bool) -> Option<PadBinding> {
        let binding = self.key_mapping.get(&key).copied()?;
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
        Some(binding)
    }

    /// Drop all held keys (releases are not delivered while unfocused)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Current pad state
    pub fn state(&self) -> PadState {
        let mut state = PadState::default();
        let (mut x, mut y) = (0i32, 0i32);

        for binding in self.held.iter().filter_map(|key| self.key_mapping.get(key)) {
            match binding {
                PadBinding::StickUp => y += 1,
                PadBinding::StickDown => y -= 1,
                PadBinding::StickLeft => x -= 1,
                PadBinding::StickRight => x += 1,
                _ => {}
            }
            if let Some(button) = binding.button() {
                state.buttons |= button;
            }
        }

        state.stick_x = x.signum() as i16 * FULL_DEFLECTION;
        state.stick_y = y.signum() as i16 * FULL_DEFLECTION;
        state
    }

    /// The pad as a controller slot (always attached)
    pub fn slot(&self) -> ControllerSlot {
        ControllerSlot::Attached(self.state())
    }

    /// Set a key mapping
    pub fn set_key_mapping(&mut self, key: KeyCode, binding: PadBinding) {
        self.key_mapping.insert(key, binding);
    }

    /// Remove a key mapping
    pub fn remove_key_mapping(&mut self, key: KeyCode) {
        self.key_mapping.remove(&key);
        self.held.remove(&key);
    }

    pub fn key_mapping(&self) -> &HashMap<KeyCode, PadBinding> {
        &self.key_mapping
    }

    /// Save current bindings to the configuration path
    pub fn save_config(&self) -> Result<()> {
        let key_mapping = self
            .key_mapping
            .iter()
            .map(|(&key, &binding)| (keycode_to_string(key), binding))
            .collect();
        InputConfig { key_mapping }.save(&self.config_path)
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }
}

impl Default for KeyboardPad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pad with default bindings, independent of any local input.toml
    fn new_test_pad() -> KeyboardPad {
        KeyboardPad::from_config(&InputConfig::default_config(), "test-config.toml")
    }

    #[test]
    fn test_default_keyboard_mapping() {
        let mut pad = new_test_pad();

        assert_eq!(
            pad.handle_keyboard(KeyCode::KeyW, true),
            Some(PadBinding::StickUp)
        );
        assert_eq!(
            pad.handle_keyboard(KeyCode::ArrowLeft, true),
            Some(PadBinding::StickLeft)
        );
        assert_eq!(
            pad.handle_keyboard(KeyCode::Enter, false),
            Some(PadBinding::Start)
        );

        // Test unmapped key
        assert_eq!(pad.handle_keyboard(KeyCode::KeyP, true), None);
    }

    #[test]
    fn test_held_keys_deflect_stick() {
        let mut pad = new_test_pad();
        assert_eq!(pad.state(), PadState::default());

        pad.handle_keyboard(KeyCode::KeyW, true);
        pad.handle_keyboard(KeyCode::KeyD, true);
        let state = pad.state();
        assert_eq!(state.stick_x, FULL_DEFLECTION);
        assert_eq!(state.stick_y, FULL_DEFLECTION);

        pad.handle_keyboard(KeyCode::KeyW, false);
        pad.handle_keyboard(KeyCode::KeyS, true);
        assert_eq!(pad.state().stick_y, -FULL_DEFLECTION);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut pad = new_test_pad();
        pad.handle_keyboard(KeyCode::KeyA, true);
        pad.handle_keyboard(KeyCode::ArrowRight, true);
        assert_eq!(pad.state().stick_x, 0);

        // Two keys for the same direction do not add up
        pad.handle_keyboard(KeyCode::KeyD, true);
        assert_eq!(pad.state().stick_x, FULL_DEFLECTION);
    }

    #[test]
    fn test_buttons_follow_held_keys() {
        let mut pad = new_test_pad();
        pad.handle_keyboard(KeyCode::Backspace, true);
        pad.handle_keyboard(KeyCode::Space, true);
        assert_eq!(pad.state().buttons, PadButtons::BACK | PadButtons::A);

        pad.handle_keyboard(KeyCode::Space, false);
        assert_eq!(pad.state().buttons, PadButtons::BACK);

        pad.release_all();
        assert_eq!(pad.slot(), ControllerSlot::Attached(PadState::default()));
    }

    #[test]
    fn test_set_and_remove_key_mapping() {
        let mut pad = new_test_pad();

        pad.set_key_mapping(KeyCode::KeyK, PadBinding::Y);
        pad.handle_keyboard(KeyCode::KeyK, true);
        assert_eq!(pad.state().buttons, PadButtons::Y);

        // Removing a held key also releases it
        pad.remove_key_mapping(KeyCode::KeyK);
        assert_eq!(pad.handle_keyboard(KeyCode::KeyK, false), None);
        assert_eq!(pad.state().buttons, PadButtons::empty());
    }

    #[test]
    fn test_translate_key() {
        assert_eq!(translate_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(translate_key(KeyCode::KeyM), Some(Key::M));
        assert_eq!(translate_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(translate_key(KeyCode::F1), None);
    }

    #[test]
    fn test_unknown_key_names_are_skipped() {
        let mut config = InputConfig::default_config();
        config
            .key_mapping
            .insert("NotAKey".to_string(), PadBinding::B);
        let pad = KeyboardPad::from_config(&config, "test-config.toml");
        assert_eq!(
            pad.key_mapping().len(),
            InputConfig::default_config().key_mapping.len()
        );
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");
        let path = path.to_str().unwrap();

        let mut pad = KeyboardPad::from_config(&InputConfig::default_config(), path);
        pad.set_key_mapping(KeyCode::KeyP, PadBinding::B);
        pad.set_key_mapping(KeyCode::F1, PadBinding::X);
        pad.set_key_mapping(KeyCode::NumpadAdd, PadBinding::Y);
        pad.save_config().unwrap();

        let reloaded = KeyboardPad::with_config_path(path);
        assert_eq!(reloaded.key_mapping(), pad.key_mapping());
        assert_eq!(
            reloaded.key_mapping().get(&KeyCode::KeyP),
            Some(&PadBinding::B)
        );
        assert_eq!(reloaded.config_path(), path);
    }

    #[test]
    fn test_key_names_parse_back() {
        for key in [
            KeyCode::KeyP,
            KeyCode::KeyR,
            KeyCode::F1,
            KeyCode::F12,
            KeyCode::Digit0,
            KeyCode::Numpad5,
            KeyCode::ControlLeft,
            KeyCode::Escape,
            KeyCode::Backquote,
        ] {
            assert_eq!(string_to_keycode(&keycode_to_string(key)), Some(key));
        }
        assert_eq!(string_to_keycode("NotAKey"), None);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let pad = KeyboardPad::with_config_path(path.to_str().unwrap());
        assert_eq!(
            pad.key_mapping().get(&KeyCode::KeyW),
            Some(&PadBinding::StickUp)
        );
    }
}
