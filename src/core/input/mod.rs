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

//! Input sampling
//!
//! Turns one tick's worth of key events and controller snapshots into
//! [`ControlDeltas`].
//!
//! # Discrete vs Continuous Signals
//!
//! Keys and pad buttons are edge-triggered: an action fires only on the tick
//! a button goes from up to down. Holding a key (including OS auto-repeat)
//! never re-triggers it.
//!
//! Sticks are continuous: their deflection is converted to offset and tone
//! deltas every tick, whether or not anything changed.
//!
//! | Source            | Action          |
//! |-------------------|-----------------|
//! | `Escape` / `BACK` | Quit            |
//! | `R` / `START`     | ResetOffsets    |
//! | `M` / `A`         | ToggleMute      |

use bitflags::bitflags;
use std::collections::HashMap;


/// Number of controller slots the sampler looks at
pub const MAX_CONTROLLERS: usize = 4;

/// Stick value divisor for offset deltas (full deflection ≈ 8 px/tick)
pub const STICK_OFFSET_DIVISOR: i32 = 4096;

/// Tone offset at a stick deflection of [`STICK_TONE_SCALE`], in Hz
pub const TONE_RANGE_HZ: f32 = 256.0;

/// Stick deflection that maps to [`TONE_RANGE_HZ`]
pub const STICK_TONE_SCALE: f32 = 30_000.0;

/// Keys the loop cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    R,
    M,
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    /// Any other key, identified by a platform scan code
    Other(u32),
}

/// One key event as delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// State after the event
    pub is_down: bool,
    /// Generated by OS auto-repeat while held
    pub repeat: bool,
}

bitflags! {
    /// Digital buttons of a controller
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PadButtons: u16 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const START = 1 << 4;
        const BACK = 1 << 5;
        const LEFT_SHOULDER = 1 << 6;
        const RIGHT_SHOULDER = 1 << 7;
        const A = 1 << 8;
        const B = 1 << 9;
        const X = 1 << 10;
        const Y = 1 << 11;
    }
}

/// Controller state read this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadState {
    pub buttons: PadButtons,
    pub stick_x: i16,
    pub stick_y: i16,
}

/// One controller slot as enumerated by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerSlot {
    #[default]
    Detached,
    Attached(PadState),
}

/// Discrete action triggered by a press edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Quit,
    ResetOffsets,
    ToggleMute,
}

/// Everything the input produced for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlDeltas {
    /// Horizontal scroll delta in pixels
    pub x_offset: i32,
    /// Vertical scroll delta in pixels
    pub y_offset: i32,
    /// Tone offset from the base frequency, in Hz
    pub tone_offset_hz: f32,
    /// Discrete actions in the order they were triggered
    pub actions: Vec<ControlAction>,
}

impl ControlDeltas {
    /// True if an action of this kind fired this tick
    pub fn contains(&self, action: ControlAction) -> bool {
        self.actions.contains(&action)
    }

    /// No continuous movement and no actions
    pub fn is_zero(&self) -> bool {
        self.x_offset == 0
            && self.y_offset == 0
            && self.tone_offset_hz == 0.0
            && self.actions.is_empty()
    }
}

const KEY_ACTIONS: [(Key, ControlAction); 3] = [
    (Key::Escape, ControlAction::Quit),
    (Key::R, ControlAction::ResetOffsets),
    (Key::M, ControlAction::ToggleMute),
];

const BUTTON_ACTIONS: [(PadButtons, ControlAction); 3] = [
    (PadButtons::BACK, ControlAction::Quit),
    (PadButtons::START, ControlAction::ResetOffsets),
    (PadButtons::A, ControlAction::ToggleMute),
];

/// Input sampler
///
/// Keeps just enough history for edge detection: the last known state of
/// each key and the previous tick's buttons per controller slot.
///
/// # Example
///
/// ```
/// use framebound::core::input::{ControlAction, ControllerSlot, InputSampler, Key, KeyEvent};
///
/// let mut sampler = InputSampler::new();
/// sampler.key_event(KeyEvent { key: Key::R, is_down: true, repeat: false });
/// sampler.key_event(KeyEvent { key: Key::R, is_down: true, repeat: true });
///
/// let deltas = sampler.sample(&[ControllerSlot::Detached]);
/// assert_eq!(deltas.actions, vec![ControlAction::ResetOffsets]);
/// ```
#[derive(Debug, Default)]
pub struct InputSampler {
    /// Last known down state per key
    key_states: HashMap<Key, bool>,
    /// Actions from key events since the last `sample`
    pending_actions: Vec<ControlAction>,
    /// Buttons held on the previous tick, per slot
    previous_buttons: [PadButtons; MAX_CONTROLLERS],
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event
    ///
    /// A transition is recorded only when `is_down != was_down`, where
    /// `was_down` is true for auto-repeat or when the key was already down.
    ///
    /// # Returns
    ///
    /// The action triggered by this event, if any
    pub fn key_event(&mut self, event: KeyEvent) -> Option<ControlAction> {
        let was_down =
            event.repeat || self.key_states.get(&event.key).copied().unwrap_or(false);
        let is_down = event.is_down;

        if is_down == was_down {
            return None;
        }
        self.key_states.insert(event.key, is_down);

        if !is_down {
            return None;
        }

        let action = KEY_ACTIONS
            .iter()
            .find(|(key, _)| *key == event.key)
            .map(|&(_, action)| action)?;
        log::debug!("{:?} pressed -> {:?}", event.key, action);
        self.pending_actions.push(action);
        Some(action)
    }

    /// Whether a key is currently held
    pub fn is_key_down(&self, key: Key) -> bool {
        self.key_states.get(&key).copied().unwrap_or(false)
    }

    /// Forget held keys (e.g. after focus loss, when releases go unseen)
    pub fn release_all_keys(&mut self) {
        self.key_states.clear();
    }

    /// Combine pending key actions with this tick's controller snapshots
    ///
    /// Slots beyond `controllers.len()` and detached slots contribute zero
    /// and lose their button history, so a reattached pad starts fresh.
    pub fn sample(&mut self, controllers: &[ControllerSlot]) -> ControlDeltas {
        let mut deltas = ControlDeltas {
            actions: std::mem::take(&mut self.pending_actions),
            ..ControlDeltas::default()
        };

        for (index, previous) in self.previous_buttons.iter_mut().enumerate() {
            let pad = match controllers.get(index) {
                Some(ControllerSlot::Attached(pad)) => pad,
                _ => {
                    *previous = PadButtons::empty();
                    continue;
                }
            };

            let pressed = pad.buttons & !*previous;
            for &(button, action) in &BUTTON_ACTIONS {
                if pressed.contains(button) {
                    log::debug!("Controller {} {:?} pressed -> {:?}", index, button, action);
                    deltas.actions.push(action);
                }
            }
            *previous = pad.buttons;

            deltas.x_offset += pad.stick_x as i32 / STICK_OFFSET_DIVISOR;
            deltas.y_offset += pad.stick_y as i32 / STICK_OFFSET_DIVISOR;
            deltas.tone_offset_hz += TONE_RANGE_HZ * (pad.stick_y as f32 / STICK_TONE_SCALE);
        }

        deltas
    }
}
