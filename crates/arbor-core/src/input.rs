// Copyright 2025 eraflo
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

//! Backend-agnostic input events consumed by the GUI router.
//!
//! The host polls its devices and pushes one [`InputEvent`] per discrete change;
//! the router never polls anything itself.

use glam::Vec2;

/// A discrete user input event delivered to the focus router.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A keyboard key changed state.
    Key {
        /// A string representation of the physical key code.
        key_code: String,
        /// Down, up or auto-repeat.
        state: ButtonState,
    },
    /// The pointer moved.
    PointerMoved {
        /// The new screen-space position.
        position: Vec2,
    },
    /// A pointer button changed state.
    PointerButton {
        /// The button that changed.
        button: MouseButton,
        /// Down, up or auto-repeat.
        state: ButtonState,
        /// The pointer position at the time of the change.
        position: Vec2,
    },
    /// The wheel was scrolled.
    Wheel {
        /// Horizontal and vertical scroll delta.
        delta: Vec2,
    },
    /// A gamepad button changed state.
    Gamepad {
        /// The button that changed.
        button: GamepadButton,
        /// Down, up or auto-repeat.
        state: ButtonState,
    },
    /// A directional navigation request.
    Navigate(Direction),
    /// An abstract navigation request not tied to a screen direction.
    Abstract(AbstractInput),
}

impl InputEvent {
    /// Returns `true` for events that may be sunk by the focused node before
    /// the router falls back to navigation.
    pub fn is_navigation(&self) -> bool {
        matches!(self, InputEvent::Navigate(_) | InputEvent::Abstract(_))
    }
}

/// The state carried by a button-like event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// The button was pressed.
    Down,
    /// The button was released.
    Up,
    /// The button is held and the host generated a repeat.
    Repeat,
}

/// A pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// The left mouse button.
    Left,
    /// The right mouse button.
    Right,
    /// The middle mouse button.
    Middle,
    /// The back mouse button (typically on the side).
    Back,
    /// The forward mouse button (typically on the side).
    Forward,
    /// Another mouse button, identified by a numeric code.
    Other(u16),
}

/// A gamepad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    /// The bottom face button, conventionally "confirm".
    South,
    /// The right face button, conventionally "cancel".
    East,
    /// The left face button.
    West,
    /// The top face button.
    North,
    /// Start / menu.
    Start,
    /// Select / back.
    Select,
    /// Another button, identified by a numeric code.
    Other(u16),
}

/// A screen direction used for directional focus navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards smaller `y`.
    Up,
    /// Towards larger `y`.
    Down,
    /// Towards smaller `x`.
    Left,
    /// Towards larger `x`.
    Right,
}

/// Navigation requests that follow child order rather than screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbstractInput {
    /// Move to the next sibling.
    Tab,
    /// Move to the previous sibling.
    ShiftTab,
}
