// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use trellis_focus::{Direction, Navigation};

/// A discrete navigation command from keyboard or gamepad.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavInput {
    /// D-pad or arrow up.
    Up,
    /// D-pad or arrow down.
    Down,
    /// D-pad or arrow left.
    Left,
    /// D-pad or arrow right.
    Right,
    /// Tab or shoulder button.
    Next,
    /// Shift+Tab or the other shoulder button.
    Prev,
    /// Enter or the primary face button.
    Confirm,
}

impl NavInput {
    /// The first command pressed in a polled gamepad state.
    ///
    /// Directions win over `Next`/`Prev`, which win over `Confirm`. The host is
    /// expected to report edges (pressed this tick), not held buttons.
    pub fn from_gamepad(state: GamepadState) -> Option<Self> {
        [
            (state.up, Self::Up),
            (state.down, Self::Down),
            (state.left, Self::Left),
            (state.right, Self::Right),
            (state.next, Self::Next),
            (state.prev, Self::Prev),
            (state.confirm, Self::Confirm),
        ]
        .into_iter()
        .find_map(|(pressed, input)| pressed.then_some(input))
    }

    /// The focus navigation this input maps to, or `None` for `Confirm`.
    pub fn navigation(self) -> Option<Navigation> {
        match self {
            Self::Up => Some(Direction::Up.into()),
            Self::Down => Some(Direction::Down.into()),
            Self::Left => Some(Direction::Left.into()),
            Self::Right => Some(Direction::Right.into()),
            Self::Next => Some(Navigation::Next),
            Self::Prev => Some(Navigation::Prev),
            Self::Confirm => None,
        }
    }
}

/// Directional and action buttons pressed since the last poll.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GamepadState {
    /// D-pad up.
    pub up: bool,
    /// D-pad down.
    pub down: bool,
    /// D-pad left.
    pub left: bool,
    /// D-pad right.
    pub right: bool,
    /// Right shoulder.
    pub next: bool,
    /// Left shoulder.
    pub prev: bool,
    /// Primary face button.
    pub confirm: bool,
}
