// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input event records and the dispatch result.
//!
//! Hosts deliver raw input in many shapes. The `From` impls here bridge the
//! common tuple shapes onto the records the scene dispatches, so
//! `scene.key((key, scancode, mods))` and `scene.key(KeyEvent { .. })` land on
//! the same path.

use kurbo::{Point, Vec2};

/// Result of offering an event to a node or subtree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Handled {
    /// The event was used; no sibling or ancestor should process it.
    Consumed,
    /// The event was not used.
    #[default]
    Ignored,
}

impl Handled {
    /// Whether this is [`Handled::Consumed`].
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

impl From<bool> for Handled {
    fn from(consumed: bool) -> Self {
        if consumed {
            Self::Consumed
        } else {
            Self::Ignored
        }
    }
}

/// Pointer button identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left button, or the primary touch/pen contact.
    Primary,
    /// Right button.
    Secondary,
    /// Middle button.
    Middle,
    /// Any other button, by host index.
    Other(u8),
}

impl From<u8> for MouseButton {
    /// Maps the conventional `0 = left, 1 = right, 2 = middle` numbering.
    fn from(index: u8) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Secondary,
            2 => Self::Middle,
            n => Self::Other(n),
        }
    }
}

/// What happened to the pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerKind {
    /// Button pressed.
    Down(MouseButton),
    /// Button released.
    Up(MouseButton),
    /// Wheel or trackpad scroll, in lines or pixels as the host reports them.
    Scroll(Vec2),
    /// Pointer moved while `button` was held.
    Drag {
        /// Held button.
        button: MouseButton,
        /// Movement since the previous drag event.
        delta: Vec2,
    },
}

/// A pointer event as offered to a node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in scene coordinates.
    pub pos: Point,
    /// Event kind.
    pub kind: PointerKind,
    /// Whether `pos` lies inside the bounds of the node receiving the event.
    ///
    /// Set by the scene for each node it offers the event to.
    pub hit: bool,
}

impl PointerEvent {
    /// Create an event at `pos`.
    pub fn new(pos: impl Into<Point>, kind: PointerKind) -> Self {
        Self {
            pos: pos.into(),
            kind,
            hit: false,
        }
    }

    /// Button press.
    pub fn down(pos: impl Into<Point>, button: impl Into<MouseButton>) -> Self {
        Self::new(pos, PointerKind::Down(button.into()))
    }

    /// Button release.
    pub fn up(pos: impl Into<Point>, button: impl Into<MouseButton>) -> Self {
        Self::new(pos, PointerKind::Up(button.into()))
    }

    /// The button involved, if any.
    pub fn button(&self) -> Option<MouseButton> {
        match self.kind {
            PointerKind::Down(b) | PointerKind::Up(b) | PointerKind::Drag { button: b, .. } => {
                Some(b)
            }
            PointerKind::Scroll(_) => None,
        }
    }
}

impl From<(f64, f64, u8)> for PointerEvent {
    /// `(x, y, button)` as a button press.
    fn from((x, y, button): (f64, f64, u8)) -> Self {
        Self::down((x, y), button)
    }
}

bitflags::bitflags! {
    /// Keyboard modifier state.
    ///
    /// Bit values follow the common desktop windowing convention so a host's
    /// raw modifier mask converts with [`Modifiers::from_bits_truncate`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        /// Shift.
        const SHIFT     = 0x0001;
        /// Control.
        const CONTROL   = 0x0002;
        /// Alt / Option.
        const ALT       = 0x0004;
        /// Super / Command / Windows.
        const SUPER     = 0x0008;
        /// Caps lock is active.
        const CAPS_LOCK = 0x0010;
        /// Num lock is active.
        const NUM_LOCK  = 0x0020;
    }
}

/// A key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Host key code.
    pub key: i32,
    /// Platform scancode.
    pub scancode: i32,
    /// Modifier state at the time of the press.
    pub modifiers: Modifiers,
}

impl From<(i32, i32, Modifiers)> for KeyEvent {
    fn from((key, scancode, modifiers): (i32, i32, Modifiers)) -> Self {
        Self {
            key,
            scancode,
            modifiers,
        }
    }
}

impl From<(i32, i32, u32)> for KeyEvent {
    /// `(key, scancode, raw modifier mask)`; unknown modifier bits are dropped.
    fn from((key, scancode, mods): (i32, i32, u32)) -> Self {
        (key, scancode, Modifiers::from_bits_truncate(mods)).into()
    }
}

/// A typed character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CharEvent {
    /// The character.
    pub ch: char,
    /// Modifier state at the time of input.
    pub modifiers: Modifiers,
}

impl From<char> for CharEvent {
    fn from(ch: char) -> Self {
        Self {
            ch,
            modifiers: Modifiers::empty(),
        }
    }
}

impl From<(char, Modifiers)> for CharEvent {
    fn from((ch, modifiers): (char, Modifiers)) -> Self {
        Self { ch, modifiers }
    }
}
