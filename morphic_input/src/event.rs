// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized input events and button/key state tracking.
//!
//! Hosts translate whatever their platform delivers into [`InputEvent`]s; nothing
//! in this crate looks at raw platform events.

use alloc::vec::Vec;
use kurbo::{Point, Vec2};

/// A pointer button.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary (context) button.
    Right,
    /// Middle button or wheel press.
    Middle,
}

bitflags::bitflags! {
    /// Set of pointer buttons currently held.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        /// [`MouseButton::Left`].
        const LEFT   = 0b001;
        /// [`MouseButton::Right`].
        const RIGHT  = 0b010;
        /// [`MouseButton::Middle`].
        const MIDDLE = 0b100;
    }
}

impl From<MouseButton> for Buttons {
    fn from(b: MouseButton) -> Self {
        match b {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
        }
    }
}

/// A logical key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// A key producing a character.
    Char(char),
    /// Any other key, by host-defined code.
    Code(u32),
}

/// One normalized input sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a surface-space position.
    PointerMoved(Point),
    /// A pointer button went down at the current pointer position.
    ButtonDown(MouseButton),
    /// A pointer button went up at the current pointer position.
    ButtonUp(MouseButton),
    /// A key went down.
    KeyDown(Key),
    /// A key went up.
    KeyUp(Key),
    /// Wheel or trackpad scroll delta.
    Wheel(Vec2),
}

/// Edge detector for pointer buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    held: Buttons,
}

impl ButtonState {
    /// Mark `button` as held. Returns `false` if it already was (a duplicate down).
    pub fn press(&mut self, button: MouseButton) -> bool {
        let b = Buttons::from(button);
        let fresh = !self.held.contains(b);
        self.held.insert(b);
        fresh
    }

    /// Mark `button` as released. Returns `false` if it was not held.
    pub fn release(&mut self, button: MouseButton) -> bool {
        let b = Buttons::from(button);
        let was = self.held.contains(b);
        self.held.remove(b);
        was
    }

    /// Whether `button` is held.
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.held.contains(Buttons::from(button))
    }

    /// Every held button.
    pub fn held(&self) -> Buttons {
        self.held
    }
}

/// What a key-down meant relative to the keys already held.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyTransition {
    /// The key was up before.
    Pressed,
    /// The key was already down (auto-repeat).
    Repeated,
}

/// Edge detector for keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    held: Vec<Key>,
}

impl KeyState {
    /// Record a key-down.
    pub fn press(&mut self, key: Key) -> KeyTransition {
        if self.held.contains(&key) {
            KeyTransition::Repeated
        } else {
            self.held.push(key);
            KeyTransition::Pressed
        }
    }

    /// Record a key-up. Returns `false` for a key that was not held.
    pub fn release(&mut self, key: Key) -> bool {
        let before = self.held.len();
        self.held.retain(|k| *k != key);
        before != self.held.len()
    }

    /// Whether `key` is held.
    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}
