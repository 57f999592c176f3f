// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click disambiguation: press, drag threshold, click and double click.
//!
//! A press followed by a release on the same node, without the pointer
//! travelling past the drag threshold in between, is a click. A second left
//! click on the same node close enough in time and space is reported as a
//! double click instead of a second single click.

use kurbo::Point;

use crate::event::MouseButton;

/// Tunables for [`ClickTracker`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClickConfig {
    /// Maximum delay between two clicks of a double click, in milliseconds.
    pub double_click_ms: f64,
    /// Maximum pointer distance between two clicks of a double click.
    pub double_click_radius: f64,
    /// Pointer travel after a press beyond which the gesture is a drag.
    pub drag_threshold: f64,
}

/// Result of a release.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ClickKind {
    /// An ordinary click.
    Single,
    /// The second click of a double click.
    Double,
}

#[derive(Copy, Clone, Debug)]
struct Press<K> {
    target: K,
    button: MouseButton,
    at: Point,
    dragged: bool,
}

#[derive(Copy, Clone, Debug)]
struct LastClick<K> {
    target: K,
    at: Point,
    time: f64,
}

/// Tracks one press at a time and remembers the last click.
#[derive(Clone, Debug)]
pub struct ClickTracker<K> {
    config: ClickConfig,
    press: Option<Press<K>>,
    last_click: Option<LastClick<K>>,
}

impl<K: Copy + Eq> ClickTracker<K> {
    /// Create a tracker.
    pub fn new(config: ClickConfig) -> Self {
        Self {
            config,
            press: None,
            last_click: None,
        }
    }

    /// Current tunables.
    pub fn config(&self) -> ClickConfig {
        self.config
    }

    /// Replace the tunables.
    pub fn set_config(&mut self, config: ClickConfig) {
        self.config = config;
    }

    /// Start tracking a press on `target`. A press replaces any unfinished one.
    pub fn press(&mut self, target: K, button: MouseButton, at: Point) {
        self.press = Some(Press {
            target,
            button,
            at,
            dragged: false,
        });
    }

    /// Position of the unfinished press.
    pub fn press_origin(&self) -> Option<Point> {
        self.press.map(|p| p.at)
    }

    /// Report pointer travel. Returns `true` exactly once, when a press first
    /// exceeds the drag threshold.
    pub fn moved(&mut self, to: Point) -> bool {
        let threshold = self.config.drag_threshold;
        let Some(p) = self.press.as_mut() else {
            return false;
        };
        if p.dragged || (to - p.at).hypot2() <= threshold * threshold {
            return false;
        }
        p.dragged = true;
        true
    }

    /// Whether the unfinished press has turned into a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragged)
    }

    /// Finish the press with a release over `target`.
    pub fn release(
        &mut self,
        target: Option<K>,
        button: MouseButton,
        at: Point,
        time: f64,
    ) -> Option<ClickKind> {
        let press = self.press.take()?;
        if press.button != button || press.dragged || Some(press.target) != target {
            return None;
        }
        if button != MouseButton::Left {
            return Some(ClickKind::Single);
        }
        let r = self.config.double_click_radius;
        let is_double = self.last_click.is_some_and(|last| {
            last.target == press.target
                && time - last.time <= self.config.double_click_ms
                && (at - last.at).hypot2() <= r * r
        });
        if is_double {
            self.last_click = None;
            Some(ClickKind::Double)
        } else {
            self.last_click = Some(LastClick {
                target: press.target,
                at,
                time,
            });
            Some(ClickKind::Single)
        }
    }

    /// Forget everything about `node`, e.g. because it was destroyed.
    pub fn forget(&mut self, node: K) {
        if self.press.is_some_and(|p| p.target == node) {
            self.press = None;
        }
        if self.last_click.is_some_and(|c| c.target == node) {
            self.last_click = None;
        }
    }
}
