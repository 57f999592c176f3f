// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input dispatch: from normalized events to morph hooks.
//!
//! Pointer events are resolved with a hit test, then offered to the target
//! and its ancestors until a hook stops them. A press captures the pointer
//! for the handler that took it until the button is released. Key events
//! only ever reach the keyboard receiver.

use core::mem;

use kurbo::{Point, Vec2};
use morphic_input::click::ClickKind;
use morphic_input::event::{InputEvent, Key, KeyTransition, MouseButton};
use morphic_input::hover::HoverEvent;
use morphic_input::router::{Dispatch, Outcome, ParentLookup, deliver};
use morphic_tree::Tree;

use crate::cx::MorphCx;
use crate::morph::{MorphFlags, MorphId, MorphState, PointerTarget};
use crate::world::World;

struct TreeParents<'a>(&'a Tree<MorphState>);

impl ParentLookup<MorphId> for TreeParents<'_> {
    fn parent_of(&self, node: &MorphId) -> Option<MorphId> {
        self.0.parent(*node)
    }
}

impl World {
    /// Queue `event` for the next [`World::run_one_cycle`].
    pub fn queue_input(&mut self, event: InputEvent) {
        self.input.push_back(event);
    }

    /// Number of queued events.
    pub fn queued_input(&self) -> usize {
        self.input.len()
    }

    /// Process the events queued so far; events queued meanwhile wait.
    pub(crate) fn process_queued_input(&mut self) -> usize {
        let batch = mem::take(&mut self.input);
        let count = batch.len();
        for event in batch {
            self.handle_input(event);
        }
        count
    }

    /// Process one event right away.
    ///
    /// Click and double-click timing use [`World::now`], which only moves
    /// when a cycle steps. Hosts delivering events between cycles should use
    /// [`World::handle_input_at`] with the event's own timestamp.
    pub fn handle_input(&mut self, event: InputEvent) {
        log::trace!("input {event:?}");
        match event {
            InputEvent::PointerMoved(pos) => self.pointer_moved(pos),
            InputEvent::ButtonDown(button) => self.button_down(button),
            InputEvent::ButtonUp(button) => self.button_up(button),
            InputEvent::Wheel(delta) => self.wheel(delta),
            InputEvent::KeyDown(key) => self.key_down(key),
            InputEvent::KeyUp(key) => self.key_up(key),
        }
    }

    /// Process one event that happened at `time` milliseconds.
    ///
    /// Advances [`World::now`] to `time`; earlier or non-finite times leave
    /// the clock alone.
    pub fn handle_input_at(&mut self, event: InputEvent, time: f64) {
        if time.is_finite() && time > self.now {
            self.now = time;
        }
        self.handle_input(event);
    }

    fn pointer_moved(&mut self, pos: Point) {
        if !pos.is_finite() {
            log::warn!("ignoring non-finite pointer position {pos:?}");
            return;
        }
        self.set_hand_position(pos);
        if self.hand.clicks.moved(pos) {
            self.start_drag_from_press();
        }
        if self.hand.drag.is_some() {
            self.drag_to(pos);
        }

        let path = self.hit_path(pos);
        self.update_hover(&path);

        if self.hand.drag.is_none() {
            let buttons = self.hand.buttons.held();
            let seq = self.route(path.last().copied());
            self.deliver_pointer(&seq, |p, cx| p.mouse_move(cx, pos, buttons));
        }
    }

    /// The press travelled past the drag threshold: grab the candidate if it lets us.
    fn start_drag_from_press(&mut self) {
        let Some(candidate) = self.hand.candidate.take() else {
            return;
        };
        if !self.morph_flags(candidate).contains(MorphFlags::DRAGGABLE) {
            return;
        }
        let (Some(press), Some(bounds)) =
            (self.hand.clicks.press_origin(), self.tree.bounds(candidate))
        else {
            return;
        };
        if self.pick_up(candidate, press - bounds.origin(), true) {
            self.hand.router.capture(None);
        }
    }

    fn update_hover(&mut self, path: &[MorphId]) {
        let transitions = self.hand.hover.update_path(path);
        let dragged = self.hand.held();
        for t in transitions {
            match (t, dragged) {
                (HoverEvent::Enter(id), None) => {
                    self.with_pointer(id, |p, cx| p.mouse_enter(cx));
                }
                (HoverEvent::Leave(id), None) => {
                    self.with_pointer(id, |p, cx| p.mouse_leave(cx));
                }
                (HoverEvent::Enter(id), Some(d)) => {
                    self.with_pointer(id, |p, cx| p.mouse_enter_dragging(cx, d));
                }
                (HoverEvent::Leave(id), Some(d)) => {
                    self.with_pointer(id, |p, cx| p.mouse_leave_dragging(cx, d));
                }
            }
        }
    }

    fn button_down(&mut self, button: MouseButton) {
        if !self.hand.buttons.press(button) {
            return;
        }
        self.destroy_temporaries();
        if let Some(session) = self.hand.drag {
            // A grab made without a button ends with this press.
            if !session.by_button {
                self.drop_held();
            }
            return;
        }
        let pos = self.hand.position;
        let target = self.top_morph_at(pos);
        if let Some(menu) = self.active_menu
            && target.is_none_or(|t| !self.tree.is_ancestor_of(menu, t))
        {
            log::debug!("press outside {menu:?} closes it");
            self.destroy(menu);
        }
        let Some(target) = target else {
            return;
        };

        self.hand.candidate = match button {
            MouseButton::Left => self.grab_root_for(target),
            _ => None,
        };
        self.hand.mouse_down = Some(target);
        self.hand.clicks.press(target, button, pos);

        let seq = self.route(Some(target));
        let handled = self.deliver_pointer(&seq, |p, cx| match button {
            MouseButton::Left => p.mouse_down_left(cx, pos),
            MouseButton::Right => p.mouse_down_right(cx, pos),
            MouseButton::Middle => Outcome::Continue,
        });
        let capture = handled.filter(|h| self.tree.is_alive(*h));
        self.hand.router.capture(capture);
    }

    fn grab_root_for(&self, target: MorphId) -> Option<MorphId> {
        let behavior = self.tree.get(target)?.behavior.as_deref()?;
        behavior.root_for_grab(target, self)
    }

    fn button_up(&mut self, button: MouseButton) {
        if !self.hand.buttons.release(button) {
            return;
        }
        let pos = self.hand.position;
        let dragging = self.hand.drag.is_some_and(|s| s.by_button);
        if dragging && button == MouseButton::Left {
            self.drop_held();
            let _ = self.hand.clicks.release(None, button, pos, self.now);
            self.end_press();
            return;
        }

        let target = self.top_morph_at(pos);
        let click = self.hand.clicks.release(target, button, pos, self.now);
        self.end_press();
        let Some(kind) = click else {
            return;
        };
        let seq = self.route(target);
        self.deliver_pointer(&seq, |p, cx| match (kind, button) {
            (ClickKind::Double, _) => p.mouse_double_click(cx, pos),
            (ClickKind::Single, MouseButton::Left) => p.mouse_click_left(cx, pos),
            (ClickKind::Single, MouseButton::Right) => p.mouse_click_right(cx, pos),
            (ClickKind::Single, MouseButton::Middle) => Outcome::Continue,
        });
    }

    fn end_press(&mut self) {
        if self.hand.buttons.held().is_empty() {
            self.hand.router.capture(None);
            self.hand.mouse_down = None;
            self.hand.candidate = None;
        }
    }

    fn wheel(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        let target = self.top_morph_at(self.hand.position);
        let seq = self.route(target);
        self.deliver_pointer(&seq, |p, cx| p.mouse_scroll(cx, delta));
    }

    fn key_down(&mut self, key: Key) {
        let repeat = self.keys.press(key) == KeyTransition::Repeated;
        let Some(receiver) = self.keyboard_receiver else {
            log::trace!("{key:?} dropped: no keyboard receiver");
            return;
        };
        self.with_behavior(receiver, |b, cx| {
            if let Some(k) = b.keyboard() {
                k.key_down(cx, key, repeat);
            }
        });
    }

    fn key_up(&mut self, key: Key) {
        self.keys.release(key);
        let Some(receiver) = self.keyboard_receiver else {
            return;
        };
        self.with_behavior(receiver, |b, cx| {
            if let Some(k) = b.keyboard() {
                k.key_up(cx, key);
            }
        });
    }

    fn route(&self, target: Option<MorphId>) -> Vec<Dispatch<MorphId>> {
        self.hand.router.route(target, &TreeParents(&self.tree))
    }

    fn with_pointer<R>(
        &mut self,
        id: MorphId,
        f: impl FnOnce(&mut dyn PointerTarget, &mut MorphCx<'_>) -> R,
    ) -> Option<R> {
        self.with_behavior(id, |b, cx| b.pointer().map(|p| f(p, cx)))
            .flatten()
    }

    fn deliver_pointer(
        &mut self,
        seq: &[Dispatch<MorphId>],
        mut f: impl FnMut(&mut dyn PointerTarget, &mut MorphCx<'_>) -> Outcome,
    ) -> Option<MorphId> {
        deliver(seq, |d| {
            self.with_pointer(d.node, &mut f)
                .unwrap_or(Outcome::Continue)
        })
    }
}
