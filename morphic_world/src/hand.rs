// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hand: pointer state, grabbing and dropping.
//!
//! A grabbed morph is reparented under the hand node, a separate root that
//! is painted after the world and never hit tested. The hand remembers where
//! the morph came from so a refused or cancelled drop can put it back.

use core::fmt;

use kurbo::{Point, Rect, Vec2};
use morphic_input::click::{ClickConfig, ClickTracker};
use morphic_input::event::ButtonState;
use morphic_input::hover::HoverState;
use morphic_input::router::Router;

use crate::animation::Easing;
use crate::morph::{MorphFlags, MorphId};
use crate::world::World;

/// Where a held morph came from and how it hangs off the pointer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragSession {
    /// The held morph.
    pub morph: MorphId,
    /// Its parent before the grab.
    pub origin_parent: Option<MorphId>,
    /// Its z-index among the origin parent's children.
    pub origin_index: usize,
    /// Its origin before the grab.
    pub origin_position: Point,
    /// Pointer position minus morph origin.
    pub pick_offset: Vec2,
    /// Whether a button was held when the grab started. Grabs without one
    /// end with the next press.
    pub by_button: bool,
}

/// Pointer state of a [`World`].
pub struct Hand {
    pub(crate) node: MorphId,
    pub(crate) position: Point,
    pub(crate) buttons: ButtonState,
    pub(crate) drag: Option<DragSession>,
    pub(crate) candidate: Option<MorphId>,
    pub(crate) mouse_down: Option<MorphId>,
    pub(crate) temporaries: Vec<MorphId>,
    pub(crate) hover: HoverState<MorphId>,
    pub(crate) clicks: ClickTracker<MorphId>,
    pub(crate) router: Router<MorphId>,
}

impl fmt::Debug for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hand")
            .field("position", &self.position)
            .field("buttons", &self.buttons.held())
            .field("drag", &self.drag)
            .field("candidate", &self.candidate)
            .field("mouse_down", &self.mouse_down)
            .field("temporaries", &self.temporaries)
            .field("hover", &self.hover.current_path())
            .finish_non_exhaustive()
    }
}

impl Hand {
    pub(crate) fn new(node: MorphId, clicks: ClickConfig) -> Self {
        Self {
            node,
            position: Point::ORIGIN,
            buttons: ButtonState::default(),
            drag: None,
            candidate: None,
            mouse_down: None,
            temporaries: Vec::new(),
            hover: HoverState::new(),
            clicks: ClickTracker::new(clicks),
            router: Router::new(),
        }
    }

    /// The hand's own tree node; held morphs are its children.
    pub fn node(&self) -> MorphId {
        self.node
    }

    /// Last known pointer position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The morph being dragged.
    pub fn held(&self) -> Option<MorphId> {
        self.drag.map(|d| d.morph)
    }

    /// Whether a morph is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The current drag, if any.
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Morph the current press would grab once the pointer travels far enough.
    pub fn grab_candidate(&self) -> Option<MorphId> {
        self.candidate
    }

    /// Morph that received the current press.
    pub fn mouse_down_target(&self) -> Option<MorphId> {
        self.mouse_down
    }

    /// Transient overlays destroyed by the next press.
    pub fn temporaries(&self) -> &[MorphId] {
        &self.temporaries
    }

    /// Root→target path under the pointer as of the last move.
    pub fn hovered(&self) -> &[MorphId] {
        self.hover.current_path()
    }

    /// Drop every reference to `id`.
    pub(crate) fn forget(&mut self, id: MorphId) {
        if self.drag.is_some_and(|d| d.morph == id) {
            self.drag = None;
        }
        if self.candidate == Some(id) {
            self.candidate = None;
        }
        if self.mouse_down == Some(id) {
            self.mouse_down = None;
        }
        if self.router.captured() == Some(id) {
            self.router.capture(None);
        }
        self.temporaries.retain(|t| *t != id);
        self.hover.forget(id);
        self.clicks.forget(id);
    }
}

impl World {
    /// Pick `id` up into the hand, keeping its offset to the pointer.
    ///
    /// The morph stays held until the next button press drops it. Returns
    /// `false` if something is already held or `id` cannot be grabbed.
    pub fn grab(&mut self, id: MorphId) -> bool {
        let Some(b) = self.tree.bounds(id) else {
            return false;
        };
        let offset = self.hand.position - b.origin();
        self.pick_up(id, offset, false)
    }

    pub(crate) fn pick_up(&mut self, id: MorphId, pick_offset: Vec2, by_button: bool) -> bool {
        if self.hand.drag.is_some() {
            log::debug!("grab of {id:?} refused: hand is full");
            return false;
        }
        if id == self.root || id == self.hand.node || !self.tree.is_alive(id) {
            return false;
        }
        let Some(bounds) = self.tree.bounds(id) else {
            return false;
        };
        let origin_parent = self.tree.parent(id);
        let session = DragSession {
            morph: id,
            origin_parent,
            origin_index: self.tree.index_in_parent(id).unwrap_or(0),
            origin_position: bounds.origin(),
            pick_offset,
            by_button,
        };
        self.changed(id);
        if self.tree.add_child(self.hand.node, id).is_err() {
            return false;
        }
        self.hand.drag = Some(session);
        let target = self.hand.position - pick_offset;
        let _ = self.tree.move_by(id, target - bounds.origin());
        self.changed(id);
        log::debug!("grabbed {id:?} from {origin_parent:?}");
        if let Some(parent) = origin_parent {
            self.with_behavior(parent, |b, cx| b.react_to_grab_of(cx, id));
        }
        true
    }

    /// Keep the held morph under the pointer.
    pub(crate) fn drag_to(&mut self, pos: Point) {
        let Some(session) = self.hand.drag else {
            return;
        };
        self.set_position(session.morph, pos - session.pick_offset);
    }

    /// Drop the held morph onto whatever accepts it under the pointer.
    pub(crate) fn drop_held(&mut self) {
        let Some(session) = self.hand.drag.take() else {
            return;
        };
        let morph = session.morph;
        if !self.tree.is_alive(morph) {
            return;
        }
        let Some(target) = self.drop_target_for(morph) else {
            log::debug!("drop of {morph:?} refused, returning it");
            self.return_to_origin(session, true);
            return;
        };
        self.changed(morph);
        if self.tree.add_child(target, morph).is_err() {
            self.return_to_origin(session, true);
            return;
        }
        self.changed(morph);
        log::debug!("dropped {morph:?} onto {target:?}");
        self.with_behavior(target, |b, cx| b.react_to_drop_of(cx, morph));
        self.with_behavior(morph, |b, cx| b.just_dropped(cx));
    }

    /// Abort the current drag: the held morph goes back where it came from.
    pub fn cancel_drag(&mut self) {
        if let Some(session) = self.hand.drag.take() {
            log::debug!("drag of {:?} cancelled", session.morph);
            self.return_to_origin(session, false);
        }
    }

    /// The morph under the pointer, or its nearest ancestor, that takes `morph`.
    fn drop_target_for(&self, morph: MorphId) -> Option<MorphId> {
        let mut cur = self.top_morph_at(self.hand.position);
        while let Some(id) = cur {
            let state = self.tree.get(id)?;
            let wants = state
                .behavior
                .as_deref()
                .is_some_and(|b| b.wants_drop_of(morph, self));
            if state.flags.contains(MorphFlags::ACCEPTS_DROPS) && wants {
                return Some(id);
            }
            cur = self.tree.parent(id);
        }
        None
    }

    fn return_to_origin(&mut self, session: DragSession, may_slide: bool) {
        let morph = session.morph;
        let parent = session
            .origin_parent
            .filter(|p| self.tree.is_alive(*p))
            .unwrap_or(self.root);
        self.changed(morph);
        if self
            .tree
            .add_child_at(parent, morph, session.origin_index)
            .is_err()
        {
            // The origin became a descendant of the morph; fall back to the world.
            let _ = self.tree.add_child(self.root, morph);
        }
        let slide_ms = self.settings.slide_back_ms;
        if may_slide && slide_ms > 0.0 {
            self.changed(morph);
            self.slide_to(morph, session.origin_position, slide_ms, Easing::default());
        } else if let Some(b) = self.tree.bounds(morph) {
            let _ = self.tree.move_by(morph, session.origin_position - b.origin());
            self.changed(morph);
        }
    }

    /// Show `id` as a transient overlay on the world, replacing the current ones.
    ///
    /// Temporaries are destroyed by the next button press.
    pub fn show_temporary(&mut self, id: MorphId) {
        self.destroy_temporaries();
        if !self.tree.is_alive(id) {
            return;
        }
        if !self.is_live(id) && self.tree.add_child(self.root, id).is_err() {
            return;
        }
        self.changed(id);
        self.hand.temporaries.push(id);
    }

    /// Destroy every temporary overlay.
    pub fn destroy_temporaries(&mut self) {
        for id in core::mem::take(&mut self.hand.temporaries) {
            self.destroy(id);
        }
    }

    pub(crate) fn set_hand_position(&mut self, pos: Point) {
        self.hand.position = pos;
        let _ = self
            .tree
            .set_bounds(self.hand.node, Rect::from_origin_size(pos, (0.0, 0.0)));
    }
}
