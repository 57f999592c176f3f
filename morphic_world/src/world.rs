// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The world: root morph, tree access and engine singletons.

use std::collections::VecDeque;
use std::fmt;

use kurbo::{Insets, Point, Rect, Size, Vec2};
use morphic_input::event::{InputEvent, KeyState};
use morphic_tree::{NodeFlags, NodeGeometry, Tree, TreeError};

use crate::animation::{Animation, AnimationId};
use crate::color::Color;
use crate::compositor::Compositor;
use crate::cx::MorphCx;
use crate::error::LayoutError;
use crate::hand::Hand;
use crate::image::Image;
use crate::morph::{Morph, MorphFlags, MorphId, MorphState, PlainMorph};
use crate::settings::Settings;

/// Background of a fresh world.
const WORLD_COLOR: Color = Color::rgb8(205, 205, 205);

/// Owner of the morph tree and of everything that is global to it.
///
/// ```
/// use kurbo::{Rect, Size};
/// use morphic_world::{Canvas, PlainMorph, World};
///
/// let mut world = World::new(Size::new(64.0, 64.0));
/// let box_ = world.create(Rect::new(8.0, 8.0, 24.0, 24.0), PlainMorph);
/// world.add_child(world.root(), box_).unwrap();
/// world.changed(box_);
///
/// let mut canvas = Canvas::new(64, 64).unwrap();
/// let report = world.run_one_cycle(0.0, &mut canvas).unwrap();
/// assert_eq!(report.flush.rects, 1);
/// ```
pub struct World {
    pub(crate) tree: Tree<MorphState>,
    pub(crate) root: MorphId,
    pub(crate) hand: Hand,
    pub(crate) compositor: Compositor,
    pub(crate) animations: Vec<(AnimationId, Animation<World>)>,
    pub(crate) next_animation: u64,
    pub(crate) keyboard_receiver: Option<MorphId>,
    pub(crate) active_menu: Option<MorphId>,
    pub(crate) focus_before_menu: Option<MorphId>,
    pub(crate) settings: Settings,
    pub(crate) input: VecDeque<InputEvent>,
    pub(crate) keys: KeyState,
    pub(crate) now: f64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("root", &self.root)
            .field("morphs", &self.tree.len())
            .field("hand", &self.hand)
            .field("broken", &self.compositor.broken().len())
            .field("animations", &self.animations.len())
            .field("keyboard_receiver", &self.keyboard_receiver)
            .field("active_menu", &self.active_menu)
            .field("queued_input", &self.input.len())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl World {
    /// A world of `size` with default [`Settings`].
    pub fn new(size: Size) -> Self {
        Self::with_settings(size, Settings::default())
    }

    /// A world of `size` with the given tunables.
    pub fn with_settings(size: Size, settings: Settings) -> Self {
        let mut tree = Tree::new();
        let bounds = size.to_rect();
        let mut root_state = MorphState::new(Box::new(PlainMorph), WORLD_COLOR);
        root_state.flags = MorphFlags::ACCEPTS_DROPS;
        root_state.image = Image::for_size(size, WORLD_COLOR);
        let root = tree.insert(NodeGeometry::with_bounds(bounds), root_state);

        // The hand is a separate root: painted last, never hit.
        let hand_geometry = NodeGeometry {
            bounds: Rect::ZERO,
            outset: Insets::ZERO,
            flags: NodeFlags::VISIBLE,
        };
        let hand_node = tree.insert(
            hand_geometry,
            MorphState::new(Box::new(PlainMorph), Color::TRANSPARENT),
        );

        let mut compositor = Compositor::default();
        compositor.invalidate(bounds);
        Self {
            tree,
            root,
            hand: Hand::new(hand_node, settings.click_config()),
            compositor,
            animations: Vec::new(),
            next_animation: 0,
            keyboard_receiver: None,
            active_menu: None,
            focus_before_menu: None,
            settings,
            input: VecDeque::new(),
            keys: KeyState::default(),
            now: 0.0,
        }
    }

    /// The root morph.
    pub fn root(&self) -> MorphId {
        self.root
    }

    /// The pointer.
    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Current tunables.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the tunables.
    pub fn set_settings(&mut self, settings: Settings) {
        self.hand.clicks.set_config(settings.click_config());
        self.settings = settings;
    }

    /// Time of the current cycle, in milliseconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of live or detached morphs, world root and hand included.
    pub fn morph_count(&self) -> usize {
        self.tree.len()
    }

    // --- creation and lookup ---

    /// Create a detached morph filled with the default gray.
    pub fn create(&mut self, bounds: Rect, morph: impl Morph) -> MorphId {
        self.create_boxed(bounds, Box::new(morph))
    }

    /// Create a detached morph from an already boxed behavior.
    pub fn create_boxed(&mut self, bounds: Rect, morph: Box<dyn Morph>) -> MorphId {
        let image = morph.render(bounds.size(), Color::GRAY);
        let mut state = MorphState::new(morph, Color::GRAY);
        state.image = image;
        self.tree.insert(NodeGeometry::with_bounds(bounds), state)
    }

    /// Whether `id` refers to a morph that has not been destroyed.
    pub fn is_alive(&self, id: MorphId) -> bool {
        self.tree.is_alive(id)
    }

    /// Whether `id` is attached under the world root or the hand.
    pub fn is_live(&self, id: MorphId) -> bool {
        self.tree
            .root_of(id)
            .is_some_and(|r| r == self.root || r == self.hand.node)
    }

    /// The behavior of `id`, if it is a `T` and no hook of it is running.
    pub fn morph<T: Morph>(&self, id: MorphId) -> Option<&T> {
        let behavior: &dyn Morph = self.tree.get(id)?.behavior.as_deref()?;
        (behavior as &dyn core::any::Any).downcast_ref::<T>()
    }

    /// Mutable access to the behavior of `id`, if it is a `T`.
    pub fn morph_mut<T: Morph>(&mut self, id: MorphId) -> Option<&mut T> {
        let behavior: &mut dyn Morph = self.tree.get_mut(id)?.behavior.as_deref_mut()?;
        (behavior as &mut dyn core::any::Any).downcast_mut::<T>()
    }

    /// Structural parent of `id`.
    pub fn parent(&self, id: MorphId) -> Option<MorphId> {
        self.tree.parent(id)
    }

    /// Children of `id`, bottom-most first.
    pub fn children(&self, id: MorphId) -> &[MorphId] {
        self.tree.children(id)
    }

    /// Bounds of `id`.
    pub fn bounds(&self, id: MorphId) -> Option<Rect> {
        self.tree.bounds(id)
    }

    /// Painted bounds of `id` merged with those of its visible descendants.
    pub fn full_bounds(&self, id: MorphId) -> Option<Rect> {
        self.tree.full_bounds(id)
    }

    /// The ancestor of `id` that sits directly under the world root or the hand.
    ///
    /// For a detached morph this is the root of its subtree. The world root
    /// and the hand have none.
    pub fn top_level_ancestor(&self, id: MorphId) -> Option<MorphId> {
        if id == self.root || id == self.hand.node || !self.tree.is_alive(id) {
            return None;
        }
        let mut cur = id;
        while let Some(p) = self.tree.parent(cur) {
            if p == self.root || p == self.hand.node {
                break;
            }
            cur = p;
        }
        Some(cur)
    }

    /// Topmost visible, pickable morph of the world under `pt`.
    ///
    /// Morphs held by the hand are never returned.
    pub fn top_morph_at(&self, pt: Point) -> Option<MorphId> {
        self.hit_path(pt).last().copied()
    }

    /// Root→target path of the morph under `pt`; empty if none.
    pub(crate) fn hit_path(&self, pt: Point) -> Vec<MorphId> {
        let threshold = self.settings.transparent_alpha;
        let tree = &self.tree;
        tree.hit_test(self.root, pt, |id, state, p| {
            tree.bounds(id)
                .is_none_or(|b| state.is_transparent_at(b, p, threshold))
        })
        .map(|hit| hit.path)
        .unwrap_or_default()
    }

    // --- structure ---

    /// Append `child` as the topmost child of `parent`. Records no damage.
    ///
    /// The hand and everything it holds refuse new children. Moving the held
    /// morph out of the hand ends the drag without a drop.
    pub fn add_child(&mut self, parent: MorphId, child: MorphId) -> Result<(), TreeError> {
        self.check_link(parent, child)?;
        self.tree.add_child(parent, child)?;
        self.release_if_held(child);
        Ok(())
    }

    /// Insert `child` as the bottom-most child of `parent`. Records no damage.
    pub fn add_child_first(&mut self, parent: MorphId, child: MorphId) -> Result<(), TreeError> {
        self.check_link(parent, child)?;
        self.tree.add_child_first(parent, child)?;
        self.release_if_held(child);
        Ok(())
    }

    /// Detach `child` from `parent`. Records no damage.
    pub fn remove_child(&mut self, parent: MorphId, child: MorphId) -> Result<(), TreeError> {
        self.tree.remove_child(parent, child)?;
        self.release_if_held(child);
        Ok(())
    }

    /// Refuse links that would move the root or the hand, or put a second
    /// morph into the hand.
    fn check_link(&self, parent: MorphId, child: MorphId) -> Result<(), TreeError> {
        let reserved = child == self.root
            || child == self.hand.node
            || self.tree.root_of(parent) == Some(self.hand.node);
        if reserved {
            return Err(TreeError::Reserved { parent, child });
        }
        Ok(())
    }

    fn release_if_held(&mut self, id: MorphId) {
        if self.hand.held() == Some(id) {
            log::debug!("{id:?} left the hand outside of a drop");
            self.hand.drag = None;
        }
    }

    /// Detach `id` from its parent, damaging its last footprint.
    pub fn detach(&mut self, id: MorphId) {
        self.changed(id);
        self.tree.detach(id);
        self.release_if_held(id);
    }

    /// Raise `id` above its siblings.
    pub fn come_to_front(&mut self, id: MorphId) {
        self.tree.come_to_front(id);
        self.changed(id);
    }

    /// Destroy `id` and its whole subtree.
    ///
    /// Idempotent. Clears every engine reference to the destroyed morphs:
    /// keyboard focus, the active menu, the hand's held morph, grab
    /// candidate, mouse-down target, temporaries and hover path.
    pub fn destroy(&mut self, id: MorphId) {
        if id == self.root || id == self.hand.node || !self.tree.is_alive(id) {
            return;
        }
        self.changed(id);
        let removed = self.tree.remove(id);
        log::debug!("destroyed {id:?} with {} morph(s)", removed.len());
        for (gone, _state) in removed {
            self.forget(gone);
        }
    }

    fn forget(&mut self, id: MorphId) {
        if self.keyboard_receiver == Some(id) {
            self.keyboard_receiver = None;
        }
        if self.focus_before_menu == Some(id) {
            self.focus_before_menu = None;
        }
        if self.active_menu == Some(id) {
            self.active_menu = None;
            let previous = self.focus_before_menu.take();
            if self.keyboard_receiver.is_none() {
                self.keyboard_receiver = previous.filter(|p| self.tree.is_alive(*p));
            }
        }
        self.hand.forget(id);
    }

    // --- geometry ---

    /// Replace the bounds of `id` alone. Records no damage and leaves the
    /// children where they are.
    ///
    /// Non-finite bounds are refused and the previous bounds kept.
    pub fn set_bounds(&mut self, id: MorphId, bounds: Rect) -> Result<(), TreeError> {
        self.tree.set_bounds(id, bounds).inspect_err(|e| {
            log::warn!("set_bounds refused: {e}");
        })
    }

    /// Translate `id` and its subtree.
    pub fn move_by(&mut self, id: MorphId, delta: Vec2) {
        if !delta.is_finite() || delta == Vec2::ZERO {
            return;
        }
        self.changed(id);
        if self.tree.move_by(id, delta).is_ok() {
            self.changed(id);
        }
    }

    /// Move `id` and its subtree so its origin lands on `pos`.
    pub fn set_position(&mut self, id: MorphId, pos: Point) {
        if let Some(b) = self.tree.bounds(id) {
            self.move_by(id, pos - b.origin());
        }
    }

    /// Resize `id` keeping its origin, then re-render it.
    pub fn set_extent(&mut self, id: MorphId, size: Size) {
        let Some(b) = self.tree.bounds(id) else {
            return;
        };
        let next = Rect::from_origin_size(b.origin(), size);
        if !next.is_finite() {
            log::warn!("set_extent refused non-finite size {size:?} for {id:?}");
            return;
        }
        self.changed(id);
        if self.tree.set_bounds(id, next).is_ok() {
            self.rerender(id);
        }
    }

    /// Set the decoration outset (e.g. a shadow) painted around `id`.
    pub fn set_outset(&mut self, id: MorphId, outset: Insets) {
        self.changed(id);
        if self.tree.set_outset(id, outset).is_ok() {
            self.changed(id);
        }
    }

    /// Ask the behavior of `id` for new bounds and apply them.
    ///
    /// On failure the previous bounds are kept and nothing is damaged.
    pub fn fix_layout(&mut self, id: MorphId) -> Result<(), LayoutError> {
        let Some(current) = self.tree.bounds(id) else {
            return Ok(());
        };
        let Some(result) = self.with_behavior(id, |b, _| b.layout(current)) else {
            return Ok(());
        };
        let next = result.inspect_err(|e| log::warn!("layout of {id:?} failed: {e}"))?;
        if next == current {
            return Ok(());
        }
        if !next.is_finite() {
            let err = LayoutError::Tree(TreeError::NonFiniteBounds(id));
            log::warn!("layout of {id:?} failed: {err}");
            return Err(err);
        }
        self.changed(id);
        self.tree.set_bounds(id, next)?;
        if next.size() != current.size() {
            self.rerender(id);
        } else {
            self.changed(id);
        }
        Ok(())
    }

    // --- appearance ---

    /// Whether `id` is visible itself (its ancestors may still hide it).
    pub fn is_visible(&self, id: MorphId) -> bool {
        self.tree
            .flags(id)
            .is_some_and(|f| f.contains(NodeFlags::VISIBLE))
    }

    /// Hide `id`, damaging its last footprint.
    pub fn hide(&mut self, id: MorphId) {
        if !self.is_visible(id) {
            return;
        }
        self.changed(id);
        self.update_node_flags(id, NodeFlags::VISIBLE, false);
    }

    /// Show `id` again.
    pub fn show(&mut self, id: MorphId) {
        if self.is_visible(id) || !self.tree.is_alive(id) {
            return;
        }
        self.update_node_flags(id, NodeFlags::VISIBLE, true);
        self.changed(id);
    }

    /// Let clicks on transparent pixels of `id` reach `id` instead of what lies below.
    pub fn set_notices_transparent_click(&mut self, id: MorphId, on: bool) {
        self.update_node_flags(id, NodeFlags::NOTICES_TRANSPARENT_CLICK, on);
    }

    /// Make `id` invisible to hit testing, together with its subtree.
    pub fn set_pickable(&mut self, id: MorphId, on: bool) {
        self.update_node_flags(id, NodeFlags::PICKABLE, on);
    }

    fn update_node_flags(&mut self, id: MorphId, flag: NodeFlags, on: bool) {
        if let Some(mut flags) = self.tree.flags(id) {
            flags.set(flag, on);
            let _ = self.tree.set_flags(id, flags);
        }
    }

    /// Interaction flags of `id`.
    pub fn morph_flags(&self, id: MorphId) -> MorphFlags {
        self.tree.get(id).map(|s| s.flags).unwrap_or_default()
    }

    /// Let the hand pick `id` up.
    pub fn set_draggable(&mut self, id: MorphId, on: bool) {
        if let Some(state) = self.tree.get_mut(id) {
            state.flags.set(MorphFlags::DRAGGABLE, on);
        }
    }

    /// Let other morphs be dropped onto `id`.
    pub fn set_accepts_drops(&mut self, id: MorphId, on: bool) {
        if let Some(state) = self.tree.get_mut(id) {
            state.flags.set(MorphFlags::ACCEPTS_DROPS, on);
        }
    }

    /// Opacity of `id`.
    pub fn alpha(&self, id: MorphId) -> Option<f64> {
        self.tree.get(id).map(|s| s.alpha)
    }

    /// Set the opacity of `id`, clamped to `0..=1`.
    pub fn set_alpha(&mut self, id: MorphId, alpha: f64) {
        if !alpha.is_finite() {
            return;
        }
        if let Some(state) = self.tree.get_mut(id) {
            state.alpha = alpha.clamp(0.0, 1.0);
            self.changed(id);
        }
    }

    /// Color of `id`.
    pub fn color(&self, id: MorphId) -> Option<Color> {
        self.tree.get(id).map(|s| s.color)
    }

    /// Set the color of `id` and re-render it.
    pub fn set_color(&mut self, id: MorphId, color: Color) {
        let Some(state) = self.tree.get_mut(id) else {
            return;
        };
        if state.color == color {
            return;
        }
        state.color = color;
        self.rerender(id);
    }

    /// Cached image of `id`.
    pub fn image(&self, id: MorphId) -> Option<&Image> {
        self.tree.get(id)?.image.as_ref()
    }

    /// Replace the cached image of `id`; `None` makes it fully transparent.
    pub fn set_image(&mut self, id: MorphId, image: Option<Image>) {
        if let Some(state) = self.tree.get_mut(id) {
            state.image = image;
            self.changed(id);
        }
    }

    /// Rebuild the cached image of `id` from its behavior.
    ///
    /// Skipped while a hook of `id` is running; call it again afterwards.
    pub fn rerender(&mut self, id: MorphId) {
        let Some(bounds) = self.tree.bounds(id) else {
            return;
        };
        let Some(state) = self.tree.get_mut(id) else {
            return;
        };
        let Some(behavior) = state.behavior.as_deref() else {
            log::debug!("rerender of busy {id:?} skipped");
            return;
        };
        state.image = behavior.render(bounds.size(), state.color);
        self.changed(id);
    }

    // --- focus ---

    /// The morph receiving key events.
    pub fn keyboard_receiver(&self) -> Option<MorphId> {
        self.keyboard_receiver
    }

    /// Route key events to `id`. The previous receiver is not notified.
    pub fn set_keyboard_receiver(&mut self, id: Option<MorphId>) {
        let id = id.filter(|i| self.tree.is_alive(*i));
        if id != self.keyboard_receiver {
            log::debug!("keyboard focus {:?} -> {id:?}", self.keyboard_receiver);
        }
        self.keyboard_receiver = id;
    }

    // --- hooks ---

    /// Run `f` once at the start of the next scheduler pass, if `id` still exists then.
    pub fn on_next_step(&mut self, id: MorphId, f: impl FnOnce(&mut Self) + 'static) {
        if let Some(state) = self.tree.get_mut(id) {
            state.on_next_step.push(Box::new(f));
        }
    }

    /// Run `f` with the behavior of `id` taken out of the tree.
    ///
    /// Returns `None` if `id` is stale or one of its hooks is already running.
    /// The behavior is put back unless `id` was destroyed meanwhile.
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: MorphId,
        f: impl FnOnce(&mut dyn Morph, &mut MorphCx<'_>) -> R,
    ) -> Option<R> {
        let mut behavior = self.tree.get_mut(id)?.behavior.take()?;
        let out = {
            let mut cx = MorphCx { world: self, id };
            f(behavior.as_mut(), &mut cx)
        };
        if let Some(state) = self.tree.get_mut(id) {
            state.behavior = Some(behavior);
        }
        Some(out)
    }
}
