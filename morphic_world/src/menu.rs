// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pop-up menus, their keyboard state machine and the actions they trigger.
//!
//! At most one menu is active in a world; popping up another destroys the
//! current one. Submenus are children of the menu that opened them, so
//! destroying the top menu takes the whole cascade down.

use core::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect};
use morphic_input::event::{Buttons, Key};
use morphic_input::router::Outcome;

use crate::color::Color;
use crate::cx::{DrawCx, MorphCx};
use crate::error::SurfaceError;
use crate::morph::{KeyTarget, Morph, MorphId, PointerTarget};
use crate::surface::Surface;
use crate::world::World;

const MENU_COLOR: Color = Color::rgb8(244, 244, 244);
const HIGHLIGHT_COLOR: Color = Color::rgb8(100, 140, 210);
const DISABLED_VEIL: Color = Color::rgba8(255, 255, 255, 140);

/// A message a menu can send to a morph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    /// [`World::destroy`].
    Destroy,
    /// [`World::hide`].
    Hide,
    /// [`World::show`].
    Show,
    /// [`World::come_to_front`].
    ComeToFront,
    /// [`World::grab`]; the next press drops the morph.
    PickUp,
    /// Delivered to the target's [`Morph::perform`].
    Custom(u32),
}

/// What activating a menu item does.
#[derive(Clone)]
pub enum Action {
    /// Run a closure against the world.
    Callback(Rc<dyn Fn(&mut World)>),
    /// Send `selector` to `target`.
    Method {
        /// Receiver of the selector.
        target: MorphId,
        /// The message.
        selector: Selector,
    },
}

impl Action {
    /// Wrap a closure.
    pub fn callback(f: impl Fn(&mut World) + 'static) -> Self {
        Self::Callback(Rc::new(f))
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::Method { target, selector } => f
                .debug_struct("Method")
                .field("target", target)
                .field("selector", selector)
                .finish(),
        }
    }
}

/// One row of a [`Menu`].
#[derive(Clone, Debug)]
pub struct MenuItem {
    /// Text shown for the row.
    pub label: String,
    /// Run on activation; rows with a submenu open it instead.
    pub action: Option<Action>,
    /// Items of the submenu opened by this row.
    pub submenu: Vec<MenuItem>,
    /// Disabled rows are skipped by keyboard navigation and ignore clicks.
    pub enabled: bool,
}

impl MenuItem {
    /// A row running `action`.
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action: Some(action),
            submenu: Vec::new(),
            enabled: true,
        }
    }

    /// A row opening a submenu.
    pub fn submenu(label: impl Into<String>, items: Vec<Self>) -> Self {
        Self {
            label: label.into(),
            action: None,
            submenu: items,
            enabled: true,
        }
    }

    /// The same row, disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether activating the row opens a submenu.
    pub fn has_submenu(&self) -> bool {
        !self.submenu.is_empty()
    }
}

/// Keyboard state of a menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuState {
    /// Nothing highlighted.
    NoSelection,
    /// Row `i` highlighted.
    ItemSelected(usize),
    /// Row `i` highlighted with its submenu open.
    SubmenuOpen(usize),
}

/// Selection logic of a menu, independent of any morph.
///
/// ```
/// use morphic_world::menu::{MenuNav, MenuState};
/// let mut nav = MenuNav::new(vec![true, false, true]);
/// nav.select_next();
/// nav.select_next();
/// assert_eq!(nav.state(), MenuState::ItemSelected(2), "disabled row skipped");
/// nav.select_next();
/// assert_eq!(nav.state(), MenuState::ItemSelected(0), "wraps");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuNav {
    state: MenuState,
    enabled: Vec<bool>,
}

impl MenuNav {
    /// A navigator over rows with the given enabled flags.
    pub fn new(enabled: Vec<bool>) -> Self {
        Self {
            state: MenuState::NoSelection,
            enabled,
        }
    }

    /// Current state.
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// The highlighted row.
    pub fn selected(&self) -> Option<usize> {
        match self.state {
            MenuState::NoSelection => None,
            MenuState::ItemSelected(i) | MenuState::SubmenuOpen(i) => Some(i),
        }
    }

    /// Highlight the next enabled row, wrapping around.
    pub fn select_next(&mut self) {
        self.advance(true);
    }

    /// Highlight the previous enabled row, wrapping around.
    pub fn select_previous(&mut self) {
        self.advance(false);
    }

    fn advance(&mut self, forward: bool) {
        let n = self.enabled.len();
        let current = self.selected();
        for k in 1..=n {
            let i = match (current, forward) {
                (Some(c), true) => (c + k) % n,
                (Some(c), false) => (c + n - k) % n,
                (None, true) => k - 1,
                (None, false) => n - k,
            };
            if self.enabled[i] {
                self.state = MenuState::ItemSelected(i);
                return;
            }
        }
    }

    /// Highlight row `i` if it exists and is enabled.
    pub fn select(&mut self, i: usize) -> bool {
        if self.enabled.get(i).copied().unwrap_or(false) {
            self.state = MenuState::ItemSelected(i);
            true
        } else {
            false
        }
    }

    /// Remove the highlight.
    pub fn clear(&mut self) {
        self.state = MenuState::NoSelection;
    }

    /// Mark the highlighted row's submenu as open.
    pub fn open_submenu(&mut self) -> Option<usize> {
        let MenuState::ItemSelected(i) = self.state else {
            return None;
        };
        self.state = MenuState::SubmenuOpen(i);
        Some(i)
    }

    /// Mark the open submenu as closed, keeping its row highlighted.
    pub fn close_submenu(&mut self) {
        if let MenuState::SubmenuOpen(i) = self.state {
            self.state = MenuState::ItemSelected(i);
        }
    }
}

/// A pop-up menu morph.
#[derive(Debug)]
pub struct Menu {
    items: Vec<MenuItem>,
    nav: MenuNav,
    parent_menu: Option<MorphId>,
    submenu: Option<MorphId>,
    item_height: f64,
    padding: f64,
}

impl Menu {
    /// A menu with `items`, laid out with the world's menu settings when popped up.
    pub fn new(items: Vec<MenuItem>) -> Self {
        let nav = MenuNav::new(items.iter().map(|i| i.enabled).collect());
        Self {
            items,
            nav,
            parent_menu: None,
            submenu: None,
            item_height: 0.0,
            padding: 0.0,
        }
    }

    /// The rows.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Keyboard state.
    pub fn state(&self) -> MenuState {
        self.nav.state()
    }

    /// The open submenu.
    pub fn submenu(&self) -> Option<MorphId> {
        self.submenu
    }

    /// The menu that opened this one.
    pub fn parent_menu(&self) -> Option<MorphId> {
        self.parent_menu
    }

    fn row_rect(&self, bounds: Rect, i: usize) -> Rect {
        let y0 = bounds.y0 + self.padding + i as f64 * self.item_height;
        Rect::new(bounds.x0, y0, bounds.x1, y0 + self.item_height)
    }

    fn row_at(&self, bounds: Rect, pos: Point) -> Option<usize> {
        (0..self.items.len()).find(|&i| self.row_rect(bounds, i).contains(pos))
    }

    /// Activate row `i`: open its submenu or close the menus and run its action.
    fn activate(&mut self, cx: &mut MorphCx<'_>, i: usize) {
        let Some(item) = self.items.get(i) else {
            return;
        };
        if !item.enabled {
            return;
        }
        if item.has_submenu() {
            self.nav.select(i);
            self.open_submenu(cx);
            return;
        }
        let action = item.action.clone();
        log::debug!("menu item {:?} activated", item.label);
        let top = top_menu(cx, cx.id());
        cx.destroy(top);
        if let Some(action) = action {
            cx.perform(&action);
        }
    }

    fn open_submenu(&mut self, cx: &mut MorphCx<'_>) {
        let Some(i) = self.nav.selected() else {
            return;
        };
        let Some(items) = self
            .items
            .get(i)
            .filter(|it| it.enabled && it.has_submenu())
            .map(|it| it.submenu.clone())
        else {
            return;
        };
        self.close_submenu(cx);
        let me = cx.id();
        let bounds = cx.my_bounds();
        let row = self.row_rect(bounds, i);
        let mut sub = Self::new(items);
        sub.parent_menu = Some(me);
        let at = Point::new(bounds.x1, row.y0 - self.padding);
        let id = cx.create_menu(sub, at);
        if cx.add_child(me, id).is_err() {
            cx.destroy(id);
            return;
        }
        cx.changed(id);
        self.submenu = Some(id);
        self.nav.select(i);
        self.nav.open_submenu();
        if cx.keyboard_receiver() == Some(me) {
            if let Some(menu) = cx.morph_mut::<Self>(id) {
                menu.nav.select_next();
            }
            cx.set_keyboard_receiver(Some(id));
        }
        cx.changed_self();
    }

    fn close_submenu(&mut self, cx: &mut MorphCx<'_>) {
        if let Some(sub) = self.submenu.take() {
            cx.destroy(sub);
            cx.changed_self();
        }
        self.nav.close_submenu();
    }

    /// Close this submenu and hand focus back to the menu that opened it.
    fn return_to_parent(&mut self, cx: &mut MorphCx<'_>) {
        let Some(parent) = self.parent_menu else {
            return;
        };
        if let Some(menu) = cx.morph_mut::<Self>(parent) {
            menu.submenu = None;
            menu.nav.close_submenu();
        }
        let me = cx.id();
        cx.destroy(me);
        cx.set_keyboard_receiver(Some(parent));
        cx.changed(parent);
    }
}

/// Outermost menu of the cascade containing `id`.
fn top_menu(world: &World, id: MorphId) -> MorphId {
    let mut cur = id;
    while let Some(p) = world.parent(cur) {
        if world.morph::<Menu>(p).is_none() {
            break;
        }
        cur = p;
    }
    cur
}

impl Morph for Menu {
    fn draw_on(
        &self,
        cx: &DrawCx<'_>,
        surface: &mut dyn Surface,
        clip: Rect,
    ) -> Result<(), SurfaceError> {
        cx.draw_cached_image(surface, clip)?;
        if let Some(i) = self.nav.selected() {
            cx.fill(surface, clip, self.row_rect(cx.bounds, i), HIGHLIGHT_COLOR)?;
        }
        for (i, item) in self.items.iter().enumerate() {
            if !item.enabled {
                cx.fill(surface, clip, self.row_rect(cx.bounds, i), DISABLED_VEIL)?;
            }
        }
        Ok(())
    }

    fn root_for_grab(&self, _me: MorphId, _world: &World) -> Option<MorphId> {
        None
    }

    fn pointer(&mut self) -> Option<&mut dyn PointerTarget> {
        Some(self)
    }

    fn keyboard(&mut self) -> Option<&mut dyn KeyTarget> {
        Some(self)
    }
}

impl PointerTarget for Menu {
    fn mouse_down_left(&mut self, _cx: &mut MorphCx<'_>, _pos: Point) -> Outcome {
        Outcome::Stop
    }

    fn mouse_move(
        &mut self,
        cx: &mut MorphCx<'_>,
        pos: Point,
        _buttons: Buttons,
    ) -> Outcome {
        let bounds = cx.my_bounds();
        if let Some(i) = self.row_at(bounds, pos)
            && self.nav.selected() != Some(i)
            && self.submenu.is_none()
            && self.nav.select(i)
        {
            cx.changed_self();
        }
        Outcome::Stop
    }

    fn mouse_click_left(&mut self, cx: &mut MorphCx<'_>, pos: Point) -> Outcome {
        let bounds = cx.my_bounds();
        if let Some(i) = self.row_at(bounds, pos) {
            self.activate(cx, i);
        }
        Outcome::Stop
    }
}

impl KeyTarget for Menu {
    fn key_down(&mut self, cx: &mut MorphCx<'_>, key: Key, _repeat: bool) {
        match key {
            Key::ArrowDown | Key::Tab => {
                self.close_submenu(cx);
                self.nav.select_next();
                cx.changed_self();
            }
            Key::ArrowUp => {
                self.close_submenu(cx);
                self.nav.select_previous();
                cx.changed_self();
            }
            Key::Enter | Key::Space => {
                if let Some(i) = self.nav.selected() {
                    self.activate(cx, i);
                }
            }
            Key::ArrowRight => self.open_submenu(cx),
            Key::ArrowLeft => self.return_to_parent(cx),
            Key::Escape => {
                let top = top_menu(cx, cx.id());
                cx.destroy(top);
            }
            _ => {}
        }
    }
}

impl World {
    /// The open menu, if any.
    pub fn active_menu(&self) -> Option<MorphId> {
        self.active_menu
    }

    /// Open `menu` at `at` (kept inside the world) with keyboard focus.
    ///
    /// The previously active menu is destroyed first. Focus returns to the
    /// previous receiver when the menu goes away.
    pub fn pop_up_menu(&mut self, menu: Menu, at: Point) -> MorphId {
        if let Some(old) = self.active_menu {
            self.destroy(old);
        }
        let id = self.create_menu(menu, at);
        let _ = self.tree.add_child(self.root, id);
        if let (Some(world), Some(b)) = (self.bounds(self.root), self.bounds(id)) {
            let dx = (world.x1 - b.x1).min(0.0).max(world.x0 - b.x0);
            let dy = (world.y1 - b.y1).min(0.0).max(world.y0 - b.y0);
            let _ = self.tree.move_by(id, kurbo::Vec2::new(dx, dy));
        }
        self.changed(id);
        self.focus_before_menu = self.keyboard_receiver;
        self.active_menu = Some(id);
        self.keyboard_receiver = Some(id);
        log::debug!("menu {id:?} popped up");
        id
    }

    /// Create a detached menu morph sized from the menu settings.
    pub(crate) fn create_menu(&mut self, mut menu: Menu, at: Point) -> MorphId {
        menu.item_height = self.settings.menu_item_height;
        menu.padding = self.settings.menu_padding;
        let height = menu.items.len() as f64 * menu.item_height + 2.0 * menu.padding;
        let bounds = Rect::from_origin_size(at, (self.settings.menu_width, height));
        let id = self.create(bounds, menu);
        self.set_color(id, MENU_COLOR);
        id
    }

    /// Run `action`.
    pub fn perform(&mut self, action: &Action) {
        match action {
            Action::Callback(f) => f(self),
            Action::Method { target, selector } => self.send(*target, *selector),
        }
    }

    /// Deliver `selector` to `target`. Stale targets are ignored.
    pub fn send(&mut self, target: MorphId, selector: Selector) {
        if !self.is_alive(target) {
            log::debug!("{selector:?} sent to stale {target:?}");
            return;
        }
        match selector {
            Selector::Destroy => self.destroy(target),
            Selector::Hide => self.hide(target),
            Selector::Show => self.show(target),
            Selector::ComeToFront => self.come_to_front(target),
            Selector::PickUp => {
                self.grab(target);
            }
            Selector::Custom(code) => {
                self.with_behavior(target, |b, cx| b.perform(cx, code));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use kurbo::Size;
    use morphic_input::event::{InputEvent, MouseButton};

    use super::*;
    use crate::morph::PlainMorph;

    fn world() -> World {
        World::new(Size::new(400.0, 400.0))
    }

    fn counter_action(hits: &Rc<Cell<u32>>) -> Action {
        let hits = hits.clone();
        Action::callback(move |_| hits.set(hits.get() + 1))
    }

    fn key(w: &mut World, k: Key) {
        w.handle_input(InputEvent::KeyDown(k));
        w.handle_input(InputEvent::KeyUp(k));
    }

    #[test]
    fn nav_skips_disabled_and_wraps_backwards() {
        let mut nav = MenuNav::new(vec![false, true, true]);
        nav.select_previous();
        assert_eq!(nav.state(), MenuState::ItemSelected(2));
        nav.select_previous();
        nav.select_previous();
        assert_eq!(nav.state(), MenuState::ItemSelected(2), "row 0 is disabled");
        assert!(!nav.select(0));
        assert_eq!(nav.open_submenu(), Some(2));
        assert_eq!(nav.state(), MenuState::SubmenuOpen(2));
        nav.close_submenu();
        assert_eq!(nav.state(), MenuState::ItemSelected(2));
    }

    #[test]
    fn nav_without_enabled_rows_stays_unselected() {
        let mut nav = MenuNav::new(vec![false, false]);
        nav.select_next();
        assert_eq!(nav.state(), MenuState::NoSelection);
        let mut empty = MenuNav::new(Vec::new());
        empty.select_previous();
        assert_eq!(empty.selected(), None);
    }

    #[test]
    fn at_most_one_active_menu() {
        let mut w = world();
        let hits = Rc::new(Cell::new(0));
        let first = w.pop_up_menu(
            Menu::new(vec![MenuItem::new("a", counter_action(&hits))]),
            Point::new(10.0, 10.0),
        );
        let second = w.pop_up_menu(
            Menu::new(vec![MenuItem::new("b", counter_action(&hits))]),
            Point::new(50.0, 50.0),
        );
        assert!(!w.is_alive(first));
        assert_eq!(w.active_menu(), Some(second));
        assert_eq!(w.keyboard_receiver(), Some(second));
    }

    #[test]
    fn keyboard_selects_and_activates() {
        let mut w = world();
        let hits = Rc::new(Cell::new(0));
        let menu = w.pop_up_menu(
            Menu::new(vec![
                MenuItem::new("one", Action::callback(|_| {})),
                MenuItem::new("two", counter_action(&hits)),
            ]),
            Point::new(10.0, 10.0),
        );
        key(&mut w, Key::ArrowDown);
        key(&mut w, Key::ArrowDown);
        assert_eq!(
            w.morph::<Menu>(menu).map(Menu::state),
            Some(MenuState::ItemSelected(1))
        );
        key(&mut w, Key::Enter);
        assert_eq!(hits.get(), 1);
        assert!(!w.is_alive(menu));
        assert_eq!(w.active_menu(), None);
        assert_eq!(w.keyboard_receiver(), None);
    }

    #[test]
    fn submenu_focus_moves_right_and_back_left() {
        let mut w = world();
        let hits = Rc::new(Cell::new(0));
        let menu = w.pop_up_menu(
            Menu::new(vec![MenuItem::submenu(
                "more",
                vec![MenuItem::new("deep", counter_action(&hits))],
            )]),
            Point::new(10.0, 10.0),
        );
        key(&mut w, Key::ArrowDown);
        key(&mut w, Key::ArrowRight);
        let sub = w.morph::<Menu>(menu).and_then(Menu::submenu).unwrap();
        assert_eq!(w.parent(sub), Some(menu));
        assert_eq!(w.keyboard_receiver(), Some(sub));
        assert_eq!(
            w.morph::<Menu>(menu).map(Menu::state),
            Some(MenuState::SubmenuOpen(0))
        );

        key(&mut w, Key::ArrowLeft);
        assert!(!w.is_alive(sub));
        assert_eq!(w.keyboard_receiver(), Some(menu));
        assert_eq!(
            w.morph::<Menu>(menu).map(Menu::state),
            Some(MenuState::ItemSelected(0))
        );

        key(&mut w, Key::ArrowRight);
        key(&mut w, Key::Enter);
        assert_eq!(hits.get(), 1, "the submenu's first item was preselected");
        assert!(!w.is_alive(menu));
    }

    #[test]
    fn escape_dismisses_the_whole_cascade_and_restores_focus() {
        let mut w = world();
        let field = w.create(Rect::new(300.0, 300.0, 320.0, 320.0), PlainMorph);
        w.add_child(w.root(), field).unwrap();
        w.set_keyboard_receiver(Some(field));
        let menu = w.pop_up_menu(
            Menu::new(vec![MenuItem::submenu(
                "more",
                vec![MenuItem::new("x", Action::callback(|_| {}))],
            )]),
            Point::new(10.0, 10.0),
        );
        key(&mut w, Key::ArrowDown);
        key(&mut w, Key::ArrowRight);
        key(&mut w, Key::Escape);
        assert!(!w.is_alive(menu));
        assert_eq!(w.active_menu(), None);
        assert_eq!(w.keyboard_receiver(), Some(field));
    }

    #[test]
    fn click_outside_closes_click_inside_activates() {
        let mut w = world();
        let target = w.create(Rect::new(200.0, 200.0, 260.0, 260.0), PlainMorph);
        w.add_child(w.root(), target).unwrap();
        let menu = w.pop_up_menu(
            Menu::new(vec![MenuItem::new(
                "hide it",
                Action::Method {
                    target,
                    selector: Selector::Hide,
                },
            )]),
            Point::new(10.0, 10.0),
        );
        let row = Point::new(20.0, 10.0 + w.settings().menu_padding + 5.0);
        w.handle_input(InputEvent::PointerMoved(row));
        w.handle_input(InputEvent::ButtonDown(MouseButton::Left));
        assert!(w.is_alive(menu), "press inside keeps the menu");
        w.handle_input(InputEvent::ButtonUp(MouseButton::Left));
        assert!(!w.is_alive(menu));
        assert!(!w.is_visible(target));

        let menu = w.pop_up_menu(Menu::new(Vec::new()), Point::new(10.0, 10.0));
        w.handle_input(InputEvent::PointerMoved(Point::new(390.0, 390.0)));
        w.handle_input(InputEvent::ButtonDown(MouseButton::Left));
        assert!(!w.is_alive(menu));
    }

    #[test]
    fn menus_stay_inside_the_world() {
        let mut w = world();
        let items = vec![MenuItem::new("x", Action::callback(|_| {}))];
        let menu = w.pop_up_menu(Menu::new(items), Point::new(390.0, 395.0));
        let b = w.bounds(menu).unwrap();
        assert!(b.x1 <= 400.0 && b.y1 <= 400.0, "{b:?}");
    }

    #[test]
    fn custom_selector_reaches_perform() {
        struct Target {
            last: Option<u32>,
        }
        impl Morph for Target {
            fn perform(&mut self, _cx: &mut MorphCx<'_>, selector: u32) {
                self.last = Some(selector);
            }
        }
        let mut w = world();
        let t = w.create(Rect::new(0.0, 0.0, 10.0, 10.0), Target { last: None });
        w.perform(&Action::Method {
            target: t,
            selector: Selector::Custom(7),
        });
        assert_eq!(w.morph::<Target>(t).and_then(|t| t.last), Some(7));
        w.destroy(t);
        w.send(t, Selector::Custom(8));
    }
}
