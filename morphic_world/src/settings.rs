// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine tunables.

use morphic_input::click::ClickConfig;

/// Tunables read by the hand, the hit tester, menus and the drop protocol.
///
/// ```
/// use morphic_world::Settings;
/// let s = Settings::default().with_drag_threshold(2.0).with_slide_back_ms(150.0);
/// assert_eq!(s.drag_threshold, 2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Pointer travel after a press, in surface units, before a grab starts.
    pub drag_threshold: f64,
    /// Maximum delay between the two clicks of a double click, in milliseconds.
    pub double_click_ms: f64,
    /// Maximum pointer distance between the two clicks of a double click.
    pub double_click_radius: f64,
    /// Pixels with an alpha at or below this value let clicks through.
    pub transparent_alpha: u8,
    /// Duration of the slide back after a refused drop; `0` jumps back at once.
    pub slide_back_ms: f64,
    /// Height of one menu row.
    pub menu_item_height: f64,
    /// Inner padding of a menu around its rows.
    pub menu_padding: f64,
    /// Width of a menu.
    pub menu_width: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            double_click_ms: 250.0,
            double_click_radius: 4.0,
            transparent_alpha: 0,
            slide_back_ms: 0.0,
            menu_item_height: 20.0,
            menu_padding: 4.0,
            menu_width: 140.0,
        }
    }
}

impl Settings {
    /// Set [`Settings::drag_threshold`].
    #[must_use]
    pub fn with_drag_threshold(mut self, value: f64) -> Self {
        self.drag_threshold = value;
        self
    }

    /// Set [`Settings::double_click_ms`].
    #[must_use]
    pub fn with_double_click_ms(mut self, value: f64) -> Self {
        self.double_click_ms = value;
        self
    }

    /// Set [`Settings::double_click_radius`].
    #[must_use]
    pub fn with_double_click_radius(mut self, value: f64) -> Self {
        self.double_click_radius = value;
        self
    }

    /// Set [`Settings::transparent_alpha`].
    #[must_use]
    pub fn with_transparent_alpha(mut self, value: u8) -> Self {
        self.transparent_alpha = value;
        self
    }

    /// Set [`Settings::slide_back_ms`].
    #[must_use]
    pub fn with_slide_back_ms(mut self, value: f64) -> Self {
        self.slide_back_ms = value;
        self
    }

    /// Set the menu row height, padding and width at once.
    #[must_use]
    pub fn with_menu_metrics(mut self, item_height: f64, padding: f64, width: f64) -> Self {
        self.menu_item_height = item_height;
        self.menu_padding = padding;
        self.menu_width = width;
        self
    }

    /// The subset the click tracker needs.
    pub fn click_config(&self) -> ClickConfig {
        ClickConfig {
            double_click_ms: self.double_click_ms,
            double_click_radius: self.double_click_radius,
            drag_threshold: self.drag_threshold,
        }
    }
}
