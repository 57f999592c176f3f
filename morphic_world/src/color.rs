// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Straight-alpha RGBA8 color, converted to `tiny_skia` at the raster boundary.

use tiny_skia::{ColorU8, PremultipliedColorU8};

/// An RGBA color with 8 bits per channel and straight (not premultiplied) alpha.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; `0` is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba8(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb8(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb8(255, 255, 255);
    /// Default morph gray.
    pub const GRAY: Self = Self::rgb8(80, 80, 80);

    /// Build a color from all four channels.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8(r, g, b, 255)
    }

    /// Same color with its alpha scaled by `factor` (clamped to `0..=1`).
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "opacity is clamped to 0..=1 before narrowing"
    )]
    pub fn multiply_alpha(self, factor: f64) -> Self {
        let mut color = self.to_skia();
        color.apply_opacity(factor.clamp(0.0, 1.0) as f32);
        color.to_color_u8().into()
    }

    /// The same color as a `tiny_skia` paint color.
    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl From<ColorU8> for Color {
    fn from(c: ColorU8) -> Self {
        Self::rgba8(c.red(), c.green(), c.blue(), c.alpha())
    }
}

impl From<Color> for ColorU8 {
    fn from(c: Color) -> Self {
        Self::from_rgba(c.r, c.g, c.b, c.a)
    }
}

impl From<PremultipliedColorU8> for Color {
    fn from(c: PremultipliedColorU8) -> Self {
        c.demultiply().into()
    }
}
