// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cached raster owned by a morph, backed by a `tiny_skia::Pixmap`.

use core::fmt;

use kurbo::{Rect, Size};
use tiny_skia::{BlendMode, Paint, Pixmap, Transform};

use crate::color::Color;

/// A premultiplied RGBA raster.
#[derive(Clone)]
pub struct Image {
    pixmap: Pixmap,
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl Image {
    /// A fully transparent image, `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(Self::from_pixmap)
    }

    /// An image with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Color) -> Option<Self> {
        let mut image = Self::new(width, height)?;
        image.pixmap.fill(color.to_skia());
        Some(image)
    }

    /// An image covering `size`, rounded up to whole pixels.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "sizes are clamped to be non-negative and rasters are far below u32::MAX"
    )]
    pub fn for_size(size: Size, color: Color) -> Option<Self> {
        let w = size.width.max(0.0).ceil() as u32;
        let h = size.height.max(0.0).ceil() as u32;
        Self::filled(w, h, color)
    }

    /// Wrap an existing pixmap.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// The backing pixmap, for presenting or encoding.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Size in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Pixel at integer coordinates, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixmap.pixel(x, y).map(Color::from)
    }

    /// Pixel containing the image-local point `(x, y)`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "negative coordinates are rejected before the cast"
    )]
    pub fn pixel_at(&self, x: f64, y: f64) -> Option<Color> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        self.pixel(x.floor() as u32, y.floor() as u32)
    }

    /// Overwrite every pixel whose center lies in the image-local `rect`.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(rect) = to_skia_rect(rect) else {
            return;
        };
        let mut paint = paint_for(color);
        paint.blend_mode = BlendMode::Source;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }
}

/// A solid, pixel-aligned paint.
pub(crate) fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = false;
    paint
}

/// `rect` in `tiny_skia` terms; `None` if it is not finite or has no area.
#[allow(
    clippy::cast_possible_truncation,
    reason = "surface coordinates fit comfortably in f32"
)]
pub(crate) fn to_skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    if !rect.is_finite() {
        return None;
    }
    let r = rect.abs();
    tiny_skia::Rect::from_ltrb(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32)
}
