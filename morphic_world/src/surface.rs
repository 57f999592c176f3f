// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing target abstraction and a `tiny_skia` implementation.

use core::fmt;

use kurbo::{Point, Rect, Size};
use tiny_skia::{FilterQuality, Paint, Pattern, Pixmap, SpreadMode, Transform};

use crate::color::Color;
use crate::error::SurfaceError;
use crate::image::{Image, paint_for, to_skia_rect};

/// A 2D raster the compositor paints on.
///
/// Coordinates are surface pixels with the origin at the top left. Draw
/// calls outside [`Surface::size`] are clipped by the implementation.
pub trait Surface {
    /// Size of the drawable area.
    fn size(&self) -> Size;

    /// Composite the `src` region of `image` (the whole image if `None`) into
    /// `dest`, with every pixel's alpha scaled by `alpha`.
    fn draw_image(
        &mut self,
        image: &Image,
        dest: Rect,
        src: Option<Rect>,
        alpha: f64,
    ) -> Result<(), SurfaceError>;

    /// Composite a solid `color` over `rect`.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError>;

    /// Current color at `point`, if the surface can be read back.
    fn pixel_at(&self, point: Point) -> Option<Color>;
}

/// CPU surface that renders into a `tiny_skia` pixmap.
///
/// ```
/// use kurbo::{Point, Rect};
/// use morphic_world::{Canvas, Color, Surface};
///
/// let mut canvas = Canvas::new(8, 8).unwrap();
/// canvas.fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), Color::BLACK).unwrap();
/// assert_eq!(canvas.pixel_at(Point::new(3.0, 3.0)), Some(Color::BLACK));
/// assert_eq!(canvas.pixel_at(Point::new(5.0, 5.0)), Some(Color::TRANSPARENT));
/// ```
#[derive(Clone)]
pub struct Canvas {
    target: Image,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.target.width())
            .field("height", &self.target.height())
            .finish()
    }
}

impl Canvas {
    /// A transparent canvas, `None` if either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Image::new(width, height).map(|target| Self { target })
    }

    /// The canvas content.
    pub fn image(&self) -> &Image {
        &self.target
    }

    /// The backing pixmap, for presenting or copying.
    pub fn pixmap(&self) -> &Pixmap {
        self.target.pixmap()
    }
}

impl Surface for Canvas {
    fn size(&self) -> Size {
        self.target.size()
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "surface coordinates and opacity fit comfortably in f32"
    )]
    fn draw_image(
        &mut self,
        image: &Image,
        dest: Rect,
        src: Option<Rect>,
        alpha: f64,
    ) -> Result<(), SurfaceError> {
        if !dest.is_finite() || !alpha.is_finite() {
            return Err(SurfaceError::Draw(format!(
                "non-finite draw_image arguments: {dest:?}, alpha {alpha}"
            )));
        }
        let src = src.unwrap_or_else(|| image.size().to_rect());
        if src.width() <= 0.0 || src.height() <= 0.0 {
            return Ok(());
        }
        let Some(area) = to_skia_rect(dest) else {
            return Ok(());
        };
        // Maps image space onto `dest` so that `src` fills it exactly.
        let sx = dest.width() / src.width();
        let sy = dest.height() / src.height();
        let placement = Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            sy as f32,
            (dest.x0 - src.x0 * sx) as f32,
            (dest.y0 - src.y0 * sy) as f32,
        );
        let mut paint = Paint::default();
        paint.anti_alias = false;
        paint.shader = Pattern::new(
            image.pixmap().as_ref(),
            SpreadMode::Pad,
            FilterQuality::Nearest,
            alpha.clamp(0.0, 1.0) as f32,
            placement,
        );
        self.target
            .pixmap_mut()
            .fill_rect(area, &paint, Transform::identity(), None);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), SurfaceError> {
        if let Some(area) = to_skia_rect(rect) {
            self.target
                .pixmap_mut()
                .fill_rect(area, &paint_for(color), Transform::identity(), None);
        }
        Ok(())
    }

    fn pixel_at(&self, point: Point) -> Option<Color> {
        self.target.pixel_at(point.x, point.y)
    }
}
