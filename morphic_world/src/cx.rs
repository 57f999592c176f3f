// Copyright 2025 the Morphic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contexts handed to morph hooks.

use core::ops::{Deref, DerefMut};

use kurbo::Rect;

use crate::color::Color;
use crate::error::SurfaceError;
use crate::image::Image;
use crate::morph::MorphId;
use crate::surface::Surface;
use crate::world::World;

/// What a morph may look at while drawing.
#[derive(Clone, Copy, Debug)]
pub struct DrawCx<'a> {
    /// The morph being drawn.
    pub id: MorphId,
    /// Its bounds in surface space.
    pub bounds: Rect,
    /// Its cached image.
    pub image: Option<&'a Image>,
    /// Its color.
    pub color: Color,
    /// Its opacity, `0..=1`.
    pub alpha: f64,
}

impl DrawCx<'_> {
    /// Composite the part of the cached image under `clip`.
    pub fn draw_cached_image(
        &self,
        surface: &mut dyn Surface,
        clip: Rect,
    ) -> Result<(), SurfaceError> {
        let Some(image) = self.image else {
            return Ok(());
        };
        let area = clip.intersect(self.bounds);
        if area.width() <= 0.0 || area.height() <= 0.0 {
            return Ok(());
        }
        let src = area - self.bounds.origin().to_vec2();
        surface.draw_image(image, area, Some(src), self.alpha)
    }

    /// Composite `color`, scaled by the morph's opacity, over `rect ∩ clip`.
    pub fn fill(
        &self,
        surface: &mut dyn Surface,
        clip: Rect,
        rect: Rect,
        color: Color,
    ) -> Result<(), SurfaceError> {
        let area = clip.intersect(rect);
        if area.width() <= 0.0 || area.height() <= 0.0 {
            return Ok(());
        }
        surface.fill_rect(area, color.multiply_alpha(self.alpha))
    }
}

/// Mutable access to the world from inside a hook of morph [`MorphCx::id`].
///
/// Dereferences to [`World`], so everything the host can do a hook can do,
/// including destroying its own morph.
#[derive(Debug)]
pub struct MorphCx<'w> {
    pub(crate) world: &'w mut World,
    pub(crate) id: MorphId,
}

impl MorphCx<'_> {
    /// The morph whose hook is running.
    pub fn id(&self) -> MorphId {
        self.id
    }

    /// Bounds of the running morph (empty if it destroyed itself).
    pub fn my_bounds(&self) -> Rect {
        self.world.bounds(self.id).unwrap_or(Rect::ZERO)
    }

    /// Record the running morph's current footprint as damaged.
    pub fn changed_self(&mut self) {
        let id = self.id;
        self.world.changed(id);
    }
}

impl Deref for MorphCx<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        self.world
    }
}

impl DerefMut for MorphCx<'_> {
    fn deref_mut(&mut self) -> &mut World {
        self.world
    }
}
