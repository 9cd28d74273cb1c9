use glam::Vec2;

use crate::{
    renderer::software::{
        RenderError, Software,
        blit::{BlitFlags, Target, shade_texel},
        lighting::LightParams,
        view::ViewState,
    },
    world::{Texture, TextureBank, TextureId},
};

/// Rows `top..=bottom` of one screen column a plane covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnYBounds {
    pub top: i16,
    pub bottom: i16,
}

impl ColumnYBounds {
    pub const UNDEFINED: Self = Self {
        top: i16::MAX,
        bottom: i16::MIN,
    };

    #[inline]
    pub fn is_defined(self) -> bool {
        self != Self::UNDEFINED
    }

    #[inline]
    pub fn contains(self, y: i16) -> bool {
        self.top <= y && y <= self.bottom
    }
}

/// A floor or ceiling region: every column it touches shares one height,
/// flat and light level.
#[derive(Clone, Debug)]
pub struct VisPlane {
    /// Eye-relative height (negative = floor below the eye).
    pub height: f32,
    pub texture: TextureId,
    pub light: u8,
    /// Inclusive horizontal range.
    pub min_x: usize,
    pub max_x: usize,
    pub cols: Vec<ColumnYBounds>,
}

impl VisPlane {
    fn sentinel(width: usize) -> Self {
        Self {
            height: 0.0,
            texture: 0,
            light: 0,
            min_x: 0,
            max_x: width.saturating_sub(1),
            // every column "taken", so the first column always looks up a plane
            cols: vec![ColumnYBounds { top: 0, bottom: 0 }; width],
        }
    }

    /// Rows touched by any defined column.
    fn row_range(&self) -> Option<(usize, usize)> {
        let cols = self.cols[self.min_x..=self.max_x]
            .iter()
            .filter(|c| c.is_defined());
        let (mut top, mut bottom) = (i16::MAX, i16::MIN);
        for c in cols {
            top = top.min(c.top);
            bottom = bottom.max(c.bottom);
        }
        (top <= bottom).then(|| (top.max(0) as usize, bottom.max(0) as usize))
    }
}

/// Per-frame visplane pool. Slot 0 is a sentinel.
#[derive(Default)]
pub struct VisPlanes {
    planes: Vec<VisPlane>,
    used: usize,
    capacity: usize,
    width: usize,
}

impl VisPlanes {
    pub fn reset(&mut self, width: usize, capacity: usize) {
        self.width = width;
        self.capacity = capacity;
        self.planes.truncate(1);
        match self.planes.first_mut() {
            Some(s) if s.cols.len() == width => {}
            _ => {
                self.planes.clear();
                self.planes.push(VisPlane::sentinel(width));
            }
        }
        self.used = 1;
    }

    /// Records in use, the sentinel included.
    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used <= 1
    }

    #[inline]
    pub fn get(&self, id: usize) -> &VisPlane {
        &self.planes[id]
    }

    /// Real planes, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &VisPlane> + '_ {
        self.planes[1..self.used].iter()
    }

    #[inline]
    pub fn column(&self, id: usize, x: usize) -> ColumnYBounds {
        self.planes[id].cols[x]
    }

    #[inline]
    pub fn set_column(&mut self, id: usize, x: usize, bounds: ColumnYBounds) {
        debug_assert!(bounds.top <= bounds.bottom);
        self.planes[id].cols[x] = bounds;
    }

    /// Find a plane after `current` that can take column `x_start`, or start
    /// a new one covering `x_start..=x_end`.
    ///
    /// Only records after `current` are searched; an older matching record
    /// is never revisited.
    pub fn find_or_create_plane(
        &mut self,
        current: usize,
        height: f32,
        texture: TextureId,
        x_start: usize,
        x_end: usize,
        light: u8,
    ) -> Result<usize, RenderError> {
        for id in current + 1..self.used {
            let p = &mut self.planes[id];
            if p.height == height
                && p.texture == texture
                && p.light == light
                && !p.cols[x_start].is_defined()
            {
                p.min_x = p.min_x.min(x_start);
                p.max_x = p.max_x.max(x_end);
                return Ok(id);
            }
        }

        if self.used >= self.capacity {
            return Err(RenderError::VisplaneOverflow(self.capacity));
        }

        let id = self.used;
        self.used += 1;
        if let Some(p) = self.planes.get_mut(id) {
            p.height = height;
            p.texture = texture;
            p.light = light;
            p.min_x = x_start;
            p.max_x = x_end;
            p.cols.clear();
            p.cols.resize(self.width, ColumnYBounds::UNDEFINED);
        } else {
            self.planes.push(VisPlane {
                height,
                texture,
                light,
                min_x: x_start,
                max_x: x_end,
                cols: vec![ColumnYBounds::UNDEFINED; self.width],
            });
        }
        Ok(id)
    }
}

/*──────────────────────── span drawing ───────────────────────────────*/

impl Software {
    /// Texture every visplane; returns the number of spans drawn.
    pub(super) fn draw_planes(&mut self, textures: &TextureBank) -> Result<u32, RenderError> {
        let view = &self.view;
        let mut dst = Target::new(&mut self.scratch, &self.config.screen);
        let mut spans = 0;

        for plane in self.visplanes.iter() {
            let Some((y_top, y_bottom)) = plane.row_range() else {
                continue;
            };
            let tex = textures.texture(plane.texture)?;
            let light = self.light_tables.params(plane.light as u32);

            for y in y_top..=y_bottom.min(view.height - 1) {
                let row = y as i16;
                let mut run: Option<usize> = None;

                for x in plane.min_x..=plane.max_x {
                    let inside = plane.cols[x].contains(row);
                    match (inside, run) {
                        (true, None) => run = Some(x),
                        (false, Some(xs)) => {
                            draw_span(&mut dst, tex, light, view, plane.height, y, xs, x - 1);
                            spans += 1;
                            run = None;
                        }
                        _ => {}
                    }
                }
                if let Some(xs) = run {
                    draw_span(&mut dst, tex, light, view, plane.height, y, xs, plane.max_x);
                    spans += 1;
                }
            }
        }
        Ok(spans)
    }
}

/// One horizontal run `x_start..=x_end` of row `y`. Every pixel of a row is
/// at the same depth, so the world position steps linearly.
#[allow(clippy::too_many_arguments)]
fn draw_span(
    dst: &mut Target,
    tex: &Texture,
    light: &LightParams,
    view: &ViewState,
    height: f32,
    y: usize,
    x_start: usize,
    x_end: usize,
) {
    let dy = (y as f32 + 0.5) - view.center_y;
    // floors are only visible below the horizon, ceilings above it
    if height == 0.0 || dy == 0.0 || (height < 0.0) != (dy > 0.0) {
        return;
    }
    let dist = view.focal_y * height.abs() / dy.abs();

    let fwd = Vec2::new(view.cos, view.sin);
    let right = Vec2::new(view.sin, -view.cos);
    let step = right * (dist / view.focal_x);
    let mut pos = Vec2::new(view.x, view.y)
        + fwd * dist
        + step * (x_start as f32 + 0.5 - view.center_x);

    let mul = [light.light_mul_for_dist(dist); 3];
    let (w, h) = (tex.w as i64, tex.h as i64);

    for x in x_start..=x_end {
        let u = (pos.x.floor() as i64).rem_euclid(w) as usize;
        let v = (pos.y.floor() as i64).rem_euclid(h) as usize;
        let texel = shade_texel(tex.texel(u, v), 0, BlitFlags::COLOR_MULT_RGB, mul, 1.0);
        dst.set_pixel(x, y, texel);
        pos += step;
    }
}
