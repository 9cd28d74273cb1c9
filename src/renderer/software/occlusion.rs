//! Per-column occluders and the occlusion-aware sprite fragment blitter.

use smallvec::SmallVec;

use crate::renderer::software::{
    RenderError,
    blit::{BlitFlags, BlitMode, ColumnBlit, Target, Texels, Wrap, blit_column},
    sprites::SpriteFragment,
};
use crate::world::TextureBank;

/// Blend factor of SHADOW (partially invisible) objects.
pub const SHADOW_ALPHA: f32 = 0.5;
/// Extra darkening applied to SHADOW objects on top of their light.
pub const SHADOW_COLOR_MULT: f32 = 0.1;

/// Something nearer than `depth` hides rows `..=top` and `bottom..`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Occluder {
    pub depth: f32,
    /// Last hidden row counted from the top.
    pub top: i16,
    /// First hidden row counted from the bottom.
    pub bottom: i16,
}

impl Occluder {
    /// Hides the whole column.
    pub const fn solid(depth: f32) -> Self {
        Self {
            depth,
            top: i16::MAX,
            bottom: i16::MIN,
        }
    }
}

type OccluderList = SmallVec<[Occluder; 8]>;

#[derive(Default)]
pub struct OccludingColumns {
    columns: Vec<OccluderList>,
    capacity: usize,
}

impl OccludingColumns {
    pub fn reset(&mut self, width: usize, capacity: usize) {
        self.columns.resize_with(width, OccluderList::new);
        for c in &mut self.columns {
            c.clear();
        }
        self.capacity = capacity;
    }

    pub fn add(&mut self, x: usize, occluder: Occluder) -> Result<(), RenderError> {
        let capacity = self.capacity;
        let column = &mut self.columns[x];
        if column.len() >= capacity {
            return Err(RenderError::OccluderOverflow { x, capacity });
        }
        column.push(occluder);
        Ok(())
    }

    pub fn column(&self, x: usize) -> &[Occluder] {
        &self.columns[x]
    }

    pub fn count(&self) -> usize {
        self.columns.iter().map(|c| c.len()).sum()
    }

    /// Visible rows `(top, bottom)` (both exclusive) left for something at
    /// `depth`, starting from the open column `(-1, view_h)`. Only occluders
    /// strictly nearer than `depth` take part.
    pub fn clip_bounds(&self, x: usize, depth: f32, view_h: i32) -> (i32, i32) {
        let mut top = -1;
        let mut bottom = view_h;
        for occ in self.columns[x].iter().filter(|o| depth > o.depth) {
            top = top.max(occ.top as i32);
            bottom = bottom.min(occ.bottom as i32);
        }
        (top, bottom)
    }
}

/// Draw one sprite fragment behind whatever occludes it; returns the number
/// of pixels written.
pub fn draw_fragment(
    frag: &SpriteFragment,
    occluders: &OccludingColumns,
    textures: &TextureBank,
    dst: &mut Target,
) -> Result<u32, RenderError> {
    let x = frag.x as usize;
    if frag.x < 0 || x >= dst.width {
        return Ok(0);
    }

    let (clip_top, clip_bottom) = occluders.clip_bounds(x, frag.depth, dst.height as i32);
    if clip_top >= clip_bottom {
        return Ok(0);
    }

    let mut y = frag.y;
    let mut count = frag.height as i32;
    let mut tex_y = 0.0;
    let mut tex_y_sub = frag.tex_y_sub;

    if y <= clip_top {
        let n = clip_top - y + 1;
        if n >= count {
            return Ok(0);
        }
        tex_y = frag.tex_y_step * n as f32 + tex_y_sub;
        tex_y_sub = 0.0;
        y += n;
        count -= n;
    }
    if y + count > clip_bottom {
        count = clip_bottom - y;
        if count <= 0 {
            return Ok(0);
        }
    }

    let tex = textures.texture(frag.texture)?;
    let col = frag.tex_col.min(tex.w.saturating_sub(1) as u16) as usize;
    let src = Texels {
        pixels: tex.column(col),
        width: 1,
        height: tex.h,
    };

    let mut flags = BlitFlags::ALPHA_TEST | BlitFlags::COLOR_MULT_RGB | BlitFlags::CLIP;
    let mut light = frag.light_mul;
    if frag.transparent {
        flags |= BlitFlags::ALPHA_BLEND;
        light *= SHADOW_COLOR_MULT;
    }

    let blit = ColumnBlit {
        tex_x: 0.0,
        tex_y,
        tex_y_sub,
        tex_x_step: 0.0,
        tex_y_step: frag.tex_y_step,
        dst_x: frag.x,
        dst_y: y,
        count: count as u32,
        color_mul: [light; 3],
        alpha: SHADOW_ALPHA,
    };
    let mode = BlitMode {
        h_wrap: Wrap::Clamp,
        v_wrap: Wrap::Discard,
        flags,
    };
    Ok(blit_column(&src, dst, &blit, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ScreenGeometry,
        world::{Texture, TextureId},
    };

    fn bank() -> (TextureBank, TextureId) {
        let mut bank = TextureBank::default_with_checker();
        let id = bank
            .insert("SPR", Texture::solid("SPR", 2, 10, 0xFF_FFFFFF))
            .unwrap();
        (bank, id)
    }

    fn fragment(texture: TextureId, x: i32, depth: f32) -> SpriteFragment {
        SpriteFragment {
            x,
            y: 0,
            height: 10,
            texture,
            tex_col: 0,
            tex_y_step: 1.0,
            tex_y_sub: 0.0,
            light_mul: 1.0,
            transparent: false,
            depth,
        }
    }

    #[test]
    fn only_nearer_occluders_clip() {
        let mut occ = OccludingColumns::default();
        occ.reset(4, 8);
        occ.add(1, Occluder { depth: 50.0, top: 3, bottom: 10 }).unwrap();
        occ.add(1, Occluder { depth: 150.0, top: 6, bottom: 8 }).unwrap();

        assert_eq!(occ.clip_bounds(1, 100.0, 10), (3, 10));
        assert_eq!(occ.clip_bounds(1, 200.0, 10), (6, 8));
        // equal depth does not occlude
        assert_eq!(occ.clip_bounds(1, 50.0, 10), (-1, 10));
        assert_eq!(occ.clip_bounds(0, 1e9, 10), (-1, 10));
    }

    #[test]
    fn column_capacity_is_enforced() {
        let mut occ = OccludingColumns::default();
        occ.reset(2, 1);
        occ.add(0, Occluder::solid(1.0)).unwrap();
        assert_eq!(
            occ.add(0, Occluder::solid(2.0)),
            Err(RenderError::OccluderOverflow { x: 0, capacity: 1 })
        );
        assert_eq!(occ.count(), 1);
    }

    #[test]
    fn trims_rows_hidden_by_silhouettes() {
        let (bank, id) = bank();
        let mut occ = OccludingColumns::default();
        occ.reset(4, 8);
        occ.add(2, Occluder { depth: 10.0, top: 2, bottom: 7 }).unwrap();

        let mut buf = vec![0; 4 * 10];
        let mut dst = Target::new(&mut buf, &ScreenGeometry::full(4, 10));
        let n = draw_fragment(&fragment(id, 2, 20.0), &occ, &bank, &mut dst).unwrap();
        assert_eq!(n, 4); // rows 3..=6
        assert_eq!(dst.pixel(2, 2), 0);
        assert_eq!(dst.pixel(2, 3), 0xFF_FFFFFF);
        assert_eq!(dst.pixel(2, 6), 0xFF_FFFFFF);
        assert_eq!(dst.pixel(2, 7), 0);
    }

    #[test]
    fn fully_occluded_writes_nothing() {
        let (bank, id) = bank();
        let mut occ = OccludingColumns::default();
        occ.reset(4, 8);
        occ.add(0, Occluder::solid(10.0)).unwrap();

        let mut buf = vec![0; 4 * 10];
        let mut dst = Target::new(&mut buf, &ScreenGeometry::full(4, 10));
        assert_eq!(draw_fragment(&fragment(id, 0, 20.0), &occ, &bank, &mut dst).unwrap(), 0);
        // the same fragment in front of the wall is drawn whole
        assert_eq!(draw_fragment(&fragment(id, 0, 5.0), &occ, &bank, &mut dst).unwrap(), 10);
        assert!(buf[..4].iter().all(|&p| p == 0 || p == 0xFF_FFFFFF));
    }

    #[test]
    fn offscreen_fragment_writes_nothing() {
        let (bank, id) = bank();
        let mut occ = OccludingColumns::default();
        occ.reset(4, 8);
        let mut buf = vec![0; 4 * 10];
        let mut dst = Target::new(&mut buf, &ScreenGeometry::full(4, 10));
        assert_eq!(draw_fragment(&fragment(id, 4, 1.0), &occ, &bank, &mut dst).unwrap(), 0);
        assert_eq!(draw_fragment(&fragment(id, -1, 1.0), &occ, &bank, &mut dst).unwrap(), 0);

        // rows -10..=-1, wholly above the view
        let above = SpriteFragment {
            y: -10,
            ..fragment(id, 1, 1.0)
        };
        assert_eq!(draw_fragment(&above, &occ, &bank, &mut dst).unwrap(), 0);

        // starts on the first row past the bottom
        let below = SpriteFragment {
            y: 10,
            ..fragment(id, 1, 1.0)
        };
        assert_eq!(draw_fragment(&below, &occ, &bank, &mut dst).unwrap(), 0);
        assert!(buf.iter().all(|&p| p == 0));
    }

    #[test]
    fn shadow_blends_darkened_texels() {
        let (bank, id) = bank();
        let mut occ = OccludingColumns::default();
        occ.reset(4, 8);
        let mut buf = vec![0xFF_000000; 4 * 10];
        let mut dst = Target::new(&mut buf, &ScreenGeometry::full(4, 10));
        let mut frag = fragment(id, 1, 1.0);
        frag.transparent = true;
        frag.height = 1;
        draw_fragment(&frag, &occ, &bank, &mut dst).unwrap();
        // 255 * 0.1 = 25, blended half-way with black
        assert_eq!(dst.pixel(1, 0), 0xFF_0C0C0C);
    }
}
