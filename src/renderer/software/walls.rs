//! Wall segments: the visplane/clip scan pass and the textured column draw.

use crate::{
    renderer::software::{
        RenderError, Software,
        blit::{BlitFlags, BlitMode, ColumnBlit, Target, Texels, Wrap, blit_column},
        occlusion::Occluder,
        planes::ColumnYBounds,
        sky::draw_sky_column,
    },
    world::{Texture, TextureBank, WallActions, WallPart, WallSegment},
};

/// Scales above this are treated as this for lighting and texel stepping.
pub const MAX_WALL_SCALE: f32 = 512.0;

/// Per-column increments of a wall part's screen edges.
#[derive(Clone, Copy, Debug)]
struct ColumnStep {
    dytop: f32,
    dybot: f32,
}

impl ColumnStep {
    fn from_part(part: &WallPart, seg: &WallSegment) -> Self {
        Self {
            dytop: -seg.scale_step * part.top_height,
            dybot: -seg.scale_step * part.bottom_height,
        }
    }
}

/// Screen edges of a wall part at the current column.
#[derive(Clone, Copy, Debug)]
struct ColumnCursor {
    y_top: f32,
    y_bot: f32,
}

impl ColumnCursor {
    fn from_part(part: &WallPart, seg: &WallSegment, center_y: f32) -> Self {
        Self {
            y_top: center_y - part.top_height * seg.left_scale,
            y_bot: center_y - part.bottom_height * seg.left_scale,
        }
    }

    #[inline]
    fn advance(&mut self, s: &ColumnStep) {
        self.y_top += s.dytop;
        self.y_bot += s.dybot;
    }
}

/// One enabled part of a segment while it is being drawn.
struct PartRaster<'a> {
    tex: &'a Texture,
    /// Texture row at the part's top edge.
    tex_y: u32,
    cursor: ColumnCursor,
    step: ColumnStep,
}

impl<'a> PartRaster<'a> {
    fn new(
        part: &WallPart,
        seg: &WallSegment,
        center_y: f32,
        textures: &'a TextureBank,
    ) -> Result<Self, RenderError> {
        let tex = textures.texture(part.texture)?;
        let tex_y = ((part.texture_mid - part.top_height) as i32).rem_euclid(tex.h as i32) as u32;
        Ok(Self {
            tex,
            tex_y,
            cursor: ColumnCursor::from_part(part, seg, center_y),
            step: ColumnStep::from_part(part, seg),
        })
    }
}

impl Software {
    /// Validate that a segment lies inside the view.
    pub(super) fn check_segment(&self, seg: &WallSegment) -> Result<bool, RenderError> {
        if seg.left_x > seg.right_x {
            return Ok(false);
        }
        if seg.left_x < 0 || seg.right_x as usize >= self.view.width {
            return Err(RenderError::SegmentOutOfBounds {
                left: seg.left_x,
                right: seg.right_x,
                width: self.view.width,
            });
        }
        Ok(true)
    }

    /// Scan pass for one segment, nearest first: record floor and ceiling
    /// columns into visplanes, tighten the running clip bounds, record sprite
    /// occluders and draw any sky it reveals.
    pub(super) fn scan_segment(
        &mut self,
        seg: &WallSegment,
        sky: &Texture,
    ) -> Result<(), RenderError> {
        let actions = seg.actions;
        let view = &self.view;
        let center_y = view.center_y;
        let view_h = view.height as i32;
        let right_x = seg.right_x as usize;
        let mut dst = Target::new(&mut self.scratch, &self.config.screen);

        // slot 0 is always "taken", so each surface looks up a plane first
        let mut floor_plane = 0;
        let mut ceil_plane = 0;

        for (i, x) in (seg.left_x as usize..=right_x).enumerate() {
            let raw_scale = seg.left_scale + seg.scale_step * i as f32;
            if raw_scale <= 0.0 {
                continue;
            }
            let scale = raw_scale.min(MAX_WALL_SCALE);
            let ceil_clip = self.clip_bands.ceil[x] as i32;
            let floor_clip = self.clip_bands.floor[x] as i32;

            if actions.contains(WallActions::ADD_FLOOR) {
                let mut top = (center_y - scale * seg.floor_height) as i32;
                if top <= ceil_clip {
                    top = ceil_clip + 1;
                }
                let bottom = floor_clip - 1;
                if top <= bottom {
                    if self.visplanes.column(floor_plane, x).is_defined() {
                        floor_plane = self.visplanes.find_or_create_plane(
                            floor_plane,
                            seg.floor_height,
                            seg.floor_pic,
                            x,
                            right_x,
                            seg.light_level,
                        )?;
                    }
                    self.visplanes.set_column(
                        floor_plane,
                        x,
                        ColumnYBounds {
                            top: top as i16,
                            bottom: bottom as i16,
                        },
                    );
                }
            }

            if actions.contains(WallActions::ADD_CEILING) {
                let top = ceil_clip + 1;
                let mut bottom = (center_y - 1.0 - scale * seg.ceiling_height) as i32;
                if bottom >= floor_clip {
                    bottom = floor_clip - 1;
                }
                if top <= bottom {
                    if self.visplanes.column(ceil_plane, x).is_defined() {
                        ceil_plane = self.visplanes.find_or_create_plane(
                            ceil_plane,
                            seg.ceiling_height,
                            seg.ceiling_pic,
                            x,
                            right_x,
                            seg.light_level,
                        )?;
                    }
                    self.visplanes.set_column(
                        ceil_plane,
                        x,
                        ColumnYBounds {
                            top: top as i16,
                            bottom: bottom as i16,
                        },
                    );
                }
            }

            let mut sil_top = None;
            let mut sil_bottom = None;

            if actions.intersects(WallActions::BOTTOM_SIL | WallActions::NEW_FLOOR) {
                let low = ((center_y - scale * seg.floor_new_height) as i32)
                    .min(floor_clip)
                    .max(0);
                if actions.contains(WallActions::BOTTOM_SIL) {
                    sil_bottom = Some(low);
                }
                if actions.contains(WallActions::NEW_FLOOR) {
                    self.clip_bands.floor[x] = low as i16;
                }
            }

            if actions.intersects(WallActions::TOP_SIL | WallActions::NEW_CEILING) {
                let high = ((center_y - 1.0 - scale * seg.ceiling_new_height) as i32)
                    .max(ceil_clip)
                    .min(view_h - 1);
                if actions.contains(WallActions::TOP_SIL) {
                    sil_top = Some(high);
                }
                if actions.contains(WallActions::NEW_CEILING) {
                    self.clip_bands.ceil[x] = high as i16;
                }
            }

            let depth = view.depth_for_scale(raw_scale);
            if actions.contains(WallActions::SOLID_SIL) {
                self.occluders.add(x, Occluder::solid(depth))?;
                self.clip_bands.ceil[x] = (view_h - 1) as i16;
                self.clip_bands.floor[x] = 0;
            } else if sil_top.is_some() || sil_bottom.is_some() {
                let occluder = Occluder {
                    depth,
                    top: sil_top.unwrap_or(-1) as i16,
                    bottom: sil_bottom.unwrap_or(view_h) as i16,
                };
                self.occluders.add(x, occluder)?;
            }

            if actions.contains(WallActions::ADD_SKY) {
                let bottom = ((center_y - scale * seg.ceiling_height) as i32).min(floor_clip);
                if ceil_clip + 1 < bottom {
                    draw_sky_column(view, x, sky, bottom as u32, &mut dst);
                    self.stats.sky_columns += 1;
                }
            }
        }
        Ok(())
    }

    /// Draw the textured parts of one segment; returns pixels written.
    pub(super) fn draw_segment(
        &mut self,
        seg: &WallSegment,
        textures: &TextureBank,
    ) -> Result<u32, RenderError> {
        let actions = seg.actions;
        if !actions.intersects(WallActions::TOP_TEXTURE | WallActions::BOTTOM_TEXTURE) {
            return Ok(0);
        }

        let view = &self.view;
        let light = self.light_tables.params(seg.light_level as u32);
        let center_angle = seg.center_angle.to_radians();

        let mut parts: [Option<PartRaster>; 2] = [None, None];
        if actions.contains(WallActions::TOP_TEXTURE) {
            parts[0] = Some(PartRaster::new(&seg.top, seg, view.center_y, textures)?);
        }
        if actions.contains(WallActions::BOTTOM_TEXTURE) {
            parts[1] = Some(PartRaster::new(&seg.bottom, seg, view.center_y, textures)?);
        }

        let mut dst = Target::new(&mut self.scratch, &self.config.screen);
        let mut written = 0;

        for (i, x) in (seg.left_x..=seg.right_x).enumerate() {
            let scale = seg.left_scale + seg.scale_step * i as f32;
            if scale > 0.0 {
                let scale = scale.min(MAX_WALL_SCALE);
                let inv_scale = 1.0 / scale;
                let tex_x = (seg.offset
                    - (center_angle - view.view_angle_for_x(x as usize)).tan() * seg.distance)
                    as i32;
                let light_mul = light.light_mul_for_scale(scale);

                for part in parts.iter().flatten() {
                    written += draw_wall_column(&mut dst, part, x, tex_x, inv_scale, light_mul);
                }
            }
            for part in parts.iter_mut().flatten() {
                part.cursor.advance(&part.step);
            }
        }
        Ok(written)
    }
}

/// Clip one wall column to the view and blit it.
fn draw_wall_column(
    dst: &mut Target,
    part: &PartRaster,
    x: i32,
    tex_x: i32,
    inv_scale: f32,
    light_mul: f32,
) -> u32 {
    let height_f = part.cursor.y_bot - part.cursor.y_top;
    if height_f < 0.0 {
        return 0;
    }
    let column_height = height_f as i64 + 1;
    let view_y = part.cursor.y_top as i64;
    let view_h = dst.height as i64;

    if view_y >= view_h {
        return 0;
    }
    let offscreen_top = if view_y < 0 { -view_y } else { 0 };
    if offscreen_top >= column_height {
        return 0;
    }
    let y = view_y + offscreen_top;
    let count = (column_height - offscreen_top).min(view_h - y);

    let tex = part.tex;
    let blit = ColumnBlit {
        tex_x: tex_x.rem_euclid(tex.w as i32) as f32,
        tex_y: part.tex_y as f32 + inv_scale * offscreen_top as f32,
        tex_y_step: inv_scale,
        dst_x: x,
        dst_y: y as i32,
        count: count as u32,
        color_mul: [light_mul; 3],
        ..Default::default()
    };
    let mode = BlitMode {
        h_wrap: Wrap::Wrap,
        v_wrap: Wrap::Wrap,
        flags: BlitFlags::COLOR_MULT_RGB,
    };
    blit_column(&Texels::from_texture(tex), dst, &blit, mode)
}
