//! Things in the world: project them to screen rectangles, sort them far to
//! near, cut them into one fragment per screen column and blit those behind
//! the occluders recorded by the wall scan.

use log::trace;

use crate::{
    defs::MobjFlags,
    math::{Angle, fixed::fixed_to_float, point_to_angle},
    renderer::software::{
        RenderError, Software,
        blit::Target,
        lighting::{LightTables, MAX_LIGHT_VALUE},
        occlusion::draw_fragment,
        view::ViewState,
    },
    world::{MapObject, SpriteBank, TextureBank, TextureId},
};

/// Rows added below every fragment so rounding never loses the bottom edge.
const FRAGMENT_EXTRA_ROWS: i32 = 2;

/// Rotation bias: half a direction step, nine times over, so that
/// "facing the camera" lands in the middle of direction 0.
const SPRITE_ANGLE_BIAS: Angle = Angle(0x9000_0000);
const SPRITE_ANGLE_SHIFT: u32 = 29;

/// A projected sprite, ready to be cut into fragments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawSprite {
    /// View-space depth of the object's origin.
    pub depth: f32,
    /// Sub-pixel screen rectangle.
    pub lx: f32,
    pub rx: f32,
    pub ty: f32,
    pub by: f32,
    pub light_mul: f32,
    pub flipped: bool,
    pub transparent: bool,
    pub texture: TextureId,
    pub tex_w: u16,
    pub tex_h: u16,
}

/// One screen column of a [`DrawSprite`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteFragment {
    pub x: i32,
    pub y: i32,
    /// Rows to draw, margin included.
    pub height: u32,
    pub texture: TextureId,
    /// Source column inside `texture`.
    pub tex_col: u16,
    pub tex_y_step: f32,
    /// Texel offset of the first row (zero or negative).
    pub tex_y_sub: f32,
    pub light_mul: f32,
    pub transparent: bool,
    pub depth: f32,
}

/// Which of the eight rotations of a frame faces the camera.
///
/// `to_object` is the angle from the view point to the object.
#[inline]
pub fn sprite_angle_index(to_object: Angle, facing: Angle) -> usize {
    ((to_object - facing + SPRITE_ANGLE_BIAS).0 >> SPRITE_ANGLE_SHIFT) as usize
}

/// Project one object. `Ok(None)` when it is the camera owner or entirely
/// outside the view.
pub fn project_sprite(
    view: &ViewState,
    lights: &LightTables,
    obj: &MapObject,
    sprites: &SpriteBank,
    extra_light: u32,
) -> Result<Option<DrawSprite>, RenderError> {
    if obj.is_player || obj.flags.contains(MobjFlags::NOSECTOR) {
        return Ok(None);
    }

    let (x, y, z) = (fixed_to_float(obj.x), fixed_to_float(obj.y), fixed_to_float(obj.z));
    let Some(pos) = view.world_to_view(x, y, z) else {
        trace!("sprite {} culled: behind the near plane", obj.frame.sprite);
        return Ok(None);
    };

    let field = obj.frame;
    let sprite = sprites
        .get(field.sprite)
        .ok_or(RenderError::UnknownSprite(field.sprite))?;
    let frame = sprite
        .frames
        .get(field.frame as usize)
        .ok_or(RenderError::BadSpriteFrame {
            sprite: field.sprite,
            frame: field.frame,
        })?;

    let to_object = point_to_angle(view.x, view.y, x, y);
    let image = &frame.angles[sprite_angle_index(to_object, obj.angle)];

    let w = pos.y;
    let lx = pos.x - image.left_offset as f32;
    let rx = lx + image.width as f32;
    let Some(clip_x) = view.x_range_to_clip(lx, rx, w) else {
        trace!("sprite {} culled: off the side", field.sprite);
        return Ok(None);
    };

    let tz = pos.z + image.top_offset as f32;
    let bz = tz - image.height as f32;
    let Some(clip_z) = view.z_range_to_clip(tz, bz, w) else {
        trace!("sprite {} culled: above or below", field.sprite);
        return Ok(None);
    };

    let level = if field.full_bright {
        MAX_LIGHT_VALUE
    } else {
        (obj.sector_light as u32 + extra_light).min(MAX_LIGHT_VALUE)
    };

    Ok(Some(DrawSprite {
        depth: w,
        lx: view.clip_to_screen_x(clip_x.x, w),
        rx: view.clip_to_screen_x(clip_x.y, w),
        ty: view.clip_to_screen_y(clip_z.x, w),
        by: view.clip_to_screen_y(clip_z.y, w),
        light_mul: lights.params(level).light_mul_for_dist(w),
        flipped: image.flipped,
        transparent: obj.flags.contains(MobjFlags::SHADOW),
        texture: image.texture,
        tex_w: image.width,
        tex_h: image.height,
    }))
}

/// Farthest first.
pub fn sort_draw_sprites(sprites: &mut [DrawSprite]) {
    sprites.sort_unstable_by(|a, b| b.depth.total_cmp(&a.depth));
}

/// Cut `sprite` into per-column fragments, appending to `out`.
pub fn emit_fragments(
    sprite: &DrawSprite,
    view_width: i32,
    out: &mut Vec<SpriteFragment>,
    limit: usize,
) -> Result<(), RenderError> {
    debug_assert!(sprite.rx >= sprite.lx && sprite.by >= sprite.ty);
    if sprite.tex_w == 0 || sprite.tex_h == 0 {
        return Ok(());
    }

    let sprite_w = sprite.rx - sprite.lx;
    let sprite_h = sprite.by - sprite.ty;
    let lx = sprite.lx as i32;
    let rx = sprite.rx as i32;
    let ty = sprite.ty as i32;
    let by = sprite.by as i32 + FRAGMENT_EXTRA_ROWS;
    let w = rx - lx + 1;
    let h = by - ty + 1;

    let tex_w = sprite.tex_w as f32;
    let tex_h = sprite.tex_h as f32;
    let x_step = if sprite_w > 1.0 { tex_w / sprite_w } else { 0.0 };
    let y_step = if sprite_h > 1.0 { tex_h / sprite_h } else { 0.0 };

    // carry the fractional left/top edge into the first texel
    let x_sub = -(sprite.lx - sprite.lx.trunc()) * x_step;
    let y_sub = -(sprite.ty - sprite.ty.trunc()) * y_step;

    // rounding would drop the last texel column
    let mut extra_col = tex_w - 1.0 - ((w - 1) as f32 * x_step + x_sub) > 0.0;

    let mut x = lx;
    let mut col = 0;
    if x < 0 {
        col = -x;
        x = 0;
    }
    if col >= w {
        return Ok(());
    }
    let end_x = if rx >= view_width {
        extra_col = false;
        view_width
    } else {
        rx + 1
    };

    // first texel just inside the right edge when mirrored
    let first = if sprite.flipped {
        f32::from_bits(tex_w.to_bits() - 1)
    } else {
        0.0
    };
    let tex_x_at = |col: i32| -> f32 {
        let u = x_step * col as f32 + x_sub;
        match (col, sprite.flipped) {
            (0, _) => first,
            (_, true) => tex_w - u.max(0.5),
            (_, false) => u.max(0.0),
        }
    };

    let mut push = |x: i32, tex_col: u16| -> Result<(), RenderError> {
        if out.len() >= limit {
            return Err(RenderError::FragmentOverflow(limit));
        }
        out.push(SpriteFragment {
            x,
            y: ty,
            height: h as u32,
            texture: sprite.texture,
            tex_col,
            tex_y_step: y_step,
            tex_y_sub: y_sub,
            light_mul: sprite.light_mul,
            transparent: sprite.transparent,
            depth: sprite.depth,
        });
        Ok(())
    };

    while x < end_x {
        let tex_col = tex_x_at(col) as u16;
        if tex_col >= sprite.tex_w {
            break;
        }
        push(x, tex_col)?;
        x += 1;
        col += 1;
    }

    if extra_col && rx + 1 < view_width {
        let last = if sprite.flipped {
            0
        } else {
            sprite.tex_w.saturating_sub(1)
        };
        push(rx + 1, last)?;
    }
    Ok(())
}

impl Software {
    /// Project every visible object and sort the result far to near.
    pub(super) fn add_sprites(
        &mut self,
        objects: &[MapObject],
        sprites: &SpriteBank,
        extra_light: u32,
    ) -> Result<(), RenderError> {
        let limit = self.config.limits.max_draw_sprites;
        for obj in objects {
            let Some(ds) = project_sprite(&self.view, &self.light_tables, obj, sprites, extra_light)?
            else {
                continue;
            };
            if self.draw_sprites.len() >= limit {
                return Err(RenderError::DrawSpriteOverflow(limit));
            }
            self.draw_sprites.push(ds);
        }
        sort_draw_sprites(&mut self.draw_sprites);
        self.stats.draw_sprites = self.draw_sprites.len();
        Ok(())
    }

    /// Fragment the sorted sprites and draw them; returns pixels written.
    pub(super) fn blit_sprites(&mut self, textures: &TextureBank) -> Result<u32, RenderError> {
        let limit = self.config.limits.max_sprite_fragments;
        let view_width = self.view.width as i32;
        self.fragments.clear();
        for sprite in &self.draw_sprites {
            emit_fragments(sprite, view_width, &mut self.fragments, limit)?;
        }
        self.stats.fragments = self.fragments.len();

        let mut dst = Target::new(&mut self.scratch, &self.config.screen);
        let mut written = 0;
        for frag in &self.fragments {
            written += draw_fragment(frag, &self.occluders, textures, &mut dst)?;
        }
        Ok(written)
    }
}
