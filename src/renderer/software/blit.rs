//! Column blit primitive shared by walls, sky and sprites.
//!
//! One call copies a vertical run of texels from a column-major texture into
//! one destination column, stepping the source coordinate by a fixed amount
//! per pixel. Everything else (lighting, transparency, clipping, texture
//! wrap) is selected with a [`BlitMode`].

use bitflags::bitflags;

use crate::{config::ScreenGeometry, renderer::Rgba, world::Texture};

/// What happens to a texel coordinate outside the texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    /// Tile.
    #[default]
    Wrap,
    /// Repeat the edge texel.
    Clamp,
    /// Skip the pixel.
    Discard,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct BlitFlags: u8 {
        /// Skip texels whose alpha byte is zero.
        const ALPHA_TEST     = 0x01;
        /// Mix with the destination using [`ColumnBlit::alpha`].
        const ALPHA_BLEND    = 0x02;
        /// Multiply RGB by [`ColumnBlit::color_mul`].
        const COLOR_MULT_RGB = 0x04;
        /// Trim the run to the view rectangle.
        const CLIP           = 0x08;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlitMode {
    pub h_wrap: Wrap,
    pub v_wrap: Wrap,
    pub flags: BlitFlags,
}

/// Parameters of one column blit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnBlit {
    pub tex_x: f32,
    pub tex_y: f32,
    /// Sub-texel offset added to `tex_y` before the first pixel.
    pub tex_y_sub: f32,
    pub tex_x_step: f32,
    pub tex_y_step: f32,
    /// Destination, relative to the view origin.
    pub dst_x: i32,
    pub dst_y: i32,
    pub count: u32,
    pub color_mul: [f32; 3],
    pub alpha: f32,
}

impl Default for ColumnBlit {
    fn default() -> Self {
        Self {
            tex_x: 0.0,
            tex_y: 0.0,
            tex_y_sub: 0.0,
            tex_x_step: 0.0,
            tex_y_step: 1.0,
            dst_x: 0,
            dst_y: 0,
            count: 0,
            color_mul: [1.0; 3],
            alpha: 1.0,
        }
    }
}

/// Column-major texel source.
#[derive(Clone, Copy)]
pub struct Texels<'a> {
    pub pixels: &'a [u32],
    pub width: usize,
    pub height: usize,
}

impl<'a> Texels<'a> {
    pub fn from_texture(tex: &'a Texture) -> Self {
        Self {
            pixels: &tex.pixels,
            width: tex.w,
            height: tex.h,
        }
    }
}

/// The frame buffer plus the view rectangle inside it.
pub struct Target<'a> {
    pub pixels: &'a mut [Rgba],
    pub stride: usize,
    pub x_offset: usize,
    pub y_offset: usize,
    pub width: usize,
    pub height: usize,
}

impl<'a> Target<'a> {
    pub fn new(pixels: &'a mut [Rgba], screen: &ScreenGeometry) -> Self {
        Self {
            pixels,
            stride: screen.buffer_width,
            x_offset: screen.x_offset,
            y_offset: screen.y_offset,
            width: screen.view_width,
            height: screen.view_height,
        }
    }

    /// Index of view pixel `(x, y)` in the buffer.
    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        (self.y_offset + y) * self.stride + self.x_offset + x
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, argb: Rgba) {
        debug_assert!(x < self.width && y < self.height);
        let idx = self.index(x, y);
        if let Some(px) = self.pixels.get_mut(idx) {
            *px = argb;
        }
    }
}

#[inline(always)]
fn wrap_coord(c: f32, size: usize, mode: Wrap) -> Option<usize> {
    let i = c.floor() as i64;
    let n = size as i64;
    match mode {
        Wrap::Wrap => Some(i.rem_euclid(n) as usize),
        Wrap::Clamp => Some(i.clamp(0, n - 1) as usize),
        Wrap::Discard => (0..n).contains(&i).then_some(i as usize),
    }
}

#[inline(always)]
fn mul_channel(c: u32, m: f32) -> u32 {
    (c as f32 * m).min(255.0) as u32
}

#[inline(always)]
fn mul_rgb(c: u32, m: [f32; 3]) -> u32 {
    let r = mul_channel((c >> 16) & 0xFF, m[0]);
    let g = mul_channel((c >> 8) & 0xFF, m[1]);
    let b = mul_channel(c & 0xFF, m[2]);
    (r << 16) | (g << 8) | b
}

#[inline(always)]
fn blend(src: u32, dst: u32, alpha: f32) -> u32 {
    let inv = 1.0 - alpha;
    let mix = |shift: u32| {
        let s = ((src >> shift) & 0xFF) as f32;
        let d = ((dst >> shift) & 0xFF) as f32;
        ((s * alpha + d * inv).min(255.0) as u32) << shift
    };
    mix(16) | mix(8) | mix(0)
}

/// Final colour of one written pixel: the texel lit by `color_mul` and/or
/// blended over `under`, as `flags` select. Always opaque.
#[inline(always)]
pub fn shade_texel(
    texel: Rgba,
    under: Rgba,
    flags: BlitFlags,
    color_mul: [f32; 3],
    alpha: f32,
) -> Rgba {
    let mut rgb = if flags.contains(BlitFlags::COLOR_MULT_RGB) {
        mul_rgb(texel, color_mul)
    } else {
        texel & 0x00FF_FFFF
    };
    if flags.contains(BlitFlags::ALPHA_BLEND) {
        rgb = blend(rgb, under, alpha);
    }
    0xFF00_0000 | rgb
}

/// Draw one column; returns the number of pixels written.
pub fn blit_column(src: &Texels, dst: &mut Target, blit: &ColumnBlit, mode: BlitMode) -> u32 {
    if src.width == 0 || src.height == 0 || blit.count == 0 {
        return 0;
    }

    let mut tex_x = blit.tex_x;
    let mut tex_y = blit.tex_y + blit.tex_y_sub;
    let mut dst_y = blit.dst_y as i64;
    let mut count = blit.count as i64;

    if mode.flags.contains(BlitFlags::CLIP) {
        if blit.dst_x < 0 || blit.dst_x as usize >= dst.width {
            return 0;
        }
        if dst_y < 0 {
            let skip = -dst_y;
            if skip >= count {
                return 0;
            }
            tex_x += blit.tex_x_step * skip as f32;
            tex_y += blit.tex_y_step * skip as f32;
            count -= skip;
            dst_y = 0;
        }
        let room = dst.height as i64 - dst_y;
        if room <= 0 {
            return 0;
        }
        count = count.min(room);
    } else {
        debug_assert!(blit.dst_x >= 0 && (blit.dst_x as usize) < dst.width);
        debug_assert!(dst_y >= 0 && dst_y + count <= dst.height as i64);
        if blit.dst_x < 0 || blit.dst_x as usize >= dst.width || dst_y < 0 {
            return 0;
        }
        count = count.min(dst.height as i64 - dst_y);
    }

    let x = blit.dst_x as usize;
    let mut written = 0;

    for i in 0..count {
        let fi = i as f32;
        let Some(u) = wrap_coord(tex_x + blit.tex_x_step * fi, src.width, mode.h_wrap) else {
            continue;
        };
        let Some(v) = wrap_coord(tex_y + blit.tex_y_step * fi, src.height, mode.v_wrap) else {
            continue;
        };

        let texel = src.pixels[u * src.height + v];
        if mode.flags.contains(BlitFlags::ALPHA_TEST) && texel >> 24 == 0 {
            continue;
        }

        let idx = dst.index(x, (dst_y + i) as usize);
        let Some(px) = dst.pixels.get_mut(idx) else {
            break;
        };
        *px = shade_texel(texel, *px, mode.flags, blit.color_mul, blit.alpha);
        written += 1;
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(buf: &mut [Rgba], w: usize, h: usize) -> Target<'_> {
        Target::new(buf, &ScreenGeometry::full(w, h))
    }

    /// 1×4 column: red, transparent, green, blue.
    fn column() -> Texture {
        Texture {
            name: "COL".into(),
            w: 1,
            h: 4,
            pixels: vec![0xFF_FF0000, 0x00_123456, 0xFF_00FF00, 0xFF_0000FF],
        }
    }

    #[test]
    fn straight_copy() {
        let tex = column();
        let mut buf = vec![0; 4 * 4];
        let mut dst = target(&mut buf, 4, 4);
        let n = blit_column(
            &Texels::from_texture(&tex),
            &mut dst,
            &ColumnBlit {
                dst_x: 2,
                count: 4,
                ..Default::default()
            },
            BlitMode::default(),
        );
        assert_eq!(n, 4);
        assert_eq!(dst.pixel(2, 0), 0xFF_FF0000);
        // alpha test is off: the transparent texel is written opaque
        assert_eq!(dst.pixel(2, 1), 0xFF_123456);
        assert_eq!(dst.pixel(2, 3), 0xFF_0000FF);
        assert_eq!(dst.pixel(1, 0), 0);
    }

    #[test]
    fn alpha_test_skips_transparent_texels() {
        let tex = column();
        let mut buf = vec![7; 4 * 4];
        let mut dst = target(&mut buf, 4, 4);
        let mode = BlitMode {
            flags: BlitFlags::ALPHA_TEST,
            ..Default::default()
        };
        let blit = ColumnBlit {
            count: 4,
            ..Default::default()
        };
        assert_eq!(blit_column(&Texels::from_texture(&tex), &mut dst, &blit, mode), 3);
        assert_eq!(dst.pixel(0, 1), 7);
    }

    #[test]
    fn vertical_wrap_and_discard() {
        let tex = column();
        let src = Texels::from_texture(&tex);
        let blit = ColumnBlit {
            tex_y: 2.0,
            count: 4,
            ..Default::default()
        };

        let mut buf = vec![0; 4];
        let mut dst = target(&mut buf, 1, 4);
        assert_eq!(blit_column(&src, &mut dst, &blit, BlitMode::default()), 4);
        assert_eq!(dst.pixel(0, 2), 0xFF_FF0000); // wrapped back to row 0

        let mut buf = vec![0; 4];
        let mut dst = target(&mut buf, 1, 4);
        let mode = BlitMode {
            v_wrap: Wrap::Discard,
            ..Default::default()
        };
        assert_eq!(blit_column(&src, &mut dst, &blit, mode), 2);
        assert_eq!(dst.pixel(0, 2), 0);

        let mut buf = vec![0; 4];
        let mut dst = target(&mut buf, 1, 4);
        let mode = BlitMode {
            v_wrap: Wrap::Clamp,
            ..Default::default()
        };
        assert_eq!(blit_column(&src, &mut dst, &blit, mode), 4);
        assert_eq!(dst.pixel(0, 3), 0xFF_0000FF);
    }

    #[test]
    fn clip_trims_and_advances_source() {
        let tex = column();
        let mut buf = vec![0; 3];
        let mut dst = target(&mut buf, 1, 3);
        let mode = BlitMode {
            flags: BlitFlags::CLIP,
            ..Default::default()
        };
        let blit = ColumnBlit {
            dst_y: -2,
            count: 8,
            ..Default::default()
        };
        let n = blit_column(&Texels::from_texture(&tex), &mut dst, &blit, mode);
        assert_eq!(n, 3);
        // first visible row samples texel 2
        assert_eq!(dst.pixel(0, 0), 0xFF_00FF00);

        let off = ColumnBlit {
            dst_x: 5,
            count: 3,
            ..Default::default()
        };
        assert_eq!(blit_column(&Texels::from_texture(&tex), &mut dst, &off, mode), 0);
    }

    #[test]
    fn light_multiply_and_blend() {
        let tex = Texture::solid("W", 1, 1, 0xFF_FF8040);
        let mut buf = vec![0xFF_000000; 2];
        let mut dst = target(&mut buf, 2, 1);
        let mode = BlitMode {
            flags: BlitFlags::COLOR_MULT_RGB,
            ..Default::default()
        };
        let blit = ColumnBlit {
            count: 1,
            color_mul: [0.5; 3],
            ..Default::default()
        };
        blit_column(&Texels::from_texture(&tex), &mut dst, &blit, mode);
        assert_eq!(dst.pixel(0, 0), 0xFF_7F4020);

        let mode = BlitMode {
            flags: BlitFlags::ALPHA_BLEND,
            ..Default::default()
        };
        let blit = ColumnBlit {
            dst_x: 1,
            count: 1,
            alpha: 0.5,
            ..Default::default()
        };
        blit_column(&Texels::from_texture(&tex), &mut dst, &blit, mode);
        assert_eq!(dst.pixel(1, 0), 0xFF_7F4020);
    }

    #[test]
    fn shading_is_opaque_and_ordered() {
        let lit = BlitFlags::COLOR_MULT_RGB;
        assert_eq!(shade_texel(0x00_FF8040, 0, BlitFlags::empty(), [0.0; 3], 0.0), 0xFF_FF8040);
        assert_eq!(shade_texel(0x80_FF8040, 0, lit, [0.5; 3], 0.0), 0xFF_7F4020);
        // lit first, then blended
        let both = lit | BlitFlags::ALPHA_BLEND;
        assert_eq!(shade_texel(0xFF_FF8040, 0xFF_000000, both, [0.5; 3], 0.5), 0xFF_3F2010);
    }

    #[test]
    fn view_offset_is_respected() {
        let tex = Texture::solid("W", 1, 1, 0xFF_FFFFFF);
        let mut buf = vec![0; 4 * 4];
        let screen = ScreenGeometry {
            buffer_width: 4,
            buffer_height: 4,
            view_width: 2,
            view_height: 2,
            x_offset: 1,
            y_offset: 2,
        };
        let mut dst = Target::new(&mut buf, &screen);
        let blit = ColumnBlit {
            count: 1,
            ..Default::default()
        };
        blit_column(&Texels::from_texture(&tex), &mut dst, &blit, BlitMode::default());
        assert_eq!(buf[2 * 4 + 1], 0xFF_FFFFFF);
        assert_eq!(buf.iter().filter(|&&p| p != 0).count(), 1);
    }
}
