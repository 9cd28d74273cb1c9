use crate::{
    math::{
        ANGLE_TO_SKY_SHIFT,
        fixed::{FRACMASK, fixed_div, fixed_mul, fixed_to_float, fixed_to_int, int_to_fixed, texel_step},
    },
    renderer::software::{
        blit::{BlitMode, ColumnBlit, Target, Texels, blit_column},
        view::ViewState,
    },
    world::Texture,
};

/// View height the sky art was drawn for.
pub const REFERENCE_VIEW_HEIGHT: u32 = 160;

/// Sky texture column for screen column `x`: 256 texels per 90° of view.
#[inline]
pub fn sky_tex_x(view: &ViewState, x: usize) -> u32 {
    ((view.x_to_view_angle(x) + view.angle).0 >> ANGLE_TO_SKY_SHIFT) & 0xFF
}

/// Screen height of a sky column: `tex_h * view_h / 160`, rounded up.
pub fn sky_column_height(tex_h: u32, view_h: u32) -> u32 {
    let sky_scale = fixed_div(int_to_fixed(view_h as i32), int_to_fixed(REFERENCE_VIEW_HEIGHT as i32));
    let scaled = fixed_mul(int_to_fixed(tex_h as i32), sky_scale);
    let round = u32::from(scaled & FRACMASK != 0);
    fixed_to_int(scaled) as u32 + round
}

/// Draw the sky at column `x`, at most `max_height` rows from the top of the
/// view. Returns the number of pixels written.
pub fn draw_sky_column(
    view: &ViewState,
    x: usize,
    sky: &Texture,
    max_height: u32,
    dst: &mut Target,
) -> u32 {
    let tex_h = sky.h as u32;
    let col_h = sky_column_height(tex_h, view.height as u32);
    debug_assert!(col_h < view.height as u32 * 2);
    if col_h == 0 {
        return 0;
    }

    let blit = ColumnBlit {
        tex_x: sky_tex_x(view, x) as f32,
        tex_y_step: fixed_to_float(texel_step(tex_h, col_h)),
        dst_x: x as i32,
        count: col_h.min(max_height).min(view.height as u32),
        ..Default::default()
    };
    blit_column(&Texels::from_texture(sky), dst, &blit, BlitMode::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{RenderConfig, ScreenGeometry},
        math::{ANG45, ANG90},
        world::Camera,
    };

    #[test]
    fn column_height_rounds_up() {
        assert_eq!(sky_column_height(128, 200), 160);
        assert_eq!(sky_column_height(100, 200), 125);
        assert_eq!(sky_column_height(101, 200), 127);
        assert_eq!(sky_column_height(128, 160), 128);
    }

    #[test]
    fn texture_x_follows_view_angle() {
        let mut view = ViewState::new(&RenderConfig::default());
        assert_eq!(sky_tex_x(&view, 160), 0);

        view.set_camera(&Camera::new(0, 0, 0, ANG45));
        assert_eq!(sky_tex_x(&view, 160), 128);

        // a quarter turn wraps the 256 texel sky once
        view.set_camera(&Camera::new(0, 0, 0, ANG90));
        assert_eq!(sky_tex_x(&view, 160), 0);

        // columns to the left look further counter-clockwise
        view.set_camera(&Camera::new(0, 0, 0, ANG45));
        assert!(sky_tex_x(&view, 100) > 128);
    }

    #[test]
    fn truncated_to_max_height() {
        let view = ViewState::new(&RenderConfig::default());
        let sky = Texture::from_fn("SKY1", 256, 128, |_, y| 0xFF_000000 | y as u32);
        let mut buf = vec![0; 320 * 200];
        let mut dst = Target::new(&mut buf, &ScreenGeometry::full(320, 200));

        assert_eq!(draw_sky_column(&view, 10, &sky, 40, &mut dst), 40);
        assert_eq!(dst.pixel(10, 39) >> 24, 0xFF);
        assert_eq!(dst.pixel(10, 40), 0);

        assert_eq!(draw_sky_column(&view, 11, &sky, 1000, &mut dst), 160);
        // texel step 128/160: row 159 samples texel 127
        assert_eq!(dst.pixel(11, 159) & 0xFF, 127);
    }
}
