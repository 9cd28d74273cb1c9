//! World → view → clip → screen transforms used for sprites.
//!
//! View space: X to the right, Y forward (depth), Z up. Clip space keeps the
//! view depth as `w`, so a point is on screen while `-w <= c <= w`.

use glam::{Vec2, Vec3};

use crate::renderer::software::view::ViewState;

/// Anything at or closer than this depth is culled.
pub const Z_NEAR: f32 = 1.0;
/// Vertical nudge applied to every sprite origin.
pub const SPRITE_EXTRA_Z_OFFSET: f32 = -4.0;

impl ViewState {
    /// Translate and rotate a world point into view space; `None` when it is
    /// behind the near plane.
    pub fn world_to_view(&self, x: f32, y: f32, z: f32) -> Option<Vec3> {
        let tx = x - self.x;
        let ty = y - self.y;
        let view = Vec3::new(
            tx * self.sin - ty * self.cos,
            tx * self.cos + ty * self.sin,
            z - self.z + SPRITE_EXTRA_Z_OFFSET,
        );
        (view.y > Z_NEAR).then_some(view)
    }

    /// Project a single view point; returns `(clip_x, clip_y, w)` or `None`
    /// when it falls outside the view frustum. Sprites clip their whole
    /// rectangle with the range forms below instead.
    #[cfg(test)]
    pub(crate) fn view_to_clip(&self, v: Vec3) -> Option<Vec3> {
        let w = v.y;
        let cx = v.x * self.proj_x;
        if cx < -w || cx > w {
            return None;
        }
        let cy = v.z * self.proj_y;
        if cy < -w || cy > w {
            return None;
        }
        Some(Vec3::new(cx, cy, w))
    }

    /// Clip-space left/right edges at depth `w`; `None` when the whole range
    /// is off one side of the screen.
    pub fn x_range_to_clip(&self, lx: f32, rx: f32, w: f32) -> Option<Vec2> {
        let clip = Vec2::new(lx * self.proj_x, rx * self.proj_x);
        (clip.x <= w && clip.y >= -w).then_some(clip)
    }

    /// Clip-space top/bottom edges at depth `w`; `None` when the whole range
    /// is above or below the screen.
    pub fn z_range_to_clip(&self, tz: f32, bz: f32, w: f32) -> Option<Vec2> {
        let clip = Vec2::new(tz * self.proj_y, bz * self.proj_y);
        (clip.x <= w && clip.y >= -w).then_some(clip)
    }

    /// Clip x → screen x. Full range maps to `0 ..= width - 0.5`.
    #[inline]
    pub fn clip_to_screen_x(&self, c: f32, w: f32) -> f32 {
        (c / w * 0.5 + 0.5) * (self.width_f - 0.5)
    }

    /// Clip y → screen y. Full range maps to `0 ..= height - 0.5`.
    #[inline]
    pub fn clip_to_screen_y(&self, c: f32, w: f32) -> f32 {
        (c / w * 0.5 + 0.5) * (self.height_f - 0.5)
    }
}
