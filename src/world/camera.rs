use glam::{Vec2, Vec3};

use crate::math::{
    Angle, Fixed,
    fixed::{float_to_fixed, fixed_to_float},
};

/// Player view-point in world space, as the simulation hands it over.
///
/// * Only **yaw** is simulated – Doom never tilts up/down.
/// * Position is 16.16 fixed point, `z` is the absolute eye height.
/// * `angle` is a binary angle (0 = east, counter-clockwise).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub angle: Angle,
}

impl Camera {
    pub fn new(x: Fixed, y: Fixed, z: Fixed, angle: Angle) -> Self {
        Self { x, y, z, angle }
    }

    /// Convenience constructor from map units and a yaw in radians.
    pub fn from_f32(pos: Vec3, yaw: f32) -> Self {
        Self {
            x: float_to_fixed(pos.x),
            y: float_to_fixed(pos.y),
            z: float_to_fixed(pos.z),
            angle: Angle::from_radians(yaw),
        }
    }

    /// Eye position in map units.
    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::new(
            fixed_to_float(self.x),
            fixed_to_float(self.y),
            fixed_to_float(self.z),
        )
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the X-Y plane.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.angle.to_radians().sin_cos();
        Vec2::new(c, s)
    }

    /// Unit vector pointing to the camera's right on the X-Y plane.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        let f = self.forward();
        Vec2::new(f.y, -f.x)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe), preserving eye-height.
    pub fn step(&mut self, forward: f32, side: f32) {
        let d = self.forward() * forward + self.right() * side;
        self.x = self.x.wrapping_add(float_to_fixed(d.x));
        self.y = self.y.wrapping_add(float_to_fixed(d.y));
    }

    /// Rotate around Z-axis (positive = turn left).
    pub fn turn(&mut self, delta: Angle) {
        self.angle = self.angle + delta;
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
