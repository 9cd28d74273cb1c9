//! Binary angle measurement: the full circle maps onto the whole `u32`
//! range, so wrapping arithmetic is modular arithmetic on angles.

use std::f64::consts::{PI, TAU};
use std::ops::{Add, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(pub u32);

pub const ANG45: Angle = Angle(0x2000_0000);
pub const ANG90: Angle = Angle(0x4000_0000);
pub const ANG180: Angle = Angle(0x8000_0000);
pub const ANG270: Angle = Angle(0xC000_0000);

/// Shift that turns an angle into a 1024-step circle (256 texels per 90°).
pub const ANGLE_TO_SKY_SHIFT: u32 = 22;

impl Angle {
    /// Angle for `rad` radians, counter-clockwise, wrapped into one turn.
    #[inline]
    pub fn from_radians(rad: f32) -> Self {
        Self::from_turns(rad as f64 / TAU)
    }

    #[inline]
    fn from_turns(turns: f64) -> Self {
        let turns = turns.rem_euclid(1.0);
        Angle((turns * 4_294_967_296.0).round() as u64 as u32)
    }

    /// Signed radians in `(-π, π]`.
    #[inline]
    pub fn to_radians(self) -> f32 {
        (self.0 as i32 as f64 * PI / 2_147_483_648.0) as f32
    }

    #[inline]
    pub fn from_degrees(deg: f32) -> Self {
        Self::from_turns(deg as f64 / 360.0)
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

/// Angle of the vector from `(x1, y1)` to `(x2, y2)`; 0 = east, CCW positive.
pub fn point_to_angle(x1: f32, y1: f32, x2: f32, y2: f32) -> Angle {
    let dx = x2 as f64 - x1 as f64;
    let dy = y2 as f64 - y1 as f64;
    if dx == 0.0 && dy == 0.0 {
        return Angle(0);
    }
    Angle::from_turns(dy.atan2(dx) / TAU)
}
