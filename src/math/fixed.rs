//! 16.16 signed fixed point, the number format the legacy renderer keeps
//! camera positions and a few derived constants in.

/// A 16.16 fixed point number.
pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;
pub const FRACMASK: Fixed = 0x0000_FFFF;

/// Multiply two 16.16 numbers (64-bit intermediate, no overflow for sane input).
#[inline]
pub const fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FRACBITS) as Fixed
}

/// Divide two 16.16 numbers.
#[inline]
pub const fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    (((a as i64) << FRACBITS) / b as i64) as Fixed
}

#[inline]
pub const fn int_to_fixed(v: i32) -> Fixed {
    v << FRACBITS
}

#[inline]
pub const fn fixed_to_int(v: Fixed) -> i32 {
    v >> FRACBITS
}

#[inline]
pub fn float_to_fixed(v: f32) -> Fixed {
    (v as f64 * 65536.0) as Fixed
}

#[inline]
pub fn fixed_to_float(v: Fixed) -> f32 {
    (v as f64 / 65536.0) as f32
}

/// `num / den` for two integer pixel counts, returned as a 16.16 texel step.
#[inline]
pub const fn texel_step(num: u32, den: u32) -> Fixed {
    fixed_div(int_to_fixed(num as i32), int_to_fixed(den as i32))
}
