pub mod angle;
pub mod fixed;

pub use angle::{ANG45, ANG90, ANG180, ANG270, ANGLE_TO_SKY_SHIFT, Angle, point_to_angle};
pub use fixed::{FRACBITS, FRACUNIT, Fixed};
