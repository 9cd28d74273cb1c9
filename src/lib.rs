//! Software column renderer core: turns one frame's camera, pre-clipped wall
//! spans and visible objects into a painted 0xAARRGGBB pixel buffer.

pub mod config;
pub mod defs;
pub mod demo;
pub mod math;
pub mod renderer;
pub mod world;
