//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Fills an owned `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Walls arrive pre-clipped and sorted near to far, so no Z-buffer is
//!   needed: the scan pass records floors, ceilings and sprite occluders
//!   near to far, walls are painted far to near, sprites last.
//! * All per-frame state lives in [`Software`] and is reset by
//!   `begin_frame`; nothing is shared between frames.
//! ---------------------------------------------------------------------------

pub mod blit;
mod error;
pub mod lighting;
pub mod occlusion;
pub mod planes;
pub mod projection;
mod renderer;
pub mod sky;
pub mod sprites;
pub mod view;
pub mod walls;

pub use error::RenderError;
pub use renderer::{CLEAR_COLOR, ClipBands, FrameStats, Software};
