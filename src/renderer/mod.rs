//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It takes a consistent [`FrameInput`] snapshot (camera, visible wall
//! spans, visible objects) and hands it to a type that implements
//! [`Renderer`].
//!
//! * A helper blanket-impl [`RendererExt`] adds `render` so call-sites stay
//!   short.
//! * A frame either completes or is aborted with a [`RenderError`]; an
//!   aborted frame is never submitted.

use crate::world::{FrameInput, SpriteBank, TextureBank};

pub use software::{FrameStats, RenderError};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// Clear the buffer and reset every per-frame record.
    fn begin_frame(&mut self);

    /// Rasterise one complete scene into the internal buffer.
    fn draw_frame(
        &mut self,
        frame: &FrameInput,
        textures: &TextureBank,
        sprites: &SpriteBank,
    ) -> Result<FrameStats, RenderError>;

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `render` adaptor.
pub trait RendererExt: Renderer {
    fn render<F>(
        &mut self,
        frame: &FrameInput,
        textures: &TextureBank,
        sprites: &SpriteBank,
        submit: F,
    ) -> Result<FrameStats, RenderError>
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame();
        let stats = self.draw_frame(frame, textures, sprites)?;
        self.end_frame(submit);
        Ok(stats)
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;
