use crate::world::{SpriteId, TextureError};

/// Reasons a frame can be aborted.
///
/// Capacity variants are sized by [`crate::config::RenderLimits`]; running
/// into one means the scene is bigger than the renderer was configured for.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RenderError {
    #[error("visplane pool exhausted ({0} planes)")]
    VisplaneOverflow(usize),

    #[error("too many sprites in view (limit {0})")]
    DrawSpriteOverflow(usize),

    #[error("sprite fragment buffer full (limit {0})")]
    FragmentOverflow(usize),

    #[error("column {x} has more than {capacity} occluders")]
    OccluderOverflow { x: usize, capacity: usize },

    #[error("sprite {0} is not in the sprite bank")]
    UnknownSprite(SpriteId),

    #[error("sprite {sprite} has no frame {frame}")]
    BadSpriteFrame { sprite: SpriteId, frame: u16 },

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("wall segment {left}..={right} outside a {width} pixel view")]
    SegmentOutOfBounds { left: i32, right: i32, width: usize },
}
