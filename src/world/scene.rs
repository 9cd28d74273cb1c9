//! Per-frame snapshot handed to the renderer by the visibility step and the
//! simulation. Everything here is built fresh every tick and only borrowed
//! by the renderer for the duration of one frame.

use bitflags::bitflags;

use crate::{
    defs::{MobjFlags, SpriteFrameField},
    math::{Angle, Fixed},
    world::{camera::Camera, texture::TextureId},
};

bitflags! {
    /// What the renderer has to do with one [`WallSegment`].
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WallActions: u16 {
        /// Draw the top (or, for one-sided lines, the whole) wall texture.
        const TOP_TEXTURE    = 0x0001;
        /// Draw the bottom wall texture.
        const BOTTOM_TEXTURE = 0x0002;
        /// Register the front sector's floor as a visplane.
        const ADD_FLOOR      = 0x0004;
        /// Register the front sector's ceiling as a visplane.
        const ADD_CEILING    = 0x0008;
        /// Ceiling is open sky.
        const ADD_SKY        = 0x0010;
        /// Raise the running floor clip to the new floor line.
        const NEW_FLOOR      = 0x0020;
        /// Lower the running ceiling clip to the new ceiling line.
        const NEW_CEILING    = 0x0040;
        /// Sprites behind this wall are clipped above the new ceiling line.
        const TOP_SIL        = 0x0080;
        /// Sprites behind this wall are clipped below the new floor line.
        const BOTTOM_SIL     = 0x0100;
        /// Nothing behind this wall is visible (one-sided line).
        const SOLID_SIL      = 0x0200;
    }
}

/// One textured part (top or bottom) of a wall.
///
/// Heights are in map units relative to the eye (positive = above).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WallPart {
    pub texture: TextureId,
    pub top_height: f32,
    pub bottom_height: f32,
    /// Texture row that lines up with eye height.
    pub texture_mid: f32,
}

/// Pre-clipped visible span of one map line.
///
/// `left_x ..= right_x` are screen columns. The scale of column `x` is
/// `left_scale + scale_step * (x - left_x)`; a world height `h` (relative to
/// the eye) lands on screen row `center_y - h * scale`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WallSegment {
    pub left_x: i32,
    pub right_x: i32,
    pub left_scale: f32,
    pub scale_step: f32,

    /// Angle of the line normal, relative to the view direction.
    pub center_angle: Angle,
    /// Perpendicular distance from the eye to the line (signed).
    pub distance: f32,
    /// Texture column under the normal's foot, including the sidedef offset.
    pub offset: f32,

    pub actions: WallActions,
    pub light_level: u8,

    pub top: WallPart,
    pub bottom: WallPart,

    /* eye-relative sector heights */
    pub floor_height: f32,
    pub ceiling_height: f32,
    pub floor_new_height: f32,
    pub ceiling_new_height: f32,

    pub floor_pic: TextureId,
    pub ceiling_pic: TextureId,
}

/// A dynamic object the visibility step found in a visible subsector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapObject {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    /// Which way the object faces.
    pub angle: Angle,
    /// Current animation state's sprite/frame field.
    pub frame: SpriteFrameField,
    pub flags: MobjFlags,
    /// Light level of the sector the object stands in.
    pub sector_light: u8,
    /// The object the camera is attached to; never drawn.
    pub is_player: bool,
}

/// Everything one call to the renderer consumes.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    pub camera: Camera,
    /// Visible wall spans, nearest first.
    pub walls: &'a [WallSegment],
    pub objects: &'a [MapObject],
    pub sky_texture: TextureId,
    /// Global light bias (gun flashes, light amplification).
    pub extra_light: u32,
}
