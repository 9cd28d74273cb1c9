mod camera;
pub mod scene;
pub mod sprite;
mod texture;

pub use camera::Camera;

pub use scene::{FrameInput, MapObject, WallActions, WallPart, WallSegment};

pub use sprite::{
    NUM_SPRITE_DIRECTIONS, Sprite, SpriteBank, SpriteFrame, SpriteFrameAngle, SpriteId,
    centered_angle,
};

pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
