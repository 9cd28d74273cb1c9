//! Sprite definitions: sprite → animation frames → 8 viewing-angle images.
//!
//! The images themselves live in the [`TextureBank`]; a frame angle only
//! stores the handle plus the placement offsets the artist gave it.

use crate::world::texture::{TextureBank, TextureError, TextureId};

/// Number of viewing directions every sprite frame provides.
pub const NUM_SPRITE_DIRECTIONS: usize = 8;

pub type SpriteId = u16;

/// One image of one frame as seen from one direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteFrameAngle {
    pub texture: TextureId,
    pub width: u16,
    pub height: u16,
    /// Distance from the image's left edge to the object's origin.
    pub left_offset: i16,
    /// Distance from the image's top edge to the object's origin.
    pub top_offset: i16,
    /// Mirror horizontally (angles 5‥7 usually reuse 3‥1 flipped).
    pub flipped: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteFrame {
    pub angles: [SpriteFrameAngle; NUM_SPRITE_DIRECTIONS],
}

impl SpriteFrame {
    /// Frame that looks identical from every direction.
    pub fn uniform(angle: SpriteFrameAngle) -> Self {
        Self {
            angles: [angle; NUM_SPRITE_DIRECTIONS],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub frames: Vec<SpriteFrame>,
}

/// Lookup table of all sprites, indexed by [`SpriteId`].
#[derive(Default)]
pub struct SpriteBank {
    sprites: Vec<Sprite>,
}

impl SpriteBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sprite: Sprite) -> SpriteId {
        self.sprites.push(sprite);
        (self.sprites.len() - 1) as SpriteId
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Build a frame angle for texture `id`, placing the origin at the bottom
/// centre of the image (the usual offsets for monsters and items).
pub fn centered_angle(
    bank: &TextureBank,
    id: TextureId,
    flipped: bool,
) -> Result<SpriteFrameAngle, TextureError> {
    let tex = bank.texture(id)?;
    Ok(SpriteFrameAngle {
        texture: id,
        width: tex.w as u16,
        height: tex.h as u16,
        left_offset: (tex.w / 2) as i16,
        top_offset: tex.h as i16,
        flipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::texture::Texture;

    #[test]
    fn centered_offsets() {
        let mut bank = TextureBank::default_with_checker();
        let id = bank.insert("TROO", Texture::solid("TROO", 40, 56, 1)).unwrap();
        let a = centered_angle(&bank, id, true).unwrap();
        assert_eq!((a.width, a.height), (40, 56));
        assert_eq!((a.left_offset, a.top_offset), (20, 56));
        assert!(a.flipped);
    }

    #[test]
    fn sprite_ids_are_sequential() {
        let mut sprites = SpriteBank::new();
        assert!(sprites.is_empty());
        let a = sprites.insert(Sprite::default());
        let b = sprites.insert(Sprite::default());
        assert_eq!((a, b), (0, 1));
        assert!(sprites.get(2).is_none());
    }
}
