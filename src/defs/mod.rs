pub mod flags;

pub use self::flags::MobjFlags;

/// Frame bit that makes a state ignore sector lighting.
pub const FF_FULLBRIGHT: u32 = 0x8000;
/// Mask for the frame index inside a packed sprite/frame field.
pub const FF_FRAMEMASK: u32 = 0x7FFF;
/// Shift of the sprite resource number inside a packed sprite/frame field.
pub const FF_SPRITESHIFT: u32 = 16;

/// A state's sprite/frame field split into its components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteFrameField {
    pub sprite: u16,
    pub frame: u16,
    pub full_bright: bool,
}

impl SpriteFrameField {
    pub const fn new(sprite: u16, frame: u16, full_bright: bool) -> Self {
        Self {
            sprite,
            frame,
            full_bright,
        }
    }

    /// Split a packed `(sprite << 16) | [FF_FULLBRIGHT] | frame` field.
    pub const fn decompose(packed: u32) -> Self {
        Self {
            sprite: (packed >> FF_SPRITESHIFT) as u16,
            frame: (packed & FF_FRAMEMASK) as u16,
            full_bright: packed & FF_FULLBRIGHT != 0,
        }
    }

    pub const fn pack(self) -> u32 {
        let bright = if self.full_bright { FF_FULLBRIGHT } else { 0 };
        ((self.sprite as u32) << FF_SPRITESHIFT) | bright | (self.frame as u32 & FF_FRAMEMASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_packed_field() {
        let f = SpriteFrameField::decompose((12 << 16) | FF_FULLBRIGHT | 3);
        assert_eq!(f, SpriteFrameField::new(12, 3, true));
        assert_eq!(f.pack(), (12 << 16) | FF_FULLBRIGHT | 3);
        assert!(!SpriteFrameField::decompose(7).full_bright);
    }
}
