use bitflags::bitflags;

bitflags! {
    /// Runtime flags carried by every **mobj** that matter to the renderer.
    ///
    /// The numeric values are copied 1-for-1 from `doom/info.h`; the
    /// simulation may set any other bit, the renderer ignores them.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MobjFlags: u32 {
        // Removed from sector links, never reaches the visible list.
        const NOSECTOR       = 0x0000_0008;
        // Partial invisibility: drawn translucent and darkened.
        const SHADOW         = 0x0004_0000;
    }
}
