//! Externally owned renderer configuration: screen geometry, projection and
//! the static per-frame capacity limits.

/// Where the 3D view sits inside the presented frame buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenGeometry {
    /// Size of the whole pixel buffer the renderer owns.
    pub buffer_width: usize,
    pub buffer_height: usize,
    /// Size of the 3D view region.
    pub view_width: usize,
    pub view_height: usize,
    /// Top-left corner of the 3D view inside the buffer.
    pub x_offset: usize,
    pub y_offset: usize,
}

impl ScreenGeometry {
    /// A view that covers the whole buffer.
    pub const fn full(width: usize, height: usize) -> Self {
        Self {
            buffer_width: width,
            buffer_height: height,
            view_width: width,
            view_height: height,
            x_offset: 0,
            y_offset: 0,
        }
    }
}

/// Worst-case bounds on per-frame state. Exceeding one aborts the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderLimits {
    /// Visplane pool size, including the sentinel record.
    pub max_visplanes: usize,
    pub max_draw_sprites: usize,
    pub max_sprite_fragments: usize,
    pub max_occluders_per_column: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            max_visplanes: 128,
            max_draw_sprites: 256,
            max_sprite_fragments: 1 << 16,
            max_occluders_per_column: 32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub screen: ScreenGeometry,
    /// Horizontal field of view.
    pub fov_degrees: f32,
    /// Vertical stretch of the projection (1.0 = square pixels).
    pub y_stretch: f32,
    pub limits: RenderLimits,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen: ScreenGeometry::full(320, 200),
            fov_degrees: 90.0,
            y_stretch: 1.0,
            limits: RenderLimits::default(),
        }
    }
}

/// Largest view the `i16` clip and occluder records can address.
pub const MAX_VIEW_DIM: usize = 4096;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("view size {0}×{1} must be non-zero and at most 4096")]
    BadViewSize(usize, usize),

    #[error("view {w}×{h} at ({x},{y}) does not fit in a {bw}×{bh} buffer")]
    ViewOutsideBuffer {
        w: usize,
        h: usize,
        x: usize,
        y: usize,
        bw: usize,
        bh: usize,
    },

    #[error("field of view {0}° must lie in (0, 180)")]
    BadFov(f32),

    #[error("vertical stretch {0} must be positive")]
    BadStretch(f32),

    #[error("limit `{0}` must be non-zero")]
    ZeroLimit(&'static str),
}

impl RenderConfig {
    pub fn with_view(mut self, width: usize, height: usize) -> Self {
        self.screen = ScreenGeometry::full(width, height);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.screen;
        if s.view_width == 0
            || s.view_height == 0
            || s.view_width > MAX_VIEW_DIM
            || s.view_height > MAX_VIEW_DIM
        {
            return Err(ConfigError::BadViewSize(s.view_width, s.view_height));
        }
        if s.x_offset + s.view_width > s.buffer_width || s.y_offset + s.view_height > s.buffer_height
        {
            return Err(ConfigError::ViewOutsideBuffer {
                w: s.view_width,
                h: s.view_height,
                x: s.x_offset,
                y: s.y_offset,
                bw: s.buffer_width,
                bh: s.buffer_height,
            });
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::BadFov(self.fov_degrees));
        }
        if !(self.y_stretch > 0.0) {
            return Err(ConfigError::BadStretch(self.y_stretch));
        }
        let l = &self.limits;
        // the sentinel occupies one visplane slot
        if l.max_visplanes < 2 {
            return Err(ConfigError::ZeroLimit("max_visplanes"));
        }
        if l.max_draw_sprites == 0 {
            return Err(ConfigError::ZeroLimit("max_draw_sprites"));
        }
        if l.max_sprite_fragments == 0 {
            return Err(ConfigError::ZeroLimit("max_sprite_fragments"));
        }
        if l.max_occluders_per_column == 0 {
            return Err(ConfigError::ZeroLimit("max_occluders_per_column"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(RenderConfig::default().validate(), Ok(()));
    }

    #[test]
    fn view_must_fit_buffer() {
        let mut cfg = RenderConfig::default();
        cfg.screen.x_offset = 8;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ViewOutsideBuffer { x: 8, .. })
        ));
    }

    #[test]
    fn rejects_degenerate_projection() {
        let mut cfg = RenderConfig::default();
        cfg.fov_degrees = 180.0;
        assert_eq!(cfg.validate(), Err(ConfigError::BadFov(180.0)));

        let cfg = RenderConfig::default().with_view(0, 200);
        assert_eq!(cfg.validate(), Err(ConfigError::BadViewSize(0, 200)));
    }

    #[test]
    fn sentinel_needs_a_slot() {
        let mut cfg = RenderConfig::default();
        cfg.limits.max_visplanes = 1;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroLimit("max_visplanes")));
    }
}
