use log::{debug, warn};

use crate::{
    config::{ConfigError, RenderConfig},
    renderer::{
        Renderer, Rgba,
        software::{
            RenderError,
            lighting::LightTables,
            occlusion::OccludingColumns,
            planes::VisPlanes,
            sprites::{DrawSprite, SpriteFragment},
            view::ViewState,
        },
    },
    world::{FrameInput, SpriteBank, TextureBank},
};

/// Colour of every pixel nothing was drawn over.
pub const CLEAR_COLOR: Rgba = 0xFF_20_20_20;

/// Running vertical clip of every view column.
///
/// Rows `..=ceil[x]` and `floor[x]..` are already covered by something
/// nearer; an open column is `(-1, view_height)`.
#[derive(Default)]
pub struct ClipBands {
    pub ceil: Vec<i16>,
    pub floor: Vec<i16>,
}

/// What the last frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub walls: usize,
    pub wall_pixels: usize,
    pub sky_columns: usize,
    pub planes: usize,
    pub spans: usize,
    pub occluders: usize,
    pub draw_sprites: usize,
    pub fragments: usize,
    pub sprite_pixels: usize,
}

/// The CPU renderer. Owns the frame buffer and all per-frame state.
pub struct Software {
    pub(crate) config: RenderConfig,
    pub(crate) scratch: Vec<Rgba>,
    pub(crate) clip_bands: ClipBands,
    pub(crate) visplanes: VisPlanes,
    pub(crate) occluders: OccludingColumns,
    pub(crate) draw_sprites: Vec<DrawSprite>,
    pub(crate) fragments: Vec<SpriteFragment>,
    pub(crate) view: ViewState,
    pub(crate) light_tables: LightTables,
    pub(crate) stats: FrameStats,
}

impl Software {
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let view = ViewState::new(&config);
        let light_tables = LightTables::generate(view.focal_y);
        let s = &config.screen;
        Ok(Self {
            scratch: vec![CLEAR_COLOR; s.buffer_width * s.buffer_height],
            clip_bands: ClipBands::default(),
            visplanes: VisPlanes::default(),
            occluders: OccludingColumns::default(),
            draw_sprites: Vec::with_capacity(config.limits.max_draw_sprites),
            fragments: Vec::new(),
            view,
            light_tables,
            stats: FrameStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Statistics of the most recent frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// The whole buffer, view region included.
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    /// Clear the buffer and every per-frame record.
    pub fn reset_frame(&mut self) {
        let width = self.view.width;
        let height = self.view.height;
        let limits = self.config.limits;

        // dark-grey clear
        self.scratch.fill(CLEAR_COLOR);

        // fully open clips at start of frame
        self.clip_bands.ceil.clear();
        self.clip_bands.ceil.resize(width, -1);
        self.clip_bands.floor.clear();
        self.clip_bands.floor.resize(width, height as i16);

        self.visplanes.reset(width, limits.max_visplanes);
        self.occluders.reset(width, limits.max_occluders_per_column);
        self.draw_sprites.clear();
        self.fragments.clear();
        self.stats = FrameStats::default();
    }

    fn render_scene(
        &mut self,
        frame: &FrameInput,
        textures: &TextureBank,
        sprites: &SpriteBank,
    ) -> Result<(), RenderError> {
        self.view.set_camera(&frame.camera);
        let sky = textures.texture(frame.sky_texture)?;

        // near to far: planes, clip bounds, occluders, sky
        for seg in frame.walls {
            if self.check_segment(seg)? {
                self.scan_segment(seg, sky)?;
                self.stats.walls += 1;
            }
        }

        // far to near, nearer walls paint over farther ones
        for seg in frame.walls.iter().rev() {
            if seg.left_x <= seg.right_x {
                self.stats.wall_pixels += self.draw_segment(seg, textures)? as usize;
            }
        }

        self.stats.spans = self.draw_planes(textures)? as usize;
        self.stats.planes = self.visplanes.len() - 1;
        self.stats.occluders = self.occluders.count();

        self.add_sprites(frame.objects, sprites, frame.extra_light)?;
        self.stats.sprite_pixels = self.blit_sprites(textures)? as usize;
        Ok(())
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self) {
        self.reset_frame();
    }

    fn draw_frame(
        &mut self,
        frame: &FrameInput,
        textures: &TextureBank,
        sprites: &SpriteBank,
    ) -> Result<FrameStats, RenderError> {
        match self.render_scene(frame, textures, sprites) {
            Ok(()) => {
                debug!(
                    "frame: {} walls, {} planes, {} spans, {} sprites, {} fragments",
                    self.stats.walls,
                    self.stats.planes,
                    self.stats.spans,
                    self.stats.draw_sprites,
                    self.stats.fragments
                );
                Ok(self.stats)
            }
            Err(e) => {
                warn!("frame aborted: {e}");
                Err(e)
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        let s = &self.config.screen;
        submit(&self.scratch, s.buffer_width, s.buffer_height);
    }
}
