use crate::{
    config::RenderConfig,
    math::Angle,
    world::Camera,
};

/// Camera-derived state shared by every raster unit.
///
/// The per-column angle tables only depend on the configuration and are
/// built once; [`ViewState::set_camera`] refreshes the pose every frame.
#[derive(Clone, Debug)]
pub struct ViewState {
    /* pose (map units) */
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub angle: Angle,
    pub sin: f32,
    pub cos: f32,

    /* view geometry */
    pub width: usize,
    pub height: usize,
    pub width_f: f32,
    pub height_f: f32,
    pub center_x: f32,
    pub center_y: f32,

    /// Clip-space scale factors (`r0c0` / `r1c1` of the projection).
    pub proj_x: f32,
    pub proj_y: f32,
    /// Pixels per map unit at depth 1.
    pub focal_x: f32,
    pub focal_y: f32,

    /// Doom-convention column angle: positive to the *left* of the view.
    x_to_view_angle: Vec<Angle>,
    /// Column angle in radians, positive to the *right* of the view.
    view_angle_for_x: Vec<f32>,
}

impl ViewState {
    pub fn new(cfg: &RenderConfig) -> Self {
        let width = cfg.screen.view_width;
        let height = cfg.screen.view_height;
        let width_f = width as f32;
        let height_f = height as f32;
        let center_x = width_f * 0.5;
        let center_y = height_f * 0.5;

        let proj_x = 1.0 / (cfg.fov_degrees.to_radians() * 0.5).tan();
        let focal_x = center_x * proj_x;
        let focal_y = focal_x * cfg.y_stretch;
        // negative: +z (up) must land on smaller screen rows
        let proj_y = -focal_y / ((height_f - 0.5) * 0.5);

        let mut x_to_view_angle = Vec::with_capacity(width);
        let mut view_angle_for_x = Vec::with_capacity(width);
        for x in 0..width {
            let dx = x as f32 - center_x;
            let rad = (dx / focal_x).atan();
            view_angle_for_x.push(rad);
            x_to_view_angle.push(Angle::from_radians(-rad));
        }

        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            angle: Angle(0),
            sin: 0.0,
            cos: 1.0,
            width,
            height,
            width_f,
            height_f,
            center_x,
            center_y,
            proj_x,
            proj_y,
            focal_x,
            focal_y,
            x_to_view_angle,
            view_angle_for_x,
        }
    }

    /// Cache the camera pose for this frame.
    pub fn set_camera(&mut self, cam: &Camera) {
        let p = cam.pos();
        self.x = p.x;
        self.y = p.y;
        self.z = p.z;
        self.angle = cam.angle;
        let (s, c) = cam.angle.to_radians().sin_cos();
        self.sin = s;
        self.cos = c;
    }

    #[inline]
    pub fn x_to_view_angle(&self, x: usize) -> Angle {
        self.x_to_view_angle[x]
    }

    #[inline]
    pub fn view_angle_for_x(&self, x: usize) -> f32 {
        self.view_angle_for_x[x]
    }

    /// Wall scale of a column at view depth `depth`.
    #[inline]
    pub fn scale_for_depth(&self, depth: f32) -> f32 {
        self.focal_y / depth
    }

    /// Inverse of [`Self::scale_for_depth`]; used to give wall columns the
    /// same depth metric as sprites.
    #[inline]
    pub fn depth_for_scale(&self, scale: f32) -> f32 {
        self.focal_y / scale
    }
}
