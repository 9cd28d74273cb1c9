use once_cell::sync::Lazy;

/// Brightest light level.
pub const MAX_LIGHT_VALUE: u32 = 255;
/// Floor of the distance-fade curve for dim sectors.
pub const MIN_LIGHT: u32 = 8;
/// Distance at which a surface is drawn at full sector brightness.
pub const LIGHT_NEAR_DIST: f32 = 64.0;
/// Distance at which a surface has faded down to the level's minimum.
pub const LIGHT_FAR_DIST: f32 = 1024.0;

/// Darkest value each sector light level fades to. Bright sectors barely
/// fade, dark ones fall off steeply.
static LIGHT_MINS: Lazy<[f32; 256]> = Lazy::new(|| {
    let mut mins = [0.0; 256];
    for (level, m) in mins.iter_mut().enumerate() {
        let level = level as u32;
        *m = (level * level / MAX_LIGHT_VALUE).max(MIN_LIGHT).min(level) as f32;
    }
    mins
});

/// Fade parameters of one light level.
///
/// `light(scale) = clamp(scale * coef - sub, min, max)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    pub min: f32,
    pub max: f32,
    pub sub: f32,
    pub coef: f32,
    /// Focal length the table was built for; turns a depth into a scale.
    pub focal: f32,
}

impl LightParams {
    #[inline]
    pub fn light_for_scale(&self, scale: f32) -> f32 {
        let l = scale * self.coef - self.sub;
        if l < self.min {
            self.min
        } else if l > self.max {
            self.max
        } else {
            l
        }
    }

    /// Light as an RGB multiplier in `0.0..=1.0`.
    #[inline]
    pub fn light_mul_for_scale(&self, scale: f32) -> f32 {
        (self.light_for_scale(scale) as u32) as f32 / MAX_LIGHT_VALUE as f32
    }

    #[inline]
    pub fn light_mul_for_dist(&self, dist: f32) -> f32 {
        self.light_mul_for_scale(self.focal / dist.max(1.0))
    }
}

/// Per light level fade parameters (configuration, built once per view).
#[derive(Clone, Debug)]
pub struct LightTables {
    params: Vec<LightParams>,
}

impl LightTables {
    /// Build the tables for a view whose wall scale is `focal / depth`.
    pub fn generate(focal: f32) -> Self {
        let scale_near = focal / LIGHT_NEAR_DIST;
        let scale_far = focal / LIGHT_FAR_DIST;

        let params = LIGHT_MINS
            .iter()
            .enumerate()
            .map(|(level, &min)| {
                let max = level as f32;
                let coef = (max - min) / (scale_near - scale_far);
                LightParams {
                    min,
                    max,
                    sub: coef * scale_far - min,
                    coef,
                    focal,
                }
            })
            .collect();
        Self { params }
    }

    #[inline]
    pub fn params(&self, level: u32) -> &LightParams {
        &self.params[level.min(MAX_LIGHT_VALUE) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_curve() {
        assert_eq!(LIGHT_MINS[255], 255.0);
        assert_eq!(LIGHT_MINS[128], 64.0);
        assert_eq!(LIGHT_MINS[20], 8.0);
        assert_eq!(LIGHT_MINS[4], 4.0);
    }

    #[test]
    fn fades_between_near_and_far() {
        let tables = LightTables::generate(160.0);
        let p = tables.params(128);

        assert_eq!(p.light_for_scale(160.0 / 32.0), 128.0); // closer than near
        assert_eq!(p.light_for_scale(160.0 / 4096.0), 64.0); // past far
        let mid = p.light_for_scale(160.0 / 200.0);
        assert!(mid > 64.0 && mid < 128.0);

        assert!((p.light_for_scale(160.0 / LIGHT_NEAR_DIST) - 128.0).abs() < 1e-3);
        assert!((p.light_for_scale(160.0 / LIGHT_FAR_DIST) - 64.0).abs() < 1e-3);
    }

    #[test]
    fn full_bright_never_fades() {
        let tables = LightTables::generate(160.0);
        let p = tables.params(255);
        assert_eq!(p.light_mul_for_dist(10_000.0), 1.0);
        assert_eq!(p.light_mul_for_dist(0.0), 1.0);
    }

    #[test]
    fn multiplier_truncates_light() {
        let tables = LightTables::generate(160.0);
        let p = tables.params(128);
        assert_eq!(p.light_mul_for_scale(100.0), 128.0 / 255.0);
        // out-of-range levels use the brightest table
        assert_eq!(tables.params(999).max, 255.0);
    }
}
