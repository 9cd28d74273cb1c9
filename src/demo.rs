//! A self-contained scene for the viewer and the end-to-end tests: a convex
//! room with square pillars, procedurally drawn art and a handful of things.
//!
//! It stands in for the BSP/visibility step: world-space lines are turned
//! into the pre-clipped, near-to-far [`WallSegment`] list the renderer
//! consumes.

use glam::Vec2;

use crate::{
    defs::{MobjFlags, SpriteFrameField},
    math::{ANG90, ANG180, ANG270, Angle, fixed::float_to_fixed},
    renderer::software::{projection::Z_NEAR, view::ViewState},
    world::{
        MapObject, Sprite, SpriteBank, SpriteFrame, SpriteId, Texture, TextureBank, TextureError,
        TextureId, WallActions, WallPart, WallSegment, centered_angle,
    },
};

/// Eye height above the floor.
pub const EYE_HEIGHT: f32 = 41.0;

/// A one-sided line; the visible face is on the right of `v1 → v2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemoLine {
    pub v1: Vec2,
    pub v2: Vec2,
    pub texture: TextureId,
    pub x_offset: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pillar {
    pub center: Vec2,
    pub half_size: f32,
    pub texture: TextureId,
}

impl Pillar {
    /// Counter-clockwise, so every face looks outward.
    fn lines(&self) -> [DemoLine; 4] {
        let h = self.half_size;
        let c = self.center;
        let corners = [
            c + Vec2::new(-h, -h),
            c + Vec2::new(h, -h),
            c + Vec2::new(h, h),
            c + Vec2::new(-h, h),
        ];
        std::array::from_fn(|i| DemoLine {
            v1: corners[i],
            v2: corners[(i + 1) % 4],
            texture: self.texture,
            x_offset: 0.0,
        })
    }
}

/// One sector: outer walls (clockwise, facing inward) plus pillars.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    pub walls: Vec<DemoLine>,
    pub pillars: Vec<Pillar>,
    pub floor_z: f32,
    pub ceiling_z: f32,
    pub light: u8,
    pub floor_pic: TextureId,
    pub ceiling_pic: TextureId,
    /// Open to the sky instead of a textured ceiling.
    pub sky: bool,
}

impl Room {
    /// Axis-aligned `w × h` room centred on the origin.
    pub fn rectangle(w: f32, h: f32, texture: TextureId) -> Self {
        let (x, y) = (w * 0.5, h * 0.5);
        let corners = [
            Vec2::new(-x, -y),
            Vec2::new(-x, y),
            Vec2::new(x, y),
            Vec2::new(x, -y),
        ];
        let mut walls = Vec::with_capacity(4);
        let mut along = 0.0;
        for i in 0..4 {
            let (v1, v2) = (corners[i], corners[(i + 1) % 4]);
            walls.push(DemoLine {
                v1,
                v2,
                texture,
                x_offset: along,
            });
            along += v1.distance(v2);
        }
        Self {
            walls,
            pillars: Vec::new(),
            floor_z: 0.0,
            ceiling_z: 128.0,
            light: 160,
            floor_pic: texture,
            ceiling_pic: texture,
            sky: false,
        }
    }

    /// Visible wall spans for `view`, nearest first.
    ///
    /// Pillars stand inside the convex room, so every pillar face is nearer
    /// than the room wall behind it; pillars among themselves are ordered by
    /// the distance to their centre.
    pub fn wall_segments(&self, view: &ViewState, out: &mut Vec<WallSegment>) {
        out.clear();
        let eye = Vec2::new(view.x, view.y);

        let mut pillars: Vec<&Pillar> = self.pillars.iter().collect();
        pillars.sort_by(|a, b| {
            a.center
                .distance_squared(eye)
                .total_cmp(&b.center.distance_squared(eye))
        });

        for pillar in pillars {
            for line in pillar.lines() {
                out.extend(self.project_line(view, &line));
            }
        }
        for line in &self.walls {
            out.extend(self.project_line(view, line));
        }
    }

    /// Clip one line to the view and derive its span parameters.
    fn project_line(&self, view: &ViewState, line: &DemoLine) -> Option<WallSegment> {
        let eye = Vec2::new(view.x, view.y);

        // back faces
        if (line.v2 - line.v1).perp_dot(eye - line.v1) >= 0.0 {
            return None;
        }

        let to_view = |p: Vec2| {
            let t = p - eye;
            Vec2::new(t.x * view.sin - t.y * view.cos, t.x * view.cos + t.y * view.sin)
        };
        let a = to_view(line.v1);
        let b = to_view(line.v2);

        let (mut p1, mut p2) = (a, b);
        if p1.y < Z_NEAR && p2.y < Z_NEAR {
            return None;
        }
        if p1.y < Z_NEAR {
            p1 = p1.lerp(p2, (Z_NEAR - p1.y) / (p2.y - p1.y));
        } else if p2.y < Z_NEAR {
            p2 = p2.lerp(p1, (Z_NEAR - p2.y) / (p1.y - p2.y));
        }

        let sx1 = view.center_x + p1.x / p1.y * view.focal_x;
        let sx2 = view.center_x + p2.x / p2.y * view.focal_x;
        if sx2 <= sx1 {
            return None;
        }
        let left_x = sx1.ceil().max(0.0) as i32;
        let right_x = (sx2.ceil() - 1.0).min(view.width_f - 1.0) as i32;
        if left_x > right_x {
            return None;
        }

        // 1/depth, hence scale, is linear in screen x
        let s1 = view.scale_for_depth(p1.y);
        let s2 = view.scale_for_depth(p2.y);
        let scale_step = (s2 - s1) / (sx2 - sx1);
        let left_scale = s1 + (left_x as f32 - sx1) * scale_step;

        // foot of the perpendicular from the eye, on the unclipped line
        let dir = (b - a).normalize_or_zero();
        let along = -a.dot(dir);
        let foot = a + dir * along;
        let distance = foot.length();
        if distance < 1e-3 {
            return None;
        }

        let floor_height = self.floor_z - view.z;
        let ceiling_height = self.ceiling_z - view.z;

        let mut actions = WallActions::TOP_TEXTURE | WallActions::SOLID_SIL;
        if floor_height < 0.0 {
            actions |= WallActions::ADD_FLOOR;
        }
        if self.sky {
            actions |= WallActions::ADD_SKY;
        } else if ceiling_height > 0.0 {
            actions |= WallActions::ADD_CEILING;
        }

        Some(WallSegment {
            left_x,
            right_x,
            left_scale,
            scale_step,
            center_angle: Angle::from_radians(foot.x.atan2(foot.y)),
            distance,
            offset: along + line.x_offset,
            actions,
            light_level: self.light,
            top: WallPart {
                texture: line.texture,
                top_height: ceiling_height,
                bottom_height: floor_height,
                // upper edge pegged to the ceiling
                texture_mid: ceiling_height,
            },
            floor_height,
            ceiling_height,
            floor_pic: self.floor_pic,
            ceiling_pic: self.ceiling_pic,
            ..Default::default()
        })
    }
}

/*──────────────────────── procedural art ─────────────────────────────*/

fn argb(r: u32, g: u32, b: u32) -> u32 {
    0xFF00_0000 | (r.min(255) << 16) | (g.min(255) << 8) | b.min(255)
}

/// Staggered bricks with dark mortar.
pub fn brick_texture(name: &str) -> Texture {
    Texture::from_fn(name, 64, 64, |x, y| {
        let row = y / 16;
        let shift = if row % 2 == 0 { 0 } else { 16 };
        let mortar = y % 16 == 0 || (x + shift) % 32 == 0;
        if mortar {
            argb(60, 55, 50)
        } else {
            let n = ((x * 7 + y * 13) % 11) as u32;
            argb(150 + n * 3, 70 + n, 50)
        }
    })
}

/// Stone flat: large tiles with a bevel.
pub fn tile_flat(name: &str, base: u32) -> Texture {
    Texture::from_fn(name, 64, 64, |x, y| {
        let edge = x % 32 == 0 || y % 32 == 0;
        let shade = if edge { 40 } else { ((x ^ y) & 7) as u32 * 2 };
        let b = base.saturating_sub(shade);
        argb(b, b, b + 10)
    })
}

/// Sky strip: gradient with a jagged mountain range at the bottom.
pub fn sky_texture(name: &str) -> Texture {
    Texture::from_fn(name, 256, 128, |x, y| {
        let ridge = 96 + ((x * 37 % 23) as i32 - 11).abs() as usize;
        if y >= ridge {
            argb(40, 50, 45)
        } else {
            let t = y as u32;
            argb(40 + t / 2, 90 + t / 2, 200)
        }
    })
}

/// Upright figure seen from rotation `rot` (0 = front, 4 = back). The
/// marker sits left of centre for rotations 1‥3 so mirrored rotations are
/// visibly different.
pub fn figure_texture(name: &str, rot: usize, body: u32) -> Texture {
    Texture::from_fn(name, 32, 56, move |x, y| {
        let dx = (x as f32 - 15.5) / 15.0;
        let dy = (y as f32 - 27.5) / 27.5;
        if dx * dx + dy * dy > 1.0 {
            return 0;
        }
        let marker_x = match rot {
            0 => 14,
            4 => return body & 0xFF7F_7F7F,
            r => 14usize.saturating_sub(r * 4),
        };
        if (12..18).contains(&y) && (marker_x..marker_x + 4).contains(&x) {
            argb(255, 240, 60)
        } else {
            body
        }
    })
}

/// Round lamp with a bright core.
pub fn lamp_texture(name: &str) -> Texture {
    Texture::from_fn(name, 16, 40, |x, y| {
        let dx = x as f32 - 7.5;
        if y < 16 {
            let dy = y as f32 - 7.5;
            let r2 = dx * dx + dy * dy;
            if r2 > 56.0 {
                0
            } else {
                argb(255, 255 - r2 as u32 * 2, 120)
            }
        } else if dx.abs() < 2.0 {
            argb(90, 90, 100)
        } else {
            0
        }
    })
}

/*──────────────────────── the scene ──────────────────────────────────*/

/// Everything the viewer needs for one playable scene.
pub struct DemoScene {
    pub textures: TextureBank,
    pub sprites: SpriteBank,
    pub room: Room,
    pub objects: Vec<MapObject>,
    pub sky: TextureId,
    /// Where the camera starts.
    pub start: (Vec2, Angle),
}

/// Eight rotations from five drawings; rotations 5‥7 mirror 3‥1.
fn rotations(
    textures: &mut TextureBank,
    name: &str,
    body: u32,
) -> Result<SpriteFrame, TextureError> {
    let mut ids = [0; 5];
    for (rot, id) in ids.iter_mut().enumerate() {
        let lump = format!("{name}A{}", rot + 1);
        *id = textures.insert(lump.clone(), figure_texture(&lump, rot, body))?;
    }
    let angle = |rot: usize, flipped| centered_angle(textures, ids[rot], flipped);
    Ok(SpriteFrame {
        angles: [
            angle(0, false)?,
            angle(1, false)?,
            angle(2, false)?,
            angle(3, false)?,
            angle(4, false)?,
            angle(3, true)?,
            angle(2, true)?,
            angle(1, true)?,
        ],
    })
}

fn thing(x: f32, y: f32, angle: Angle, sprite: SpriteId, full_bright: bool) -> MapObject {
    MapObject {
        x: float_to_fixed(x),
        y: float_to_fixed(y),
        z: 0,
        angle,
        frame: SpriteFrameField::new(sprite, 0, full_bright),
        flags: MobjFlags::empty(),
        sector_light: 0,
        is_player: false,
    }
}

impl DemoScene {
    pub fn new() -> Result<Self, TextureError> {
        let mut textures = TextureBank::default_with_checker();
        let brick = textures.insert("BRICK", brick_texture("BRICK"))?;
        let pillar = textures.insert("PILLAR", tile_flat("PILLAR", 150))?;
        let floor = textures.insert("FLOOR", tile_flat("FLOOR", 110))?;
        let ceiling = textures.insert("CEIL", tile_flat("CEIL", 70))?;
        let sky = textures.insert("SKY1", sky_texture("SKY1"))?;
        let lamp = textures.insert("LAMPA0", lamp_texture("LAMPA0"))?;

        let mut sprites = SpriteBank::new();
        let dude = sprites.insert(Sprite {
            name: "DUDE".into(),
            frames: vec![rotations(&mut textures, "DUDE", argb(60, 140, 70))?],
        });
        let lamp = sprites.insert(Sprite {
            name: "LAMP".into(),
            frames: vec![SpriteFrame::uniform(centered_angle(&textures, lamp, false)?)],
        });

        let mut room = Room::rectangle(768.0, 768.0, brick);
        room.floor_pic = floor;
        room.ceiling_pic = ceiling;
        room.sky = true;
        for (x, y) in [(-160.0, 160.0), (160.0, 160.0), (0.0, -120.0)] {
            room.pillars.push(Pillar {
                center: Vec2::new(x, y),
                half_size: 32.0,
                texture: pillar,
            });
        }

        let mut objects = vec![
            thing(0.0, 200.0, ANG270, dude, false),
            thing(-90.0, 60.0, Angle(0), dude, false),
            thing(120.0, -40.0, ANG180, dude, false),
            thing(-280.0, -280.0, ANG90, lamp, true),
            thing(280.0, 280.0, ANG90, lamp, true),
        ];
        // a partially invisible one
        let mut ghost = thing(60.0, 300.0, ANG270, dude, false);
        ghost.flags |= MobjFlags::SHADOW;
        objects.push(ghost);
        for obj in &mut objects {
            obj.sector_light = room.light;
        }

        Ok(Self {
            textures,
            sprites,
            room,
            objects,
            sky,
            start: (Vec2::new(0.0, -300.0), ANG90),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RenderConfig,
        math::FRACUNIT,
        renderer::{RendererExt, software::Software},
        world::{Camera, FrameInput},
    };

    fn view_at(x: i32, y: i32, angle: Angle) -> ViewState {
        let mut view = ViewState::new(&RenderConfig::default());
        view.set_camera(&Camera::new(x * FRACUNIT, y * FRACUNIT, 41 * FRACUNIT, angle));
        view
    }

    #[test]
    fn wall_facing_the_camera() {
        let room = Room {
            walls: vec![DemoLine {
                v1: Vec2::new(-100.0, 80.0),
                v2: Vec2::new(100.0, 80.0),
                texture: 1,
                x_offset: 0.0,
            }],
            ..Room::rectangle(10.0, 10.0, 1)
        };
        let view = view_at(0, 0, ANG90);
        let mut segs = Vec::new();
        room.wall_segments(&view, &mut segs);

        assert_eq!(segs.len(), 1);
        let seg = &segs[0];
        assert_eq!((seg.left_x, seg.right_x), (0, 319));
        assert!((seg.left_scale - 2.0).abs() < 1e-3);
        assert!(seg.scale_step.abs() < 1e-6);
        assert!((seg.distance - 80.0).abs() < 1e-3);
        assert!(seg.center_angle.to_radians().abs() < 1e-4);
        // texture x runs from v1: the foot of the normal is 100 units in
        assert!((seg.offset - 100.0).abs() < 1e-3);
        assert!(seg.actions.contains(WallActions::ADD_FLOOR | WallActions::ADD_CEILING));
        assert_eq!(seg.floor_height, -41.0);
    }

    #[test]
    fn back_faces_and_lines_behind_are_dropped() {
        let mut room = Room::rectangle(10.0, 10.0, 1);
        room.walls = vec![
            // seen from behind
            DemoLine {
                v1: Vec2::new(100.0, 80.0),
                v2: Vec2::new(-100.0, 80.0),
                texture: 1,
                x_offset: 0.0,
            },
            // behind the camera
            DemoLine {
                v1: Vec2::new(100.0, -80.0),
                v2: Vec2::new(-100.0, -80.0),
                texture: 1,
                x_offset: 0.0,
            },
        ];
        let mut segs = Vec::new();
        room.wall_segments(&view_at(0, 0, ANG90), &mut segs);
        // the second one faces the camera but is entirely behind it
        assert!(segs.is_empty());
    }

    #[test]
    fn near_plane_clips_a_side_wall() {
        let mut room = Room::rectangle(10.0, 10.0, 1);
        room.walls = vec![DemoLine {
            v1: Vec2::new(-50.0, -100.0),
            v2: Vec2::new(-50.0, 300.0),
            texture: 1,
            x_offset: 0.0,
        }];
        let mut segs = Vec::new();
        room.wall_segments(&view_at(0, 0, ANG90), &mut segs);
        assert_eq!(segs.len(), 1);
        let seg = &segs[0];
        assert_eq!(seg.left_x, 0);
        assert!(seg.right_x < 160);
        // nearer on the left
        assert!(seg.scale_step < 0.0);
    }

    #[test]
    fn pillars_come_before_room_walls() {
        let scene = DemoScene::new().unwrap();
        let (pos, angle) = scene.start;
        let view = view_at(pos.x as i32, pos.y as i32, angle);
        let mut segs = Vec::new();
        scene.room.wall_segments(&view, &mut segs);

        assert!(!segs.is_empty());
        let first_room_wall = segs
            .iter()
            .position(|s| s.top.texture == scene.room.walls[0].texture)
            .unwrap();
        assert!(segs[first_room_wall..]
            .iter()
            .all(|s| s.top.texture == scene.room.walls[0].texture));
        assert!(segs.iter().all(|s| s.actions.contains(WallActions::ADD_SKY)));
    }

    #[test]
    fn mirrored_rotations_share_drawings() {
        let scene = DemoScene::new().unwrap();
        let frame = &scene.sprites.get(0).unwrap().frames[0];
        assert_eq!(frame.angles[1].texture, frame.angles[7].texture);
        assert!(frame.angles[7].flipped && !frame.angles[1].flipped);
        let front = scene.textures.texture(frame.angles[0].texture).unwrap();
        // transparent outside the silhouette
        assert_eq!(front.texel(0, 0) >> 24, 0);
        assert_eq!(front.texel(16, 28) >> 24, 0xFF);
    }

    #[test]
    fn whole_scene_renders() {
        let scene = DemoScene::new().unwrap();
        let cfg = RenderConfig::default();
        let mut sw = Software::new(cfg).unwrap();
        let (pos, angle) = scene.start;
        let camera = Camera::new(
            float_to_fixed(pos.x),
            float_to_fixed(pos.y),
            float_to_fixed(EYE_HEIGHT),
            angle,
        );
        let mut view = ViewState::new(&cfg);
        view.set_camera(&camera);
        let mut walls = Vec::new();
        scene.room.wall_segments(&view, &mut walls);

        let input = FrameInput {
            camera,
            walls: &walls,
            objects: &scene.objects,
            sky_texture: scene.sky,
            extra_light: 0,
        };
        let stats = sw
            .render(&input, &scene.textures, &scene.sprites, |_, _, _| {})
            .unwrap();
        assert!(stats.walls > 0);
        assert!(stats.sky_columns > 0);
        assert!(stats.draw_sprites > 0);
        assert!(stats.fragments > 0);
    }
}
