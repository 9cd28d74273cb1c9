use anyhow::Context;
use clap::Parser;
use minifb::{Key, Scale, Window, WindowOptions};
use std::time::{Duration, Instant};

use yadoom_render::{
    config::RenderConfig,
    demo::{DemoScene, EYE_HEIGHT},
    math::Angle,
    renderer::{
        RendererExt,
        software::{Software, view::ViewState},
    },
    world::{Camera, FrameInput},
};

const WALK_SPEED: f32 = 4.0;
const TURN_SPEED: Angle = Angle(0x0200_0000);

/// Walk around the demo room with the software renderer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// View width in pixels.
    #[arg(long, default_value_t = 320)]
    width: usize,
    /// View height in pixels.
    #[arg(long, default_value_t = 200)]
    height: usize,
    /// Horizontal field of view in degrees.
    #[arg(long, default_value_t = 90.0)]
    fov: f32,
    /// Window pixel scale: 1, 2, 4 or 8.
    #[arg(long, default_value_t = 2)]
    scale: u32,
    /// Global light bias added to every sector.
    #[arg(long, default_value_t = 0)]
    extra_light: u32,
}

fn window_scale(n: u32) -> Scale {
    match n {
        0 | 1 => Scale::X1,
        2 | 3 => Scale::X2,
        4..=7 => Scale::X4,
        _ => Scale::X8,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cfg = RenderConfig {
        fov_degrees: args.fov,
        ..RenderConfig::default().with_view(args.width, args.height)
    };
    let mut renderer = Software::new(cfg).context("invalid renderer configuration")?;
    let mut view = ViewState::new(&cfg);

    let scene = DemoScene::new()?;
    let (start, start_angle) = scene.start;
    let mut camera = Camera::from_f32(start.extend(EYE_HEIGHT), start_angle.to_radians());
    let mut walls = Vec::new();

    let options = WindowOptions {
        scale: window_scale(args.scale),
        ..WindowOptions::default()
    };
    let mut win = Window::new("yadoom software renderer", args.width, args.height, options)?;
    win.set_target_fps(35);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO; // cumulated render time
    let mut acc_frames = 0usize; // frames in the current window
    let mut last_print = Instant::now(); // when we printed last

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* movement --------------------------------------------------------- */
        let run = if win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift) {
            2.0
        } else {
            1.0
        };
        let mut forward = 0.0;
        let mut side = 0.0;
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            forward += WALK_SPEED * run;
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            forward -= WALK_SPEED * run;
        }

        let alt = win.is_key_down(Key::LeftAlt) || win.is_key_down(Key::RightAlt);
        if alt {
            /* Alt + ←/→  = strafe */
            if win.is_key_down(Key::Left) {
                side -= WALK_SPEED * run;
            }
            if win.is_key_down(Key::Right) {
                side += WALK_SPEED * run;
            }
        } else {
            /* plain ←/→   = turn   */
            if win.is_key_down(Key::Left) {
                camera.turn(TURN_SPEED);
            }
            if win.is_key_down(Key::Right) {
                camera.turn(Angle(0) - TURN_SPEED);
            }
        }
        if win.is_key_down(Key::A) {
            side -= WALK_SPEED * run;
        }
        if win.is_key_down(Key::D) {
            side += WALK_SPEED * run;
        }
        camera.step(forward, side);

        let t0 = Instant::now(); // ┌─ frame timer start

        /* visible walls ---------------------------------------------------- */
        view.set_camera(&camera);
        scene.room.wall_segments(&view, &mut walls);

        /* draw ------------------------------------------------------------- */
        let input = FrameInput {
            camera,
            walls: &walls,
            objects: &scene.objects,
            sky_texture: scene.sky,
            extra_light: args.extra_light,
        };
        let mut shown = Ok(());
        renderer.render(&input, &scene.textures, &scene.sprites, |fb, w, h| {
            // ─────────── accumulate & report every ~3 s ────────────────────
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        })?;
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            let fps = 1000.0 / avg_ms;
            println!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, fps);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
