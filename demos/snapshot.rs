//! Render a particle field headlessly and save the last frame as a PNG.
//!
//! ```text
//! cargo run --example snapshot [frames] [out.png]
//! ```
//!
//! The pointer circles the center of the frame, so the repulsion hole is
//! visible in the output.

use backdrop::prelude::*;

const WIDTH: u32 = 960;
const HEIGHT: u32 = 540;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(240);
    let out = args.next().unwrap_or_else(|| "snapshot.png".to_string());

    let config = FieldConfig::default().with_seed(7);
    let surface = Pixmap::with_background(0, 0, Rgba::rgb8(10, 10, 20, 1.0));
    let mut field = ParticleField::new(Some(surface), config, (WIDTH, HEIGHT));
    let mut frame_loop = AnimationLoop::new(ManualHost::new());

    let center = Vec2::new(WIDTH as f32, HEIGHT as f32) * 0.5;
    let mut time = Time::new();

    frame_loop.start(&mut field);
    for i in 1..frames {
        let angle = i as f32 * 0.02;
        field.set_pointer(center + Vec2::new(angle.cos(), angle.sin()) * 180.0);
        frame_loop.tick(&mut field);
        time.tick();
    }

    log::info!(
        "rendered {} frames in {:.2}s ({:.0} fps)",
        field.frame_count(),
        time.elapsed(),
        field.frame_count() as f32 / time.elapsed().max(1e-6)
    );

    let Some(pixmap) = field.surface() else {
        return;
    };
    if let Err(e) = pixmap.save_png(&out) {
        log::error!("{}", e);
        std::process::exit(1);
    }
    log::info!("saved {}", out);
}
