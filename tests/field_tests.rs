//! End-to-end behavior of the particle field through its public API.

use backdrop::forces::{link_opacity, perspective_scale, repulsion_strength};
use backdrop::prelude::*;
use backdrop::{ConfigError, DrawCommand};

fn still(x: f32, y: f32) -> Particle {
    Particle::new(Vec3::new(x, y, 0.0), Vec3::ZERO, 2.0, Rgba::rgb8(74, 158, 255, 0.6))
}

fn lines(field: &ParticleField<Recorder>) -> Vec<DrawCommand> {
    field.surface().unwrap().lines().copied().collect()
}

#[test]
fn test_positions_stay_inside_bounds() {
    let config = FieldConfig::default().with_seed(11);
    let mut field = ParticleField::new(Some(Recorder::new(0, 0)), config, (640, 360));
    field.set_pointer(Vec2::new(320.0, 180.0));

    for frame in 0..600 {
        if frame == 300 {
            field.resize(200, 120);
        }
        field.step();
        let (w, h) = field.size();
        for p in field.particles() {
            assert!((0.0..w as f32).contains(&p.position.x), "x = {}", p.position.x);
            assert!((0.0..h as f32).contains(&p.position.y), "y = {}", p.position.y);
            assert!((0.0..1000.0).contains(&p.position.z), "z = {}", p.position.z);
        }
    }
}

#[test]
fn test_planar_speed_never_grows_without_pointer() {
    let config = FieldConfig::default().with_seed(3);
    let mut field = ParticleField::new(Some(Recorder::new(0, 0)), config, (800, 600));
    // Far enough that no particle is ever within the repulsion radius.
    field.set_pointer(Vec2::new(-10_000.0, -10_000.0));

    let mut speeds: Vec<f32> = field.particles().iter().map(|p| p.planar_speed()).collect();
    for _ in 0..50 {
        field.update();
        for (p, last) in field.particles().iter().zip(speeds.iter_mut()) {
            let speed = p.planar_speed();
            assert!(speed <= *last + 1e-6);
            *last = speed;
        }
    }
}

#[test]
fn test_pointer_pushes_nearby_particle_away() {
    let mut field = ParticleField::from_particles(Recorder::new(400, 400), FieldConfig::default(), vec![still(100.0, 100.0)]);
    field.set_pointer(Vec2::new(50.0, 100.0));
    field.update();

    let p = field.particles()[0];
    let expected = 50.0 * repulsion_strength(50.0, 150.0, 0.01, Falloff::Linear) * 0.99;
    assert!((p.velocity.x - expected).abs() < 1e-6);
    assert!(p.velocity.x > 0.0);
    assert_eq!(p.velocity.y, 0.0);
}

#[test]
fn test_repulsion_factor_bounds() {
    assert_eq!(repulsion_strength(0.0, 150.0, 1.0, Falloff::Linear), 1.0);
    assert_eq!(repulsion_strength(150.0, 150.0, 1.0, Falloff::Linear), 0.0);
    assert_eq!(repulsion_strength(400.0, 150.0, 1.0, Falloff::Linear), 0.0);
    assert!((repulsion_strength(75.0, 150.0, 1.0, Falloff::Linear) - 0.5).abs() < 1e-6);
}

#[test]
fn test_two_particles_fifty_apart_get_one_line() {
    let particles = vec![still(500.0, 500.0), still(550.0, 500.0)];
    let mut field = ParticleField::from_particles(Recorder::new(1000, 1000), FieldConfig::default(), particles);
    field.step();

    let lines = lines(&field);
    assert_eq!(lines.len(), 1);
    match lines[0] {
        DrawCommand::Line { color, width, .. } => {
            assert!((color.a - 0.175).abs() < 1e-6);
            assert_eq!(color.to_rgba8()[..3], [74, 158, 255]);
            assert_eq!(width, 1.0);
        }
        other => panic!("expected a line, got {:?}", other),
    }
    assert!((link_opacity(50.0, 120.0, 0.3) - 0.175).abs() < 1e-6);
}

#[test]
fn test_distant_particles_are_not_linked() {
    let particles = vec![still(100.0, 500.0), still(220.0, 500.0), still(900.0, 900.0)];
    let mut field = ParticleField::from_particles(Recorder::new(1000, 1000), FieldConfig::default(), particles);
    field.step();
    assert!(lines(&field).is_empty());
    assert_eq!(field.surface().unwrap().discs().count(), 3);
}

#[test]
fn test_perspective_scale_matches_depth() {
    assert_eq!(perspective_scale(0.0, 1000.0), 1.0);
    assert!((perspective_scale(1000.0, 1000.0) - 0.5).abs() < 1e-6);
    assert!(perspective_scale(999.0, 1000.0) < perspective_scale(10.0, 1000.0));
}

#[test]
fn test_resting_particle_far_from_pointer_is_unchanged() {
    let mut field = ParticleField::from_particles(Recorder::new(800, 600), FieldConfig::default(), vec![still(0.0, 0.0)]);
    field.set_pointer(Vec2::new(1000.0, 1000.0));
    field.step();

    let p = field.particles()[0];
    assert_eq!(p.position, Vec3::ZERO);
    assert_eq!(p.velocity, Vec3::ZERO);
}

#[test]
fn test_visibility_flicker_keeps_one_schedule() {
    let config = FieldConfig::default().with_particle_count(10).with_seed(1);
    let mut field = ParticleField::new(Some(Recorder::new(0, 0)), config, (300, 200));
    let mut frame_loop = AnimationLoop::new(ManualHost::new());

    frame_loop.start(&mut field);
    assert_eq!(frame_loop.host().requests(), 1);

    frame_loop.set_visible(false, &mut field);
    frame_loop.set_visible(true, &mut field);
    assert_eq!(frame_loop.host().requests(), 1);
    assert_eq!(field.frame_count(), 1);

    // The original callback fires and keeps a single chain going.
    assert!(frame_loop.tick(&mut field));
    assert_eq!(frame_loop.host().requests(), 2);
    assert_eq!(field.frame_count(), 2);
}

#[test]
fn test_hidden_then_visible_restarts_after_chain_ended() {
    let config = FieldConfig::default().with_particle_count(10).with_seed(1);
    let mut field = ParticleField::new(Some(Recorder::new(0, 0)), config, (300, 200));
    let mut frame_loop = AnimationLoop::new(ManualHost::new());

    frame_loop.start(&mut field);
    frame_loop.set_visible(false, &mut field);
    assert!(!frame_loop.tick(&mut field));
    assert!(!frame_loop.is_scheduled());

    frame_loop.set_visible(true, &mut field);
    assert!(frame_loop.is_scheduled());
    assert_eq!(field.frame_count(), 2);
}

#[test]
fn test_pixmap_frame_has_visible_particles() {
    let background = Rgba::rgb8(10, 10, 20, 1.0);
    let config = FieldConfig::default().with_seed(9);
    let mut field = ParticleField::new(Some(Pixmap::with_background(0, 0, background)), config, (320, 240));
    field.step();

    let pixmap = field.surface().unwrap();
    let bg = background.to_rgba8();
    let lit = pixmap.as_bytes().chunks_exact(4).filter(|px| *px != bg).count();
    assert!(lit > 0);

    let p = field.particles()[0];
    let center = pixmap.pixel(p.position.x as u32, p.position.y as u32).unwrap();
    assert_ne!(center, bg);
}

#[test]
fn test_config_json_keeps_defaults_and_rejects_bad_values() {
    let config = FieldConfig::from_json(r#"{ "particle_count": 40 }"#).unwrap();
    assert_eq!(config.particle_count, 40);
    assert_eq!(config.damping, 0.99);
    assert_eq!(config.palette.len(), 4);

    assert!(matches!(
        FieldConfig::from_json(r#"{ "damping": 1.5 }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        FieldConfig::from_json(r#"{ "palette": [] }"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(FieldConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
}
