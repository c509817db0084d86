use super::*;
use crate::surface::recording::RecordingSurface;

fn still_spark(x: f64, y: f64) -> Spark {
    Spark {
        pos: Point::new(x, y),
        vel: Vec2::ZERO,
        hue: 100.0,
        radius: 2.0,
    }
}

fn calm() -> SparkConfig {
    SparkConfig {
        friction: 1.0,
        wander: 0.0,
        ..SparkConfig::default()
    }
}

#[test]
fn wrap_axis_jumps_to_the_opposite_margin() {
    assert_eq!(wrap_axis(-25.0, 1000.0, 20.0), 1020.0);
    assert_eq!(wrap_axis(1021.0, 1000.0, 20.0), -20.0);
    assert_eq!(wrap_axis(-20.0, 1000.0, 20.0), -20.0);
    assert_eq!(wrap_axis(500.0, 1000.0, 20.0), 500.0);
}

#[test]
fn spark_left_of_margin_reappears_on_the_right() {
    let mut field = ParticleField::new();
    field.push(still_spark(-25.0, 300.0));
    let mut rng = Rng64::new(1);
    field.step(0.016, Viewport::new(1000.0, 600.0).unwrap(), &calm(), &mut rng);
    assert_eq!(field.sparks()[0].pos, Point::new(1020.0, 300.0));
}

#[test]
fn seeded_sparks_fall_within_configured_bands() {
    let cfg = SparkConfig::default();
    let vp = Viewport::new(800.0, 600.0).unwrap();
    let mut rng = Rng64::new(42);
    let mut field = ParticleField::new();
    field.seed(vp, &cfg, &mut rng);
    assert_eq!(field.len(), 24);
    for s in field.sparks() {
        assert!((0.0..800.0).contains(&s.pos.x));
        assert!((0.0..600.0).contains(&s.pos.y));
        assert!((95.0..125.0).contains(&s.hue));
        assert!((1.6..3.2).contains(&s.radius));
        let speed = s.vel.hypot();
        assert!(speed > 40.0 - 1e-9 && speed < 120.0 + 1e-9, "speed {speed}");
    }
}

#[test]
fn friction_decays_velocity_per_tick() {
    let mut field = ParticleField::new();
    field.push(Spark {
        vel: Vec2::new(100.0, 0.0),
        ..still_spark(100.0, 100.0)
    });
    let cfg = SparkConfig {
        wander: 0.0,
        ..SparkConfig::default()
    };
    let mut rng = Rng64::new(1);
    let vp = Viewport::new(1000.0, 1000.0).unwrap();
    field.step(0.01, vp, &cfg, &mut rng);
    let s = field.sparks()[0];
    assert!((s.vel.x - 98.5).abs() < 1e-9);
    assert!((s.pos.x - 100.985).abs() < 1e-9);
}

#[test]
fn zero_dt_leaves_sparks_untouched() {
    let mut field = ParticleField::new();
    let mut rng = Rng64::new(9);
    field.seed(Viewport::default(), &SparkConfig::default(), &mut rng);
    let before = field.sparks().to_vec();
    field.step(0.0, Viewport::default(), &SparkConfig::default(), &mut rng);
    assert_eq!(field.sparks(), &before[..]);
}

#[test]
fn hue_and_positions_stay_bounded_over_many_ticks() {
    let cfg = SparkConfig::default();
    let vp = Viewport::new(320.0, 200.0).unwrap();
    let mut rng = Rng64::new(5);
    let mut field = ParticleField::new();
    field.seed(vp, &cfg, &mut rng);
    for _ in 0..5_000 {
        field.step(0.05, vp, &cfg, &mut rng);
        for s in field.sparks() {
            assert!((0.0..360.0).contains(&s.hue));
            assert!(s.pos.x >= -20.0 && s.pos.x <= 340.0);
            assert!(s.pos.y >= -20.0 && s.pos.y <= 220.0);
        }
    }
}

#[test]
fn render_fades_before_drawing() {
    let mut field = ParticleField::new();
    field.push(still_spark(10.0, 10.0));
    field.push(still_spark(20.0, 20.0));
    let mut s = RecordingSurface::new();
    s.fill_disc(Point::ZERO, 1.0, crate::foundation::core::Rgba8::BLACK);
    field.render(&SparkConfig::default(), &mut s);
    assert_eq!(s.fades(), 1);
    assert_eq!(s.discs().len(), 2);
    assert_eq!(s.discs()[0].center, Point::new(10.0, 10.0));
}
