use super::*;
use crate::layout::resolver::ElementId;
use crate::layout::static_layout::{ElementBox, StaticLayout};
use crate::surface::recording::RecordingSurface;

fn pair(a: &str, b: &str, index: usize) -> AnchorPair {
    AnchorPair::new(ElementId::new(a), ElementId::new(b), index)
}

fn sim_with_paths(cfg: &EngineConfig, surface: &mut RecordingSurface) -> Simulation {
    let mut sim = Simulation::new(cfg);
    sim.set_viewport(Viewport::new(1000.0, 800.0).unwrap());
    sim.add_path(
        pair("#a", "#b", 0),
        (Point::new(50.0, 50.0), Point::new(600.0, 400.0)),
        cfg,
        surface,
    );
    sim.add_path(
        pair("#b", "#c", 1),
        (Point::new(600.0, 400.0), Point::new(620.0, 750.0)),
        cfg,
        surface,
    );
    sim
}

fn snapshot(sim: &Simulation) -> Vec<(f64, f64, Vec<Point>)> {
    let mut out = Vec::new();
    for lane in sim.pool().lanes() {
        for m in &lane.markers {
            out.push((m.t, 0.0, Vec::new()));
        }
        for p in &lane.packets {
            out.push((p.t, p.hue, p.history().copied().collect()));
        }
    }
    out
}

#[test]
fn add_path_registers_visuals_and_one_marker() {
    let cfg = EngineConfig::default();
    let mut s = RecordingSurface::new();
    let sim = sim_with_paths(&cfg, &mut s);
    assert_eq!(sim.paths().len(), 2);
    assert_eq!(sim.pool().lanes().len(), 2);
    assert_eq!(sim.pool().live_markers(), 2);
    assert_eq!(s.path_count(), 2);
    let h = sim.paths()[1].handle();
    assert_eq!(s.path(h).unwrap().curve, Some(sim.paths()[1].geometry().curve()));
    assert_eq!(s.path(h).unwrap().opacity, 0.55);
}

#[test]
fn zero_dt_step_changes_no_entity_state() {
    let cfg = EngineConfig::default();
    let mut s = RecordingSurface::new();
    let mut sim = sim_with_paths(&cfg, &mut s);
    sim.seed_packets(1.0, &cfg, &mut s);
    sim.seed_sparks(&cfg);
    sim.step(0.016, true, &cfg, &mut s);

    let before = snapshot(&sim);
    let sparks = sim.field().sparks().to_vec();
    let live = sim.pool().live_packets();
    for _ in 0..50 {
        sim.step(0.0, true, &cfg, &mut s);
    }
    assert_eq!(snapshot(&sim), before);
    assert_eq!(sim.field().sparks(), &sparks[..]);
    assert_eq!(sim.pool().live_packets(), live);
}

#[test]
fn invariants_hold_over_long_runs() {
    let cfg = EngineConfig {
        packets: crate::config::PacketConfig {
            spawn_probability_per_tick: 0.3,
            ..Default::default()
        },
        ..EngineConfig::default()
    };
    let mut s = RecordingSurface::new();
    let mut sim = sim_with_paths(&cfg, &mut s);
    sim.seed_sparks(&cfg);
    for i in 0..3_000 {
        sim.step(0.05, i % 2 == 0, &cfg, &mut s);
        assert!(sim.pool().live_packets() < cfg.packets.cap);
        for lane in sim.pool().lanes() {
            for m in &lane.markers {
                assert!((0.0..1.0).contains(&m.t));
            }
            for p in &lane.packets {
                assert!((0.0..1.0).contains(&p.t));
                assert!((0.0..360.0).contains(&p.hue));
                assert!(p.history_len() <= cfg.packets.history_len);
            }
        }
    }
}

#[test]
fn non_commit_ticks_write_no_entity_visuals() {
    let cfg = EngineConfig {
        sparks: crate::config::SparkConfig {
            enabled: false,
            ..Default::default()
        },
        ..EngineConfig::default()
    };
    let mut s = RecordingSurface::new();
    let mut sim = sim_with_paths(&cfg, &mut s);
    sim.seed_packets(1.0, &cfg, &mut s);
    let before = s.writes();
    sim.step(0.016, false, &cfg, &mut s);
    assert_eq!(s.writes(), before);
    sim.step(0.016, true, &cfg, &mut s);
    assert!(s.writes() > before);
}

#[test]
fn committed_trail_matches_history() {
    let cfg = EngineConfig::default();
    let mut s = RecordingSurface::new();
    let mut sim = sim_with_paths(&cfg, &mut s);
    sim.seed_packets(1.0, &cfg, &mut s);
    for _ in 0..7 {
        sim.step(0.016, true, &cfg, &mut s);
    }
    let p = &sim.pool().lanes()[0].packets[0];
    let trail = s.trail(p.visual().trail).unwrap();
    let history: Vec<Point> = p.history().copied().collect();
    assert_eq!(trail.points, history);
    let (center, rot) = s.body(p.visual().body).unwrap().transform.unwrap();
    assert_eq!(center, sim.paths()[0].geometry().point_at(p.t));
    assert_eq!(rot, p.body_rotation_deg());
}

#[test]
fn refresh_keeps_geometry_when_anchor_missing() {
    let cfg = EngineConfig::default();
    let mut s = RecordingSurface::new();
    let mut sim = Simulation::new(&cfg);
    let mut layout = StaticLayout::new(Viewport::new(1000.0, 800.0).unwrap())
        .with_element("#a", ElementBox::new(0.0, 0.0, 100.0, 100.0))
        .with_element("#b", ElementBox::new(500.0, 300.0, 100.0, 100.0));
    let resolver = LayoutResolver::new();
    let p = pair("#a", "#b", 0);
    let endpoints = resolver.resolve(&p, &layout).unwrap();
    sim.add_path(p, endpoints, &cfg, &mut s);
    let lut_before = sim.paths()[0].geometry().lut().to_vec();

    layout.remove_element("#b");
    assert_eq!(sim.refresh_paths(&resolver, &layout, &cfg, &mut s), 0);
    assert_eq!(sim.paths()[0].geometry().lut(), &lut_before[..]);

    layout.set_element("#b", ElementBox::new(700.0, 500.0, 100.0, 100.0));
    assert_eq!(sim.refresh_paths(&resolver, &layout, &cfg, &mut s), 1);
    assert_eq!(sim.paths()[0].endpoints().1, Point::new(750.0, 550.0));
    let h = sim.paths()[0].handle();
    assert_eq!(s.path(h).unwrap().curve, Some(sim.paths()[0].geometry().curve()));
}

#[test]
fn same_seed_replays_the_same_run() {
    let cfg = EngineConfig::default();
    let run = || {
        let mut s = RecordingSurface::new();
        let mut sim = sim_with_paths(&cfg, &mut s);
        sim.seed_packets(cfg.packets.initial_spawn_probability, &cfg, &mut s);
        sim.seed_sparks(&cfg);
        for _ in 0..200 {
            sim.step(0.016, true, &cfg, &mut s);
        }
        (snapshot(&sim), sim.field().sparks().to_vec())
    };
    assert_eq!(run(), run());
}
