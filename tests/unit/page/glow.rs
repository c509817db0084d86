use super::*;

fn vp() -> Viewport {
    Viewport::new(1000.0, 1000.0).unwrap()
}

#[test]
fn ratio_uses_viewport_shrunk_at_bottom() {
    let card = Rect::new(0.0, 700.0, 100.0, 900.0);
    assert!((GlowPulse::visible_ratio(card, vp()) - 0.5).abs() < 1e-9);
    let below = Rect::new(0.0, 850.0, 100.0, 950.0);
    assert_eq!(GlowPulse::visible_ratio(below, vp()), 0.0);
}

#[test]
fn card_entering_view_pulses_for_1200ms() {
    let mut g = GlowPulse::new(false);
    let hidden = [("card", Rect::new(0.0, 1200.0, 100.0, 1400.0))];
    let shown = [("card", Rect::new(0.0, 200.0, 100.0, 400.0))];

    assert!(g.observe(0.0, &hidden, vp()).is_empty());
    assert_eq!(g.observe(100.0, &shown, vp()), vec!["card".to_owned()]);
    assert!(g.is_glowing("card", 1299.0));
    assert!(g.expire(1299.0).is_empty());
    assert_eq!(g.expire(1300.0), vec!["card".to_owned()]);
    assert!(!g.is_glowing("card", 1300.0));

    // Staying in view does not pulse again.
    assert!(g.observe(1400.0, &shown, vp()).is_empty());
}

#[test]
fn reentry_restarts_the_timer() {
    let mut g = GlowPulse::new(false);
    let hidden = [("card", Rect::new(0.0, 1200.0, 100.0, 1400.0))];
    let shown = [("card", Rect::new(0.0, 200.0, 100.0, 400.0))];
    g.observe(0.0, &shown, vp());
    g.observe(500.0, &hidden, vp());
    g.observe(1000.0, &shown, vp());
    assert!(g.is_glowing("card", 2100.0));
}

#[test]
fn reduced_motion_and_disconnect_disable_pulses() {
    let shown = [("card", Rect::new(0.0, 200.0, 100.0, 400.0))];
    let mut reduced = GlowPulse::new(true);
    assert!(reduced.observe(0.0, &shown, vp()).is_empty());
    assert!(!reduced.is_enabled());

    let mut g = GlowPulse::new(false);
    g.observe(0.0, &shown, vp());
    g.disconnect();
    assert!(!g.is_glowing("card", 10.0));
    assert!(g.observe(20.0, &shown, vp()).is_empty());
}
