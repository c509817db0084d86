use super::*;
use crate::layout::resolver::ElementId;

fn cfg() -> PathConfig {
    PathConfig::default()
}

#[test]
fn horizontal_segments_bend_by_dx_sign() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(100.0, 0.0);
    // dx = 100 > 60: dir = +1 regardless of index, control point pushed towards +y.
    for idx in [0, 1] {
        let c = control_point(a, b, idx, &cfg());
        assert_eq!(c, Point::new(50.0, 24.0));
    }
    let c = control_point(b, a, 0, &cfg());
    assert_eq!(c, Point::new(50.0, 24.0));
}

#[test]
fn steep_segments_alternate_by_parity() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(0.0, 100.0);
    let even = control_point(a, b, 2, &cfg());
    let odd = control_point(a, b, 3, &cfg());
    assert_eq!(even, Point::new(24.0, 50.0));
    assert_eq!(odd, Point::new(-24.0, 50.0));
}

#[test]
fn lut_has_fixed_size_and_hits_endpoints() {
    let a = Point::new(10.0, 20.0);
    let b = Point::new(400.0, 300.0);
    let g = PathGeometry::build(a, b, 0, &cfg());
    assert_eq!(g.lut().len(), 120);
    assert!((g.lut()[0] - a).hypot() < 1e-2);
    assert!((g.lut()[119] - b).hypot() < 1e-2);
    assert!(g.length() > (b - a).hypot());
}

#[test]
fn lut_samples_are_evenly_spaced_by_arclength() {
    let g = PathGeometry::build(Point::new(0.0, 0.0), Point::new(300.0, 200.0), 1, &cfg());
    let steps: Vec<f64> = g.lut().windows(2).map(|w| (w[1] - w[0]).hypot()).collect();
    let expected = g.length() / 119.0;
    for s in steps {
        assert!((s - expected).abs() < expected * 0.05, "{s} vs {expected}");
    }
}

#[test]
fn rebuild_is_idempotent() {
    let a = Point::new(5.0, 5.0);
    let b = Point::new(250.0, 90.0);
    let g1 = PathGeometry::build(a, b, 4, &cfg());
    let g2 = PathGeometry::build(a, b, 4, &cfg());
    assert_eq!(g1, g2);
    assert_eq!(g1.lut(), g2.lut());
}

#[test]
fn degenerate_curve_falls_back_to_unit_length() {
    let p = Point::new(42.0, 42.0);
    let g = PathGeometry::build(p, p, 0, &cfg());
    assert_eq!(g.length(), 1.0);
    assert!(g.lut().iter().all(|q| *q == p));
    assert_eq!(g.point_at(0.5), p);
}

#[test]
fn point_at_is_nearest_sample_and_clamped() {
    let g = PathGeometry::build(Point::new(0.0, 0.0), Point::new(500.0, 0.0), 0, &cfg());
    assert_eq!(g.point_at(0.0), g.lut()[0]);
    assert_eq!(g.point_at(0.5), g.lut()[59]);
    assert_eq!(g.point_at(0.999_999), g.lut()[118]);
    assert_eq!(g.point_at(1.0), g.lut()[119]);
    assert_eq!(g.point_at(-3.0), g.lut()[0]);
    assert_eq!(g.point_at(7.0), g.lut()[119]);
    assert_eq!(g.point_at(f64::NAN), g.lut()[0]);
}

#[test]
fn svg_path_data_matches_curve() {
    let g = PathGeometry::build(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 0, &cfg());
    assert_eq!(g.svg_d(), "M 0,0 Q 50,24 100,0");
    assert_eq!(g.to_bez_path().elements().len(), 2);
}

#[test]
fn refresh_keeps_identity_and_swaps_geometry() {
    let pair = AnchorPair::new(ElementId::new("#a"), ElementId::new("#b"), 1);
    let mut p = ConnectorPath::new(
        pair,
        VisualHandle(7),
        (Point::new(0.0, 0.0), Point::new(100.0, 100.0)),
        &cfg(),
    );
    assert_eq!(p.variant(), PathVariant::Alt);
    let before = p.geometry().clone();

    assert!(!p.refresh((Point::new(0.0, 0.0), Point::new(100.0, 100.0)), &cfg()));
    assert_eq!(p.geometry(), &before);

    assert!(p.refresh((Point::new(0.0, 50.0), Point::new(100.0, 150.0)), &cfg()));
    assert_ne!(p.geometry(), &before);
    assert_eq!(p.handle(), VisualHandle(7));
}
