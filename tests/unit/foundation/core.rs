use super::*;

#[test]
fn viewport_rejects_negative_and_nan() {
    assert!(Viewport::new(-1.0, 10.0).is_err());
    assert!(Viewport::new(10.0, f64::NAN).is_err());
    assert!(Viewport::new(0.0, 0.0).is_ok());
}

#[test]
fn backing_size_floors_pixel_ratio() {
    let vp = Viewport::new(1000.0, 500.0).unwrap();
    assert_eq!(vp.backing_size(1.0), (1000, 500));
    assert_eq!(vp.backing_size(1.75), (1000, 500));
    assert_eq!(vp.backing_size(2.5), (2000, 1000));
    assert_eq!(vp.backing_size(0.5), (1000, 500));
    assert_eq!(canvas_pixel_ratio(f64::INFINITY), 1);
}

#[test]
fn hex_and_premul() {
    let c = Rgba8::opaque(0, 229, 255);
    assert_eq!(c.to_hex(), "#00e5ff");
    assert_eq!(c.to_premul(), [0, 229, 255, 255]);

    let half = Rgba8::opaque(255, 0, 0).with_opacity(0.5);
    assert_eq!(half.a, 128);
    assert_eq!(half.to_premul(), [128, 0, 0, 128]);
}

#[test]
fn hue_normalization_stays_in_range() {
    assert_eq!(normalize_hue(360.0), 0.0);
    assert_eq!(normalize_hue(725.0), 5.0);
    assert_eq!(normalize_hue(-90.0), 270.0);
    assert_eq!(normalize_hue(-1e-20), 0.0);
    assert_eq!(normalize_hue(f64::NAN), 0.0);
    for h in [-1e9, -0.1, 0.0, 359.999, 1e12] {
        let n = normalize_hue(h);
        assert!((0.0..360.0).contains(&n), "{h} -> {n}");
    }
}
