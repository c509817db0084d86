use super::*;

#[test]
fn greeting_follows_the_clock() {
    assert_eq!(greeting(0), "Good morning!");
    assert_eq!(greeting(11), "Good morning!");
    assert_eq!(greeting(12), "Good afternoon!");
    assert_eq!(greeting(17), "Good afternoon!");
    assert_eq!(greeting(18), "Good evening!");
    assert_eq!(greeting(23), "Good evening!");
}

#[test]
fn tilt_maps_pointer_offset_to_rotation() {
    let hero = Rect::new(100.0, 100.0, 300.0, 200.0);
    let center = hover_tilt(Point::new(200.0, 150.0), hero);
    assert_eq!(center, Tilt::RESET);

    let corner = hover_tilt(Point::new(300.0, 100.0), hero);
    assert_eq!(corner.rotate_x_deg, 5.0);
    assert_eq!(corner.rotate_y_deg, 7.0);
    assert_eq!(
        corner.css(),
        "rotateX(5.00deg) rotateY(7.00deg) translateZ(0)"
    );

    let odd = hover_tilt(Point::new(133.0, 177.0), hero);
    assert_eq!(odd.rotate_x_deg, -2.7);
    assert_eq!(odd.rotate_y_deg, -4.69);
}

#[test]
fn tilt_reset_and_degenerate_bounds() {
    assert_eq!(
        Tilt::RESET.css(),
        "rotateX(0deg) rotateY(0deg) translateZ(0)"
    );
    let flat = Rect::new(0.0, 0.0, 100.0, 0.0);
    assert_eq!(hover_tilt(Point::new(10.0, 0.0), flat), Tilt::RESET);
}

#[test]
fn header_flips_past_threshold() {
    let mut h = HeaderState::new();
    assert!(!h.on_scroll(8.0));
    assert!(!h.is_scrolled());
    assert!(h.on_scroll(8.5));
    assert!(h.is_scrolled());
    assert!(!h.on_scroll(400.0));
    assert!(h.on_scroll(0.0));
    assert_eq!(HeaderState::body_offset(72.0), "72px");
}

#[test]
fn collapsible_toggles_aria_state() {
    let mut c = Collapsible::new();
    assert_eq!((c.aria_hidden(), c.aria_expanded()), ("true", "false"));
    assert!(c.toggle());
    assert_eq!((c.aria_hidden(), c.aria_expanded()), ("false", "true"));

    assert!(c.on_key(Key::Space));
    assert!(!c.is_open());
    assert!(c.on_key(Key::Enter));
    assert!(c.is_open());
    assert!(!c.on_key(Key::Other));
    assert!(c.is_open());
}
