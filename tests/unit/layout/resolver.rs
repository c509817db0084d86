use super::*;
use crate::layout::static_layout::{ElementBox, StaticLayout};

fn layout() -> StaticLayout {
    StaticLayout::new(Viewport::new(1000.0, 800.0).unwrap())
        .with_element("#a", ElementBox::new(0.0, 0.0, 100.0, 50.0))
        .with_element("#b", ElementBox::new(500.0, 400.0, 200.0, 100.0))
        .with_element("#ghost", ElementBox::new(30.0, 30.0, 0.0, 0.0))
}

fn pair(a: &str, b: &str) -> AnchorPair {
    AnchorPair::new(ElementId::new(a), ElementId::new(b), 0)
}

#[test]
fn resolves_centers() {
    let r = LayoutResolver::new();
    let (a, b) = r.resolve(&pair("#a", "#b"), &layout()).unwrap();
    assert_eq!(a, Point::new(50.0, 25.0));
    assert_eq!(b, Point::new(600.0, 450.0));
}

#[test]
fn missing_or_detached_endpoint_is_unavailable() {
    let r = LayoutResolver::new();
    assert!(r.resolve(&pair("#a", "#missing"), &layout()).is_none());
    assert!(r.resolve(&pair("#ghost", "#b"), &layout()).is_none());
}

#[test]
fn queued_updates_coalesce() {
    let mut r = LayoutResolver::new();
    assert!(!r.take_pending());
    for _ in 0..5 {
        r.queue_update();
    }
    assert!(r.is_pending());
    assert!(r.take_pending());
    assert!(!r.take_pending());
    assert_eq!(r.refreshes(), 1);
}
