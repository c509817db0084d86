use std::cell::Cell;

use super::*;

#[test]
fn events_reach_only_matching_listeners() {
    let events = HostEvents::new();
    let loads = Rc::new(Cell::new(0));
    let scrolls = Rc::new(Cell::new(0.0));

    let l = loads.clone();
    let _a = events.subscribe(EventKind::Load, move |_| l.set(l.get() + 1));
    let s = scrolls.clone();
    let _b = events.subscribe(EventKind::Scroll, move |e| {
        if let HostEvent::Scroll { y } = e {
            s.set(*y);
        }
    });

    assert_eq!(events.emit(&HostEvent::Load), 1);
    assert_eq!(events.emit(&HostEvent::Scroll { y: 42.0 }), 1);
    assert_eq!(events.emit(&HostEvent::PageHide), 0);
    assert_eq!(loads.get(), 1);
    assert_eq!(scrolls.get(), 42.0);
}

#[test]
fn dropping_the_guard_detaches_and_prunes() {
    let events = HostEvents::new();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    let sub = events.subscribe(EventKind::OrientationChange, move |_| h.set(h.get() + 1));
    events.emit(&HostEvent::OrientationChange);
    sub.unsubscribe();

    assert_eq!(events.listener_count(), 1);
    assert_eq!(events.emit(&HostEvent::OrientationChange), 0);
    assert_eq!(events.listener_count(), 0);
    assert_eq!(hits.get(), 1);
}

#[test]
fn listeners_may_emit_reentrantly() {
    let events = HostEvents::new();
    let hidden = Rc::new(Cell::new(false));

    let inner = events.clone();
    let _hide = events.subscribe(EventKind::PageHide, move |_| {
        inner.emit(&HostEvent::VisibilityChange { hidden: true });
    });
    let flag = hidden.clone();
    let _vis = events.subscribe(EventKind::VisibilityChange, move |e| {
        if let HostEvent::VisibilityChange { hidden } = e {
            flag.set(*hidden);
        }
    });

    events.emit(&HostEvent::PageHide);
    assert!(hidden.get());
}

#[test]
fn kind_matches_variant() {
    let vp = Viewport::new(10.0, 10.0).unwrap();
    assert_eq!(HostEvent::Resize(vp).kind(), EventKind::Resize);
    assert_eq!(
        HostEvent::VisibilityChange { hidden: false }.kind(),
        EventKind::VisibilityChange
    );
}
