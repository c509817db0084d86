use crate::foundation::core::{Point, Rect};

/// Time-of-day greeting for a local hour in `0..24`.
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning!"
    } else if hour < 18 {
        "Good afternoon!"
    } else {
        "Good evening!"
    }
}

/// Hero graphic rotation, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub rotate_x_deg: f64,
    pub rotate_y_deg: f64,
}

impl Tilt {
    /// Pose applied when the pointer leaves the hero.
    pub const RESET: Self = Self {
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
    };

    /// CSS `transform` value.
    pub fn css(&self) -> String {
        if *self == Self::RESET {
            return "rotateX(0deg) rotateY(0deg) translateZ(0)".to_owned();
        }
        format!(
            "rotateX({:.2}deg) rotateY({:.2}deg) translateZ(0)",
            self.rotate_x_deg, self.rotate_y_deg
        )
    }
}

/// Tilt for a pointer at `pointer` over the hero box `bounds` (both in viewport space).
pub fn hover_tilt(pointer: Point, bounds: Rect) -> Tilt {
    let (w, h) = (bounds.width(), bounds.height());
    if w <= 0.0 || h <= 0.0 {
        return Tilt::RESET;
    }
    let x = (pointer.x - bounds.x0) / w - 0.5;
    let y = (pointer.y - bounds.y0) / h - 0.5;
    Tilt {
        rotate_x_deg: round2(-y * 10.0),
        rotate_y_deg: round2(x * 14.0),
    }
}

fn round2(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    // Avoid "-0.00" in CSS output.
    if r == 0.0 { 0.0 } else { r }
}

/// Sticky header state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderState {
    scrolled: bool,
}

impl HeaderState {
    pub const SCROLL_THRESHOLD_PX: f64 = 8.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Update from the page scroll offset. Returns whether the `scrolled` class flipped.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        let next = scroll_y > Self::SCROLL_THRESHOLD_PX;
        let changed = next != self.scrolled;
        self.scrolled = next;
        changed
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Body top padding and scroll padding that keep content clear of the fixed header.
    pub fn body_offset(header_height: f64) -> String {
        format!("{}px", header_height.max(0.0))
    }
}

/// Keys that activate a focused collapsible card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

/// Expand/collapse panel with its ARIA attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Collapsible {
    open: bool,
}

impl Collapsible {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the panel and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Handle a key press on the card. Returns `true` when the key was consumed.
    pub fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter | Key::Space => {
                self.toggle();
                true
            }
            Key::Other => false,
        }
    }

    /// `aria-hidden` of the panel.
    pub fn aria_hidden(&self) -> &'static str {
        if self.open { "false" } else { "true" }
    }

    /// `aria-expanded` of the card.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/chrome.rs"]
mod tests;
