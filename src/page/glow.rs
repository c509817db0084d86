use std::collections::BTreeMap;

use crate::foundation::core::{Rect, Viewport};

#[derive(Clone, Copy, Debug, Default)]
struct CardState {
    visible: bool,
    glow_until_ms: Option<f64>,
}

/// Brief `glow-on` pulse for cards scrolling into view.
#[derive(Clone, Debug)]
pub struct GlowPulse {
    enabled: bool,
    cards: BTreeMap<String, CardState>,
}

impl GlowPulse {
    pub const PULSE_MS: f64 = 1200.0;
    /// Visible fraction of a card needed to count as in view.
    pub const THRESHOLD: f64 = 0.35;
    /// Fraction of the viewport height ignored at the bottom.
    pub const BOTTOM_MARGIN: f64 = 0.20;

    /// A pulse that never fires when `reduced_motion` is set.
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            enabled: !reduced_motion,
            cards: BTreeMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stop observing for good, as on page hide.
    pub fn disconnect(&mut self) {
        self.enabled = false;
        self.cards.clear();
    }

    /// Share of `card` inside the viewport minus its bottom margin.
    pub fn visible_ratio(card: Rect, viewport: Viewport) -> f64 {
        let area = card.area();
        if area <= 0.0 {
            return 0.0;
        }
        let root = Rect::new(
            0.0,
            0.0,
            viewport.width,
            viewport.height * (1.0 - Self::BOTTOM_MARGIN),
        );
        let hit = card.intersect(root);
        (hit.area() / area).clamp(0.0, 1.0)
    }

    /// Feed current card boxes at host time `now_ms`. Cards crossing into view start (or
    /// restart) their pulse. Returns the ids that started pulsing.
    pub fn observe(&mut self, now_ms: f64, cards: &[(&str, Rect)], viewport: Viewport) -> Vec<String> {
        if !self.enabled {
            return Vec::new();
        }
        let mut started = Vec::new();
        for (id, r) in cards {
            let visible = Self::visible_ratio(*r, viewport) >= Self::THRESHOLD;
            let state = self.cards.entry((*id).to_owned()).or_default();
            if visible && !state.visible {
                state.glow_until_ms = Some(now_ms + Self::PULSE_MS);
                started.push((*id).to_owned());
            }
            state.visible = visible;
        }
        started
    }

    pub fn is_glowing(&self, id: &str, now_ms: f64) -> bool {
        self.cards
            .get(id)
            .and_then(|c| c.glow_until_ms)
            .is_some_and(|until| now_ms < until)
    }

    /// Clear expired pulses. Returns the ids whose `glow-on` should be removed.
    pub fn expire(&mut self, now_ms: f64) -> Vec<String> {
        let mut ended = Vec::new();
        for (id, c) in &mut self.cards {
            if c.glow_until_ms.is_some_and(|until| now_ms >= until) {
                c.glow_until_ms = None;
                ended.push(id.clone());
            }
        }
        ended
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/glow.rs"]
mod tests;
