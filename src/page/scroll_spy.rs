use std::collections::BTreeSet;

use crate::foundation::core::{Rect, Viewport};

/// Highlights the navigation link whose section sits in a thin band just above the middle of
/// the viewport.
///
/// Only sections that newly enter the band change the active link, so a click stays active
/// until scrolling brings another section in.
#[derive(Clone, Debug, Default)]
pub struct ScrollSpy {
    links: Vec<String>,
    active: Option<String>,
    intersecting: BTreeSet<String>,
}

impl ScrollSpy {
    /// Fraction of the viewport height cut from the top of the observation band.
    pub const TOP_MARGIN: f64 = 0.40;
    /// Fraction of the viewport height cut from the bottom of the observation band.
    pub const BOTTOM_MARGIN: f64 = 0.55;

    /// `links` are the link targets (`#about`, `#projects`, ...).
    pub fn new<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            links: links.into_iter().map(Into::into).collect(),
            active: None,
            intersecting: BTreeSet::new(),
        }
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Vertical extent of the observation band.
    pub fn band(viewport: Viewport) -> (f64, f64) {
        (
            viewport.height * Self::TOP_MARGIN,
            viewport.height * (1.0 - Self::BOTTOM_MARGIN),
        )
    }

    /// Feed the current section boxes. Returns whether the active link changed.
    pub fn observe(&mut self, sections: &[(&str, Rect)], viewport: Viewport) -> bool {
        let (top, bottom) = Self::band(viewport);
        let mut now = BTreeSet::new();
        let mut entered = None;
        for (href, r) in sections {
            if !self.links.iter().any(|l| l == href) {
                continue;
            }
            if r.y0 <= bottom && r.y1 >= top && r.x1 > 0.0 && r.x0 < viewport.width {
                if !self.intersecting.contains(*href) {
                    entered = Some(*href);
                }
                now.insert((*href).to_owned());
            }
        }
        self.intersecting = now;
        match entered {
            Some(href) => self.set_active(href),
            None => false,
        }
    }

    /// Activate a link immediately, as a click does.
    pub fn click(&mut self, href: &str) -> bool {
        self.set_active(href)
    }

    fn set_active(&mut self, href: &str) -> bool {
        if self.active.as_deref() == Some(href) {
            return false;
        }
        self.active = Some(href.to_owned());
        true
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, href: &str) -> bool {
        self.active() == Some(href)
    }

    /// `aria-current` for a link: `Some("page")` on the active one.
    pub fn aria_current(&self, href: &str) -> Option<&'static str> {
        self.is_active(href).then_some("page")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/scroll_spy.rs"]
mod tests;
