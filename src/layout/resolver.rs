use crate::foundation::core::{Point, Rect, Viewport};

/// Opaque identifier of a page element (a selector on the host page).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Two elements whose centers are the endpoints of one connector path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorPair {
    pub a: ElementId,
    pub b: ElementId,
    /// Biases curvature direction and picks the visual variant.
    pub index: usize,
}

impl AnchorPair {
    pub fn new(a: ElementId, b: ElementId, index: usize) -> Self {
        Self { a, b, index }
    }
}

/// Read-only view of the host page geometry.
pub trait LayoutSource {
    fn viewport(&self) -> Viewport;

    /// Bounding box in viewport space, or `None` when the element is missing or detached.
    fn element_bounds(&self, id: &ElementId) -> Option<Rect>;
}

/// Resolves anchor pairs to endpoint centers and coalesces refresh requests.
///
/// Any number of `queue_update` calls between two frames collapse into a single refresh.
#[derive(Debug, Default)]
pub struct LayoutResolver {
    pending: bool,
    refreshes: u64,
}

impl LayoutResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Center of both endpoints, or `None` if either is unavailable.
    pub fn resolve(&self, pair: &AnchorPair, source: &dyn LayoutSource) -> Option<(Point, Point)> {
        let a = source.element_bounds(&pair.a).and_then(center_of)?;
        let b = source.element_bounds(&pair.b).and_then(center_of)?;
        Some((a, b))
    }

    pub fn queue_update(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending flag. Returns `true` at most once per batch of requests.
    pub fn take_pending(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.refreshes = self.refreshes.saturating_add(1);
        true
    }

    /// Refreshes performed so far.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

fn center_of(r: Rect) -> Option<Point> {
    let finite = [r.x0, r.y0, r.x1, r.y1].iter().all(|v| v.is_finite());
    // Zero-area boxes are what detached elements report.
    if !finite || r.area() <= 0.0 {
        return None;
    }
    Some(r.center())
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolver.rs"]
mod tests;
