use kurbo::{ParamCurve, ParamCurveArclen};

use crate::config::PathConfig;
use crate::foundation::core::{BezPath, Point, QuadBez};
use crate::layout::resolver::AnchorPair;
use crate::surface::visual::{PathVariant, VisualHandle};

const ARCLEN_ACCURACY: f64 = 1e-3;

/// Control point of the connector curve between `a` and `b`.
///
/// The control point sits at the segment midpoint, pushed perpendicular by `curvature` times the
/// segment length. Mostly-horizontal segments bend by the sign of `dx`; steeper ones alternate
/// by index parity.
pub fn control_point(a: Point, b: Point, index: usize, cfg: &PathConfig) -> Point {
    let d = b - a;
    let dir = if d.x.abs() > cfg.horizontal_threshold_px {
        d.x.signum()
    } else if index % 2 == 1 {
        1.0
    } else {
        -1.0
    };
    Point::new(
        a.x + d.x * 0.5 - d.y * cfg.curvature * dir,
        a.y + d.y * 0.5 + d.x * cfg.curvature * dir,
    )
}

/// Immutable geometry of one connector: curve, cached length and an arclength lookup table.
///
/// Always replaced whole; a half-built table is never observable.
#[derive(Clone, Debug, PartialEq)]
pub struct PathGeometry {
    curve: QuadBez,
    length: f64,
    lut: Box<[Point]>,
}

impl PathGeometry {
    pub fn build(a: Point, b: Point, index: usize, cfg: &PathConfig) -> Self {
        let curve = QuadBez::new(a, control_point(a, b, index, cfg), b);
        let n = cfg.lut_samples.max(2);
        let raw = curve.arclen(ARCLEN_ACCURACY);

        let lut: Box<[Point]> = if raw.is_finite() && raw > 0.0 {
            (0..n)
                .map(|i| {
                    let s = raw * (i as f64) / ((n - 1) as f64);
                    curve.eval(curve.inv_arclen(s, ARCLEN_ACCURACY))
                })
                .collect()
        } else {
            // Zero length means every control point coincides.
            vec![curve.p0; n].into_boxed_slice()
        };

        let length = if raw.is_finite() && raw > 0.0 { raw } else { 1.0 };
        Self { curve, length, lut }
    }

    pub fn curve(&self) -> QuadBez {
        self.curve
    }

    /// Arclength in pixels; 1 for degenerate curves.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn lut(&self) -> &[Point] {
        &self.lut
    }

    /// Nearest LUT sample at or below normalized arclength `t`.
    pub fn point_at(&self, t: f64) -> Point {
        let n = self.lut.len();
        let last = n.saturating_sub(1);
        let raw = (t * last as f64).floor();
        let i = if raw.is_finite() {
            (raw.max(0.0) as usize).min(last)
        } else {
            0
        };
        self.lut[i]
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut p = BezPath::new();
        p.move_to(self.curve.p0);
        p.quad_to(self.curve.p1, self.curve.p2);
        p
    }

    /// SVG path data, `M ax,ay Q cx,cy bx,by`.
    pub fn svg_d(&self) -> String {
        let QuadBez { p0, p1, p2 } = self.curve;
        format!(
            "M {},{} Q {},{} {},{}",
            p0.x, p0.y, p1.x, p1.y, p2.x, p2.y
        )
    }
}

/// A connector between one anchor pair. Created once; its geometry is refreshed in place while
/// the entities riding it persist.
#[derive(Clone, Debug)]
pub struct ConnectorPath {
    pair: AnchorPair,
    variant: PathVariant,
    handle: VisualHandle,
    geometry: PathGeometry,
    endpoints: (Point, Point),
}

impl ConnectorPath {
    pub fn new(
        pair: AnchorPair,
        handle: VisualHandle,
        endpoints: (Point, Point),
        cfg: &PathConfig,
    ) -> Self {
        let variant = PathVariant::for_index(pair.index);
        let geometry = PathGeometry::build(endpoints.0, endpoints.1, pair.index, cfg);
        Self {
            pair,
            variant,
            handle,
            geometry,
            endpoints,
        }
    }

    /// Rebuild geometry for new endpoints. Returns whether the endpoints moved.
    pub fn refresh(&mut self, endpoints: (Point, Point), cfg: &PathConfig) -> bool {
        let moved = endpoints != self.endpoints;
        let next = PathGeometry::build(endpoints.0, endpoints.1, self.pair.index, cfg);
        self.geometry = next;
        self.endpoints = endpoints;
        moved
    }

    pub fn pair(&self) -> &AnchorPair {
        &self.pair
    }

    pub fn variant(&self) -> PathVariant {
        self.variant
    }

    pub fn handle(&self) -> VisualHandle {
        self.handle
    }

    pub fn geometry(&self) -> &PathGeometry {
        &self.geometry
    }

    pub fn endpoints(&self) -> (Point, Point) {
        self.endpoints
    }
}

#[cfg(test)]
#[path = "../../tests/unit/connector/path.rs"]
mod tests;
