use std::collections::BTreeMap;

use crate::foundation::core::{Point, QuadBez, Rgba8, Viewport};
use crate::surface::visual::{MarkerStyle, PacketVisual, PathVariant, VisualHandle, VisualSurface};

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedPath {
    pub variant: PathVariant,
    pub opacity: f64,
    pub curve: Option<QuadBez>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedMarker {
    pub style: MarkerStyle,
    pub center: Option<Point>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedTrail {
    pub points: Vec<Point>,
    pub color: Rgba8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedBody {
    pub fill: Rgba8,
    pub transform: Option<(Point, f64)>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedDisc {
    pub center: Point,
    pub radius: f64,
    pub color: Rgba8,
}

/// In-memory surface for tests, debugging and headless statistics.
///
/// Keeps the latest value written to every handle plus a count of all writes.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_handle: u32,
    viewport: Option<Viewport>,
    canvas: Option<Viewport>,
    pub(crate) paths: BTreeMap<VisualHandle, RecordedPath>,
    pub(crate) markers: BTreeMap<VisualHandle, RecordedMarker>,
    pub(crate) trails: BTreeMap<VisualHandle, RecordedTrail>,
    pub(crate) bodies: BTreeMap<VisualHandle, RecordedBody>,
    /// Discs drawn since the last fade.
    pub(crate) discs: Vec<RecordedDisc>,
    fades: u64,
    writes: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self) -> VisualHandle {
        let h = VisualHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        h
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn canvas(&self) -> Option<Viewport> {
        self.canvas
    }

    pub fn path(&self, h: VisualHandle) -> Option<&RecordedPath> {
        self.paths.get(&h)
    }

    pub fn marker(&self, h: VisualHandle) -> Option<&RecordedMarker> {
        self.markers.get(&h)
    }

    pub fn trail(&self, h: VisualHandle) -> Option<&RecordedTrail> {
        self.trails.get(&h)
    }

    pub fn body(&self, h: VisualHandle) -> Option<&RecordedBody> {
        self.bodies.get(&h)
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn packet_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn discs(&self) -> &[RecordedDisc] {
        &self.discs
    }

    pub fn fades(&self) -> u64 {
        self.fades
    }

    /// Total value writes (registrations excluded).
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn wrote(&mut self) {
        self.writes = self.writes.saturating_add(1);
    }
}

impl VisualSurface for RecordingSurface {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.wrote();
    }

    fn register_path(&mut self, variant: PathVariant, opacity: f64) -> VisualHandle {
        let h = self.issue();
        self.paths.insert(
            h,
            RecordedPath {
                variant,
                opacity,
                curve: None,
            },
        );
        h
    }

    fn set_path_curve(&mut self, path: VisualHandle, curve: QuadBez) {
        if let Some(p) = self.paths.get_mut(&path) {
            p.curve = Some(curve);
            self.wrote();
        }
    }

    fn register_marker(&mut self, style: MarkerStyle) -> VisualHandle {
        let h = self.issue();
        self.markers.insert(
            h,
            RecordedMarker {
                style,
                center: None,
            },
        );
        h
    }

    fn move_marker(&mut self, marker: VisualHandle, center: Point) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.center = Some(center);
            self.wrote();
        }
    }

    fn register_packet(&mut self, color: Rgba8) -> PacketVisual {
        let trail = self.issue();
        let body = self.issue();
        self.trails.insert(
            trail,
            RecordedTrail {
                points: Vec::new(),
                color,
            },
        );
        self.bodies.insert(
            body,
            RecordedBody {
                fill: color,
                transform: None,
            },
        );
        PacketVisual { trail, body }
    }

    fn set_trail_points(&mut self, trail: VisualHandle, points: &[Point]) {
        if let Some(t) = self.trails.get_mut(&trail) {
            t.points.clear();
            t.points.extend_from_slice(points);
            self.wrote();
        }
    }

    fn set_trail_color(&mut self, trail: VisualHandle, color: Rgba8) {
        if let Some(t) = self.trails.get_mut(&trail) {
            t.color = color;
            self.wrote();
        }
    }

    fn set_body_transform(&mut self, body: VisualHandle, center: Point, rotation_deg: f64) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.transform = Some((center, rotation_deg));
            self.wrote();
        }
    }

    fn resize_canvas(&mut self, viewport: Viewport) {
        self.canvas = Some(viewport);
        self.discs.clear();
    }

    fn fade_canvas(&mut self, _alpha: f64) {
        self.fades = self.fades.saturating_add(1);
        self.discs.clear();
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.discs.push(RecordedDisc {
            center,
            radius,
            color,
        });
    }
}
