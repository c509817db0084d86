use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::config::{MarkerConfig, PacketConfig};
use crate::foundation::color::hsl_to_rgba8;
use crate::foundation::core::{Point, Rgba8, normalize_hue};
use crate::foundation::rng::Rng64;
use crate::surface::visual::{MarkerStyle, PacketVisual, PathVariant, VisualHandle, VisualSurface};

/// Trail slots reserved up front; longer bounds grow on demand.
const HISTORY_PREALLOC: usize = 32;

/// Wrap a normalized position into `[0, 1)`.
pub(crate) fn wrap_unit(t: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    let w = t.rem_euclid(1.0);
    if w >= 1.0 { 0.0 } else { w }
}

/// Plain dot riding a path. Wraps around at the end of the path.
#[derive(Clone, Debug)]
pub struct Marker {
    pub t: f64,
    pub speed: f64,
    handle: VisualHandle,
    committed: Option<Point>,
}

impl Marker {
    pub fn new(t: f64, speed: f64, handle: VisualHandle) -> Self {
        Self {
            t: wrap_unit(t),
            speed,
            handle,
            committed: None,
        }
    }

    pub fn handle(&self) -> VisualHandle {
        self.handle
    }

    pub fn advance(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        self.t = wrap_unit(self.t + self.speed * dt);
    }

    /// Push the snapped position if it differs from the last one written.
    pub(crate) fn commit(&mut self, at: Point, snap_px: f64, surface: &mut dyn VisualSurface) {
        let p = snap(at, snap_px);
        if self.committed == Some(p) {
            return;
        }
        self.committed = Some(p);
        surface.move_marker(self.handle, p);
    }
}

fn snap(p: Point, grid: f64) -> Point {
    if grid.is_nan() || grid <= 0.0 {
        return p;
    }
    Point::new((p.x / grid).round() * grid, (p.y / grid).round() * grid)
}

/// Color-cycling entity with a bounded trail. Restarts from the beginning of its path with an
/// empty trail after each lap.
#[derive(Clone, Debug)]
pub struct Packet {
    pub t: f64,
    pub speed: f64,
    /// Added to the body rotation, radians.
    pub rotation_bias: f64,
    pub hue: f64,
    history: VecDeque<Point>,
    history_len: usize,
    visual: PacketVisual,
    laps: u64,
    trail_dirty: bool,
    committed_color: Option<Rgba8>,
    committed_body: Option<(Point, f64)>,
}

impl Packet {
    pub fn new(
        t: f64,
        speed: f64,
        rotation_bias: f64,
        hue: f64,
        history_len: usize,
        visual: PacketVisual,
    ) -> Self {
        let history_len = history_len.max(1);
        Self {
            t: wrap_unit(t),
            speed,
            rotation_bias,
            hue: normalize_hue(hue),
            history: VecDeque::with_capacity(history_len.min(HISTORY_PREALLOC) + 1),
            history_len,
            visual,
            laps: 0,
            trail_dirty: false,
            committed_color: None,
            committed_body: None,
        }
    }

    pub fn visual(&self) -> PacketVisual {
        self.visual
    }

    pub fn history(&self) -> impl ExactSizeIterator<Item = &Point> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_bound(&self) -> usize {
        self.history_len
    }

    pub fn laps(&self) -> u64 {
        self.laps
    }

    /// Move along the path and cycle the hue. On passing the end, `t` resets to 0 and the trail
    /// is emptied. Returns whether a lap completed.
    pub fn advance(&mut self, dt: f64, hue_rate_deg_per_sec: f64) -> bool {
        if dt <= 0.0 {
            return false;
        }
        let mut lapped = false;
        self.t += self.speed * dt;
        if self.t >= 1.0 || self.t.is_nan() {
            self.t = 0.0;
            self.history.clear();
            self.trail_dirty = true;
            self.laps = self.laps.saturating_add(1);
            lapped = true;
        }
        self.hue = normalize_hue(self.hue + hue_rate_deg_per_sec * dt);
        lapped
    }

    /// Append a trail point (rounded to 0.1 px), evicting the oldest beyond the bound.
    pub fn record(&mut self, p: Point) {
        let p = Point::new((p.x * 10.0).round() / 10.0, (p.y * 10.0).round() / 10.0);
        self.history.push_back(p);
        while self.history.len() > self.history_len {
            self.history.pop_front();
        }
        self.trail_dirty = true;
    }

    pub fn body_rotation_deg(&self) -> f64 {
        (self.t * std::f64::consts::TAU + self.rotation_bias).to_degrees()
    }

    pub(crate) fn commit(
        &mut self,
        at: Point,
        cfg: &PacketConfig,
        surface: &mut dyn VisualSurface,
    ) {
        if self.trail_dirty {
            self.trail_dirty = false;
            surface.set_trail_points(self.visual.trail, self.history.make_contiguous());
        }

        let color = hsl_to_rgba8(self.hue, cfg.saturation, cfg.lightness);
        if self.committed_color != Some(color) {
            self.committed_color = Some(color);
            surface.set_trail_color(self.visual.trail, color);
        }

        let body = (at, self.body_rotation_deg());
        if self.committed_body != Some(body) {
            self.committed_body = Some(body);
            surface.set_body_transform(self.visual.body, body.0, body.1);
        }
    }
}

/// Entities riding one path.
#[derive(Clone, Debug, Default)]
pub struct Lane {
    pub markers: SmallVec<[Marker; 2]>,
    pub packets: Vec<Packet>,
}

/// Owns every marker and packet, lane by lane, and enforces the global packet cap.
///
/// Packets are never evicted: once the cap is reached further spawns are refused.
#[derive(Clone, Debug)]
pub struct EntityPool {
    lanes: Vec<Lane>,
    cap: usize,
    live_packets: usize,
}

impl EntityPool {
    pub fn new(cap: usize) -> Self {
        Self {
            lanes: Vec::new(),
            cap,
            live_packets: 0,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn live_packets(&self) -> usize {
        self.live_packets
    }

    pub fn live_markers(&self) -> usize {
        self.lanes.iter().map(|l| l.markers.len()).sum()
    }

    /// A spawn is admitted only if the live count stays below `cap` afterwards; `cap <= 1` never
    /// admits one.
    pub fn has_room(&self) -> bool {
        self.live_packets.saturating_add(1) < self.cap
    }

    pub fn add_lane(&mut self) -> usize {
        self.lanes.push(Lane::default());
        self.lanes.len() - 1
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, lane: usize) -> Option<&Lane> {
        self.lanes.get(lane)
    }

    pub(crate) fn lanes_mut(&mut self) -> &mut [Lane] {
        &mut self.lanes
    }

    /// Seed the configured number of markers (one by default) with random phase and speed.
    pub fn seed_markers(
        &mut self,
        lane: usize,
        variant: PathVariant,
        cfg: &MarkerConfig,
        rng: &mut Rng64,
        surface: &mut dyn VisualSurface,
    ) {
        let Some(l) = self.lanes.get_mut(lane) else {
            return;
        };
        for _ in 0..cfg.per_path {
            let style = MarkerStyle {
                radius: rng.range(cfg.radius_min, cfg.radius_max),
                opacity: rng.range(cfg.opacity_min, cfg.opacity_max),
                variant,
            };
            let handle = surface.register_marker(style);
            let t = rng.next_f64_01();
            let speed = rng.range(cfg.speed_min, cfg.speed_max);
            l.markers.push(Marker::new(t, speed, handle));
        }
    }

    /// Create one packet on `lane` with randomized phase, speed, rotation bias and hue. A no-op
    /// when the pool is full or the lane does not exist.
    pub fn spawn_packet(
        &mut self,
        lane: usize,
        cfg: &PacketConfig,
        rng: &mut Rng64,
        surface: &mut dyn VisualSurface,
    ) -> bool {
        if !self.has_room() || lane >= self.lanes.len() {
            return false;
        }
        let hue = (rng.next_f64_01() * 360.0).floor();
        let visual = surface.register_packet(hsl_to_rgba8(hue, cfg.saturation, cfg.lightness));
        let t = rng.next_f64_01() * cfg.initial_t_max;
        let speed = rng.range(cfg.speed_min, cfg.speed_max);
        let rotation_bias = rng.signed_unit() * cfg.rotation_bias_max;

        self.lanes[lane].packets.push(Packet::new(
            t,
            speed,
            rotation_bias,
            hue,
            cfg.history_len,
            visual,
        ));
        self.live_packets += 1;
        tracing::trace!(lane, live = self.live_packets, "packet spawned");
        true
    }

    /// Roll `probability` and spawn on success (still subject to the cap).
    pub fn try_spawn(
        &mut self,
        lane: usize,
        probability: f64,
        cfg: &PacketConfig,
        rng: &mut Rng64,
        surface: &mut dyn VisualSurface,
    ) -> bool {
        if !rng.chance(probability) {
            return false;
        }
        self.spawn_packet(lane, cfg, rng, surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/connector/pool.rs"]
mod tests;
