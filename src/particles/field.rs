use crate::config::SparkConfig;
use crate::foundation::color::hsl_to_rgba8;
use crate::foundation::core::{Point, Vec2, Viewport, normalize_hue};
use crate::foundation::rng::Rng64;
use crate::surface::visual::VisualSurface;

/// Free-flying particle, independent of any connector path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spark {
    pub pos: Point,
    /// px/s
    pub vel: Vec2,
    pub hue: f64,
    pub radius: f64,
}

/// Wrap one coordinate to the opposite edge once it leaves `[-margin, extent + margin]`.
pub(crate) fn wrap_axis(v: f64, extent: f64, margin: f64) -> f64 {
    if v < -margin {
        extent + margin
    } else if v > extent + margin {
        -margin
    } else {
        v
    }
}

/// Fixed-size spark population. Sparks are never destroyed; leaving the viewport recycles them
/// at the opposite edge.
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
    sparks: Vec<Spark>,
}

impl ParticleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the population with `cfg.count` sparks scattered over `viewport`.
    pub fn seed(&mut self, viewport: Viewport, cfg: &SparkConfig, rng: &mut Rng64) {
        self.sparks.clear();
        self.sparks.reserve(cfg.count);
        for _ in 0..cfg.count {
            let hue = normalize_hue(cfg.hue_min + rng.next_f64_01() * cfg.hue_span);
            let x = rng.next_f64_01() * viewport.width;
            let y = rng.next_f64_01() * viewport.height;
            let speed = rng.range(cfg.speed_min, cfg.speed_max);
            let angle = rng.next_f64_01() * std::f64::consts::TAU;
            let radius = rng.range(cfg.radius_min, cfg.radius_max);
            self.sparks.push(Spark {
                pos: Point::new(x, y),
                vel: Vec2::from_angle(angle) * speed,
                hue,
                radius,
            });
        }
        tracing::trace!(count = self.sparks.len(), "sparks seeded");
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    pub fn push(&mut self, spark: Spark) {
        self.sparks.push(spark);
    }

    /// One physics tick: friction, integration, wander, edge wrap, hue drift.
    ///
    /// Friction is per tick, not per second. `dt <= 0` leaves every spark untouched.
    pub fn step(&mut self, dt: f64, viewport: Viewport, cfg: &SparkConfig, rng: &mut Rng64) {
        if dt <= 0.0 {
            return;
        }
        let margin = cfg.wrap_margin_px;
        for s in &mut self.sparks {
            s.vel *= cfg.friction;
            s.pos += s.vel * dt;
            s.vel.x += (rng.next_f64_01() - 0.5) * cfg.wander * dt;
            s.vel.y += (rng.next_f64_01() - 0.5) * cfg.wander * dt;

            s.pos.x = wrap_axis(s.pos.x, viewport.width, margin);
            s.pos.y = wrap_axis(s.pos.y, viewport.height, margin);

            s.hue = normalize_hue(s.hue + cfg.hue_rate_deg_per_sec * dt);
        }
    }

    /// Fade what is already on the canvas, then draw every spark as a disc.
    pub fn render(&self, cfg: &SparkConfig, surface: &mut dyn VisualSurface) {
        surface.fade_canvas(cfg.fade_alpha);
        for s in &self.sparks {
            let color = hsl_to_rgba8(s.hue, cfg.saturation, cfg.lightness);
            surface.fill_disc(s.pos, s.radius, color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/field.rs"]
mod tests;
