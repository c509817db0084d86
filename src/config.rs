use std::path::Path;

use crate::foundation::error::{NeonError, NeonResult};
use crate::layout::resolver::{AnchorPair, ElementId};

const MAX_LUT_SAMPLES: usize = 4096;
const MAX_MARKERS_PER_PATH: usize = 64;
const MAX_PACKET_CAP: usize = 10_000;
const MAX_HISTORY_LEN: usize = 1024;
const MAX_SPARKS: usize = 10_000;

/// Complete tuning surface of the connector engine.
///
/// Every field has a default matching the hand-tuned page, so a config file only needs to name
/// what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for all random decisions (phases, speeds, spawns, sparks).
    pub seed: u64,
    /// Anchor element pairs; list position is the variant index of the resulting path.
    pub anchors: Vec<[String; 2]>,
    pub path: PathConfig,
    pub markers: MarkerConfig,
    pub packets: PacketConfig,
    pub sparks: SparkConfig,
    pub stepper: StepperConfig,
}

/// Curve shape and lookup-table resolution.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Perpendicular control-point offset as a fraction of the segment length.
    pub curvature: f64,
    /// Segments with `|dx|` above this bend by the sign of `dx` instead of index parity.
    pub horizontal_threshold_px: f64,
    pub lut_samples: usize,
    pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub per_path: usize,
    pub speed_min: f64,
    pub speed_max: f64,
    pub radius_min: f64,
    pub radius_max: f64,
    pub opacity_min: f64,
    pub opacity_max: f64,
    /// Committed marker positions are snapped to this grid to skip sub-pixel writes.
    pub snap_px: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PacketConfig {
    /// Global packet bound: a spawn is refused unless the live count across all paths stays
    /// below this value afterwards, so at most `cap - 1` packets are live and `cap <= 1` never
    /// spawns.
    pub cap: usize,
    pub initial_spawn_probability: f64,
    pub spawn_probability_per_tick: f64,
    /// Initial `t` is drawn from `[0, initial_t_max)`.
    pub initial_t_max: f64,
    pub speed_min: f64,
    pub speed_max: f64,
    /// Rotation bias is drawn from `[-rotation_bias_max, rotation_bias_max)` radians.
    pub rotation_bias_max: f64,
    pub history_len: usize,
    pub hue_rate_deg_per_sec: f64,
    pub saturation: f64,
    pub lightness: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    pub enabled: bool,
    pub count: usize,
    pub speed_min: f64,
    pub speed_max: f64,
    pub radius_min: f64,
    pub radius_max: f64,
    pub hue_min: f64,
    pub hue_span: f64,
    /// Multiplicative velocity decay applied once per tick.
    pub friction: f64,
    /// Width of the uniform random acceleration band, px/s² (centered on zero).
    pub wander: f64,
    pub wrap_margin_px: f64,
    pub hue_rate_deg_per_sec: f64,
    /// Alpha of the black fill laid over the spark canvas every tick.
    pub fade_alpha: f64,
    pub saturation: f64,
    pub lightness: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    /// Upper bound on a single tick's delta time, in seconds.
    pub max_dt_secs: f64,
    /// Write to the visual surface on alternating ticks only.
    pub alternate_commits: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let anchors = [
            ("#hero", "#education .glass"),
            ("#hero", "#skills-top"),
            ("#skills-top", "#skills-lang"),
            ("#skills-top", "#skills-web"),
            ("#skills-top", "#skills-ds"),
            ("#skills-top", "#skills-bi"),
            ("#skills-top", "#skills-cloud"),
            ("#skills-top", "#skills-devops"),
            ("#skills", "#education .glass"),
            ("#skills", "#projects"),
        ]
        .into_iter()
        .map(|(a, b)| [a.to_owned(), b.to_owned()])
        .collect();

        Self {
            seed: 0x6e65_6f6e,
            anchors,
            path: PathConfig::default(),
            markers: MarkerConfig::default(),
            packets: PacketConfig::default(),
            sparks: SparkConfig::default(),
            stepper: StepperConfig::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            curvature: 0.24,
            horizontal_threshold_px: 60.0,
            lut_samples: 120,
            opacity: 0.55,
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            per_path: 1,
            speed_min: 0.05,
            speed_max: 0.15,
            radius_min: 2.2,
            radius_max: 4.2,
            opacity_min: 0.55,
            opacity_max: 0.9,
            snap_px: 0.5,
        }
    }
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            cap: 10,
            initial_spawn_probability: 0.20,
            spawn_probability_per_tick: 0.01,
            initial_t_max: 0.8,
            speed_min: 0.25,
            speed_max: 0.5,
            rotation_bias_max: 0.12,
            history_len: 10,
            hue_rate_deg_per_sec: 72.0,
            saturation: 0.9,
            lightness: 0.6,
        }
    }
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 24,
            speed_min: 40.0,
            speed_max: 120.0,
            radius_min: 1.6,
            radius_max: 3.2,
            hue_min: 95.0,
            hue_span: 30.0,
            friction: 0.985,
            wander: 10.0,
            wrap_margin_px: 20.0,
            hue_rate_deg_per_sec: 24.0,
            fade_alpha: 0.10,
            saturation: 0.9,
            lightness: 0.6,
        }
    }
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            max_dt_secs: 0.05,
            alternate_commits: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> NeonResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> NeonResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            NeonError::validation(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Anchor pairs with their variant indices.
    pub fn anchor_pairs(&self) -> Vec<AnchorPair> {
        self.anchors
            .iter()
            .enumerate()
            .map(|(i, [a, b])| AnchorPair::new(ElementId::new(a), ElementId::new(b), i))
            .collect()
    }

    pub fn validate(&self) -> NeonResult<()> {
        fn probability(name: &str, p: f64) -> NeonResult<()> {
            if !(0.0..=1.0).contains(&p) {
                return Err(NeonError::validation(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
            Ok(())
        }

        fn at_most(name: &str, v: usize, max: usize) -> NeonResult<()> {
            if v > max {
                return Err(NeonError::validation(format!(
                    "{name} must be <= {max}, got {v}"
                )));
            }
            Ok(())
        }

        fn span(name: &str, lo: f64, hi: f64) -> NeonResult<()> {
            if !lo.is_finite() || !hi.is_finite() || lo < 0.0 || lo > hi {
                return Err(NeonError::validation(format!(
                    "{name} range must satisfy 0 <= min <= max, got [{lo}, {hi}]"
                )));
            }
            Ok(())
        }

        for (i, [a, b]) in self.anchors.iter().enumerate() {
            if a.trim().is_empty() || b.trim().is_empty() {
                return Err(NeonError::validation(format!(
                    "anchor pair {i} has an empty element id"
                )));
            }
        }

        if self.path.lut_samples < 2 {
            return Err(NeonError::validation("path.lut_samples must be >= 2"));
        }
        at_most("path.lut_samples", self.path.lut_samples, MAX_LUT_SAMPLES)?;
        at_most("markers.per_path", self.markers.per_path, MAX_MARKERS_PER_PATH)?;
        at_most("packets.cap", self.packets.cap, MAX_PACKET_CAP)?;
        at_most("packets.history_len", self.packets.history_len, MAX_HISTORY_LEN)?;
        at_most("sparks.count", self.sparks.count, MAX_SPARKS)?;
        if !self.path.curvature.is_finite() {
            return Err(NeonError::validation("path.curvature must be finite"));
        }
        probability("path.opacity", self.path.opacity)?;

        span(
            "markers.speed",
            self.markers.speed_min,
            self.markers.speed_max,
        )?;
        span(
            "markers.radius",
            self.markers.radius_min,
            self.markers.radius_max,
        )?;
        span(
            "markers.opacity",
            self.markers.opacity_min,
            self.markers.opacity_max,
        )?;
        probability("markers.opacity_max", self.markers.opacity_max)?;

        probability(
            "packets.initial_spawn_probability",
            self.packets.initial_spawn_probability,
        )?;
        probability(
            "packets.spawn_probability_per_tick",
            self.packets.spawn_probability_per_tick,
        )?;
        probability("packets.initial_t_max", self.packets.initial_t_max)?;
        span(
            "packets.speed",
            self.packets.speed_min,
            self.packets.speed_max,
        )?;
        if self.packets.history_len == 0 {
            return Err(NeonError::validation("packets.history_len must be >= 1"));
        }
        if !self.packets.hue_rate_deg_per_sec.is_finite() {
            return Err(NeonError::validation(
                "packets.hue_rate_deg_per_sec must be finite",
            ));
        }

        span("sparks.speed", self.sparks.speed_min, self.sparks.speed_max)?;
        span(
            "sparks.radius",
            self.sparks.radius_min,
            self.sparks.radius_max,
        )?;
        probability("sparks.friction", self.sparks.friction)?;
        probability("sparks.fade_alpha", self.sparks.fade_alpha)?;
        if !self.sparks.wrap_margin_px.is_finite() || self.sparks.wrap_margin_px < 0.0 {
            return Err(NeonError::validation(
                "sparks.wrap_margin_px must be finite and >= 0",
            ));
        }

        if !(self.stepper.max_dt_secs.is_finite() && self.stepper.max_dt_secs > 0.0) {
            return Err(NeonError::validation(
                "stepper.max_dt_secs must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
