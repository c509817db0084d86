use crate::foundation::error::{NeonError, NeonResult};

pub use kurbo::{Affine, BezPath, Point, QuadBez, Rect, Vec2};

/// Visible area of the host page in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> NeonResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(NeonError::validation(
                "viewport dimensions must be finite and non-negative",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn aspect(self) -> f64 {
        if self.height <= 0.0 {
            return 1.0;
        }
        self.width / self.height
    }

    /// Backing-store size for a canvas covering the viewport at the given device pixel ratio.
    ///
    /// Fractional ratios are floored and the ratio never drops below 1.
    pub fn backing_size(self, device_pixel_ratio: f64) -> (u32, u32) {
        let dpr = f64::from(canvas_pixel_ratio(device_pixel_ratio));
        (
            (self.width * dpr).round().max(0.0) as u32,
            (self.height * dpr).round().max(0.0) as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Integer pixel ratio used for 2D canvases: `max(1, floor(dpr))`.
pub fn canvas_pixel_ratio(device_pixel_ratio: f64) -> u32 {
    if !device_pixel_ratio.is_finite() {
        return 1;
    }
    (device_pixel_ratio.floor() as u32).max(1)
}

/// Straight (non-premultiplied) RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// `#rrggbb`, alpha ignored.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    let w = h.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.
    if w >= 360.0 { 0.0 } else { w }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
