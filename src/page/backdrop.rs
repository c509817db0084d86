use crate::foundation::core::{Point, Vec2, Viewport};

/// 3D position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

/// Camera drift, pointer parallax and grid pulse of the neon-grid background.
#[derive(Clone, Copy, Debug)]
pub struct BackdropRig {
    mouse: Vec2,
    viewport: Viewport,
}

impl BackdropRig {
    pub const FOV_DEG: f64 = 55.0;
    pub const NEAR: f64 = 0.1;
    pub const FAR: f64 = 1000.0;
    pub const MAX_PIXEL_RATIO: f64 = 1.5;
    pub const LOOK_AT: Vec3 = Vec3::new(0.0, -1.0, 0.0);

    pub fn new(viewport: Viewport) -> Self {
        Self {
            mouse: Vec2::ZERO,
            viewport,
        }
    }

    /// Pointer in `[-1, 1]` on both axes.
    pub fn mouse(&self) -> Vec2 {
        self.mouse
    }

    pub fn on_pointer_move(&mut self, client: Point) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.mouse = Vec2::new(client.x / w * 2.0 - 1.0, client.y / h * 2.0 - 1.0);
    }

    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn aspect(&self) -> f64 {
        self.viewport.aspect()
    }

    /// Camera at `t` seconds since start.
    pub fn camera(&self, t: f64) -> CameraPose {
        CameraPose {
            position: Vec3::new(
                (t * 0.2).sin() * 0.6 + self.mouse.x * 0.4,
                4.0,
                10.0 + (t * 0.1).cos() * 0.4 + self.mouse.y * 0.3,
            ),
            look_at: Self::LOOK_AT,
        }
    }

    pub fn grid_opacity(t: f64) -> f64 {
        0.22 + (t * 2.0).sin() * 0.03
    }

    /// Renderer pixel ratio: the device ratio, capped.
    pub fn pixel_ratio(device_pixel_ratio: f64) -> f64 {
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return 1.0;
        }
        device_pixel_ratio.min(Self::MAX_PIXEL_RATIO)
    }
}
