use crate::foundation::core::{Point, QuadBez, Rgba8, Viewport};

/// Opaque id of one drawable registered with a [`VisualSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct VisualHandle(pub u32);

/// The two drawables backing one packet: its trail polyline and its diamond body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketVisual {
    pub trail: VisualHandle,
    pub body: VisualHandle,
}

/// Alternating look of connector paths and their markers (odd variant indices use `Alt`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PathVariant {
    Primary,
    Alt,
}

impl PathVariant {
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 1 { Self::Alt } else { Self::Primary }
    }

    pub fn stroke(self) -> Rgba8 {
        match self {
            Self::Primary => Rgba8::opaque(0x00, 0xe5, 0xff),
            Self::Alt => Rgba8::opaque(0xff, 0x2b, 0xd6),
        }
    }
}

/// Per-marker look, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    pub radius: f64,
    pub opacity: f64,
    pub variant: PathVariant,
}

/// Write-only sink for everything the engine draws.
///
/// The engine registers drawables once and then only pushes changed values. Implementations
/// must tolerate writes to handles they never issued by ignoring them.
pub trait VisualSurface {
    fn set_viewport(&mut self, viewport: Viewport);

    fn register_path(&mut self, variant: PathVariant, opacity: f64) -> VisualHandle;
    fn set_path_curve(&mut self, path: VisualHandle, curve: QuadBez);

    fn register_marker(&mut self, style: MarkerStyle) -> VisualHandle;
    fn move_marker(&mut self, marker: VisualHandle, center: Point);

    /// Register a packet; `color` seeds both the trail stroke and the body fill.
    fn register_packet(&mut self, color: Rgba8) -> PacketVisual;
    fn set_trail_points(&mut self, trail: VisualHandle, points: &[Point]);
    fn set_trail_color(&mut self, trail: VisualHandle, color: Rgba8);
    fn set_body_transform(&mut self, body: VisualHandle, center: Point, rotation_deg: f64);

    /// Size (and clear) the spark canvas.
    fn resize_canvas(&mut self, viewport: Viewport);
    /// Lay a translucent black fill over the whole spark canvas.
    fn fade_canvas(&mut self, alpha: f64);
    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba8);
}
