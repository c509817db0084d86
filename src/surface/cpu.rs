use std::collections::BTreeMap;

use kurbo::{Cap, Circle, Join, Shape, Stroke, StrokeOpts};

use crate::foundation::core::{
    Affine, BezPath, Point, QuadBez, Rgba8, Viewport, canvas_pixel_ratio,
};
use crate::foundation::error::{NeonError, NeonResult};
use crate::foundation::math::{fade_to_black_in_place, over_premul_in_place};
use crate::surface::visual::{MarkerStyle, PacketVisual, PathVariant, VisualHandle, VisualSurface};

const PATH_STROKE_WIDTH: f64 = 2.0;
const TRAIL_STROKE_WIDTH: f64 = 2.5;
const TRAIL_OPACITY: f64 = 0.9;
const BODY_OPACITY: f64 = 0.95;
const BODY_HALF_DIAGONAL: f64 = 6.0;
const TOLERANCE: f64 = 0.1;

/// A rendered frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

#[derive(Clone, Copy, Debug)]
struct PathState {
    variant: PathVariant,
    opacity: f64,
    curve: Option<QuadBez>,
}

#[derive(Clone, Copy, Debug)]
struct MarkerState {
    style: MarkerStyle,
    center: Option<Point>,
}

#[derive(Clone, Debug)]
struct TrailState {
    points: Vec<Point>,
    color: Rgba8,
}

#[derive(Clone, Copy, Debug)]
struct BodyState {
    fill: Rgba8,
    transform: Option<(Point, f64)>,
}

#[derive(Clone, Copy, Debug)]
struct Disc {
    center: Point,
    radius: f64,
    color: Rgba8,
}

/// CPU raster surface powered by `vello_cpu`.
///
/// The spark canvas is a persistent premultiplied layer: fades darken it in place and discs are
/// composited onto it, so motion trails build up across ticks. Everything else is retained as
/// vector state and rasterized by [`CpuSurface::render_frame`].
pub struct CpuSurface {
    viewport: Viewport,
    device_pixel_ratio: f64,
    width: u16,
    height: u16,
    background: Rgba8,
    sparks: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    pending_discs: Vec<Disc>,
    next_handle: u32,
    paths: BTreeMap<VisualHandle, PathState>,
    markers: BTreeMap<VisualHandle, MarkerState>,
    trails: BTreeMap<VisualHandle, TrailState>,
    bodies: BTreeMap<VisualHandle, BodyState>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("viewport", &self.viewport)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("paths", &self.paths.len())
            .field("markers", &self.markers.len())
            .field("packets", &self.bodies.len())
            .finish()
    }
}

impl CpuSurface {
    /// Page background behind every layer.
    pub const BACKGROUND: Rgba8 = Rgba8::opaque(0x02, 0x01, 0x0a);

    pub fn new(viewport: Viewport, device_pixel_ratio: f64) -> NeonResult<Self> {
        let (width, height) = pixel_size(viewport, device_pixel_ratio)?;
        Ok(Self {
            viewport,
            device_pixel_ratio,
            width,
            height,
            background: Self::BACKGROUND,
            sparks: vello_cpu::Pixmap::new(width, height),
            scratch: vello_cpu::Pixmap::new(width, height),
            pending_discs: Vec::new(),
            next_handle: 0,
            paths: BTreeMap::new(),
            markers: BTreeMap::new(),
            trails: BTreeMap::new(),
            bodies: BTreeMap::new(),
        })
    }

    pub fn with_background(mut self, background: Rgba8) -> Self {
        self.background = background;
        self
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Backing size in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    /// The spark layer alone, premultiplied RGBA8.
    pub fn spark_layer(&mut self) -> &[u8] {
        self.flush_discs();
        self.sparks.data_as_u8_slice()
    }

    fn issue(&mut self) -> VisualHandle {
        let h = VisualHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        h
    }

    fn scale(&self) -> Affine {
        Affine::scale(f64::from(canvas_pixel_ratio(self.device_pixel_ratio)))
    }

    fn new_ctx(&self) -> vello_cpu::RenderContext {
        vello_cpu::RenderContext::new(self.width, self.height)
    }

    fn flush_discs(&mut self) {
        if self.pending_discs.is_empty() {
            return;
        }
        let mut ctx = self.new_ctx();
        ctx.set_transform(affine_to_cpu(self.scale()));
        for d in self.pending_discs.drain(..) {
            set_color(&mut ctx, d.color);
            let circle = Circle::new(d.center, d.radius);
            ctx.fill_path(&bezpath_to_cpu(&circle.to_path(TOLERANCE)));
        }
        ctx.flush();
        self.scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.scratch);
        over_premul_in_place(
            self.sparks.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
        );
    }

    /// Compose background, spark layer, connectors, markers and packets into one frame.
    #[tracing::instrument(skip_all, fields(width = self.width, height = self.height))]
    pub fn render_frame(&mut self) -> NeonResult<FrameRGBA> {
        self.flush_discs();

        let px = self.background.to_premul();
        let mut data = Vec::with_capacity(usize::from(self.width) * usize::from(self.height) * 4);
        for _ in 0..usize::from(self.width) * usize::from(self.height) {
            data.extend_from_slice(&px);
        }
        over_premul_in_place(&mut data, self.sparks.data_as_u8_slice());

        let mut ctx = self.new_ctx();
        let scale = self.scale();
        self.draw_vectors(&mut ctx, scale);
        ctx.flush();
        self.scratch.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut self.scratch);
        over_premul_in_place(&mut data, self.scratch.data_as_u8_slice());

        if data.len() != usize::from(self.width) * usize::from(self.height) * 4 {
            return Err(NeonError::render("frame buffer size mismatch"));
        }
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
            premultiplied: true,
        })
    }

    fn draw_vectors(&self, ctx: &mut vello_cpu::RenderContext, scale: Affine) {
        ctx.set_transform(affine_to_cpu(scale));

        let path_stroke = Stroke::new(PATH_STROKE_WIDTH)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        for p in self.paths.values() {
            let Some(curve) = p.curve else {
                continue;
            };
            let mut bez = BezPath::new();
            bez.move_to(curve.p0);
            bez.quad_to(curve.p1, curve.p2);
            let outline = kurbo::stroke(bez, &path_stroke, &StrokeOpts::default(), TOLERANCE);
            set_color(ctx, p.variant.stroke().with_opacity(p.opacity));
            ctx.fill_path(&bezpath_to_cpu(&outline));
        }

        for m in self.markers.values() {
            let Some(center) = m.center else {
                continue;
            };
            set_color(ctx, m.style.variant.stroke().with_opacity(m.style.opacity));
            let circle = Circle::new(center, m.style.radius);
            ctx.fill_path(&bezpath_to_cpu(&circle.to_path(TOLERANCE)));
        }

        let trail_stroke = Stroke::new(TRAIL_STROKE_WIDTH)
            .with_caps(Cap::Round)
            .with_join(Join::Round);
        for t in self.trails.values() {
            let Some((first, rest)) = t.points.split_first() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let mut line = BezPath::new();
            line.move_to(*first);
            for p in rest {
                line.line_to(*p);
            }
            let outline = kurbo::stroke(line, &trail_stroke, &StrokeOpts::default(), TOLERANCE);
            set_color(ctx, t.color.with_opacity(TRAIL_OPACITY));
            ctx.fill_path(&bezpath_to_cpu(&outline));
        }

        for b in self.bodies.values() {
            let Some((center, rotation_deg)) = b.transform else {
                continue;
            };
            let tr = scale
                * Affine::translate(center.to_vec2())
                * Affine::rotate(rotation_deg.to_radians());
            ctx.set_transform(affine_to_cpu(tr));
            set_color(ctx, b.fill.with_opacity(BODY_OPACITY));
            ctx.fill_path(&bezpath_to_cpu(&diamond()));
        }
        ctx.set_transform(affine_to_cpu(scale));
    }
}

impl VisualSurface for CpuSurface {
    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn register_path(&mut self, variant: PathVariant, opacity: f64) -> VisualHandle {
        let h = self.issue();
        self.paths.insert(
            h,
            PathState {
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
        }
    }

    fn register_marker(&mut self, style: MarkerStyle) -> VisualHandle {
        let h = self.issue();
        self.markers.insert(
            h,
            MarkerState {
                style,
                center: None,
            },
        );
        h
    }

    fn move_marker(&mut self, marker: VisualHandle, center: Point) {
        if let Some(m) = self.markers.get_mut(&marker) {
            m.center = Some(center);
        }
    }

    fn register_packet(&mut self, color: Rgba8) -> PacketVisual {
        let trail = self.issue();
        let body = self.issue();
        self.trails.insert(
            trail,
            TrailState {
                points: Vec::new(),
                color,
            },
        );
        self.bodies.insert(
            body,
            BodyState {
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
        }
    }

    fn set_trail_color(&mut self, trail: VisualHandle, color: Rgba8) {
        if let Some(t) = self.trails.get_mut(&trail) {
            t.color = color;
        }
    }

    fn set_body_transform(&mut self, body: VisualHandle, center: Point, rotation_deg: f64) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.transform = Some((center, rotation_deg));
        }
    }

    fn resize_canvas(&mut self, viewport: Viewport) {
        match pixel_size(viewport, self.device_pixel_ratio) {
            Ok((width, height)) => {
                self.viewport = viewport;
                self.width = width;
                self.height = height;
                self.sparks = vello_cpu::Pixmap::new(width, height);
                self.scratch = vello_cpu::Pixmap::new(width, height);
                self.pending_discs.clear();
            }
            Err(e) => tracing::debug!(error = %e, "canvas resize ignored"),
        }
    }

    fn fade_canvas(&mut self, alpha: f64) {
        self.flush_discs();
        fade_to_black_in_place(self.sparks.data_as_u8_slice_mut(), alpha);
    }

    fn fill_disc(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.pending_discs.push(Disc {
            center,
            radius,
            color,
        });
    }
}

fn pixel_size(viewport: Viewport, device_pixel_ratio: f64) -> NeonResult<(u16, u16)> {
    let (w, h) = viewport.backing_size(device_pixel_ratio);
    let w = u16::try_from(w)
        .map_err(|_| NeonError::render(format!("canvas width {w} exceeds u16")))?;
    let h = u16::try_from(h)
        .map_err(|_| NeonError::render(format!("canvas height {h} exceeds u16")))?;
    if w == 0 || h == 0 {
        return Err(NeonError::render("canvas must be non-empty"));
    }
    Ok((w, h))
}

/// Packet body outline: `0,-6 6,0 0,6 -6,0`.
fn diamond() -> BezPath {
    let r = BODY_HALF_DIAGONAL;
    let mut p = BezPath::new();
    p.move_to((0.0, -r));
    p.line_to((r, 0.0));
    p.line_to((0.0, r));
    p.line_to((-r, 0.0));
    p.close_path();
    p
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Write a frame as PNG, unpremultiplying first when needed.
pub fn save_png(frame: &FrameRGBA, path: impl AsRef<std::path::Path>) -> NeonResult<()> {
    let path = path.as_ref();
    let data = if frame.premultiplied {
        unpremultiply(&frame.data)
    } else {
        frame.data.clone()
    };
    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| NeonError::render(format!("write png '{}': {e}", path.display())))
}

fn unpremultiply(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/cpu.rs"]
mod tests;
