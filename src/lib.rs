//! Neonwire animates neon connectors between page elements: curved paths with riding markers,
//! color-cycling packets with bounded trails, and a field of free-flying sparks.
//!
//! The engine is headless. A host feeds it:
//!
//! - page geometry through a [`LayoutSource`]
//! - time through [`ConnectorEngine::frame`] (or a [`FrameClock`])
//! - page events through [`HostEvents`]
//!
//! and it writes drawables to a [`VisualSurface`]: [`RecordingSurface`] for tests and stats,
//! [`CpuSurface`] to rasterize frames.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod config;
pub(crate) mod connector;
pub(crate) mod engine;
pub(crate) mod host;
pub(crate) mod layout;
/// Page chrome helpers outside the connector animation.
pub mod page;
pub(crate) mod particles;
pub(crate) mod surface;

pub use crate::foundation::color::hsl_to_rgba8;
pub use crate::foundation::core::{
    Affine, BezPath, Point, QuadBez, Rect, Rgba8, Vec2, Viewport, canvas_pixel_ratio,
    normalize_hue,
};
pub use crate::foundation::error::{NeonError, NeonResult};
pub use crate::foundation::rng::Rng64;

pub use crate::config::{
    EngineConfig, MarkerConfig, PacketConfig, PathConfig, SparkConfig, StepperConfig,
};
pub use crate::connector::path::{ConnectorPath, PathGeometry, control_point};
pub use crate::connector::pool::{EntityPool, Lane, Marker, Packet};
pub use crate::connector::state::Simulation;
pub use crate::connector::stepper::{FrameStepper, TickOutcome};
pub use crate::engine::{ConnectorEngine, EngineStats};
pub use crate::host::clock::{FrameClock, ManualClock, SystemClock};
pub use crate::host::events::{EventKind, HostEvent, HostEvents, Subscription};
pub use crate::layout::resolver::{AnchorPair, ElementId, LayoutResolver, LayoutSource};
pub use crate::layout::static_layout::{ElementBox, StaticLayout};
pub use crate::particles::field::{ParticleField, Spark};
pub use crate::surface::cpu::{CpuSurface, FrameRGBA, save_png};
pub use crate::surface::recording::{
    RecordedBody, RecordedDisc, RecordedMarker, RecordedPath, RecordedTrail, RecordingSurface,
};
pub use crate::surface::visual::{
    MarkerStyle, PacketVisual, PathVariant, VisualHandle, VisualSurface,
};
