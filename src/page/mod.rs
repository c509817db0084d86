//! Small stateful helpers for the rest of the page: greeting, hero tilt, header, collapsible
//! panel, scroll-spy, glow pulses and the 3D backdrop's camera math. They compute what the
//! host should write; they never touch a document themselves.

mod backdrop;
mod chrome;
mod glow;
mod scroll_spy;

pub use backdrop::{BackdropRig, CameraPose, Vec3};
pub use chrome::{Collapsible, HeaderState, Key, Tilt, greeting, hover_tilt};
pub use glow::GlowPulse;
pub use scroll_spy::ScrollSpy;
