//! View synchronization internals: coordinate mapping, rate limiting and the
//! animation phase state machine. [`crate::layers::gl::GlLayer`] wires them to
//! the host and the GL surface.

pub mod mapper;
pub mod phase;
pub mod throttle;

pub use mapper::{SurfaceCamera, SyncGeometry};
pub use phase::{AnimationPhase, PhaseController, SyncAction};
pub use throttle::ThrottleGate;
