//! # maplet-gl
//!
//! Keeps a perspective-capable GL map surface glued to a Leaflet-style host map.
//!
//! The GL surface renders into an oversized container that lives inside one of
//! the host's panes. Every pan, zoom, resize and zoom animation of the host is
//! mirrored onto that container and onto the surface camera, so both maps stay
//! in visual agreement at all times.

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod sync;
pub mod traits;

#[cfg(feature = "wasm")]
pub mod dom;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::GlLayerOptions,
    geo::{LatLng, LatLngBounds, LngLat, Point},
    map::HeadlessMap,
    viewport::{CanvasTransform, Viewport},
};

pub use crate::input::events::{HostEvent, HostEventKind, SurfaceEventKind};

pub use crate::layers::gl::{gl_layer, GlLayer};

pub use crate::sync::{
    mapper::SurfaceCamera, phase::AnimationPhase, throttle::ThrottleGate,
};

pub use crate::traits::{DomElement, GlSurface, GlSurfaceFactory, HostView};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("GL surface exposes neither `{internal}` nor `{public}`")]
    MissingPrimitive {
        internal: &'static str,
        public: &'static str,
    },

    #[error("Layer is not attached to a host view")]
    NotAttached,

    #[error("Layer is already attached to a host view")]
    AlreadyAttached,

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Style URL error: {0}")]
    StyleUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` so the engine's `log` output becomes visible.
/// Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}
