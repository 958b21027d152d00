//! Prelude module for common maplet-gl types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_gl::prelude::*;`

pub use crate::core::{
    config::GlLayerOptions,
    geo::{LatLng, LatLngBounds, LngLat, Point},
    map::HeadlessMap,
    style::{resolve_style, ResolvedStyle},
    viewport::{CanvasTransform, Viewport},
};

pub use crate::layers::{
    container::OverlayContainer,
    gl::{gl_layer, GlLayer, SyncStats},
    surface::{SurfaceHandle, SurfaceOptions},
};

pub use crate::input::events::{HostEvent, HostEventKind, SurfaceEventKind};

pub use crate::sync::{
    mapper::{SurfaceCamera, SyncGeometry},
    phase::{AnimationPhase, PhaseController, SyncAction},
    throttle::ThrottleGate,
};

pub use crate::rendering::headless::{HeadlessElement, HeadlessSurface, HeadlessSurfaceFactory};

pub use crate::traits::{
    Configurable, DomElement, GlSurface, GlSurfaceFactory, HostProjection, HostView,
    RenderPrimitive,
};

pub use crate::{Error as MapError, Result};

pub use instant::{Duration, Instant};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
