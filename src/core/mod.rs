pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod style;
pub mod viewport;

pub use config::GlLayerOptions;
pub use geo::{LatLng, LatLngBounds, LngLat, Point};
pub use map::HeadlessMap;
pub use viewport::{CanvasTransform, Viewport};
