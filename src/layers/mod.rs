pub mod container;
pub mod gl;
pub mod surface;

// Re-export main types
pub use container::OverlayContainer;
pub use gl::{gl_layer, GlLayer, SyncStats};
pub use surface::{SurfaceHandle, SurfaceOptions};
