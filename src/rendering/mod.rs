pub mod headless;

// Re-export main types
pub use headless::{HeadlessElement, HeadlessSurface, HeadlessSurfaceFactory};
