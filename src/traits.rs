//! Collaborator seams of the synchronization engine
//!
//! The engine never talks to a concrete map library. The host map, its DOM
//! elements and the GL renderer are all reached through the traits below, so
//! the same engine drives a browser page (see the `wasm` feature) or the
//! headless collaborators used in tests.

use futures::channel::oneshot;

use crate::{
    core::{
        geo::{LatLng, LatLngBounds, LngLat, Point},
        viewport::CanvasTransform,
    },
    input::events::{HostEventKind, SurfaceEventKind},
    layers::surface::SurfaceOptions,
    sync::mapper::SurfaceCamera,
    Result,
};

/// Read-only projection state of the host map
pub trait HostProjection {
    /// Current center of the host view
    fn center(&self) -> LatLng;

    /// Current (possibly fractional) zoom level
    fn zoom(&self) -> f64;

    /// Viewport size in pixels
    fn size(&self) -> Point;

    /// Offset of the map pane relative to the container
    fn map_pane_pos(&self) -> Point;

    fn container_point_to_layer_point(&self, point: Point) -> Point;

    fn lat_lng_to_container_point(&self, lat_lng: LatLng) -> Point;

    fn container_point_to_lat_lng(&self, point: Point) -> LatLng;

    /// Projects a coordinate to absolute pixel space at the given zoom
    fn project(&self, lat_lng: LatLng, zoom: f64) -> Point;

    /// Scale factor between two zoom levels
    fn zoom_scale(&self, to_zoom: f64, from_zoom: f64) -> f64;

    /// Geographical extent of the visible viewport
    fn bounds(&self) -> LatLngBounds;
}

/// Host map the GL layer is attached to
pub trait HostView: HostProjection {
    type Element: DomElement;

    /// Whether the host animates zooms with CSS transitions
    fn zoom_animation(&self) -> bool {
        true
    }

    fn has_pane(&self, name: &str) -> bool;

    /// Creates a detached element carrying the given class
    fn create_element(&mut self, class_name: &str) -> Self::Element;

    fn append_to_pane(&mut self, pane: &str, element: &Self::Element);

    fn remove_from_pane(&mut self, pane: &str, element: &Self::Element);

    /// Subscribes the layer to the given host events
    fn on(&mut self, kinds: &[HostEventKind]);

    /// Drops subscriptions made with [`HostView::on`]
    fn off(&mut self, kinds: &[HostEventKind]);

    /// Moves the host view without animation
    fn set_view(&mut self, center: LatLng, zoom: f64);
}

/// Handle to a DOM-like element. Clones refer to the same element.
pub trait DomElement: Clone {
    /// Places the element at a layer point (Leaflet's `setPosition`)
    fn set_position(&self, point: Point);

    /// Sets the CSS pixel size
    fn set_size(&self, size: Point);

    /// Applies a translate-then-scale transform (Leaflet's `setTransform`)
    fn set_transform(&self, transform: CanvasTransform);

    fn add_class(&self, class_name: &str);
}

/// Redraw entry points a GL surface may expose. Older renderers only have
/// the public names, newer ones moved them to underscored internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPrimitive {
    InternalResize,
    Resize,
    InternalUpdate,
    Update,
}

impl RenderPrimitive {
    pub fn name(self) -> &'static str {
        match self {
            RenderPrimitive::InternalResize => "_resize",
            RenderPrimitive::Resize => "resize",
            RenderPrimitive::InternalUpdate => "_update",
            RenderPrimitive::Update => "update",
        }
    }
}

impl std::fmt::Display for RenderPrimitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The overlaid GL map renderer
pub trait GlSurface {
    type Canvas: DomElement;

    /// The element the surface draws into
    fn canvas(&self) -> Self::Canvas;

    fn center(&self) -> LngLat;

    fn zoom(&self) -> f64;

    /// Writes center and zoom straight into the surface transform without
    /// scheduling an animation frame
    fn set_camera(&mut self, camera: SurfaceCamera);

    /// Moves the camera through the renderer, emitting its move events
    fn jump_to(&mut self, camera: SurfaceCamera);

    /// Size the surface transform currently renders at
    fn transform_size(&self) -> Point;

    fn supports(&self, primitive: RenderPrimitive) -> bool;

    fn invoke(&mut self, primitive: RenderPrimitive);

    /// Lifts the latitude range so the surface can follow the host past the poles
    fn unclamp_latitude(&mut self);

    fn freeze_elevation(&mut self, frozen: bool);

    /// Registers a listener that fires at most once. Dropping the receiver
    /// unregisters it.
    fn once(&mut self, kind: SurfaceEventKind) -> oneshot::Receiver<()>;

    /// Disposes the renderer
    fn remove(&mut self);
}

/// Builds GL surfaces bound to a container element
pub trait GlSurfaceFactory<E: DomElement> {
    type Surface: GlSurface;

    fn create(&mut self, options: SurfaceOptions<'_, E>) -> Result<Self::Surface>;
}

/// Trait for configurable components
pub trait Configurable {
    type Config: Clone;

    /// Get the current configuration
    fn config(&self) -> &Self::Config;

    /// Set new configuration
    fn set_config(&mut self, config: Self::Config) -> Result<()>;

    /// Validate configuration
    fn validate_config(config: &Self::Config) -> Result<()> {
        let _ = config;
        Ok(())
    }

    /// Update configuration with a partial change
    fn update_config<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut Self::Config),
    {
        let mut config = self.config().clone();
        updater(&mut config);
        Self::validate_config(&config)?;
        self.set_config(config)
    }
}
