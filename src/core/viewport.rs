use crate::{
    core::{
        constants::{MAX_LATITUDE, TILE_SIZE},
        geo::{LatLng, LatLngBounds, Point},
    },
    traits::HostProjection,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pan/zoom state of a Leaflet-style map: center, zoom, screen dimensions,
/// the pixel origin of the current layer space and the map pane offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center as of the last view reset
    center: LatLng,
    /// The current zoom level
    zoom: f64,
    /// The size of the viewport in pixels
    size: Point,
    /// Absolute pixel coordinate of layer point (0, 0)
    pixel_origin: Point,
    /// Offset of the map pane inside the container; grows while panning
    map_pane_pos: Point,
}

/// CSS-style transform applied to an element (translate, then scale)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    /// Translation in pixels
    pub translate: Point,
    /// Scale factor (1.0 = no scaling)
    pub scale: f64,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            translate: Point::default(),
            scale: 1.0,
        }
    }
}

impl CanvasTransform {
    pub fn new(translate: Point, scale: f64) -> Self {
        Self { translate, scale }
    }

    /// Create identity transform (no change)
    pub fn identity() -> Self {
        Self::default()
    }

    /// Pure scale, no translation
    pub fn scale(scale: f64) -> Self {
        Self::new(Point::default(), scale)
    }

    /// Check if this is effectively an identity transform
    pub fn is_identity(&self) -> bool {
        (self.scale - 1.0).abs() < 0.001
            && self.translate.x.abs() < 0.1
            && self.translate.y.abs() < 0.1
    }
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let mut viewport = Self {
            center,
            zoom,
            size,
            pixel_origin: Point::default(),
            map_pane_pos: Point::default(),
        };
        viewport.reset_pixel_origin();
        viewport
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn pixel_origin(&self) -> Point {
        self.pixel_origin
    }

    pub fn map_pane_pos(&self) -> Point {
        self.map_pane_pos
    }

    /// Center of the view. Derived from pixels once the pane has moved.
    pub fn center(&self) -> LatLng {
        if self.map_pane_pos == Point::default() {
            self.center
        } else {
            let center_point = self.container_point_to_layer_point(self.size.divide_by(2.0));
            self.layer_point_to_lat_lng(center_point)
        }
    }

    /// Jumps to a new center and zoom, resetting the layer space
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
        self.map_pane_pos = Point::default();
        self.reset_pixel_origin();
    }

    /// Shifts the view by a pixel offset by moving the map pane
    pub fn pan_by(&mut self, offset: Point) {
        self.map_pane_pos = self.map_pane_pos.subtract(&offset);
    }

    /// Changes the viewport size keeping the center in place
    pub fn set_size(&mut self, size: Point) {
        let shift = size
            .divide_by(2.0)
            .round()
            .subtract(&self.size.divide_by(2.0).round());
        self.size = size;
        self.map_pane_pos = self.map_pane_pos.add(&shift);
    }

    /// Gets the scale factor for a zoom level
    pub fn scale(zoom: f64) -> f64 {
        TILE_SIZE * 2_f64.powf(zoom)
    }

    /// Projects a LatLng to absolute pixel coordinates (spherical mercator)
    pub fn project(&self, lat_lng: &LatLng, zoom: f64) -> Point {
        let scale = Self::scale(zoom);
        let lat = lat_lng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        let x = (lat_lng.lng + 180.0) / 360.0;
        let y = 0.5 - (PI / 4.0 + lat / 2.0).tan().ln() / (2.0 * PI);

        Point::new(x * scale, y * scale)
    }

    /// Unprojects absolute pixel coordinates back to LatLng
    pub fn unproject(&self, point: &Point, zoom: f64) -> LatLng {
        let scale = Self::scale(zoom);

        let lng = point.x / scale * 360.0 - 180.0;
        let y = PI * (1.0 - 2.0 * point.y / scale);
        let lat = y.sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    fn reset_pixel_origin(&mut self) {
        self.pixel_origin = self
            .project(&self.center, self.zoom)
            .subtract(&self.size.divide_by(2.0))
            .add(&self.map_pane_pos)
            .round();
    }

    /// Converts LatLng to layer point (relative to pixel origin)
    pub fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng, self.zoom)
            .round()
            .subtract(&self.pixel_origin)
    }

    /// Converts layer point back to LatLng
    pub fn layer_point_to_lat_lng(&self, point: Point) -> LatLng {
        self.unproject(&point.add(&self.pixel_origin), self.zoom)
    }

    pub fn container_point_to_layer_point(&self, point: Point) -> Point {
        point.subtract(&self.map_pane_pos)
    }

    pub fn layer_point_to_container_point(&self, point: Point) -> Point {
        point.add(&self.map_pane_pos)
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let top_left = self.pixel_origin.subtract(&self.map_pane_pos);
        let nw = self.unproject(&top_left, self.zoom);
        let se = self.unproject(&top_left.add(&self.size), self.zoom);
        LatLngBounds::from_corners(nw, se)
    }
}

impl HostProjection for Viewport {
    fn center(&self) -> LatLng {
        Viewport::center(self)
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn size(&self) -> Point {
        self.size
    }

    fn map_pane_pos(&self) -> Point {
        self.map_pane_pos
    }

    fn container_point_to_layer_point(&self, point: Point) -> Point {
        Viewport::container_point_to_layer_point(self, point)
    }

    fn lat_lng_to_container_point(&self, lat_lng: LatLng) -> Point {
        self.layer_point_to_container_point(self.lat_lng_to_layer_point(&lat_lng))
    }

    fn container_point_to_lat_lng(&self, point: Point) -> LatLng {
        self.layer_point_to_lat_lng(Viewport::container_point_to_layer_point(self, point))
    }

    fn project(&self, lat_lng: LatLng, zoom: f64) -> Point {
        Viewport::project(self, &lat_lng, zoom)
    }

    fn zoom_scale(&self, to_zoom: f64, from_zoom: f64) -> f64 {
        Self::scale(to_zoom) / Self::scale(from_zoom)
    }

    fn bounds(&self) -> LatLngBounds {
        Viewport::bounds(self)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}
