//! Coordinate mapping between the host view and the GL surface
//!
//! Pure functions only. The host numbers zoom levels one higher than the GL
//! surface and orders coordinates latitude first, the surface longitude first.

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        constants::ZOOM_CONVENTION_OFFSET,
        geo::{LatLng, LatLngBounds, LngLat, Point},
        viewport::CanvasTransform,
    },
    traits::HostProjection,
};

/// Camera of the GL surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceCamera {
    pub center: LngLat,
    pub zoom: f64,
}

impl SurfaceCamera {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

/// Size of the padded overlay: `host_size * (1 + 2 * padding)`
pub fn surface_size(host_size: Point, padding: f64) -> Point {
    host_size.multiply(1.0 + padding * 2.0)
}

/// Pixels the overlay extends past each edge of the viewport
pub fn padding_offset(host_size: Point, padding: f64) -> Point {
    host_size.multiply(padding)
}

/// Layer-space position of the overlay's top-left corner, snapped to whole
/// pixels so the composited canvas stays sharp
pub fn top_left(origin_offset: Point, host_size: Point, padding: f64) -> Point {
    origin_offset
        .subtract(&padding_offset(host_size, padding))
        .round()
}

/// Host center/zoom expressed as a surface camera
pub fn host_to_surface(center: LatLng, zoom: f64) -> SurfaceCamera {
    SurfaceCamera::new(center.to_lng_lat(), zoom - ZOOM_CONVENTION_OFFSET)
}

/// Inverse of [`host_to_surface`]
pub fn surface_to_host(camera: SurfaceCamera) -> (LatLng, f64) {
    (camera.center.into(), camera.zoom + ZOOM_CONVENTION_OFFSET)
}

/// Everything a synchronization pass applies, computed from one host snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncGeometry {
    /// Host layer point under container point (0, 0)
    pub origin_offset: Point,
    /// Overlay size in pixels
    pub size: Point,
    /// Overlay top-left in layer pixels
    pub top_left: Point,
    /// Surface camera matching the host view
    pub camera: SurfaceCamera,
}

impl SyncGeometry {
    pub fn compute<P: HostProjection + ?Sized>(host: &P, padding: f64) -> Self {
        let host_size = host.size();
        let origin_offset = host.container_point_to_layer_point(Point::default());

        Self {
            origin_offset,
            size: surface_size(host_size, padding),
            top_left: top_left(origin_offset, host_size, padding),
            camera: host_to_surface(host.center(), host.zoom()),
        }
    }
}

/// Geographical extent of the whole padded overlay
pub fn visible_bounds<P: HostProjection + ?Sized>(host: &P, padding: f64) -> LatLngBounds {
    let half_size = surface_size(host.size(), padding).divide_by(2.0);
    let center = host.lat_lng_to_container_point(host.center());

    LatLngBounds::from_corners(
        host.container_point_to_lat_lng(center.subtract(&half_size)),
        host.container_point_to_lat_lng(center.add(&half_size)),
    )
}

/// Counter-transform for the canvas while the host runs a CSS zoom towards
/// `target_center`/`target_zoom`. `recorded_offset` is the host layer offset
/// captured by the last synchronization pass.
pub fn zoom_anim_transform<P: HostProjection + ?Sized>(
    host: &P,
    target_center: LatLng,
    target_zoom: f64,
    padding: f64,
    recorded_offset: Point,
) -> CanvasTransform {
    let scale = host.zoom_scale(target_zoom, host.zoom());
    let scaled_padding = host.size().multiply(padding * scale);
    let view_half = surface_size(host.size(), padding).divide_by(2.0);

    let top_left = host
        .project(target_center, target_zoom)
        .subtract(&view_half)
        .add(&host.map_pane_pos().add(&scaled_padding))
        .round();
    let offset = host
        .project(host.bounds().north_west(), target_zoom)
        .subtract(&top_left);

    CanvasTransform::new(offset.subtract(&recorded_offset), scale)
}

/// Transform that undoes a finished CSS zoom: the canvas sits at the host's
/// north-west corner again, unscaled
pub fn transition_reset_transform<P: HostProjection + ?Sized>(host: &P) -> CanvasTransform {
    let offset = host.lat_lng_to_container_point(host.bounds().north_west());
    CanvasTransform::new(offset, 1.0)
}

/// Scale correction applied when a zoom ends; clears any translation
pub fn zoom_end_transform<P: HostProjection + ?Sized>(host: &P) -> CanvasTransform {
    CanvasTransform::scale(host.zoom_scale(host.zoom(), host.zoom()))
}
