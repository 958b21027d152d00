use serde::{Deserialize, Serialize};

/// Geographical coordinate in host order (latitude first)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Swaps into the GL surface's (longitude, latitude) order
    pub fn to_lng_lat(self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<LngLat> for LatLng {
    fn from(value: LngLat) -> Self {
        Self::new(value.lat, value.lng)
    }
}

/// Geographical coordinate in GL surface order (longitude first)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Array form `[lng, lat]`, the shape GL style options expect
    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<LatLng> for LngLat {
    fn from(value: LatLng) -> Self {
        value.to_lng_lat()
    }
}

/// Represents a point in screen, layer or projected pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn divide_by(&self, scalar: f64) -> Point {
        Point::new(self.x / scalar, self.y / scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn floor(&self) -> Point {
        Point::new(self.x.floor(), self.y.floor())
    }

    /// Rounds both axes to whole pixels (half away from zero, like `f64::round`)
    pub fn round(&self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Builds bounds from any two opposite corners
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self::new(
            LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        )
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Checks if this bounds fully contains another
    pub fn contains_bounds(&self, other: &LatLngBounds) -> bool {
        self.contains(&other.south_west) && self.contains(&other.north_east)
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Gets the span of the bounds
    pub fn span(&self) -> LatLng {
        LatLng::new(
            self.north_east.lat - self.south_west.lat,
            self.north_east.lng - self.south_west.lng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_axis_swap() {
        let surface = LatLng::new(10.0, 20.0).to_lng_lat();
        assert_eq!(surface.to_array(), [20.0, 10.0]);
        assert_eq!(LatLng::from(surface), LatLng::new(10.0, 20.0));
    }

    #[test]
    fn test_point_round() {
        assert_eq!(Point::new(-80.4, 59.5).round(), Point::new(-80.0, 60.0));
        assert_eq!(Point::new(1.49, -1.5).round(), Point::new(1.0, -2.0));
    }

    #[test]
    fn test_bounds_corners() {
        let bounds = LatLngBounds::from_corners(LatLng::new(41.0, -73.0), LatLng::new(40.0, -75.0));
        assert_eq!(bounds.north_west(), LatLng::new(41.0, -75.0));
        assert_eq!(bounds.south_east(), LatLng::new(40.0, -73.0));
        assert!(bounds.contains(&LatLng::new(40.5, -74.0)));
        assert!(!bounds.contains(&LatLng::new(42.0, -74.0)));
    }
}
