//! Core constants derived from Leaflet defaults and the GL surface conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Fraction of the host viewport rendered beyond each edge of the view.
pub const DEFAULT_PADDING: f64 = 0.1;

/// Minimum spacing between two throttled pan updates.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 32;

/// GL surfaces number zoom levels for 512 px tiles, hosts for 256 px tiles,
/// so the surface always sits exactly one level below the host.
pub const ZOOM_CONVENTION_OFFSET: f64 = 1.0;

/// Pane used when the configured one does not exist on the host.
pub const DEFAULT_PANE: &str = "tilePane";

/// Class given to the element hosting the GL canvas.
pub const CONTAINER_CLASS: &str = "leaflet-gl-layer";

/// Classes that make the host treat the GL canvas like an image overlay.
pub const CANVAS_CLASSES: [&str; 2] = ["leaflet-image-layer", "leaflet-zoom-animated"];

/// Added to the canvas when the overlay should receive pointer events.
pub const INTERACTIVE_CLASS: &str = "leaflet-interactive";

/// Styles under this prefix may carry their API key as a `key` query parameter.
pub const KEYED_STYLE_PREFIX: &str = "https://api.maptiler.com/maps/";

/// Query parameter holding the API key in keyed style URLs.
pub const STYLE_KEY_PARAM: &str = "key";

/// Attribution always shown for the GL basemap.
pub const BASE_ATTRIBUTION: &str = "<a href=\"https://www.maptiler.com/copyright/\" target=\"_blank\">&copy; MapTiler</a> <a href=\"https://www.openstreetmap.org/copyright\" target=\"_blank\">&copy; OpenStreetMap contributors</a>";

/// Spherical mercator latitude limit.
pub const MAX_LATITUDE: f64 = 85.0511287798;
