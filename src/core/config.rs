//! Options accepted by the GL layer
//!
//! Field names follow the host library's option names when (de)serialized, so
//! a JSON options object written for the JavaScript plugin loads unchanged.
//! Anything not recognised here lands in [`GlLayerOptions::extra`] and is
//! handed to the GL surface untouched.

use serde::{Deserialize, Serialize};

use crate::{
    core::constants::{
        BASE_ATTRIBUTION, DEFAULT_PADDING, DEFAULT_PANE, DEFAULT_UPDATE_INTERVAL_MS,
    },
    MapError, Result,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlLayerOptions {
    /// Style URL (or any string the surface understands as a style)
    pub style: String,
    /// Explicit API key; wins over a key embedded in the style URL
    pub api_key: Option<String>,
    /// How much to extend the overlay beyond the view, relative to the view size
    pub padding: f64,
    /// Minimum milliseconds between two pan-driven updates
    #[serde(rename = "updateInterval")]
    pub update_interval_ms: u64,
    /// Whether the overlay canvas receives pointer events
    pub interactive: bool,
    /// Host pane the overlay container is inserted into
    pub pane: String,
    /// Extra class added to the GL canvas
    pub class_name: Option<String>,
    /// Attribution appended after the basemap attribution
    pub attribution: Option<String>,
    /// Let the surface locate the user and push the result back to the host
    pub geolocate: bool,
    /// Surface options this layer does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for GlLayerOptions {
    fn default() -> Self {
        Self {
            style: String::new(),
            api_key: None,
            padding: DEFAULT_PADDING,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            interactive: false,
            pane: DEFAULT_PANE.to_string(),
            class_name: None,
            attribution: None,
            geolocate: false,
            extra: serde_json::Map::new(),
        }
    }
}

impl GlLayerOptions {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            ..Self::default()
        }
    }

    /// Parses options from a JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_update_interval(mut self, interval_ms: u64) -> Self {
        self.update_interval_ms = interval_ms;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_pane(mut self, pane: impl Into<String>) -> Self {
        self.pane = pane.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }

    pub fn with_geolocate(mut self, geolocate: bool) -> Self {
        self.geolocate = geolocate;
        self
    }

    /// Adds a raw option forwarded to the GL surface
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn update_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.update_interval_ms)
    }

    /// Basemap attribution followed by the user supplied one, if any
    pub fn attribution_html(&self) -> String {
        match self.attribution.as_deref() {
            Some(extra) if !extra.is_empty() => format!("{BASE_ATTRIBUTION} {extra}"),
            _ => BASE_ATTRIBUTION.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(MapError::InvalidConfig(format!(
                "padding must be a finite, non-negative fraction (got {})",
                self.padding
            )));
        }
        if self.update_interval_ms == 0 {
            return Err(MapError::InvalidConfig(
                "updateInterval must be at least 1 ms".to_string(),
            ));
        }
        if self.pane.is_empty() {
            return Err(MapError::InvalidConfig("pane name is empty".to_string()));
        }
        Ok(())
    }
}
