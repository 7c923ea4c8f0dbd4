use foundation::time::Millis;
use layers::raster::RasterLayer;
use layers::symbology::LineStyle;
use serde::{Deserialize, Serialize};

use crate::backend::ControlPosition;
use crate::view::{ViewState, ZoomOptions};

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidZoomRange { min_zoom: f64, max_zoom: f64 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid viewer config: {e}"),
            ConfigError::InvalidZoomRange { min_zoom, max_zoom } => {
                write!(f, "zoom range {min_zoom}..{max_zoom} is empty or not finite")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::InvalidZoomRange { .. } => None,
        }
    }
}

/// Tunables of the map/list synchronization.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub initial_view: ViewState,
    pub zoom: ZoomOptions,
    /// Fraction of the markers' bounding box added on every side when fitting.
    pub fit_padding: f64,
    /// Zoom used when flying to a single entity.
    pub focus_zoom: f64,
    pub fly_duration_s: f64,
    pub resize_debounce_ms: u64,
    /// Delay between invalidating the buffer and restoring the captured view.
    pub restore_delay_ms: u64,
    /// Delay before scrolling a card into view, to let layout settle.
    pub scroll_delay_ms: u64,
    pub max_init_attempts: u32,
    pub init_retry_ms: u64,
    pub tiles: RasterLayer,
    pub zoom_control: ControlPosition,
    pub route_style: LineStyle,
    /// Message shown in place of the map when it cannot be created.
    pub unavailable_message: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_view: ViewState::default(),
            zoom: ZoomOptions::default(),
            fit_padding: 0.1,
            focus_zoom: 15.0,
            fly_duration_s: 0.5,
            resize_debounce_ms: 150,
            restore_delay_ms: 50,
            scroll_delay_ms: 50,
            max_init_attempts: 3,
            init_retry_ms: 100,
            tiles: RasterLayer::openstreetmap(),
            zoom_control: ControlPosition::TopRight,
            route_style: LineStyle::route(),
            unavailable_message: "Failed to load map. Please try again later.".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zoom.is_valid() {
            return Err(ConfigError::InvalidZoomRange {
                min_zoom: self.zoom.min_zoom,
                max_zoom: self.zoom.max_zoom,
            });
        }
        Ok(())
    }

    pub fn with_initial_view(mut self, view: ViewState) -> Self {
        self.initial_view = view;
        self
    }

    pub fn resize_debounce(&self) -> Millis {
        Millis(self.resize_debounce_ms)
    }

    pub fn restore_delay(&self) -> Millis {
        Millis(self.restore_delay_ms)
    }

    pub fn scroll_delay(&self) -> Millis {
        Millis(self.scroll_delay_ms)
    }

    pub fn init_retry(&self) -> Millis {
        Millis(self.init_retry_ms)
    }
}
