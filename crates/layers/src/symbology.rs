use serde::{Deserialize, Serialize};

/// Stroke style for line overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    /// CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f32,
    pub opacity: f32,
    /// Dash pattern in pixels, e.g. `"10, 10"`. `None` draws a solid line.
    pub dash_array: Option<String>,
}

impl LineStyle {
    pub fn solid(color: impl Into<String>, weight: f32) -> Self {
        Self {
            color: color.into(),
            weight,
            opacity: 1.0,
            dash_array: None,
        }
    }

    /// Dashed blue line used for itineraries.
    pub fn route() -> Self {
        Self {
            color: "#3b82f6".to_string(),
            weight: 4.0,
            opacity: 0.8,
            dash_array: Some("10, 10".to_string()),
        }
    }

    pub fn is_dashed(&self) -> bool {
        self.dash_array.as_deref().is_some_and(|d| !d.trim().is_empty())
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::route()
    }
}

/// Pin icon geometry, in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub icon_size: [u32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_size: [u32; 2],
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            icon_size: [25, 41],
            icon_anchor: [12, 41],
            popup_anchor: [1, -34],
            shadow_size: [41, 41],
        }
    }
}
