use serde::{Deserialize, Serialize};

/// Base tile layer drawn underneath every overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterLayer {
    /// `{s}`/`{z}`/`{x}`/`{y}` URL template.
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: f64,
    pub detect_retina: bool,
}

impl RasterLayer {
    pub fn openstreetmap() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            max_zoom: 19.0,
            detect_retina: true,
        }
    }

    /// Expands the template for one tile. `{s}` is picked from `a`/`b`/`c`
    /// by tile coordinates so the same tile always hits the same subdomain.
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        const SUBDOMAINS: [&str; 3] = ["a", "b", "c"];
        let s = SUBDOMAINS[((x + y) % 3) as usize];
        self.url_template
            .replace("{s}", s)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl Default for RasterLayer {
    fn default() -> Self {
        Self::openstreetmap()
    }
}

#[cfg(test)]
mod tests {
    use super::RasterLayer;

    #[test]
    fn expands_template() {
        let osm = RasterLayer::openstreetmap();
        assert_eq!(
            osm.tile_url(13, 6977, 3173),
            "https://b.tile.openstreetmap.org/13/6977/3173.png"
        );
        assert_eq!(osm.max_zoom, 19.0);
    }
}
