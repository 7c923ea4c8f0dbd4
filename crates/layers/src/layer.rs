use crate::markers::MarkerSpec;
use crate::route::PolylineSpec;

/// Handle of something drawn on a map backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    UnknownLayer(LayerId),
    Detached,
    Backend(String),
}

impl std::fmt::Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::UnknownLayer(id) => write!(f, "unknown layer {}", id.0),
            DrawError::Detached => write!(f, "map surface is not attached"),
            DrawError::Backend(msg) => write!(f, "map backend error: {msg}"),
        }
    }
}

impl std::error::Error for DrawError {}

/// The drawing half of a map backend: overlays that can be added and removed.
pub trait OverlayCanvas {
    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<LayerId, DrawError>;
    fn add_polyline(&mut self, line: &PolylineSpec) -> Result<LayerId, DrawError>;
    fn remove_layer(&mut self, id: LayerId) -> Result<(), DrawError>;
}

/// Outcome of reconciling one derived layer against a canvas.
///
/// Failures are collected rather than returned early so that one bad draw
/// call never leaves the rest of the layer half-built.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncReport {
    pub removed: usize,
    pub added: usize,
    pub errors: Vec<DrawError>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn merge(&mut self, other: SyncReport) {
        self.removed += other.removed;
        self.added += other.added;
        self.errors.extend(other.errors);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{DrawError, LayerId, OverlayCanvas};
    use crate::markers::MarkerSpec;
    use crate::route::PolylineSpec;
    use std::collections::BTreeMap;

    /// Canvas that records what is currently drawn.
    #[derive(Debug, Default)]
    pub struct RecordingCanvas {
        pub(crate) next: u64,
        pub markers: BTreeMap<LayerId, MarkerSpec>,
        pub lines: BTreeMap<LayerId, PolylineSpec>,
        pub fail_markers: bool,
    }

    impl OverlayCanvas for RecordingCanvas {
        fn add_marker(&mut self, marker: &MarkerSpec) -> Result<LayerId, DrawError> {
            if self.fail_markers {
                return Err(DrawError::Backend("marker rejected".to_string()));
            }
            self.next += 1;
            let id = LayerId(self.next);
            self.markers.insert(id, marker.clone());
            Ok(id)
        }

        fn add_polyline(&mut self, line: &PolylineSpec) -> Result<LayerId, DrawError> {
            self.next += 1;
            let id = LayerId(self.next);
            self.lines.insert(id, line.clone());
            Ok(id)
        }

        fn remove_layer(&mut self, id: LayerId) -> Result<(), DrawError> {
            if self.markers.remove(&id).is_some() || self.lines.remove(&id).is_some() {
                Ok(())
            } else {
                Err(DrawError::UnknownLayer(id))
            }
        }
    }
}
