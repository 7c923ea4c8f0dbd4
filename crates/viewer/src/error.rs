use layers::DrawError;

#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// The drawable surface had zero area when the map tried to bind to it.
    SurfaceNotSized { width: f64, height: f64 },
    /// The backend refused to create its rendering context or base layers.
    Backend(DrawError),
    /// The surface was torn down; it cannot be initialized again.
    TornDown,
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::SurfaceNotSized { width, height } => {
                write!(f, "map surface has no area ({width}x{height})")
            }
            MapError::Backend(e) => write!(f, "map backend failed: {e}"),
            MapError::TornDown => write!(f, "map surface already torn down"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DrawError> for MapError {
    fn from(e: DrawError) -> Self {
        MapError::Backend(e)
    }
}

/// Error returned by a user-supplied callback. Never propagated; only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackError(pub String);

impl CallbackError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CallbackError {}
