use thiserror::Error;

/// Failures that prevent the scene from starting. None of them are retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("rendering surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("invalid scene config: {0}")]
    InvalidConfig(String),
}

impl SceneError {
    /// Short machine-readable kind sent to the host page.
    pub fn kind(&self) -> &'static str {
        match self {
            SceneError::SurfaceUnavailable(_) => "surface_unavailable",
            SceneError::InvalidViewport { .. } => "invalid_viewport",
            SceneError::UnsupportedFeature(_) => "unsupported_feature",
            SceneError::InvalidConfig(_) => "invalid_config",
        }
    }
}
