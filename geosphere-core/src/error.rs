/// Error types shared by the rendering pipeline and its hosts
use std::path::PathBuf;

/// Geometry that cannot be turned into a well-formed sphere mesh
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Anything that can stop a frame from being produced or presented
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
