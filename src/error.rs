//! Asset loading errors.
//!
//! Only decoding of external assets (height images, vegetation models,
//! config files) can fail. Sampling and placement degrade gracefully and
//! never produce an error.

use std::path::PathBuf;

/// Errors that can occur while loading terrain or vegetation assets.
#[derive(Debug)]
pub enum LoadError {
    /// The image could not be opened or decoded
    Image(image::ImageError),
    /// The image decoded but has no pixels
    EmptyImage { path: PathBuf },
    /// IO error (file not found, permissions, etc.)
    Io(std::io::Error),
    /// The model file is malformed or contains no triangles
    Model(String),
    /// The configuration file could not be parsed
    Config(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Image(e) => write!(f, "Image decode error: {}", e),
            LoadError::EmptyImage { path } => {
                write!(f, "Height map is empty: {}", path.display())
            }
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Model(e) => write!(f, "Model error: {}", e),
            LoadError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Image(e) => Some(e),
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        LoadError::Image(e)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_path() {
        let err = LoadError::EmptyImage { path: PathBuf::from("maps/empty.png") };
        assert!(err.to_string().contains("maps/empty.png"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LoadError = io.into();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
