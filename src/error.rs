use thiserror::Error;

/// Library error type for degradation and crop operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Image too small for the requested crop, or degenerate after an
    /// extreme downscale.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Configuration value outside its documented range.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Encode/decode failure from the underlying codec.
    #[error(transparent)]
    Codec(#[from] image::ImageError),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
