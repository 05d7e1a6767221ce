use std::path::PathBuf;

/// Errors surfaced by the fixture operations.
///
/// Font problems never show up here: an unusable font degrades to the bitmap
/// fallback and is reported through `FontChoice`.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("{} is {size} bytes, larger than the {limit} byte limit", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("invalid data URI: {0}")]
    InvalidDataUri(String),
}

pub type Result<T> = std::result::Result<T, FixtureError>;
