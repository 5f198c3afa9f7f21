use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestImageError {
    #[error("test directory does not exist: {}", .0.display())]
    MissingTestDir(PathBuf),
    #[error("image file does not exist: {}", .0.display())]
    Missing(PathBuf),
    #[error("image file is too small ({size} bytes)")]
    TooSmall { size: u64 },
    #[error("image has unexpected dimensions ({width}, {height})")]
    Dimensions { width: u32, height: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}
