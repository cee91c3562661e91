use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("No access to capture storage at {}", .0.display())]
    StorageUnavailable(PathBuf),

    /// Raised by hardware-backed devices asked to capture before the camera is opened.
    #[error("Camera not initialized")]
    NotInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Non-zero status from a native camera library call. Not produced by [`PatternCamera`].
    ///
    /// [`PatternCamera`]: super::PatternCamera
    #[error("{call}() returned error code {code}")]
    Native { call: &'static str, code: i32 },

    #[error("Invalid resolution {0:?}, expected <width>x<height>")]
    InvalidResolution(String),
}

impl DeviceError {
    /// Short stable label for the failure, suitable for response bodies and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DeviceError::StorageUnavailable(_) => "storage",
            DeviceError::NotInitialized => "not-initialized",
            DeviceError::Io(_) => "io",
            DeviceError::Image(_) => "image",
            DeviceError::Native { .. } => "native",
            DeviceError::InvalidResolution(_) => "invalid-resolution",
        }
    }
}

pub type Result<T> = std::result::Result<T, DeviceError>;
