pub mod common;

pub mod error;

pub mod pattern;

pub use common::{CameraDevice, CaptureOrigin, Resolution, capture_file_name};

pub use error::{DeviceError, Result};

pub use pattern::{PatternCamera, default_resolutions};
