pub mod devices;

#[cfg(feature = "web")]
pub mod web;

pub use devices::{
    CameraDevice, CaptureOrigin, DeviceError, PatternCamera, Resolution, Result,
    capture_file_name, default_resolutions,
};

#[cfg(feature = "web")]
pub use web::{AppState, CAPTURE_PATH, CaptureServer, ServerConfig, ServerError, router};
