use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use super::common::{CameraDevice, CaptureOrigin, Resolution, capture_file_name};
use super::error::{DeviceError, Result};

const BAR_COLOURS: [[u8; 3]; 7] = [
    [192, 192, 192],
    [192, 192, 0],
    [0, 192, 192],
    [0, 192, 0],
    [192, 0, 192],
    [192, 0, 0],
    [0, 0, 192],
];

pub fn default_resolutions() -> Vec<Resolution> {
    [(1920, 1080), (1280, 720), (640, 480)]
        .into_iter()
        .filter_map(|(w, h)| Resolution::new(w, h))
        .collect()
}

/// Software camera that writes colour-bar frames to a directory.
pub struct PatternCamera {
    output_dir: PathBuf,
    resolutions: Vec<Resolution>,
}

impl PatternCamera {
    /// An empty `resolutions` list falls back to [`default_resolutions`].
    pub fn new(output_dir: impl Into<PathBuf>, resolutions: Vec<Resolution>) -> Self {
        let resolutions = if resolutions.is_empty() {
            default_resolutions()
        } else {
            resolutions
        };
        Self {
            output_dir: output_dir.into(),
            resolutions,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Frames are rendered at the first advertised resolution.
    pub fn frame_size(&self) -> Resolution {
        self.resolutions[0]
    }

    pub fn capture(&self, origin: CaptureOrigin) -> Result<PathBuf> {
        if !self.output_dir.is_dir() {
            return Err(DeviceError::StorageUnavailable(self.output_dir.clone()));
        }
        let path = self
            .output_dir
            .join(capture_file_name(origin, &chrono::Local::now()));
        colour_bars(self.frame_size()).save(&path)?;
        Ok(path)
    }
}

impl CameraDevice for PatternCamera {
    fn capture_remote(&self) -> Result<PathBuf> {
        self.capture(CaptureOrigin::Remote)
    }

    fn list_resolutions(&self) -> Result<Vec<Resolution>> {
        Ok(self.resolutions.clone())
    }
}

fn colour_bars(size: Resolution) -> RgbImage {
    let (w, h) = (size.width(), size.height());
    let bar_width = (w as usize).div_ceil(BAR_COLOURS.len()).max(1);
    RgbImage::from_fn(w, h, |x, _| {
        let index = (x as usize / bar_width).min(BAR_COLOURS.len() - 1);
        Rgb(BAR_COLOURS[index])
    })
}
