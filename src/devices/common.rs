use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use serde::{Serialize, Serializer};

use super::error::{DeviceError, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const REMOTE_PREFIX: &str = "REMOTE_";
const CAPTURE_EXTENSION: &str = "png";

/// A supported frame size in device-native pixels. Both sides are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DeviceError::InvalidResolution(s.to_string());
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Resolution::new(width, height).ok_or_else(invalid)
    }
}

// Serialized as the "<width>x<height>" string used on the wire.
impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOrigin {
    Local,
    Remote,
}

/// Camera operations the capture service relies on.
///
/// Both calls block on hardware or file I/O and must not be invoked from an
/// async executor thread directly.
pub trait CameraDevice: Send + Sync {
    /// Capture one still frame tagged as remotely triggered and return where it was written.
    fn capture_remote(&self) -> Result<PathBuf>;

    /// Supported resolutions in device order. May be empty.
    fn list_resolutions(&self) -> Result<Vec<Resolution>>;
}

impl<T: CameraDevice + ?Sized> CameraDevice for Arc<T> {
    fn capture_remote(&self) -> Result<PathBuf> {
        (**self).capture_remote()
    }

    fn list_resolutions(&self) -> Result<Vec<Resolution>> {
        (**self).list_resolutions()
    }
}

impl<T: CameraDevice + ?Sized> CameraDevice for Box<T> {
    fn capture_remote(&self) -> Result<PathBuf> {
        (**self).capture_remote()
    }

    fn list_resolutions(&self) -> Result<Vec<Resolution>> {
        (**self).list_resolutions()
    }
}

pub fn capture_file_name<Tz>(origin: CaptureOrigin, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let stamp = timestamp.format(TIMESTAMP_FORMAT);
    match origin {
        CaptureOrigin::Local => format!("{stamp}.{CAPTURE_EXTENSION}"),
        CaptureOrigin::Remote => format!("{REMOTE_PREFIX}{stamp}.{CAPTURE_EXTENSION}"),
    }
}
