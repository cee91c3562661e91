#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use remotecam::{CameraDevice, DeviceError, Resolution};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Capture,
    List,
}

/// Scriptable camera that records the order of device calls.
#[derive(Default)]
pub struct StubCamera {
    resolutions: Vec<Resolution>,
    delay: Duration,
    failing_captures: AtomicUsize,
    fail_listing: AtomicBool,
    panic_next: AtomicBool,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubCamera {
    pub fn with_resolutions(pairs: &[(u32, u32)]) -> Self {
        Self {
            resolutions: pairs
                .iter()
                .map(|&(w, h)| Resolution::new(w, h).expect("non-zero resolution"))
                .collect(),
            ..Self::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the next `count` captures with a storage error.
    pub fn failing_captures(self, count: usize) -> Self {
        self.failing_captures.store(count, Ordering::SeqCst);
        self
    }

    pub fn failing_listing(self) -> Self {
        self.fail_listing.store(true, Ordering::SeqCst);
        self
    }

    pub fn panicking_once(self) -> Self {
        self.panic_next.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn finish(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl CameraDevice for StubCamera {
    fn capture_remote(&self) -> Result<PathBuf, DeviceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(Call::Capture);

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.panic_next.swap(false, Ordering::SeqCst) {
            self.finish();
            panic!("camera handle lost");
        }
        let failing = self
            .failing_captures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            self.finish();
            return Err(DeviceError::StorageUnavailable(PathBuf::from("/sdcard")));
        }
        Ok(PathBuf::from("/sdcard/REMOTE_2024-01-01_00-00-00.png"))
    }

    fn list_resolutions(&self) -> Result<Vec<Resolution>, DeviceError> {
        self.calls.lock().unwrap().push(Call::List);
        self.finish();
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(DeviceError::Native {
                call: "getResolutions",
                code: -1,
            });
        }
        Ok(self.resolutions.clone())
    }
}

/// Send a raw request over a fresh connection and read until the server closes it.
pub async fn raw_request(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(request.as_bytes()).await.expect("write");
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.expect("read");
    String::from_utf8_lossy(&buf).into_owned()
}

pub fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
}

pub fn status_line(response: &str) -> &str {
    response.lines().next().unwrap_or_default()
}

pub fn body(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or_default()
}
