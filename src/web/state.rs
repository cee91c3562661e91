use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::devices::CameraDevice;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    /// Port bound by `CaptureServer::serve`. `0` picks a free port.
    pub port: u16,
    /// Upper bound on one capture + enumeration sequence as seen by the client.
    pub capture_timeout: Duration,
    /// How long `stop` waits for in-flight requests before aborting them.
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            capture_timeout: Duration::from_secs(30),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub device: Arc<dyn CameraDevice>,
    pub capture_lock: Arc<Mutex<()>>, // held for the whole capture + enumeration sequence
    pub capture_timeout: Duration,
}

impl AppState {
    pub fn new(device: Arc<dyn CameraDevice>, capture_timeout: Duration) -> Self {
        Self {
            device,
            capture_lock: Arc::new(Mutex::new(())),
            capture_timeout,
        }
    }

    pub fn busy(&self) -> bool {
        self.capture_lock.try_lock().is_err()
    }
}
