//! The capture HTTP service.
//!
//! A single route, `GET /pruebanicsens`, captures a frame through the injected
//! [`CameraDevice`] and answers with the device's supported resolutions as a
//! JSON array of `"<width>x<height>"` strings. Other paths answer `404` and
//! other methods `405`.

pub mod error;
pub mod handlers;
pub mod state;
pub mod util;

use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::routing::any;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::devices::CameraDevice;

pub use error::{Result, ServerError};
pub use handlers::CAPTURE_PATH;
pub use state::{AppState, ServerConfig};
pub use util::{init_tracing, render_resolutions};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(CAPTURE_PATH, any(handlers::capture))
        .fallback(handlers::fallback)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

struct Running {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Owns the listening socket. Either stopped or listening on one address.
pub struct CaptureServer {
    state: AppState,
    config: ServerConfig,
    running: Option<Running>,
}

impl CaptureServer {
    pub fn new(device: Arc<dyn CameraDevice>, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(device, config.capture_timeout),
            config,
            running: None,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn is_listening(&self) -> bool {
        self.running.is_some()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.addr)
    }

    /// Bind `config.host:port` and start accepting connections in the background.
    /// `port` overrides `config.port`; [`serve`](Self::serve) uses the configured one.
    ///
    /// Port `0` binds an OS-assigned port; the returned address carries the real one.
    /// Calling this while already listening leaves the existing listener untouched
    /// and returns its address.
    pub async fn start(&mut self, port: u16) -> Result<SocketAddr> {
        if let Some(running) = &self.running {
            warn!(address = %running.addr, "Server already listening");
            return Ok(running.addr);
        }

        let addr = listen_addr(&self.config.host, port)?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local = listener.local_addr()?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let app = router(self.state.clone());
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        info!(address = %format!("http://{local}"), "Listening");
        self.running = Some(Running {
            addr: local,
            shutdown,
            task,
        });
        Ok(local)
    }

    /// Close the listener and wait up to `shutdown_grace` for in-flight requests,
    /// then abort the server task. The port is free once this returns. No-op when stopped.
    pub async fn stop(&mut self) {
        let Some(Running {
            addr,
            shutdown,
            mut task,
        }) = self.running.take()
        else {
            return;
        };

        let _ = shutdown.send(());
        match tokio::time::timeout(self.config.shutdown_grace, &mut task).await {
            Ok(Ok(Ok(()))) => info!(address = %addr, "Server stopped"),
            Ok(Ok(Err(e))) => warn!(address = %addr, error = %e, "Server exited with error"),
            Ok(Err(e)) => warn!(address = %addr, error = %e, "Server task failed"),
            Err(_) => {
                warn!(address = %addr, grace = ?self.config.shutdown_grace, "Graceful shutdown timed out, aborting");
                task.abort();
                let _ = task.await;
            }
        }
    }

    /// Listen on the configured port until `signal` resolves, then stop.
    pub async fn serve<F>(&mut self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.start(self.config.port).await?;

        let exited = match self.running.as_mut() {
            Some(running) => tokio::select! {
                _ = signal => None,
                res = &mut running.task => Some(res),
            },
            None => None,
        };

        match exited {
            None => {
                info!("Shutdown requested");
                self.stop().await;
                Ok(())
            }
            Some(res) => {
                self.running = None;
                match res {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => {
                        error!(error = %e, "Server error");
                        Err(e.into())
                    }
                    Err(e) => {
                        error!(error = %e, "Server task failed");
                        Err(std::io::Error::other(e).into())
                    }
                }
            }
        }
    }
}

impl Drop for CaptureServer {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            let _ = running.shutdown.send(());
            running.task.abort();
        }
    }
}

fn listen_addr(host: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = host
        .parse()
        .map_err(|_| ServerError::InvalidAddress(host.to_string()))?;
    Ok(SocketAddr::new(ip, port))
}
