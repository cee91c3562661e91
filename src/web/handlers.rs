use axum::extract::State;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use super::state::AppState;
use super::util::render_resolutions;
use crate::devices::DeviceError;

pub const CAPTURE_PATH: &str = "/pruebanicsens";

pub async fn capture(method: Method, State(state): State<AppState>) -> Response {
    if method != Method::GET {
        return method_not_allowed(&method);
    }
    if state.busy() {
        info!("Capture queued behind an in-flight capture");
    }

    // One deadline covers waiting for the lock and the device calls. The owned guard
    // moves into the blocking task so the lock outlives a timed-out request.
    let device = state.device.clone();
    let lock = state.capture_lock.clone();
    let run = async move {
        let guard = lock.lock_owned().await;
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            let path = device.capture_remote()?;
            let resolutions = device.list_resolutions()?;
            Ok::<_, DeviceError>((path, resolutions))
        })
        .await
    };

    match tokio::time::timeout(state.capture_timeout, run).await {
        Ok(Ok(Ok((path, resolutions)))) => {
            info!(path = %path.display(), resolutions = resolutions.len(), "Capture complete");
            match render_resolutions(&resolutions) {
                Ok(body) => (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response(),
                Err(e) => {
                    error!(error = %e, "Failed to encode resolutions");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Capture failed (encoding): {e}"),
                    )
                        .into_response()
                }
            }
        }
        Ok(Ok(Err(e))) => {
            error!(kind = e.kind(), error = %e, "Capture failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Capture failed ({}): {e}", e.kind()),
            )
                .into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "Capture task join error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Capture failed (panic): {e}"),
            )
                .into_response()
        }
        Err(_) => {
            warn!(timeout = ?state.capture_timeout, "Capture timed out");
            (StatusCode::GATEWAY_TIMEOUT, "Capture timed out").into_response()
        }
    }
}

pub async fn fallback(method: Method) -> Response {
    if method != Method::GET {
        return method_not_allowed(&method);
    }
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn method_not_allowed(method: &Method) -> Response {
    warn!(%method, "Rejected request method");
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}
