use tracing_subscriber::{EnvFilter, fmt};

use crate::devices::Resolution;

/// JSON array of `"<width>x<height>"` strings in device order, e.g. `["1920x1080","640x480"]`.
pub fn render_resolutions(resolutions: &[Resolution]) -> serde_json::Result<String> {
    serde_json::to_string(resolutions)
}

/// Install the fmt subscriber. Honors RUST_LOG; safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,axum::rejection=trace"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
