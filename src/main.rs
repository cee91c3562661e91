use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use remotecam::web::{self, CaptureServer, ServerConfig, ServerError};
use remotecam::{CameraDevice, PatternCamera, Resolution};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "remotecam", about = "Trigger camera captures over HTTP")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Directory captured frames are written to
    #[arg(short, long, value_name = "DIR", default_value = "captures")]
    output_dir: PathBuf,

    /// Advertised resolution as WIDTHxHEIGHT; repeat for more. First one is the frame size.
    #[arg(short, long = "resolution", value_name = "WxH")]
    resolutions: Vec<Resolution>,

    /// Seconds a capture may take before the request fails with 504
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    capture_timeout: u64,
}

fn main() {
    let args = Args::parse();
    web::init_tracing();

    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ServerError> {
    std::fs::create_dir_all(&args.output_dir)?;
    let camera = PatternCamera::new(&args.output_dir, args.resolutions);
    let advertised: Vec<String> = camera
        .list_resolutions()?
        .iter()
        .map(ToString::to_string)
        .collect();
    info!(
        output_dir = %camera.output_dir().display(),
        resolutions = ?advertised,
        "Pattern camera ready"
    );

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        capture_timeout: Duration::from_secs(args.capture_timeout),
        ..ServerConfig::default()
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let mut server = CaptureServer::new(Arc::new(camera), config);
        server
            .serve(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "Failed to install Ctrl-C handler, shutting down");
                }
            })
            .await
    })
}
