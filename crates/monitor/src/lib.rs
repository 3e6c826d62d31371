//! Drowsiness Monitor
//!
//! Wires the frame source, the DMS state machine, the alert gate, and the
//! overlay display into one sequential processing loop.

pub mod display;
pub mod session;
pub mod settings;

pub use display::{status_color, Display, Overlay, Rgb};
pub use session::{run_loop, MonitorSession, SessionSummary, StopReason, TickReport};
pub use settings::{Settings, DEFAULT_CONFIG_FILE};

use alerting::AlertGate;
use anyhow::Context;
use camera_capture::spawn_reader;
use dms::DmsModule;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize logging; `RUST_LOG` wins over the configured level
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {e}"))
}

async fn quit_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Quit key unavailable ({}), running until the source ends", e);
        std::future::pending::<()>().await;
    }
}

/// Run one monitoring session with the given settings
pub async fn run(settings: Settings) -> anyhow::Result<SessionSummary> {
    let dms = DmsModule::new(settings.dms.clone()).context("Invalid detector settings")?;
    let gate = AlertGate::from_config(&settings.alert);
    let source = settings
        .camera
        .open()
        .context("Failed to open frame source")?;
    let mut frames = spawn_reader(source).context("Failed to start frame reader")?;

    info!(
        ear_threshold = dms.config().ear_threshold,
        mar_threshold = dms.config().mar_threshold,
        fps = settings.camera.fps,
        "Monitoring started"
    );

    let mut session = MonitorSession::new(dms, gate);
    let reason = run_loop(
        &mut session,
        &mut frames,
        settings.camera.frame_interval(),
        quit_signal(),
    )
    .await
    .context("Frame source failed")?;

    info!("Monitoring stopped: {:?}", reason);
    Ok(session.summary())
}
