//! Drowsiness Monitor - Main Entry Point

use monitor::{init_logging, load_config, run};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config(std::env::args().nth(1).as_deref())?;
    init_logging(&config.log_level)?;

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Replaying landmarks from {}", config.input);

    let report = run(config).await?;
    info!(
        "{}: {} frames, {} eye closures, {} yawns, {} alarms",
        report.label,
        report.summary.frames,
        report.summary.eye_shut_events,
        report.summary.yawn_events,
        report.summary.alarm_events
    );

    Ok(())
}
