//! Drowsiness Monitor Host
//!
//! Replays a recorded landmark stream through the DMS pipeline, hands alarm
//! snapshots to a consumer task, and writes per-frame telemetry as JSON lines.

pub mod replay;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant, SystemTime};

use alerting::{alarm_channel, AlarmEdges, AlarmPublisher, AlarmSnapshot, AlarmSubscriber, AlarmTransition};
use anyhow::Context;
use chrono::{DateTime, Utc};
use config::{Config, ConfigError, Environment, File as ConfigFile};
use dms::telemetry::perclos;
use dms::{DmsConfig, DrowsinessMonitor, FrameClock, TelemetryRecord, TripSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;
use video_frame::VideoFrame;

use crate::replay::ReplaySource;

/// Config file used when none is given on the command line or in `MONITOR_CONFIG`
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";

/// Host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Pipeline configuration, including session thresholds
    pub dms: DmsConfig,

    /// Landmark replay file (JSON lines)
    pub input: String,

    /// Telemetry output (JSON lines); stdout when unset
    pub telemetry_path: Option<String>,

    /// Trip report output (JSON); logged only when unset
    pub report_path: Option<String>,

    /// Directory for annotated PNG frames; frames are discarded when unset
    pub frames_dir: Option<String>,

    /// Sleep between frames according to the recorded timing
    pub realtime: bool,

    /// Maximum log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dms: DmsConfig::default(),
            input: "landmarks.jsonl".to_string(),
            telemetry_path: None,
            report_path: None,
            frames_dir: None,
            realtime: false,
            log_level: "info".to_string(),
        }
    }
}

/// Load configuration: defaults, then the TOML file (if present), then
/// `MONITOR_`-prefixed environment variables (`__` separates nested keys,
/// e.g. `MONITOR_DMS__THRESHOLDS__EAR_THRESH=0.2`).
pub fn load_config(path: Option<&str>) -> Result<MonitorConfig, ConfigError> {
    let path = path
        .map(str::to_string)
        .or_else(|| std::env::var("MONITOR_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    Config::builder()
        .add_source(ConfigFile::with_name(&path).required(false))
        .add_source(
            Environment::with_prefix("MONITOR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// Initialize logging (stderr, so stdout stays free for telemetry)
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let level = Level::from_str(level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Identity and outcome of one replayed trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripReport {
    pub trip_id: Uuid,
    pub label: String,
    pub started_at: DateTime<Utc>,
    pub summary: TripSummary,
    /// Share of face frames with EAR below threshold
    pub perclos: f64,
    /// Alarm episodes raised by the pipeline (one per closure run that
    /// reached the wait time)
    pub alarms_sounded: u64,
}

/// Replay the configured input through the pipeline
pub async fn run(config: MonitorConfig) -> anyhow::Result<TripReport> {
    let started_at = Utc::now();
    let trip_id = Uuid::new_v4();
    let label = started_at.format("Trip %m/%d/%Y %H:%M:%S").to_string();
    info!("Starting {} ({})", label, trip_id);

    let (publisher, subscriber) = alarm_channel();
    let consumer = tokio::spawn(sound_alarm(subscriber));

    let report_path = config.report_path.clone();
    let outcome = tokio::task::spawn_blocking(move || replay_trip(&config, publisher))
        .await
        .context("Replay task panicked")??;

    // publisher is dropped with the replay task, which ends the consumer
    consumer.await.context("Alarm consumer panicked")?;

    let report = TripReport {
        trip_id,
        label,
        started_at,
        summary: outcome.summary,
        perclos: outcome.perclos,
        alarms_sounded: outcome.alarms_sounded,
    };

    match report_path {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path))?;
            serde_json::to_writer_pretty(file, &report)
                .with_context(|| format!("Failed to write {}", path))?;
            info!("Trip report written to {}", path);
        }
        None => info!("Trip report: {}", serde_json::to_string(&report)?),
    }

    Ok(report)
}

/// Alarm consumer: start/stop playback on the latest alarm state.
///
/// The watch channel coalesces snapshots, so short episodes may never reach
/// this task when replay runs faster than real time.
async fn sound_alarm(mut subscriber: AlarmSubscriber) {
    let mut edges = AlarmEdges::new();
    while let Ok(snapshot) = subscriber.changed().await {
        match edges.observe(&snapshot) {
            Some(AlarmTransition::Raised) => info!("Sounding alarm"),
            Some(AlarmTransition::Cleared) => info!("Silencing alarm"),
            None => {}
        }
    }
    debug!("Alarm consumer done after {} playbacks", edges.raised_count());
}

struct ReplayOutcome {
    summary: TripSummary,
    perclos: f64,
    alarms_sounded: u64,
}

fn replay_trip(config: &MonitorConfig, publisher: AlarmPublisher) -> anyhow::Result<ReplayOutcome> {
    let input = File::open(&config.input)
        .with_context(|| format!("Failed to open replay {}", config.input))?;
    let mut source = ReplaySource::new(BufReader::new(input));

    let mut telemetry: Box<dyn Write> = match &config.telemetry_path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let frames_dir = match &config.frames_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir))?;
            Some(PathBuf::from(dir))
        }
        None => None,
    };

    let thresholds = config.dms.thresholds;
    let start = Instant::now();
    let wall_start = SystemTime::now();
    let mut monitor = DrowsinessMonitor::with_start(config.dms.clone(), start)?;
    let mut summary = TripSummary::default();
    let mut records: Vec<TelemetryRecord> = Vec::new();
    let mut elapsed = Duration::ZERO;
    let mut frame_index = 0u64;
    let mut alarms_sounded = 0u64;

    while let Some(entry) = source.next_entry()? {
        let dt = Duration::from_secs_f64(entry.dt);
        elapsed += dt;
        if config.realtime {
            std::thread::sleep(dt);
        }

        let mut frame = VideoFrame::blank(entry.width, entry.height)?;
        frame.sequence = frame_index as u32;
        frame.timestamp_ns = elapsed.as_nanos() as u64;
        let clock = FrameClock::new(start + elapsed, wall_start + elapsed);

        let result = monitor.process_at(frame, entry.landmarks.as_ref(), &thresholds, clock)?;
        if result.edges.alarm {
            alarms_sounded += 1;
        }

        if publisher.publish(AlarmSnapshot::from_result(frame_index, &result)).is_err() {
            warn!("Alarm consumer gone, alarm state no longer delivered");
        }

        if let Some(record) = &result.event {
            serde_json::to_writer(&mut telemetry, record)?;
            writeln!(telemetry)?;
            summary.observe(record);
            records.push(record.clone());
        } else {
            debug!("Frame {} had no face", frame_index);
        }

        if let Some(dir) = &frames_dir {
            save_frame(dir, frame_index, result.frame)?;
        }

        frame_index += 1;
    }

    telemetry.flush()?;
    info!("Replayed {} frames ({} with a face)", frame_index, summary.frames);

    Ok(ReplayOutcome {
        summary,
        perclos: perclos(&records, thresholds.ear_thresh),
        alarms_sounded,
    })
}

fn save_frame(dir: &Path, index: u64, frame: VideoFrame) -> anyhow::Result<()> {
    let path = dir.join(format!("frame_{:06}.png", index));
    let (img, _, _) = frame.into_rgb_image()?;
    img.save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))
}
