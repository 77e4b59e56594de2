//! Driver Monitoring System (DMS)
//!
//! Per-frame drowsiness and fatigue detection from face mesh landmarks:
//! - Eye aspect ratio (EAR) for eye closure
//! - Mouth aspect ratio (MAR) for yawning
//! - Time-accumulated closure with a debounced alarm
//! - Annotated, selfie-mirrored output frames

pub mod analysis;
pub mod annotate;
pub mod config;
pub mod detector;
pub mod features;
pub mod geometry;
pub mod landmarks;
pub mod state;
pub mod telemetry;

pub use analysis::FrameResult;
pub use annotate::{FrameAnnotator, TextOverlay};
pub use config::{DmsConfig, Thresholds};
pub use detector::{LandmarkSource, NoFace};
pub use features::{combined_features, FeatureBundle, FeatureError};
pub use geometry::{Landmark, PixelPoint};
pub use landmarks::LandmarkSet;
pub use state::{ColorState, DetectorState, FrameClock, FrameEdges};
pub use telemetry::{TelemetryRecord, TripSummary};

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};
use video_frame::{FrameError, VideoFrame};

use crate::annotate::Readout;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Invalid frame: {0}")]
    InvalidFrame(#[from] FrameError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Font loading failed: {0}")]
    Font(String),

    #[error("Landmark source failed: {0}")]
    Source(String),
}

/// Drowsiness monitor for one session.
///
/// Frames must be processed one at a time with non-decreasing clock readings.
pub struct DrowsinessMonitor {
    config: DmsConfig,
    annotator: FrameAnnotator,
    state: DetectorState,
}

impl DrowsinessMonitor {
    /// Create a new monitor starting its session now
    pub fn new(config: DmsConfig) -> Result<Self, DmsError> {
        Self::with_start(config, Instant::now())
    }

    /// Create a new monitor whose session started at `start`
    pub fn with_start(config: DmsConfig, start: Instant) -> Result<Self, DmsError> {
        config.validate()?;
        info!("Creating drowsiness monitor with thresholds: {:?}", config.thresholds);
        Ok(Self {
            annotator: FrameAnnotator::new(&config)?,
            state: DetectorState::new(start),
            config,
        })
    }

    /// Process a frame using the real clocks
    pub fn process(
        &mut self,
        frame: VideoFrame,
        landmarks: Option<&LandmarkSet>,
        thresholds: &Thresholds,
    ) -> Result<FrameResult, DmsError> {
        self.process_at(frame, landmarks, thresholds, FrameClock::now())
    }

    /// Process a frame at the given clock readings
    pub fn process_at(
        &mut self,
        frame: VideoFrame,
        landmarks: Option<&LandmarkSet>,
        thresholds: &Thresholds,
        clock: FrameClock,
    ) -> Result<FrameResult, DmsError> {
        thresholds.validate()?;
        frame.validate()?;
        let (width, height) = frame.dimensions();

        let Some(landmarks) = landmarks else {
            debug!("No face in frame {}", frame.sequence);
            self.state.reset_no_face(clock.monotonic);
            let frame = self.annotator.annotate(frame, None, &[], self.state.color)?;
            return Ok(FrameResult {
                frame,
                play_alarm: false,
                event: None,
                color: self.state.color,
                drowsy_time: 0.0,
                features: None,
                edges: FrameEdges::default(),
                overlays: Vec::new(),
            });
        };

        let features = combined_features(
            landmarks,
            &crate::landmarks::LEFT_EYE,
            &crate::landmarks::RIGHT_EYE,
            &crate::landmarks::MOUTH,
            width,
            height,
        );
        let (event, edges) = self.state.update(features.ear, features.mar, thresholds, clock);

        let overlays = annotate::readouts(
            &Readout {
                ear: features.ear,
                mar: features.mar,
                drowsy_time: self.state.drowsy_time,
                play_alarm: self.state.play_alarm,
                color: self.state.color,
            },
            height,
        );
        let frame = self
            .annotator
            .annotate(frame, Some(&features), &overlays, self.state.color)?;

        Ok(FrameResult {
            frame,
            play_alarm: self.state.play_alarm,
            event: Some(event),
            color: self.state.color,
            drowsy_time: self.state.drowsy_time,
            features: Some(features),
            edges,
            overlays,
        })
    }

    /// Ask `source` for landmarks, then process the frame
    pub fn process_from<S: LandmarkSource + ?Sized>(
        &mut self,
        source: &mut S,
        frame: VideoFrame,
        thresholds: &Thresholds,
        clock: FrameClock,
    ) -> Result<FrameResult, DmsError> {
        let landmarks = source.next_landmarks(&frame)?;
        self.process_at(frame, landmarks.as_ref(), thresholds, clock)
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    pub fn last_event(&self) -> Option<&TelemetryRecord> {
        self.state.last_event.as_ref()
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }
}
