//! DMS per-frame results

use video_frame::VideoFrame;

use crate::annotate::TextOverlay;
use crate::features::FeatureBundle;
use crate::state::{ColorState, FrameEdges};
use crate::telemetry::TelemetryRecord;

/// Output of processing one frame
#[derive(Debug, Clone)]
pub struct FrameResult {
    /// Annotated, mirrored frame
    pub frame: VideoFrame,

    /// Alarm should be sounding
    pub play_alarm: bool,

    /// Telemetry row, `None` when no face was found
    pub event: Option<TelemetryRecord>,

    pub color: ColorState,

    /// Continuous eye closure so far (seconds)
    pub drowsy_time: f64,

    /// Features used for this frame, `None` when no face was found
    pub features: Option<FeatureBundle>,

    /// Rising edges detected on this frame
    pub edges: FrameEdges,

    /// Text readouts placed on the frame
    pub overlays: Vec<TextOverlay>,
}

impl FrameResult {
    pub fn face_detected(&self) -> bool {
        self.event.is_some()
    }
}
