//! Watch-channel handoff of alarm snapshots

use dms::{FrameResult, TelemetryRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::HandoffError;

/// Immutable view of the pipeline after one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlarmSnapshot {
    pub play_alarm: bool,
    /// Latest telemetry, `None` when the frame had no face
    pub event: Option<TelemetryRecord>,
    pub frame_index: u64,
}

impl AlarmSnapshot {
    pub fn from_result(frame_index: u64, result: &FrameResult) -> Self {
        Self {
            play_alarm: result.play_alarm,
            event: result.event.clone(),
            frame_index,
        }
    }
}

/// Create a connected publisher/subscriber pair
pub fn alarm_channel() -> (AlarmPublisher, AlarmSubscriber) {
    let (tx, rx) = watch::channel(AlarmSnapshot::default());
    (AlarmPublisher { tx }, AlarmSubscriber { rx })
}

/// Video-side end of the handoff
#[derive(Debug)]
pub struct AlarmPublisher {
    tx: watch::Sender<AlarmSnapshot>,
}

impl AlarmPublisher {
    /// Replace the shared snapshot. Never blocks.
    pub fn publish(&self, snapshot: AlarmSnapshot) -> Result<(), HandoffError> {
        debug!(
            "Publishing frame {} (alarm: {})",
            snapshot.frame_index, snapshot.play_alarm
        );
        self.tx.send(snapshot).map_err(|_| HandoffError::Closed)
    }
}

/// Consumer-side end of the handoff
#[derive(Debug, Clone)]
pub struct AlarmSubscriber {
    rx: watch::Receiver<AlarmSnapshot>,
}

impl AlarmSubscriber {
    /// Latest published snapshot
    pub fn current(&self) -> AlarmSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for a snapshot newer than the last one seen
    pub async fn changed(&mut self) -> Result<AlarmSnapshot, HandoffError> {
        self.rx.changed().await.map_err(|_| HandoffError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// Alarm start/stop transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmTransition {
    Raised,
    Cleared,
}

/// Turns a stream of snapshots into start/stop events for audio playback
#[derive(Debug, Default)]
pub struct AlarmEdges {
    sounding: bool,
    raised: u64,
}

impl AlarmEdges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, snapshot: &AlarmSnapshot) -> Option<AlarmTransition> {
        match (self.sounding, snapshot.play_alarm) {
            (false, true) => {
                self.sounding = true;
                self.raised += 1;
                info!("Alarm raised at frame {} (episode {})", snapshot.frame_index, self.raised);
                Some(AlarmTransition::Raised)
            }
            (true, false) => {
                self.sounding = false;
                info!("Alarm cleared at frame {}", snapshot.frame_index);
                Some(AlarmTransition::Cleared)
            }
            _ => None,
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }

    /// Number of times the alarm started
    pub fn raised_count(&self) -> u64 {
        self.raised
    }
}
