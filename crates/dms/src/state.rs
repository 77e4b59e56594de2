//! Driver state tracking

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Thresholds;
use crate::telemetry::TelemetryRecord;

/// Feedback color state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorState {
    #[default]
    Alert,
    Drowsy,
}

impl ColorState {
    /// Display color (RGB)
    pub fn rgb(self) -> [u8; 3] {
        match self {
            ColorState::Alert => [0, 255, 0],
            ColorState::Drowsy => [255, 0, 0],
        }
    }
}

/// Clock readings for one processed frame.
///
/// `monotonic` accumulates eye-closure time; `wall` only stamps telemetry.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    pub monotonic: Instant,
    pub wall: SystemTime,
}

impl FrameClock {
    pub fn now() -> Self {
        Self {
            monotonic: Instant::now(),
            wall: SystemTime::now(),
        }
    }

    pub fn new(monotonic: Instant, wall: SystemTime) -> Self {
        Self { monotonic, wall }
    }

    /// Wall time as seconds since the UNIX epoch
    pub fn unix_seconds(&self) -> f64 {
        self.wall
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Rising edges observed while updating the state with one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameEdges {
    pub eye_shut: bool,
    pub yawn: bool,
    pub alarm: bool,
}

/// Driver state (tracked over a monitoring session)
#[derive(Debug, Clone)]
pub struct DetectorState {
    /// Continuous time eyes have been shut (seconds)
    pub drowsy_time: f64,

    /// Last processing tick
    pub start_time: Instant,

    pub color: ColorState,

    /// Alarm should be sounding
    pub play_alarm: bool,

    /// Debounce latches, true while their condition holds
    pub eye_shut_flag: bool,
    pub yawn_flag: bool,
    pub alarm_flag: bool,

    /// Rising-edge counts for the session
    pub eye_shut_counter: u64,
    pub yawn_counter: u64,
    pub alarm_counter: u64,

    /// Telemetry from the last processed frame, `None` if it had no face
    pub last_event: Option<TelemetryRecord>,
}

impl DetectorState {
    pub fn new(start_time: Instant) -> Self {
        Self {
            drowsy_time: 0.0,
            start_time,
            color: ColorState::Alert,
            play_alarm: false,
            eye_shut_flag: false,
            yawn_flag: false,
            alarm_flag: false,
            eye_shut_counter: 0,
            yawn_counter: 0,
            alarm_counter: 0,
            last_event: None,
        }
    }

    /// No face this frame: drop straight back to the alert state.
    ///
    /// Counters and the yawn latch are kept.
    pub fn reset_no_face(&mut self, now: Instant) {
        if self.play_alarm {
            info!("Face lost, clearing drowsiness alarm");
        }
        self.start_time = now;
        self.drowsy_time = 0.0;
        self.color = ColorState::Alert;
        self.play_alarm = false;
        self.eye_shut_flag = false;
        self.alarm_flag = false;
        self.last_event = None;
    }

    /// Advance the state machine with one frame's features
    pub fn update(
        &mut self,
        ear: f64,
        mar: f64,
        thresholds: &Thresholds,
        clock: FrameClock,
    ) -> (TelemetryRecord, FrameEdges) {
        let mut edges = FrameEdges::default();
        let now = clock.monotonic;

        if mar > thresholds.mar_thresh {
            if !self.yawn_flag {
                self.yawn_counter += 1;
                self.yawn_flag = true;
                edges.yawn = true;
                debug!("Yawn detected (MAR {:.2}, count {})", mar, self.yawn_counter);
            }
        } else {
            self.yawn_flag = false;
        }

        if ear < thresholds.ear_thresh {
            // A closure run starts counting at its first shut frame
            if self.eye_shut_flag {
                self.drowsy_time += now.saturating_duration_since(self.start_time).as_secs_f64();
            }
            self.start_time = now;
            self.color = ColorState::Drowsy;

            if !self.eye_shut_flag {
                self.eye_shut_counter += 1;
                self.eye_shut_flag = true;
                edges.eye_shut = true;
                debug!("Eyes shut (EAR {:.3}, count {})", ear, self.eye_shut_counter);
            }

            if self.drowsy_time >= thresholds.wait_time {
                if !self.play_alarm {
                    info!("Drowsiness alarm raised after {:.2}s of eye closure", self.drowsy_time);
                }
                self.play_alarm = true;
                if !self.alarm_flag {
                    self.alarm_counter += 1;
                    self.alarm_flag = true;
                    edges.alarm = true;
                }
            } else {
                self.alarm_flag = false;
            }
        } else {
            if self.play_alarm {
                info!("Eyes open, clearing drowsiness alarm");
            }
            self.start_time = now;
            self.drowsy_time = 0.0;
            self.color = ColorState::Alert;
            self.play_alarm = false;
            self.eye_shut_flag = false;
            self.alarm_flag = false;
        }

        let record = TelemetryRecord {
            timestamp: clock.unix_seconds(),
            ear,
            mar,
            eye_shut_counter: self.eye_shut_counter,
            yawn_counter: self.yawn_counter,
            alarm_counter: self.alarm_counter,
            alarm_on: self.play_alarm,
        };
        self.last_event = Some(record.clone());

        (record, edges)
    }
}
