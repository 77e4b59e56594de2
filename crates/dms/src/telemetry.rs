//! Per-frame telemetry records and trip summaries

use serde::{Deserialize, Serialize};

/// Column order consumers use when writing telemetry rows
pub const TELEMETRY_COLUMNS: [&str; 7] = [
    "timestamp",
    "EAR",
    "MAR",
    "eye_shut_counter",
    "yawn_counter",
    "alarm_counter",
    "alarm_on",
];

/// One processed frame with a face, as stored by the trip log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Wall-clock time (seconds since UNIX epoch)
    pub timestamp: f64,
    #[serde(rename = "EAR")]
    pub ear: f64,
    #[serde(rename = "MAR")]
    pub mar: f64,
    pub eye_shut_counter: u64,
    pub yawn_counter: u64,
    pub alarm_counter: u64,
    pub alarm_on: bool,
}

/// Aggregate view of a trip, built from its telemetry records
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TripSummary {
    pub frames: u64,
    pub first_timestamp: Option<f64>,
    pub last_timestamp: Option<f64>,
    pub eye_shut_events: u64,
    pub yawn_events: u64,
    pub alarm_events: u64,
    pub alarm_frames: u64,
    pub mean_ear: f64,
    pub mean_mar: f64,
    #[serde(skip)]
    ear_sum: f64,
    #[serde(skip)]
    mar_sum: f64,
}

impl TripSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TelemetryRecord>,
    {
        let mut summary = Self::default();
        for record in records {
            summary.observe(record);
        }
        summary
    }

    /// Fold one record into the summary
    pub fn observe(&mut self, record: &TelemetryRecord) {
        self.frames += 1;
        if self.first_timestamp.is_none() {
            self.first_timestamp = Some(record.timestamp);
        }
        self.last_timestamp = Some(record.timestamp);

        // Counters are cumulative for the session, so the trip total is the max seen
        self.eye_shut_events = self.eye_shut_events.max(record.eye_shut_counter);
        self.yawn_events = self.yawn_events.max(record.yawn_counter);
        self.alarm_events = self.alarm_events.max(record.alarm_counter);
        if record.alarm_on {
            self.alarm_frames += 1;
        }

        self.ear_sum += record.ear;
        self.mar_sum += record.mar;
        self.mean_ear = self.ear_sum / self.frames as f64;
        self.mean_mar = self.mar_sum / self.frames as f64;
    }

    /// Seconds between the first and last record
    pub fn duration_secs(&self) -> f64 {
        match (self.first_timestamp, self.last_timestamp) {
            (Some(first), Some(last)) => (last - first).max(0.0),
            _ => 0.0,
        }
    }

    /// Share of frames with the alarm sounding
    pub fn alarm_ratio(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.alarm_frames as f64 / self.frames as f64
    }
}

/// Share of records whose EAR is below `ear_thresh` (PERCLOS)
pub fn perclos<'a, I>(records: I, ear_thresh: f64) -> f64
where
    I: IntoIterator<Item = &'a TelemetryRecord>,
{
    let (closed, total) = records.into_iter().fold((0u64, 0u64), |(closed, total), r| {
        (closed + u64::from(r.ear < ear_thresh), total + 1)
    });
    if total == 0 {
        return 0.0;
    }
    closed as f64 / total as f64
}
