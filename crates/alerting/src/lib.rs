//! Alarm Handoff
//!
//! Carries the latest alarm decision and telemetry record from the
//! single-threaded video pipeline to concurrent consumers (audio playback,
//! trip logging) without sharing mutable state.

mod handoff;

pub use handoff::{
    alarm_channel, AlarmEdges, AlarmPublisher, AlarmSnapshot, AlarmSubscriber, AlarmTransition,
};

use thiserror::Error;

/// Handoff errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandoffError {
    #[error("Alarm channel closed")]
    Closed,
}
