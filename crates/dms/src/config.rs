//! DMS configuration

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// Drowsiness thresholds, fixed for a monitoring session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Eyes count as shut while EAR is below this value
    #[serde(alias = "EAR_THRESH")]
    pub ear_thresh: f64,

    /// Mouth counts as yawning while MAR is above this value
    #[serde(alias = "MAR_THRESH")]
    pub mar_thresh: f64,

    /// Continuous eye closure before the alarm sounds (seconds)
    #[serde(alias = "WAIT_TIME")]
    pub wait_time: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ear_thresh: 0.18,
            mar_thresh: 0.90,
            wait_time: 4.0,
        }
    }
}

impl Thresholds {
    /// Create strict thresholds (alarm sooner)
    pub fn strict() -> Self {
        Self {
            ear_thresh: 0.20,
            wait_time: 2.0,
            ..Default::default()
        }
    }

    /// Create lenient thresholds (alarm later)
    pub fn lenient() -> Self {
        Self {
            ear_thresh: 0.15,
            wait_time: 6.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), DmsError> {
        if !self.ear_thresh.is_finite() || self.ear_thresh <= 0.0 {
            return Err(DmsError::Config(format!(
                "ear_thresh must be a positive number, got {}",
                self.ear_thresh
            )));
        }
        if !self.mar_thresh.is_finite() || self.mar_thresh <= 0.0 {
            return Err(DmsError::Config(format!(
                "mar_thresh must be a positive number, got {}",
                self.mar_thresh
            )));
        }
        if !self.wait_time.is_finite() || self.wait_time < 0.0 {
            return Err(DmsError::Config(format!(
                "wait_time must be zero or more seconds, got {}",
                self.wait_time
            )));
        }
        Ok(())
    }
}

/// DMS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// Session thresholds
    pub thresholds: Thresholds,

    /// TTF/OTF font for the numeric readouts; text is skipped without one
    pub font_path: Option<String>,

    /// Landmark marker radius (pixels)
    pub marker_radius: i32,

    /// Readout text height (pixels)
    pub text_scale: f32,

    /// Mirror output frames for a selfie-view display
    pub mirror: bool,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            font_path: None,
            marker_radius: 2,
            text_scale: 24.0,
            mirror: true,
        }
    }
}

impl DmsConfig {
    /// Create strict config (lower thresholds)
    pub fn strict() -> Self {
        Self {
            thresholds: Thresholds::strict(),
            ..Default::default()
        }
    }

    /// Create lenient config (higher thresholds)
    pub fn lenient() -> Self {
        Self {
            thresholds: Thresholds::lenient(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), DmsError> {
        self.thresholds.validate()?;
        if self.marker_radius < 0 {
            return Err(DmsError::Config(format!(
                "marker_radius must not be negative, got {}",
                self.marker_radius
            )));
        }
        if !self.text_scale.is_finite() || self.text_scale <= 0.0 {
            return Err(DmsError::Config(format!(
                "text_scale must be positive, got {}",
                self.text_scale
            )));
        }
        Ok(())
    }
}
