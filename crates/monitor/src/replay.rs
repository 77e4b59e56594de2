//! Recorded landmark streams, one JSON object per frame

use std::io::BufRead;

use dms::{Landmark, LandmarkSet};
use serde::Deserialize;
use thiserror::Error;

/// Replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read replay: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed replay line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid frame on replay line {line}: {reason}")]
    Frame { line: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct ReplayLine {
    width: u32,
    height: u32,
    #[serde(default)]
    landmarks: Option<Vec<Landmark>>,
    /// Seconds since the previous frame
    #[serde(default)]
    dt: f64,
}

/// One recorded frame
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayEntry {
    pub width: u32,
    pub height: u32,
    /// `None` when the detector found no face
    pub landmarks: Option<LandmarkSet>,
    pub dt: f64,
}

/// Reads replay entries, skipping blank lines and `#` comments
pub struct ReplaySource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    pub fn next_entry(&mut self) -> Result<Option<ReplayEntry>, ReplayError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let parsed: ReplayLine = serde_json::from_str(text).map_err(|source| {
                ReplayError::Parse {
                    line: self.line,
                    source,
                }
            })?;
            return self.entry(parsed).map(Some);
        }
    }

    fn entry(&self, parsed: ReplayLine) -> Result<ReplayEntry, ReplayError> {
        if parsed.width == 0 || parsed.height == 0 {
            return Err(ReplayError::Frame {
                line: self.line,
                reason: format!("dimensions {}x{}", parsed.width, parsed.height),
            });
        }
        if !parsed.dt.is_finite() || parsed.dt < 0.0 {
            return Err(ReplayError::Frame {
                line: self.line,
                reason: format!("dt must be a non-negative number, got {}", parsed.dt),
            });
        }

        Ok(ReplayEntry {
            width: parsed.width,
            height: parsed.height,
            landmarks: parsed.landmarks.map(LandmarkSet::new),
            dt: parsed.dt,
        })
    }
}

impl<R: BufRead> Iterator for ReplaySource<R> {
    type Item = Result<ReplayEntry, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}
