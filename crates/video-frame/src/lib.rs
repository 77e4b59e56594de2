//! Video Frame Library for Driver Monitoring
//!
//! Provides the decoded RGB frame handed to the drowsiness pipeline by the
//! capture/decoding collaborator, plus conversion to and from `image` buffers
//! for drawing.

pub mod frame;

pub use frame::VideoFrame;

use thiserror::Error;

/// Frame error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Invalid dimensions: {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}
