//! Landmark detector boundary

use video_frame::VideoFrame;

use crate::landmarks::LandmarkSet;
use crate::DmsError;

/// Supplies face landmarks for a frame.
///
/// `Ok(None)` means no face was found, which is normal input rather than an
/// error. Implementations wrap a face mesh model or replay recorded output.
pub trait LandmarkSource {
    fn next_landmarks(&mut self, frame: &VideoFrame) -> Result<Option<LandmarkSet>, DmsError>;
}

impl<F> LandmarkSource for F
where
    F: FnMut(&VideoFrame) -> Result<Option<LandmarkSet>, DmsError>,
{
    fn next_landmarks(&mut self, frame: &VideoFrame) -> Result<Option<LandmarkSet>, DmsError> {
        self(frame)
    }
}

/// Source that never finds a face
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFace;

impl LandmarkSource for NoFace {
    fn next_landmarks(&mut self, _frame: &VideoFrame) -> Result<Option<LandmarkSet>, DmsError> {
        Ok(None)
    }
}
