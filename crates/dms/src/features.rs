//! Eye and mouth aspect ratio extraction

use thiserror::Error;
use tracing::debug;

use crate::geometry::{denormalize, PixelPoint};
use crate::landmarks::LandmarkSet;

/// Reasons a ratio could not be computed for one feature
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Landmark {index} missing from a set of {len}")]
    MissingLandmark { index: usize, len: usize },

    #[error("Landmark {index} lies outside the {width}x{height} frame")]
    OutOfFrame { index: usize, width: u32, height: u32 },

    #[error("Horizontal reference distance is zero")]
    DegenerateWidth,
}

/// Aspect ratio for one feature plus the pixels it was computed from
pub type Measurement<const N: usize> = (f64, [PixelPoint; N]);

fn pixel_points<const N: usize>(
    landmarks: &LandmarkSet,
    indices: &[usize; N],
    width: u32,
    height: u32,
) -> Result<[PixelPoint; N], FeatureError> {
    let mut points = [PixelPoint::default(); N];
    for (slot, &index) in points.iter_mut().zip(indices.iter()) {
        let landmark = landmarks.get(index).ok_or(FeatureError::MissingLandmark {
            index,
            len: landmarks.len(),
        })?;
        *slot = denormalize(landmark, width, height).ok_or(FeatureError::OutOfFrame {
            index,
            width,
            height,
        })?;
    }
    Ok(points)
}

/// Eye aspect ratio from six contour points ordered P1..P6.
///
/// `(|P2P6| + |P3P5|) / (2 * |P1P4|)`
pub fn eye_aspect_ratio(
    landmarks: &LandmarkSet,
    indices: &[usize; 6],
    width: u32,
    height: u32,
) -> Result<Measurement<6>, FeatureError> {
    let p = pixel_points(landmarks, indices, width, height)?;

    let p2_p6 = p[1].distance_to(&p[5]);
    let p3_p5 = p[2].distance_to(&p[4]);
    let p1_p4 = p[0].distance_to(&p[3]);

    if p1_p4 == 0.0 {
        return Err(FeatureError::DegenerateWidth);
    }

    Ok(((p2_p6 + p3_p5) / (2.0 * p1_p4), p))
}

/// Mouth aspect ratio from eight points: corners P1/P2, then lip pairs.
///
/// `(|P3P4| + |P5P6| + |P7P8|) / (3 * |P1P2|)`
pub fn mouth_aspect_ratio(
    landmarks: &LandmarkSet,
    indices: &[usize; 8],
    width: u32,
    height: u32,
) -> Result<Measurement<8>, FeatureError> {
    let p = pixel_points(landmarks, indices, width, height)?;

    let p1_p2 = p[0].distance_to(&p[1]);
    let p3_p4 = p[2].distance_to(&p[3]);
    let p5_p6 = p[4].distance_to(&p[5]);
    let p7_p8 = p[6].distance_to(&p[7]);

    if p1_p2 == 0.0 {
        return Err(FeatureError::DegenerateWidth);
    }

    Ok(((p3_p4 + p5_p6 + p7_p8) / (3.0 * p1_p2), p))
}

/// Per-frame facial features with the pixels used to compute them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureBundle {
    /// Mean of left and right eye aspect ratio
    pub ear: f64,
    /// Mouth aspect ratio
    pub mar: f64,
    pub left_eye: Option<[PixelPoint; 6]>,
    pub right_eye: Option<[PixelPoint; 6]>,
    pub mouth: Option<[PixelPoint; 8]>,
}

impl FeatureBundle {
    /// All marker positions that were successfully computed
    pub fn marker_points(&self) -> impl Iterator<Item = &PixelPoint> {
        self.left_eye
            .iter()
            .flat_map(|p| p.iter())
            .chain(self.right_eye.iter().flat_map(|p| p.iter()))
            .chain(self.mouth.iter().flat_map(|p| p.iter()))
    }
}

/// A failed feature reads as ratio 0.0 with no markers.
///
/// 0.0 is indistinguishable from a fully closed eye, so a failed eye is
/// treated as shut by the state machine.
fn or_fallback<const N: usize>(
    feature: &str,
    result: Result<Measurement<N>, FeatureError>,
) -> (f64, Option<[PixelPoint; N]>) {
    match result {
        Ok((ratio, points)) => (ratio, Some(points)),
        Err(e) => {
            debug!("{} ratio unavailable, using 0.0: {}", feature, e);
            (0.0, None)
        }
    }
}

/// Compute averaged EAR and MAR for one face.
///
/// Each side is computed independently; a failed eye contributes 0.0 to the
/// average rather than being excluded, so one missing eye halves the score.
pub fn combined_features(
    landmarks: &LandmarkSet,
    left_indices: &[usize; 6],
    right_indices: &[usize; 6],
    mouth_indices: &[usize; 8],
    width: u32,
    height: u32,
) -> FeatureBundle {
    let (left_ear, left_eye) = or_fallback(
        "left eye",
        eye_aspect_ratio(landmarks, left_indices, width, height),
    );
    let (right_ear, right_eye) = or_fallback(
        "right eye",
        eye_aspect_ratio(landmarks, right_indices, width, height),
    );
    let (mar, mouth) = or_fallback(
        "mouth",
        mouth_aspect_ratio(landmarks, mouth_indices, width, height),
    );

    FeatureBundle {
        ear: (left_ear + right_ear) / 2.0,
        mar,
        left_eye,
        right_eye,
        mouth,
    }
}
