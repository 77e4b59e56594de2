//! Face mesh landmark topology

use serde::{Deserialize, Serialize};

use crate::geometry::Landmark;
use crate::DmsError;

/// Number of points produced by the refined face mesh
pub const FACE_MESH_LANDMARKS: usize = 478;

/// Left eye contour, ordered P1..P6 (outer corner, upper lid, inner corner, lower lid)
pub const LEFT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];

/// Right eye contour, ordered P1..P6
pub const RIGHT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];

/// Mouth points: corners (P1, P2), then three upper/lower lip pairs
pub const MOUTH: [usize; 8] = [61, 291, 39, 181, 0, 17, 269, 405];

/// Ordered landmarks for one detected face
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    /// Wrap detector output as-is.
    ///
    /// Missing indices are tolerated here; feature extraction reports them.
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Wrap detector output, rejecting sets too short for the eye/mouth topology
    pub fn from_points(points: Vec<Landmark>) -> Result<Self, DmsError> {
        let required = required_len();
        if points.len() < required {
            return Err(DmsError::Source(format!(
                "landmark set has {} points, topology needs at least {}",
                points.len(),
                required
            )));
        }
        Ok(Self { points })
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Smallest set length that covers every referenced index
pub fn required_len() -> usize {
    LEFT_EYE
        .iter()
        .chain(RIGHT_EYE.iter())
        .chain(MOUTH.iter())
        .max()
        .map_or(0, |max| max + 1)
}
