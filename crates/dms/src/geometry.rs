//! Geometry utilities for landmark coordinates

use serde::{Deserialize, Serialize};

/// Normalized landmark coordinate, relative to frame width/height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Landmark {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Landmark position on the frame's pixel grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another pixel
    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        distance(
            [self.x as f64, self.y as f64],
            [other.x as f64, other.y as f64],
        )
    }
}

/// L2 norm between two points of the same dimension
pub fn distance<const N: usize>(p1: [f64; N], p2: [f64; N]) -> f64 {
    p1.iter()
        .zip(p2.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

/// Tolerance when checking that a normalized value lies in [0, 1]
const NORMALIZED_EPSILON: f32 = 1e-6;

fn is_normalized(value: f32) -> bool {
    value.is_finite() && value > -NORMALIZED_EPSILON && value < 1.0 + NORMALIZED_EPSILON
}

/// Map a normalized landmark onto the pixel grid of a `width` x `height` frame.
///
/// Returns `None` when the landmark lies outside the visible frame, which the
/// detector reports for occluded points. A coordinate of exactly 1.0 maps to
/// the last row/column.
pub fn denormalize(landmark: Landmark, width: u32, height: u32) -> Option<PixelPoint> {
    if width == 0 || height == 0 {
        return None;
    }
    if !is_normalized(landmark.x) || !is_normalized(landmark.y) {
        return None;
    }

    let x = ((landmark.x.max(0.0) * width as f32).floor() as i64).min(width as i64 - 1);
    let y = ((landmark.y.max(0.0) * height as f32).floor() as i64).min(height as i64 - 1);

    Some(PixelPoint::new(x as i32, y as i32))
}
