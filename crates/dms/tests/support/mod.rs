//! Synthetic faces and timelines shared by the integration tests

#![allow(dead_code)]

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use dms::landmarks::{FACE_MESH_LANDMARKS, LEFT_EYE, MOUTH, RIGHT_EYE};
use dms::{FrameClock, Landmark, LandmarkSet};
use video_frame::VideoFrame;

pub const WIDTH: u32 = 200;
pub const HEIGHT: u32 = 200;

/// Eye width in pixels; EAR = opening / EYE_WIDTH
pub const EYE_WIDTH: i32 = 40;
/// Mouth width in pixels; MAR = opening / MOUTH_WIDTH
pub const MOUTH_WIDTH: i32 = 40;

fn at(x: i32, y: i32) -> Landmark {
    Landmark::new(
        (x as f32 + 0.5) / WIDTH as f32,
        (y as f32 + 0.5) / HEIGHT as f32,
    )
}

fn eye(cx: i32, cy: i32, opening: i32) -> [(i32, i32); 6] {
    let half = EYE_WIDTH / 2;
    [
        (cx - half, cy),
        (cx - 10, cy),
        (cx + 10, cy),
        (cx + half, cy),
        (cx + 10, cy + opening),
        (cx - 10, cy + opening),
    ]
}

fn mouth(cx: i32, cy: i32, opening: i32) -> [(i32, i32); 8] {
    let half = MOUTH_WIDTH / 2;
    [
        (cx - half, cy),
        (cx + half, cy),
        (cx - 10, cy),
        (cx - 10, cy + opening),
        (cx, cy),
        (cx, cy + opening),
        (cx + 10, cy),
        (cx + 10, cy + opening),
    ]
}

/// Face whose EAR is `eye_opening / 40` and MAR is `mouth_opening / 40`
pub fn face(eye_opening: i32, mouth_opening: i32) -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.5); FACE_MESH_LANDMARKS];
    for (&i, (x, y)) in LEFT_EYE.iter().zip(eye(140, 60, eye_opening)) {
        points[i] = at(x, y);
    }
    for (&i, (x, y)) in RIGHT_EYE.iter().zip(eye(60, 60, eye_opening)) {
        points[i] = at(x, y);
    }
    for (&i, (x, y)) in MOUTH.iter().zip(mouth(100, 130, mouth_opening)) {
        points[i] = at(x, y);
    }
    LandmarkSet::from_points(points).unwrap()
}

/// EAR 0.25, MAR 0.25
pub fn open_face() -> LandmarkSet {
    face(10, 10)
}

/// EAR 0.10, MAR 0.25
pub fn shut_face() -> LandmarkSet {
    face(4, 10)
}

/// EAR 0.25, MAR 1.0
pub fn yawning_face() -> LandmarkSet {
    face(10, 40)
}

pub fn frame(sequence: u32) -> VideoFrame {
    let mut frame = VideoFrame::blank(WIDTH, HEIGHT).unwrap();
    frame.sequence = sequence;
    frame
}

pub struct Timeline {
    pub base: Instant,
    wall: SystemTime,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            wall: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        }
    }

    pub fn at(&self, secs: f64) -> FrameClock {
        let offset = Duration::from_secs_f64(secs);
        FrameClock::new(self.base + offset, self.wall + offset)
    }
}
