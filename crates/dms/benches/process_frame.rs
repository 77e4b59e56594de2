//! Per-frame processing cost against a 30 fps budget

use std::time::{Duration, Instant, SystemTime};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dms::landmarks::FACE_MESH_LANDMARKS;
use dms::{
    combined_features, landmarks, DmsConfig, DrowsinessMonitor, FrameClock, Landmark, LandmarkSet,
    Thresholds,
};
use video_frame::VideoFrame;

fn face() -> LandmarkSet {
    let points = (0..FACE_MESH_LANDMARKS)
        .map(|i| {
            let t = i as f32 / FACE_MESH_LANDMARKS as f32;
            Landmark::new(0.2 + 0.6 * t, 0.3 + 0.4 * (t * 7.0).sin().abs())
        })
        .collect();
    LandmarkSet::new(points)
}

fn bench_features(c: &mut Criterion) {
    let set = face();
    c.bench_function("combined_features", |b| {
        b.iter(|| {
            combined_features(
                black_box(&set),
                &landmarks::LEFT_EYE,
                &landmarks::RIGHT_EYE,
                &landmarks::MOUTH,
                640,
                480,
            )
        })
    });
}

fn bench_process(c: &mut Criterion) {
    let set = face();
    let thresholds = Thresholds::default();
    let frame = VideoFrame::blank(640, 480).expect("valid frame");
    let start = Instant::now();
    let mut monitor =
        DrowsinessMonitor::with_start(DmsConfig::default(), start).expect("default config");
    let mut tick = 0u64;

    c.bench_function("process_vga_frame", |b| {
        b.iter(|| {
            tick += 1;
            let clock = FrameClock::new(
                start + Duration::from_millis(33 * tick),
                SystemTime::now(),
            );
            monitor
                .process_at(frame.clone(), Some(&set), &thresholds, clock)
                .expect("frame processed")
        })
    });
}

criterion_group!(benches, bench_features, bench_process);
criterion_main!(benches);
