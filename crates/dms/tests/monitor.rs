mod support;

use dms::{ColorState, DmsConfig, DmsError, DrowsinessMonitor, LandmarkSet, NoFace, Thresholds};
use support::*;
use video_frame::VideoFrame;

fn thresholds(wait_time: f64) -> Thresholds {
    Thresholds {
        ear_thresh: 0.18,
        mar_thresh: 0.90,
        wait_time,
    }
}

fn monitor(timeline: &Timeline) -> DrowsinessMonitor {
    DrowsinessMonitor::with_start(DmsConfig::default(), timeline.base).unwrap()
}

#[test]
fn test_synthetic_faces_have_expected_ratios() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(2.0);

    let result = monitor
        .process_at(frame(0), Some(&open_face()), &th, t.at(0.0))
        .unwrap();
    let event = result.event.unwrap();
    assert!((event.ear - 0.25).abs() < 1e-9);
    assert!((event.mar - 0.25).abs() < 1e-9);

    let result = monitor
        .process_at(frame(1), Some(&yawning_face()), &th, t.at(0.1))
        .unwrap();
    assert!((result.event.unwrap().mar - 1.0).abs() < 1e-9);
}

#[test]
fn test_eye_closure_scenario() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(2.0);
    let faces = [open_face(), open_face(), shut_face(), shut_face(), shut_face(), open_face()];

    let mut alarms = Vec::new();
    let mut shut_counts = Vec::new();
    for (i, face) in faces.iter().enumerate() {
        let result = monitor
            .process_at(frame(i as u32), Some(face), &th, t.at(i as f64))
            .unwrap();
        alarms.push(result.play_alarm);
        shut_counts.push(result.event.unwrap().eye_shut_counter);
    }

    assert_eq!(shut_counts, vec![0, 0, 1, 1, 1, 1]);
    assert_eq!(alarms, vec![false, false, false, false, true, false]);
    assert!(!monitor.state().eye_shut_flag);
    assert_eq!(monitor.state().alarm_counter, 1);
}

#[test]
fn test_alarm_frame_shows_warning() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(1.0);

    monitor.process_at(frame(0), Some(&shut_face()), &th, t.at(0.0)).unwrap();
    let result = monitor
        .process_at(frame(1), Some(&shut_face()), &th, t.at(1.0))
        .unwrap();

    assert!(result.play_alarm);
    assert!(result.edges.alarm);
    assert_eq!(result.color, ColorState::Drowsy);
    assert_eq!(result.overlays.len(), 4);
    assert_eq!(result.overlays[3].text, dms::annotate::WAKE_UP_TEXT);
    assert_eq!(result.overlays[2].text, "DROWSY: 1.000 Secs");
}

#[test]
fn test_no_face_after_closure_resets() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(5.0);

    for i in 0..3 {
        monitor
            .process_at(frame(i), Some(&shut_face()), &th, t.at(i as f64))
            .unwrap();
    }
    assert!(monitor.state().drowsy_time > 0.0);

    let result = monitor.process_at(frame(3), None, &th, t.at(3.0)).unwrap();
    assert!(!result.play_alarm);
    assert!(!result.face_detected());
    assert!(result.overlays.is_empty());
    assert_eq!(result.color, ColorState::Alert);
    assert_eq!(monitor.state().drowsy_time, 0.0);
    assert!(monitor.last_event().is_none());
}

#[test]
fn test_no_face_clears_active_alarm() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(1.0);

    for i in 0..3 {
        monitor
            .process_at(frame(i), Some(&shut_face()), &th, t.at(i as f64))
            .unwrap();
    }
    assert!(monitor.state().play_alarm);

    let result = monitor
        .process_from(&mut NoFace, frame(3), &th, t.at(3.0))
        .unwrap();
    assert!(!result.play_alarm);
    assert!(!monitor.state().play_alarm);
}

#[test]
fn test_yawn_counter_counts_rising_edges() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(4.0);
    let faces = [open_face(), yawning_face(), yawning_face(), open_face(), yawning_face()];

    for (i, face) in faces.iter().enumerate() {
        monitor
            .process_at(frame(i as u32), Some(face), &th, t.at(i as f64 * 0.1))
            .unwrap();
    }
    assert_eq!(monitor.state().yawn_counter, 2);
    assert_eq!(monitor.last_event().unwrap().yawn_counter, 2);
}

#[test]
fn test_thresholds_are_per_call() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);

    // EAR 0.25 is "shut" under a 0.3 threshold
    let strict = Thresholds {
        ear_thresh: 0.3,
        ..thresholds(4.0)
    };
    let result = monitor
        .process_at(frame(0), Some(&open_face()), &strict, t.at(0.0))
        .unwrap();
    assert_eq!(result.color, ColorState::Drowsy);

    let result = monitor
        .process_at(frame(1), Some(&open_face()), &thresholds(4.0), t.at(0.5))
        .unwrap();
    assert_eq!(result.color, ColorState::Alert);
}

#[test]
fn test_missing_landmarks_read_as_closed() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(4.0);

    let result = monitor
        .process_at(frame(0), Some(&LandmarkSet::default()), &th, t.at(0.0))
        .unwrap();
    let event = result.event.unwrap();
    assert_eq!(event.ear, 0.0);
    assert_eq!(event.mar, 0.0);
    assert_eq!(event.eye_shut_counter, 1);
    assert_eq!(result.features.unwrap().marker_points().count(), 0);
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);

    let bad = Thresholds {
        wait_time: f64::INFINITY,
        ..Default::default()
    };
    assert!(matches!(
        monitor.process_at(frame(0), None, &bad, t.at(0.0)),
        Err(DmsError::Config(_))
    ));

    let mut broken = VideoFrame::blank(4, 4).unwrap();
    broken.data.truncate(5);
    assert!(matches!(
        monitor.process_at(broken, None, &Thresholds::default(), t.at(0.0)),
        Err(DmsError::InvalidFrame(_))
    ));
}

#[test]
fn test_closure_source() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(4.0);
    let mut calls = 0;
    let mut source = |_frame: &VideoFrame| -> Result<Option<LandmarkSet>, DmsError> {
        calls += 1;
        Ok(Some(shut_face()))
    };

    let result = monitor
        .process_from(&mut source, frame(0), &th, t.at(0.0))
        .unwrap();
    assert!(result.face_detected());
    assert_eq!(calls, 1);
}

#[test]
fn test_output_frame_is_mirrored_with_markers() {
    let t = Timeline::new();
    let mut monitor = monitor(&t);
    let th = thresholds(4.0);

    let result = monitor
        .process_at(frame(7), Some(&open_face()), &th, t.at(0.0))
        .unwrap();
    let features = result.features.as_ref().unwrap();
    let p1 = features.right_eye.unwrap()[0];

    // marker drawn at P1 then mirrored
    let mirrored_x = (WIDTH as i32 - 1 - p1.x) as u32;
    assert_eq!(result.frame.get_pixel(mirrored_x, p1.y as u32), Some([0, 255, 0]));
    assert_eq!(result.frame.sequence, 7);
    assert_eq!(result.frame.dimensions(), (WIDTH, HEIGHT));
}
