//! Session handling of missing subjects, smoothing and isolation


use face_framing_guide::{
    config::Config,
    geometry::CanvasSize,
    landmarks::LandmarkIndices,
    session::{FrameOutcome, FramingSession, NoSubjectReason},
    targets::{TargetLayout, TargetSlot},
};
use std::time::Duration;
use test_helpers::{face_aiming_at, frontal_face, CANVAS};

fn center_target_face() -> Vec<face_framing_guide::landmarks::Landmark> {
    let target = TargetLayout::new(Config::default().targets).targets(CANVAS)[TargetSlot::BottomCenter.index()];
    face_aiming_at(CANVAS, target.x, target.y)
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn test_no_face_resets_progress() {
    let mut session = FramingSession::new(Config::default()).unwrap();
    let mesh = center_target_face();

    for now in [0, 500, 1000] {
        session.process_frame(Some(&mesh), CANVAS, ms(now));
    }
    assert_eq!(session.workflow().completed_steps(), &[true, false, false]);

    let outcome = session.process_frame(None, CANVAS, ms(1016));
    assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::NoFace));
    assert_eq!(session.workflow().current_step(), 0);
    assert_eq!(session.workflow().completed_steps(), &[false, false, false]);

    // Smoothing restarts from the next raw point
    let outcome = session.process_frame(Some(&frontal_face(0.5, 0.5, 0.5)), CANVAS, ms(1032));
    let report = outcome.report().unwrap();
    assert_eq!(report.smoothed_aim, report.aim_line.end);
}

#[test]
fn test_missing_landmarks_keep_state() {
    let mut session = FramingSession::new(Config::default()).unwrap();
    let mesh = center_target_face();

    session.process_frame(Some(&mesh), CANVAS, ms(0));
    session.process_frame(Some(&mesh), CANVAS, ms(500));

    let truncated = &mesh[..100];
    let outcome = session.process_frame(Some(truncated), CANVAS, ms(700));
    assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::MissingLandmarks));
    assert_eq!(session.workflow().hold_start(), Some(ms(0)));

    session.process_frame(Some(&mesh), CANVAS, ms(1000));
    assert_eq!(session.workflow().completed_steps(), &[true, false, false]);
}

#[test]
fn test_degenerate_frame_keeps_state() {
    let mut session = FramingSession::new(Config::default()).unwrap();
    let mesh = center_target_face();
    session.process_frame(Some(&mesh), CANVAS, ms(0));

    let mut collapsed = mesh.clone();
    let indices = LandmarkIndices::default();
    collapsed[indices.left_eye] = collapsed[indices.right_eye];
    let outcome = session.process_frame(Some(&collapsed), CANVAS, ms(300));
    assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::DegenerateGeometry));
    assert_eq!(session.workflow().hold_start(), Some(ms(0)));

    let outcome = session.process_frame(Some(&mesh), CANVAS, ms(400));
    assert_eq!(outcome.report().unwrap().workflow.hold_ms, 400);
}

#[test]
fn test_invalid_canvas_is_skipped() {
    let mut session = FramingSession::new(Config::default()).unwrap();
    let mesh = frontal_face(0.5, 0.5, 0.5);

    for canvas in [
        CanvasSize::new(0.0, 480.0),
        CanvasSize::new(640.0, -1.0),
        CanvasSize::new(f64::NAN, 480.0),
    ] {
        let outcome = session.process_frame(Some(&mesh), canvas, ms(0));
        assert_eq!(outcome, FrameOutcome::NoSubject(NoSubjectReason::InvalidCanvas));
    }
}

#[test]
fn test_steady_aim_is_reproduced_exactly() {
    let mut session = FramingSession::new(Config::default()).unwrap();
    let mesh = frontal_face(0.5, 0.5, 0.5);

    for now in 0..20 {
        let outcome = session.process_frame(Some(&mesh), CANVAS, ms(now * 16));
        let report = outcome.report().unwrap();
        assert_eq!(report.smoothed_aim, report.aim_line.end);
    }
}

#[test]
fn test_smoothing_converges_after_step() {
    let mut session = FramingSession::new(Config::default()).unwrap();
    session.process_frame(Some(&frontal_face(0.5, 0.5, 0.5)), CANVAS, ms(0));

    let moved = face_aiming_at(CANVAS, 560.0, 364.0);
    let mut last = None;
    for frame in 1..=100 {
        last = Some(session.process_frame(Some(&moved), CANVAS, ms(frame * 16)));
    }

    let outcome = last.unwrap();
    let report = outcome.report().unwrap();
    assert!((report.smoothed_aim.x - report.aim_line.end.x).abs() < 1e-3);
    assert!((report.smoothed_aim.y - report.aim_line.end.y).abs() < 1e-3);
}

#[test]
fn test_sessions_are_independent() {
    let mut first = FramingSession::new(Config::default()).unwrap();
    let mut second = FramingSession::new(Config::default()).unwrap();
    let on_target = center_target_face();
    let frontal = frontal_face(0.5, 0.5, 0.5);

    for now in [0, 600, 1200] {
        first.process_frame(Some(&on_target), CANVAS, ms(now));
        second.process_frame(Some(&frontal), CANVAS, ms(now));
    }

    assert_eq!(first.workflow().current_step(), 1);
    assert_eq!(second.workflow().current_step(), 0);
    assert!(second.workflow().hold_start().is_none());

    // A reset on one session leaves the other alone
    second.reset();
    assert_eq!(first.workflow().completed_steps(), &[true, false, false]);
}

#[test]
fn test_reset_mid_workflow() {
    let mut session = FramingSession::new(Config::default()).unwrap();
    let mesh = center_target_face();

    // Complete the first step
    for now in [0, 500, 1000, 1016] {
        session.process_frame(Some(&mesh), CANVAS, ms(now));
    }
    assert_eq!(session.workflow().current_step(), 1);

    // Part-way through a hold on the second step
    let target = TargetLayout::new(Config::default().targets).targets(CANVAS)[TargetSlot::BottomRight.index()];
    let right = face_aiming_at(CANVAS, target.x, target.y);
    for frame in 1..=30 {
        session.process_frame(Some(&right), CANVAS, ms(1016 + frame * 16));
    }
    assert!(session.workflow().hold_start().is_some());

    session.reset();
    assert_eq!(session.workflow().current_step(), 0);
    assert_eq!(session.workflow().completed_steps(), &[false, false, false]);
    assert!(!session.workflow().is_complete());
    assert!(session.workflow().hold_start().is_none());

    let outcome = session.process_frame(Some(&frontal_face(0.5, 0.5, 0.5)), CANVAS, ms(2000));
    let report = outcome.report().unwrap();
    assert_eq!(report.smoothed_aim, report.aim_line.end);
}

#[test]
fn test_sessions_can_move_between_threads() {
    let mut session = FramingSession::new(Config::default()).unwrap();
    let mesh = frontal_face(0.5, 0.5, 0.5);

    let handle = std::thread::spawn(move || {
        session.process_frame(Some(&mesh), CANVAS, ms(0));
        session
    });
    let session = handle.join().unwrap();
    assert_eq!(session.workflow().current_step(), 0);
}
