use face_geometry::{LandmarkSource, NamedLandmarks, Point2};
use proptest::prelude::*;

use dms::{DmsAlert, DmsConfig, DmsModule, DriverStatus, NeutralTick};

const EYE_WIDTH: f64 = 30.0;
const MOUTH_WIDTH: f64 = 60.0;

/// Landmarks whose EAR and MAR come out at the requested values
fn face(ear: f64, mar: f64) -> NamedLandmarks {
    let eye = |x0: f64| {
        let gap = ear * EYE_WIDTH;
        [
            Point2::new(x0, 200.0),
            Point2::new(x0 + 8.0, 200.0 - gap / 2.0),
            Point2::new(x0 + 22.0, 200.0 - gap / 2.0),
            Point2::new(x0 + EYE_WIDTH, 200.0),
            Point2::new(x0 + 22.0, 200.0 + gap / 2.0),
            Point2::new(x0 + 8.0, 200.0 + gap / 2.0),
        ]
    };
    let gap = mar * MOUTH_WIDTH;
    NamedLandmarks {
        left_eye: eye(250.0),
        right_eye: eye(360.0),
        mouth: [
            Point2::new(320.0, 300.0 - gap / 2.0),
            Point2::new(320.0, 300.0 + gap / 2.0),
            Point2::new(290.0, 300.0),
            Point2::new(290.0 + MOUTH_WIDTH, 300.0),
        ],
    }
}

fn feed(module: &mut DmsModule, landmarks: &NamedLandmarks, frames: usize) -> Vec<DmsAlert> {
    (0..frames)
        .flat_map(|_| module.process(Some(landmarks as &dyn LandmarkSource)).alerts)
        .collect()
}

fn module() -> DmsModule {
    DmsModule::new(DmsConfig::default()).unwrap()
}

#[test]
fn closed_eyes_reach_drowsy_with_one_alert() {
    let mut dms = module();
    let alerts = feed(&mut dms, &face(0.10, 0.10), 30);

    assert_eq!(alerts, vec![DmsAlert::Drowsiness]);
    assert_eq!(dms.state().status, DriverStatus::Drowsy);
    assert_eq!(dms.state().drowsy_frame_counter, 30);
}

#[test]
fn two_frame_closure_is_not_a_blink() {
    let mut dms = module();
    feed(&mut dms, &face(0.10, 0.10), 2);
    feed(&mut dms, &face(0.30, 0.10), 1);

    assert_eq!(dms.state().eye_closed_frames, 0);
    assert_eq!(dms.state().blink_count, 0);
}

#[test]
fn sustained_yawn_counts_once() {
    let mut dms = module();
    let yawn = face(0.30, 0.80);

    let alerts = feed(&mut dms, &yawn, 15);
    assert_eq!(alerts, vec![DmsAlert::Yawning]);
    assert_eq!(dms.state().yawn_count, 1);
    assert_eq!(dms.state().status, DriverStatus::Yawning);

    assert!(feed(&mut dms, &yawn, 15).is_empty());
    assert_eq!(dms.state().yawn_count, 1);
}

#[test]
fn drowsy_returns_to_normal_after_reset_frames() {
    let mut dms = module();
    feed(&mut dms, &face(0.10, 0.10), 30);
    assert_eq!(dms.state().status, DriverStatus::Drowsy);

    feed(&mut dms, &face(0.30, 0.10), 24);
    assert_eq!(dms.state().status, DriverStatus::Drowsy);
    feed(&mut dms, &face(0.30, 0.10), 1);
    assert_eq!(dms.state().status, DriverStatus::Normal);
    // The long closure also ended as one blink
    assert_eq!(dms.state().blink_count, 1);
}

#[test]
fn missing_face_is_a_neutral_tick() {
    let mut dms = module();
    feed(&mut dms, &face(0.10, 0.10), 2);
    let before = dms.state().clone();

    let analysis = dms.process(None);
    assert_eq!(analysis.neutral, Some(NeutralTick::NoFace));
    assert!(!analysis.face_detected);
    assert_eq!(dms.state(), &before);

    // The closed run continues across the gap
    feed(&mut dms, &face(0.10, 0.10), 1);
    assert_eq!(dms.state().eye_closed_frames, 3);
    assert_eq!(dms.neutral_ticks(), 1);
    assert_eq!(dms.ticks(), 4);
}

#[test]
fn degenerate_geometry_is_a_neutral_tick() {
    let mut dms = module();
    feed(&mut dms, &face(0.10, 0.10), 5);
    let before = dms.state().clone();

    let mut broken = face(0.10, 0.10);
    broken.left_eye[3] = broken.left_eye[0];
    let analysis = dms.process(Some(&broken as &dyn LandmarkSource));

    assert_eq!(analysis.neutral, Some(NeutralTick::DegenerateGeometry));
    assert!(analysis.face_detected);
    assert!(analysis.face_bbox.is_some());
    assert_eq!(dms.state(), &before);
}

#[test]
fn analysis_reports_ratios_and_box() {
    let mut dms = module();
    let analysis = dms.process(Some(&face(0.30, 0.10) as &dyn LandmarkSource));

    let sample = analysis.sample.unwrap();
    assert!((sample.ear - 0.30).abs() < 1e-9);
    assert!((sample.mar - 0.10).abs() < 1e-9);

    let bbox = analysis.face_bbox.unwrap();
    assert_eq!(bbox.min_x, 250.0);
    assert_eq!(bbox.max_x, 390.0);
}

#[test]
fn invalid_config_is_rejected() {
    let config = DmsConfig {
        consec_frames: 0,
        ..Default::default()
    };
    assert!(DmsModule::new(config).is_err());
}

/// Frames built from (eyes closed, mouth open, length) segments
fn expand(segments: &[(bool, bool, usize)]) -> Vec<(bool, bool)> {
    segments
        .iter()
        .flat_map(|&(closed, open, len)| std::iter::repeat((closed, open)).take(len))
        .collect()
}

/// Lengths of maximal `true` runs, with whether each run was followed by a `false`
fn runs(flags: impl Iterator<Item = bool>) -> Vec<(usize, bool)> {
    let mut runs = Vec::new();
    let mut current = 0;
    for flag in flags {
        if flag {
            current += 1;
        } else if current > 0 {
            runs.push((current, true));
            current = 0;
        }
    }
    if current > 0 {
        runs.push((current, false));
    }
    runs
}

proptest! {
    #[test]
    fn pt_counts_never_decrease(frames in prop::collection::vec((0.0_f64..0.5, 0.0_f64..1.2), 1..300)) {
        let mut dms = module();
        let (mut blinks, mut yawns) = (0, 0);

        for (ear, mar) in frames {
            let analysis = dms.process_sample(face_geometry::RatioSample::new(ear, mar));
            prop_assert!(analysis.blink_count >= blinks);
            prop_assert!(analysis.yawn_count >= yawns);
            prop_assert!(analysis.blink_count - blinks <= 1);
            prop_assert!(analysis.yawn_count - yawns <= 1);
            blinks = analysis.blink_count;
            yawns = analysis.yawn_count;
        }
    }

    #[test]
    fn pt_drowsy_requires_consec_closed_frames(frames in prop::collection::vec(0.0_f64..0.5, 1..120)) {
        let mut dms = module();
        let mut closed_run = 0u32;

        for ear in frames {
            let before = dms.state().status;
            let analysis = dms.process_sample(face_geometry::RatioSample::new(ear, 0.1));
            closed_run = if ear < 0.22 { closed_run + 1 } else { 0 };

            if analysis.status == DriverStatus::Drowsy && before != DriverStatus::Drowsy {
                prop_assert!(closed_run >= 30);
                prop_assert_eq!(analysis.alerts.clone(), vec![DmsAlert::Drowsiness]);
            }
        }
    }

    #[test]
    fn pt_counts_match_runs_and_episodes(
        segments in prop::collection::vec((any::<bool>(), any::<bool>(), 1_usize..25), 1..40)
    ) {
        let frames = expand(&segments);
        let mut dms = module();
        for &(closed, open) in &frames {
            let ear = if closed { 0.10 } else { 0.30 };
            let mar = if open { 0.80 } else { 0.10 };
            dms.process_sample(face_geometry::RatioSample::new(ear, mar));
        }

        // A blink is a closed run of 3+ frames that the eyes reopened after
        let blinks = runs(frames.iter().map(|f| f.0))
            .into_iter()
            .filter(|&(len, ended)| len >= 3 && ended)
            .count();
        // A yawn is an open-mouth episode that lasted 15+ frames
        let yawns = runs(frames.iter().map(|f| f.1))
            .into_iter()
            .filter(|&(len, _)| len >= 15)
            .count();

        prop_assert_eq!(dms.state().blink_count as usize, blinks);
        prop_assert_eq!(dms.state().yawn_count as usize, yawns);
    }
}
