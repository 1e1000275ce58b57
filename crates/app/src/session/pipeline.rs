//! Per-frame processing: detect → angles → state update → render.
//!
//! Failure containment is structural: each stage's `Result` maps onto a
//! degraded feedback line, and no per-frame failure can escape the pipeline.
//! Rep state only moves on a fully successful state update; every degraded
//! path hands the prior state back untouched.

use image::RgbImage;
use pose_core::{angle_between, BodyPoint, Landmarks, PoseDetect};
use tracing::{debug, error, warn};

use crate::session::render::{self, Hud};
use crate::session::reps::{self, FormGate, RepState};

/// Gauge/percent interpolation domain over the elbow angle.
const ELBOW_DOMAIN: (f32, f32) = (90.0, 160.0);

/// Joint angles derived for one frame. Transient; recomputed every frame.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct JointAngles {
    pub(crate) elbow: f32,
    pub(crate) shoulder: f32,
    pub(crate) hip: f32,
}

/// Terminal outcome of one frame: an annotated buffer is always produced.
pub(crate) struct FrameOutput {
    pub(crate) frame: RgbImage,
    pub(crate) state: RepState,
    pub(crate) feedback: &'static str,
    pub(crate) angles: JointAngles,
}

/// Process one decoded frame against the shared detector and the session's
/// rep state. Never fails; degraded stages fall through to rendering with
/// whatever values are current.
pub(crate) fn process_frame(
    frame: &RgbImage,
    detector: &mut dyn PoseDetect,
    state: RepState,
) -> FrameOutput {
    if frame.width() == 0 || frame.height() == 0 {
        warn!("empty frame received; returning placeholder");
        return FrameOutput {
            frame: render::placeholder_frame("Invalid Frame"),
            state,
            feedback: "Move into frame",
            angles: JointAngles::default(),
        };
    }

    // Overlays land on a private copy so a failed stage cannot corrupt the
    // caller's buffer.
    let mut canvas = frame.clone();
    let mut feedback: &'static str = "Move into frame";
    let mut angles = JointAngles::default();
    let mut next = state;

    match detector.detect(frame) {
        Err(err) => {
            error!("pose detection failed: {err:#}");
            render::draw_caption(&mut canvas, "Error");
            return FrameOutput {
                frame: canvas,
                state,
                feedback: "Processing error",
                angles,
            };
        }
        Ok(landmarks) if landmarks.is_empty() => {
            debug!("no pose detected in frame");
        }
        Ok(landmarks) => {
            let elbow = joint_angle(
                &landmarks,
                BodyPoint::RightShoulder,
                BodyPoint::RightElbow,
                BodyPoint::RightWrist,
            );
            let shoulder = joint_angle(
                &landmarks,
                BodyPoint::RightElbow,
                BodyPoint::RightShoulder,
                BodyPoint::RightHip,
            );
            let hip = joint_angle(
                &landmarks,
                BodyPoint::RightShoulder,
                BodyPoint::RightHip,
                BodyPoint::RightKnee,
            );

            angles = JointAngles {
                elbow: elbow.unwrap_or(0.0),
                shoulder: shoulder.unwrap_or(0.0),
                hip: hip.unwrap_or(0.0),
            };

            if elbow.is_some() && shoulder.is_some() && hip.is_some() {
                let (line, updated) =
                    reps::advance(state, angles.elbow, angles.shoulder, angles.hip);
                feedback = line;
                next = updated;
            } else {
                warn!("right-side landmarks incomplete; rep state unchanged");
                feedback = "Error detecting pose";
            }
        }
    }

    let hud = Hud {
        percent: render::interp(angles.elbow, ELBOW_DOMAIN, (0.0, 100.0)),
        bar: render::interp(angles.elbow, ELBOW_DOMAIN, (380.0, 50.0)),
        count: next.count,
        feedback,
        form_ok: next.form == FormGate::Confirmed,
        elbow: angles.elbow,
        shoulder: angles.shoulder,
        hip: angles.hip,
    };
    render::draw_overlays(&mut canvas, &hud);

    FrameOutput {
        frame: canvas,
        state: next,
        feedback,
        angles,
    }
}

/// Angle at `vertex` for a landmark triple; `None` when any point is missing.
fn joint_angle(
    landmarks: &Landmarks,
    proximal: BodyPoint,
    vertex: BodyPoint,
    distal: BodyPoint,
) -> Option<f32> {
    let p = landmarks.get(proximal)?;
    let v = landmarks.get(vertex)?;
    let d = landmarks.get(distal)?;
    Some(angle_between(p, v, d))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use anyhow::{anyhow, Result};
    use pose_core::Landmark;

    use super::*;

    /// Detector that replays a scripted sequence of results.
    struct Scripted {
        responses: VecDeque<Result<Landmarks>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<Landmarks>>) -> Self {
            Self {
                responses: responses.into(),
            }
        }
    }

    impl PoseDetect for Scripted {
        fn detect(&mut self, _image: &RgbImage) -> Result<Landmarks> {
            self.responses
                .pop_front()
                .unwrap_or_else(|| Ok(Landmarks::empty()))
        }
    }

    fn point(body: BodyPoint, x: f32, y: f32) -> Landmark {
        Landmark::new(body, x, y)
    }

    /// Right-side view, arms extended: elbow/shoulder/hip all straight.
    fn up_pose() -> Landmarks {
        Landmarks::new(vec![
            point(BodyPoint::RightShoulder, 0.0, 0.0),
            point(BodyPoint::RightElbow, 10.0, 0.0),
            point(BodyPoint::RightWrist, 20.0, 0.0),
            point(BodyPoint::RightHip, -20.0, 0.0),
            point(BodyPoint::RightKnee, -40.0, 0.0),
        ])
    }

    /// Right-side view, bottom of the pushup: elbow at 90, body straight.
    fn down_pose() -> Landmarks {
        Landmarks::new(vec![
            point(BodyPoint::RightShoulder, 0.0, 0.0),
            point(BodyPoint::RightElbow, 10.0, 0.0),
            point(BodyPoint::RightWrist, 10.0, 10.0),
            point(BodyPoint::RightHip, -20.0, 0.0),
            point(BodyPoint::RightKnee, -40.0, 0.0),
        ])
    }

    fn frame() -> RgbImage {
        RgbImage::new(64, 64)
    }

    #[test]
    fn no_pose_leaves_state_untouched() {
        let mut detector = Scripted::new(vec![Ok(Landmarks::empty())]);
        let state = RepState::new();
        let output = process_frame(&frame(), &mut detector, state);
        assert_eq!(output.feedback, "Move into frame");
        assert_eq!(output.state, state);
        assert_eq!(output.frame.dimensions(), (64, 64));
    }

    #[test]
    fn full_rep_across_three_frames() {
        let mut detector = Scripted::new(vec![
            Ok(up_pose()),
            Ok(down_pose()),
            Ok(up_pose()),
        ]);
        let image = frame();

        let mut state = RepState::new();
        let out = process_frame(&image, &mut detector, state);
        assert_eq!(out.feedback, "Good - Go Down");
        assert_eq!(out.state.form, FormGate::Confirmed);
        assert_eq!(out.state.count, 0.0);
        state = out.state;

        let out = process_frame(&image, &mut detector, state);
        assert_eq!(out.feedback, "Good - Push Up");
        assert_eq!(out.state.count, 0.5);
        state = out.state;

        let out = process_frame(&image, &mut detector, state);
        assert_eq!(out.feedback, "Good - Go Down");
        assert_eq!(out.state.count, 1.0);
        assert_eq!(out.state.whole_reps(), 1);
    }

    #[test]
    fn detector_error_degrades_without_state_change() {
        let mut detector = Scripted::new(vec![Err(anyhow!("runtime exploded"))]);
        let state = RepState {
            count: 2.5,
            ..RepState::new()
        };
        let output = process_frame(&frame(), &mut detector, state);
        assert_eq!(output.feedback, "Processing error");
        assert_eq!(output.state, state);
        assert_eq!(output.frame.dimensions(), (64, 64));
    }

    #[test]
    fn empty_input_frame_yields_placeholder() {
        let mut detector = Scripted::new(vec![]);
        let empty = RgbImage::new(0, 0);
        let state = RepState::new();
        let output = process_frame(&empty, &mut detector, state);
        assert_eq!(output.frame.dimensions(), (640, 480));
        assert_eq!(output.state, state);
    }

    #[test]
    fn missing_landmark_reports_detection_error() {
        // Wrist, hip, and knee absent: no triple completes.
        let partial = Landmarks::new(vec![
            point(BodyPoint::RightShoulder, 0.0, 0.0),
            point(BodyPoint::RightElbow, 10.0, 0.0),
        ]);
        let mut detector = Scripted::new(vec![Ok(partial)]);
        let state = RepState::new();
        let output = process_frame(&frame(), &mut detector, state);
        assert_eq!(output.feedback, "Error detecting pose");
        assert_eq!(output.state, state);
    }

    #[test]
    fn repeated_down_frames_count_a_single_half_rep() {
        let mut detector = Scripted::new(vec![
            Ok(up_pose()),
            Ok(down_pose()),
            Ok(down_pose()),
            Ok(down_pose()),
        ]);
        let image = frame();
        let mut state = RepState::new();
        for _ in 0..4 {
            state = process_frame(&image, &mut detector, state).state;
        }
        assert_eq!(state.count, 0.5);
    }
}
