//! Pose-detection core shared by the pushup trainer service.
//!
//! The crate keeps the detection capability behind a small trait so the
//! streaming session never depends on a concrete model runtime:
//! - `landmark`: body keypoints and the per-frame landmark set.
//! - `angle`: joint-angle geometry on landmark positions.
//! - `detect`: the `PoseDetect` capability trait.
//! - `movenet`: MoveNet SinglePose provider running on ONNX Runtime.

pub mod angle;
pub mod detect;
pub mod landmark;
pub mod movenet;

pub use angle::angle_between;
pub use detect::PoseDetect;
pub use landmark::{BodyPoint, Landmark, Landmarks};
pub use movenet::MoveNetDetector;
