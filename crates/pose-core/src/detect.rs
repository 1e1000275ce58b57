//! The pose-estimation capability boundary.

use anyhow::Result;
use image::RgbImage;

use crate::landmark::Landmarks;

/// Pose-estimation capability: one image in, one landmark set out.
///
/// An empty set means no subject was found in the frame; that is not an
/// error. Implementations may own model state (weights, runtime sessions)
/// but must not leak per-call state between invocations, since a single
/// instance is shared across concurrent streaming sessions.
pub trait PoseDetect: Send {
    fn detect(&mut self, image: &RgbImage) -> Result<Landmarks>;
}
