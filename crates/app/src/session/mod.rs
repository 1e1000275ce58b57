//! Per-connection pushup analysis session.
//!
//! The module is split into focused submodules:
//! - `data`: session counters and the periodic status payload.
//! - `reps`: the repetition-counting state machine.
//! - `render`: HUD overlays drawn onto the outgoing frame.
//! - `pipeline`: per-frame detect → angles → state → render orchestration.
//! - `transport`: the WebSocket receive/process/send loop.

use std::sync::{Arc, Mutex};

use pose_core::PoseDetect;

/// Pose detector shared by every session. The provider needs `&mut self`,
/// so concurrent sessions serialise their calls behind the mutex.
pub(crate) type SharedDetector = Arc<Mutex<dyn PoseDetect + Send>>;

pub(crate) mod data;
pub(crate) mod pipeline;
pub(crate) mod render;
pub(crate) mod reps;
pub(crate) mod transport;
