//! WebSocket session loop: receive → decode → pipeline → encode → send.
//!
//! The loop is strictly sequential within a session; rep-state updates are
//! ordered by frame arrival, and the only suspension points are the inbound
//! receive and the outbound sends. Nothing per-frame may end the session
//! except a transport failure or the decode-failure ceiling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use actix_ws::{AggregatedMessage, AggregatedMessageStream, CloseCode, CloseReason, Session};
use chrono::Utc;
use futures_util::StreamExt;
use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, error, info, warn};

use crate::session::{
    data::{SessionStats, StatusUpdate, HEARTBEAT_INTERVAL, MAX_DECODE_FAILURES},
    pipeline::process_frame,
    reps::{FormGate, RepState},
    SharedDetector,
};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Drive one client session from accept to disconnect. The session summary
/// is logged exactly once, whichever path ends the loop.
pub(crate) async fn run_session(
    mut session: Session,
    mut stream: AggregatedMessageStream,
    detector: SharedDetector,
    jpeg_quality: u8,
) {
    let session_id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
    info!(session_id, "client connected");
    metrics::counter!("pushup_sessions_total").increment(1);
    metrics::gauge!("pushup_active_sessions").increment(1.0);

    let mut stats = SessionStats::new();
    let mut state = RepState::new();
    let mut feedback: &'static str = "Move into frame";

    while let Some(message) = stream.next().await {
        let message = match message {
            Ok(message) => message,
            Err(err) => {
                error!(session_id, "receive error: {err}");
                break;
            }
        };

        match message {
            AggregatedMessage::Binary(payload) => {
                let frame_number = stats.frame_received();
                if frame_number % HEARTBEAT_INTERVAL == 0 {
                    debug!(
                        session_id,
                        frame = frame_number,
                        count = state.count,
                        "session heartbeat"
                    );
                }

                let decode_start = Instant::now();
                let frame = match image::load_from_memory(&payload) {
                    Ok(decoded) => decoded.to_rgb8(),
                    Err(err) => {
                        warn!(
                            session_id,
                            frame = frame_number,
                            "frame decode failed: {err}"
                        );
                        metrics::counter!("pushup_decode_failures_total").increment(1);
                        if stats.decode_failed() {
                            error!(
                                session_id,
                                "{MAX_DECODE_FAILURES} consecutive decode failures; closing session"
                            );
                            break;
                        }
                        continue;
                    }
                };
                stats.decode_succeeded();
                metrics::histogram!("pushup_stage_latency_seconds", "stage" => "decode")
                    .record(decode_start.elapsed().as_secs_f64());

                let pipeline_start = Instant::now();
                let output = {
                    let mut guard = detector
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    process_frame(&frame, &mut *guard, state)
                };
                metrics::histogram!("pushup_stage_latency_seconds", "stage" => "pipeline")
                    .record(pipeline_start.elapsed().as_secs_f64());

                let previous_whole = state.whole_reps();
                if output.state.count != state.count {
                    info!(
                        session_id,
                        "rep count {} -> {}", state.count, output.state.count
                    );
                }
                state = output.state;
                feedback = output.feedback;
                if state.whole_reps() > previous_whole {
                    stats.rep_completed(state.form == FormGate::Confirmed);
                }

                let mut encoded = Vec::new();
                if let Err(err) =
                    JpegEncoder::new_with_quality(&mut encoded, jpeg_quality)
                        .encode_image(&output.frame)
                {
                    error!(session_id, frame = frame_number, "JPEG encode failed: {err}");
                    metrics::counter!("pushup_encode_failures_total").increment(1);
                    continue;
                }

                if session.binary(encoded).await.is_err() {
                    error!(session_id, "frame send failed; closing session");
                    break;
                }
                metrics::counter!("pushup_frames_total").increment(1);

                if stats.frame_processed() {
                    let status = StatusUpdate {
                        count: state.count as i64,
                        feedback,
                        form: state.form_flag(),
                        correct_reps: stats.correct_reps,
                        incorrect_reps: stats.incorrect_reps,
                        timestamp: Utc::now().to_rfc3339(),
                    };
                    match serde_json::to_string(&status) {
                        Ok(json) => {
                            if session.text(json).await.is_err() {
                                error!(session_id, "status send failed; closing session");
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(session_id, "status serialisation failed: {err}");
                        }
                    }
                }
            }
            AggregatedMessage::Ping(payload) => {
                if session.pong(&payload).await.is_err() {
                    break;
                }
            }
            AggregatedMessage::Close(reason) => {
                debug!(session_id, "client closed: {reason:?}");
                break;
            }
            AggregatedMessage::Text(_) | AggregatedMessage::Pong(_) => {}
        }
    }

    metrics::gauge!("pushup_active_sessions").decrement(1.0);
    info!(
        session_id,
        frames = stats.received_frames,
        processed = stats.processed_frames,
        reps = state.count,
        correct = stats.correct_reps,
        incorrect = stats.incorrect_reps,
        duration_s = stats.started_at.elapsed().as_secs_f64(),
        "session ended"
    );
    let _ = session
        .close(Some(CloseReason::from(CloseCode::Normal)))
        .await;
}
