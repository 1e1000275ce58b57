//! Session counters and outbound status payloads.

use std::time::Instant;

use serde::Serialize;

/// Consecutive decode failures tolerated before the session is cut off.
pub(crate) const MAX_DECODE_FAILURES: u32 = 10;
/// A status record is pushed after every this many processed frames.
pub(crate) const STATUS_INTERVAL: u64 = 10;
/// Heartbeat log cadence, in received frames.
pub(crate) const HEARTBEAT_INTERVAL: u64 = 30;

/// Periodic status record interleaved with the binary frame stream.
#[derive(Serialize)]
pub(crate) struct StatusUpdate<'a> {
    pub(crate) count: i64,
    pub(crate) feedback: &'a str,
    pub(crate) form: u8,
    pub(crate) correct_reps: u32,
    pub(crate) incorrect_reps: u32,
    pub(crate) timestamp: String,
}

/// Per-session diagnostic counters. The decode-failure streak drives the
/// cut-off and the processed-frame count drives the status cadence; nothing
/// here feeds back into rep logic.
pub(crate) struct SessionStats {
    pub(crate) received_frames: u64,
    pub(crate) processed_frames: u64,
    pub(crate) decode_failure_streak: u32,
    pub(crate) correct_reps: u32,
    pub(crate) incorrect_reps: u32,
    pub(crate) started_at: Instant,
}

impl SessionStats {
    pub(crate) fn new() -> Self {
        Self {
            received_frames: 0,
            processed_frames: 0,
            decode_failure_streak: 0,
            correct_reps: 0,
            incorrect_reps: 0,
            started_at: Instant::now(),
        }
    }

    /// Count one inbound frame, returning its 1-based sequence number.
    pub(crate) fn frame_received(&mut self) -> u64 {
        self.received_frames += 1;
        self.received_frames
    }

    /// Record a decode failure; true once the consecutive ceiling is hit.
    pub(crate) fn decode_failed(&mut self) -> bool {
        self.decode_failure_streak += 1;
        self.decode_failure_streak >= MAX_DECODE_FAILURES
    }

    /// A successful decode resets the failure streak.
    pub(crate) fn decode_succeeded(&mut self) {
        self.decode_failure_streak = 0;
    }

    /// Count one fully processed-and-delivered frame; true when a status
    /// record is due.
    pub(crate) fn frame_processed(&mut self) -> bool {
        self.processed_frames += 1;
        self.processed_frames % STATUS_INTERVAL == 0
    }

    /// Tally a completed repetition by form classification.
    pub(crate) fn rep_completed(&mut self, correct: bool) {
        if correct {
            self.correct_reps += 1;
        } else {
            self.incorrect_reps += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_reached_after_ten_consecutive_failures() {
        let mut stats = SessionStats::new();
        for _ in 0..MAX_DECODE_FAILURES - 1 {
            assert!(!stats.decode_failed());
        }
        assert!(stats.decode_failed());
    }

    #[test]
    fn success_resets_failure_streak() {
        let mut stats = SessionStats::new();
        for _ in 0..MAX_DECODE_FAILURES - 1 {
            assert!(!stats.decode_failed());
        }
        stats.decode_succeeded();
        assert_eq!(stats.decode_failure_streak, 0);
        for _ in 0..MAX_DECODE_FAILURES - 1 {
            assert!(!stats.decode_failed());
        }
        assert!(stats.decode_failed());
    }

    #[test]
    fn status_due_every_tenth_processed_frame() {
        let mut stats = SessionStats::new();
        for frame in 1..=35u64 {
            let due = stats.frame_processed();
            assert_eq!(due, frame % STATUS_INTERVAL == 0, "frame {frame}");
        }
    }

    #[test]
    fn skipped_frames_do_not_advance_the_cadence() {
        let mut stats = SessionStats::new();
        for _ in 0..9 {
            stats.frame_processed();
        }
        // Received-but-skipped frames move only the receive counter.
        stats.frame_received();
        stats.frame_received();
        assert!(stats.frame_processed());
    }

    #[test]
    fn rep_tally_splits_by_classification() {
        let mut stats = SessionStats::new();
        stats.rep_completed(true);
        stats.rep_completed(true);
        stats.rep_completed(false);
        assert_eq!(stats.correct_reps, 2);
        assert_eq!(stats.incorrect_reps, 1);
    }
}
