//! Repetition-counting state machine.
//!
//! A full repetition is two phase transitions (down-reached then up-reached),
//! each worth 0.5. The single `Direction` bit is the hysteresis that stops a
//! subject oscillating around a threshold from re-triggering the same phase.
//! The angle thresholds (90°, 160°, 40°) are domain-tuned values and must not
//! be "cleaned up".

/// Which phase transition the counter expects next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    AwaitDescent,
    AwaitAscent,
}

/// Sticky posture gate: counting stays off until one valid extended,
/// straight-body posture has been observed. Never reset within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FormGate {
    Pending,
    Confirmed,
}

/// The only state that survives across frames within a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RepState {
    pub(crate) count: f32,
    pub(crate) direction: Direction,
    pub(crate) form: FormGate,
}

impl RepState {
    pub(crate) fn new() -> Self {
        Self {
            count: 0.0,
            direction: Direction::AwaitDescent,
            form: FormGate::Pending,
        }
    }

    /// Whole repetitions completed (integer part of the half-rep count).
    pub(crate) fn whole_reps(&self) -> u32 {
        self.count as u32
    }

    /// Wire representation of the form gate (0 or 1).
    pub(crate) fn form_flag(&self) -> u8 {
        match self.form {
            FormGate::Pending => 0,
            FormGate::Confirmed => 1,
        }
    }
}

/// Advance the counter with one frame's joint angles.
///
/// Pure value-in/value-out: returns the feedback line and the next state,
/// never mutating shared data. Count moves by at most 0.5 per call and never
/// decreases.
pub(crate) fn advance(
    state: RepState,
    elbow: f32,
    shoulder: f32,
    hip: f32,
) -> (&'static str, RepState) {
    let mut next = state;

    // Arms extended, body straight: valid starting posture.
    if elbow > 160.0 && shoulder > 40.0 && hip > 160.0 {
        next.form = FormGate::Confirmed;
    }

    if next.form != FormGate::Confirmed {
        return ("Get into starting position", next);
    }

    // Down phase: elbow bent, hips still straight.
    if elbow <= 90.0 && hip > 160.0 {
        if next.direction == Direction::AwaitDescent {
            next.count += 0.5;
            next.direction = Direction::AwaitAscent;
        }
        ("Good - Push Up", next)
    // Up phase: same posture that confirms the form gate.
    } else if elbow > 160.0 && shoulder > 40.0 && hip > 160.0 {
        if next.direction == Direction::AwaitAscent {
            next.count += 0.5;
            next.direction = Direction::AwaitDescent;
        }
        ("Good - Go Down", next)
    } else {
        ("Fix Form", next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP: (f32, f32, f32) = (170.0, 50.0, 170.0);
    const DOWN: (f32, f32, f32) = (80.0, 20.0, 170.0);

    fn step(state: RepState, (elbow, shoulder, hip): (f32, f32, f32)) -> (&'static str, RepState) {
        advance(state, elbow, shoulder, hip)
    }

    #[test]
    fn form_gate_confirms_and_sticks() {
        let (feedback, state) = step(RepState::new(), UP);
        assert_eq!(state.form, FormGate::Confirmed);
        assert_eq!(feedback, "Good - Go Down");

        // Arbitrary later angles never reset the gate.
        let (_, state) = step(state, (10.0, 5.0, 20.0));
        assert_eq!(state.form, FormGate::Confirmed);
        let (_, state) = step(state, (0.0, 0.0, 0.0));
        assert_eq!(state.form, FormGate::Confirmed);
    }

    #[test]
    fn no_counting_before_form_confirmed() {
        let (feedback, state) = step(RepState::new(), DOWN);
        assert_eq!(feedback, "Get into starting position");
        assert_eq!(state.count, 0.0);
        assert_eq!(state.direction, Direction::AwaitDescent);
        assert_eq!(state.form, FormGate::Pending);
    }

    #[test]
    fn full_rep_counts_one_point_zero() {
        let state = RepState {
            count: 0.0,
            direction: Direction::AwaitDescent,
            form: FormGate::Confirmed,
        };
        let (feedback, state) = step(state, DOWN);
        assert_eq!(feedback, "Good - Push Up");
        assert_eq!(state.count, 0.5);
        assert_eq!(state.direction, Direction::AwaitAscent);

        let (feedback, state) = step(state, UP);
        assert_eq!(feedback, "Good - Go Down");
        assert_eq!(state.count, 1.0);
        assert_eq!(state.direction, Direction::AwaitDescent);
    }

    #[test]
    fn repeated_down_frames_count_once() {
        let mut state = RepState {
            count: 0.0,
            direction: Direction::AwaitDescent,
            form: FormGate::Confirmed,
        };
        for _ in 0..5 {
            state = step(state, DOWN).1;
        }
        assert_eq!(state.count, 0.5);
    }

    #[test]
    fn count_moves_at_most_half_and_never_down() {
        let mut state = RepState::new();
        let frames = [UP, DOWN, DOWN, (120.0, 30.0, 140.0), UP, UP, DOWN];
        for angles in frames {
            let previous = state.count;
            state = step(state, angles).1;
            assert!(state.count >= previous);
            assert!(state.count - previous <= 0.5);
        }
    }

    #[test]
    fn sagging_hips_block_the_down_phase() {
        let state = RepState {
            count: 0.0,
            direction: Direction::AwaitDescent,
            form: FormGate::Confirmed,
        };
        let (feedback, state) = step(state, (80.0, 20.0, 140.0));
        assert_eq!(feedback, "Fix Form");
        assert_eq!(state.count, 0.0);
        assert_eq!(state.direction, Direction::AwaitDescent);
    }
}
