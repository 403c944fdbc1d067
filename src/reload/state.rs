//! Reentrancy state for reload passes.
//!
//! One pass at a time mutates the page; triggers that land while a pass is
//! in flight are absorbed into a single follow-up iteration.
//!
//! Transition table:
//!
//! ```text
//! Idle      --request-->  Attempting (pass starts)
//! Attempting--request-->  Attempting (reschedule = true, absorbed)
//! Attempting--arm------>  Attempting (reschedule = false, iteration starts)
//! Attempting--finish--->  Idle       (only with no pending reschedule)
//! ```

/// The `in_progress`/`reschedule` pair guarding reload passes.
///
/// Invariant: `reschedule` is true only while `in_progress` is true.
#[derive(Debug, Default)]
pub struct ReloadState {
    in_progress: bool,
    reschedule: bool,
}

impl ReloadState {
    pub const fn new() -> Self {
        Self {
            in_progress: false,
            reschedule: false,
        }
    }

    /// Record a reload request.
    ///
    /// Returns `true` if the caller should start a pass; `false` if an
    /// in-flight pass absorbed the request and will re-run its loop.
    pub fn request(&mut self) -> bool {
        if self.in_progress {
            self.reschedule = true;
            false
        } else {
            self.in_progress = true;
            true
        }
    }

    /// Start one loop iteration.
    ///
    /// Clears any absorbed request: only triggers arriving after this point
    /// count against the iteration's finalize decision.
    pub fn arm(&mut self) {
        self.reschedule = false;
    }

    /// Whether a trigger arrived since the iteration was armed.
    pub fn rescheduled(&self) -> bool {
        self.reschedule
    }

    /// End the pass.
    ///
    /// Only legal at the finalize decision point, where `rescheduled()` has
    /// just been seen false.
    pub fn finish(&mut self) {
        debug_assert!(!self.reschedule, "finish with a pending reschedule");
        self.in_progress = false;
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariant(state: &ReloadState) {
        // reschedule may be true only while a pass is in progress
        assert!(!state.rescheduled() || state.in_progress());
    }

    #[test]
    fn test_first_request_starts_pass() {
        let mut state = ReloadState::new();
        assert!(!state.in_progress());

        assert!(state.request());
        assert!(state.in_progress());
        assert!(!state.rescheduled());
        assert_invariant(&state);
    }

    #[test]
    fn test_request_during_pass_is_absorbed() {
        let mut state = ReloadState::new();
        assert!(state.request());
        state.arm();

        assert!(!state.request());
        assert!(state.rescheduled());
        assert_invariant(&state);

        // Further requests coalesce into the same reschedule
        assert!(!state.request());
        assert!(state.rescheduled());
    }

    #[test]
    fn test_arm_clears_absorbed_request() {
        let mut state = ReloadState::new();
        assert!(state.request());
        state.arm();
        assert!(!state.request());

        state.arm();
        assert!(!state.rescheduled());
        assert_invariant(&state);
    }

    #[test]
    fn test_finish_returns_to_idle() {
        let mut state = ReloadState::new();
        assert!(state.request());
        state.arm();
        state.finish();

        assert!(!state.in_progress());
        assert!(!state.rescheduled());

        // The next request starts a fresh pass
        assert!(state.request());
    }

    #[test]
    fn test_burst_sequence() {
        // Two triggers within one pass window: one pass, one extra iteration
        let mut state = ReloadState::new();

        assert!(state.request()); // trigger 1: pass starts
        state.arm(); // iteration 1
        assert!(!state.request()); // trigger 2: absorbed mid-iteration
        assert!(state.rescheduled()); // decision point: run again

        state.arm(); // iteration 2
        assert!(!state.rescheduled()); // decision point: finalize
        state.finish();
        assert!(!state.in_progress());
    }
}
