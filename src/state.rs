//! The user-visible processing state machine.
//!
//! `idle → validating → uploading → persisting → succeeded | failed`
//!
//! Phases only move forward within a session; the single backward edge is an
//! explicit [`ProcessingState::reset`] from a terminal phase back to `idle`
//! (the user acknowledging the outcome and starting over). There is no
//! automatic retry.
//!
//! The progress percentage shown during `uploading` is a timed sweep, not a
//! byte count — this transport exposes no real transfer events. Testers:
//! treat it as cosmetic; assert on phases, never on mid-upload percentages.

use serde::Serialize;

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Validating,
    Uploading,
    Persisting,
    Succeeded,
    Failed,
}

impl Phase {
    /// Position in the forward order. `Succeeded` and `Failed` share a rank:
    /// they are alternative terminals, not successive steps.
    fn rank(self) -> u8 {
        match self {
            Phase::Idle => 0,
            Phase::Validating => 1,
            Phase::Uploading => 2,
            Phase::Persisting => 3,
            Phase::Succeeded | Phase::Failed => 4,
        }
    }

    /// Both terminal phases stay put until the user resets.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

/// Snapshot of the session's progress, suitable for rendering directly.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingState {
    pub phase: Phase,
    /// 0–100. Cosmetic during `uploading` (see module docs).
    pub progress_percent: u8,
    /// Short human-readable status line.
    pub message: String,
    /// Present only in `failed`.
    pub error_detail: Option<String>,
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            progress_percent: 0,
            message: String::new(),
            error_detail: None,
        }
    }
}

impl ProcessingState {
    /// Move forward to `phase`. Backward moves are ignored (and flagged in
    /// debug builds) so a late cosmetic tick can never rewind a terminal
    /// state.
    pub fn advance(&mut self, phase: Phase, percent: u8, message: impl Into<String>) {
        debug_assert!(
            phase.rank() >= self.phase.rank(),
            "phase may not move backward: {:?} -> {:?}",
            self.phase,
            phase
        );
        if phase.rank() < self.phase.rank() {
            return;
        }
        self.phase = phase;
        self.progress_percent = self.progress_percent.max(percent.min(100));
        self.message = message.into();
    }

    /// Raise the percentage without changing phase. Drops ticks that would
    /// move backward or land outside `uploading`'s cosmetic band.
    pub fn tick(&mut self, percent: u8) {
        if self.phase == Phase::Uploading && percent > self.progress_percent {
            self.progress_percent = percent.min(100);
        }
    }

    /// Terminal success.
    pub fn succeed(&mut self, message: impl Into<String>) {
        self.advance(Phase::Succeeded, 100, message);
        self.error_detail = None;
    }

    /// Terminal failure with a user-facing message and the underlying detail.
    pub fn fail(&mut self, message: impl Into<String>, detail: impl Into<String>) {
        self.advance(Phase::Failed, 100, message);
        self.error_detail = Some(detail.into());
    }

    /// Back to `idle` for an explicit user retry. Only valid from a terminal
    /// phase; mid-flight resets are refused.
    pub fn reset(&mut self) -> bool {
        if self.phase == Phase::Idle || self.phase.is_terminal() {
            *self = Self::default();
            true
        } else {
            false
        }
    }
}
