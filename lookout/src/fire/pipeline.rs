//! Coalescing refresh state machine.
//!
//! A lookout runs at most one fire-behavior pass at a time. Triggers that
//! arrive while a pass runs are folded into a single pending flag, so any
//! burst of triggers during one pass yields exactly one follow-up pass.
//!
//! # State Machine
//!
//! ```text
//! Idle ──trigger──► Running ──trigger──► RunningWithPending
//!  ▲                 │   ▲                  │        │
//!  └────complete─────┘   └────complete──────┘     trigger (no change)
//! ```

/// Refresh state of one lookout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    /// No pass running.
    #[default]
    Idle,
    /// A pass is running and nothing is queued.
    Running,
    /// A pass is running and one more has been requested.
    RunningWithPending,
}

/// Result of [`RefreshState::trigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The caller must start a pass.
    Start,
    /// A running pass will be followed by another; nothing to start.
    Coalesced,
}

/// Result of [`RefreshState::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// No request is pending; the lookout is idle.
    Finished,
    /// A request arrived during the pass; run another one.
    Restart,
}

impl RefreshState {
    /// Records a refresh request.
    pub fn trigger(&mut self) -> TriggerOutcome {
        match self {
            RefreshState::Idle => {
                *self = RefreshState::Running;
                TriggerOutcome::Start
            }
            RefreshState::Running | RefreshState::RunningWithPending => {
                *self = RefreshState::RunningWithPending;
                TriggerOutcome::Coalesced
            }
        }
    }

    /// Records the end of a pass, successful or aborted.
    pub fn complete(&mut self) -> CompletionOutcome {
        match self {
            RefreshState::RunningWithPending => {
                *self = RefreshState::Running;
                CompletionOutcome::Restart
            }
            RefreshState::Running | RefreshState::Idle => {
                *self = RefreshState::Idle;
                CompletionOutcome::Finished
            }
        }
    }

    pub fn in_progress(&self) -> bool {
        !matches!(self, RefreshState::Idle)
    }

    pub fn pending(&self) -> bool {
        matches!(self, RefreshState::RunningWithPending)
    }
}
