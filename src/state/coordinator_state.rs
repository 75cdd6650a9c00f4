/// Coordinator state definitions for tracking a search run
///
/// This module defines every state a pagination coordinator passes through.
use std::fmt;

/// Represents the current phase of a paginated search run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorState {
    /// No run in progress
    Idle,

    /// Fetching page 1 to learn the total page count
    DiscoveringCount,

    /// Spawning one task per remaining page
    FanningOut,

    /// Waiting for every spawned task to report
    AwaitingCompletion,

    // ===== Terminal States =====
    /// All pages reported and the results were merged
    Done,

    /// Page-count discovery failed; no result set was produced
    Failed,
}

impl CoordinatorState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true while a run is in flight
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::DiscoveringCount | Self::FanningOut | Self::AwaitingCompletion
        )
    }

    /// Returns true if the coordinator may move from `self` to `next`
    ///
    /// Any active state may fail. Terminal states only go back to `Idle`,
    /// which is how a coordinator is reused for another run.
    pub fn can_transition_to(&self, next: CoordinatorState) -> bool {
        use CoordinatorState::*;

        match (self, next) {
            (Idle, DiscoveringCount) => true,
            (DiscoveringCount, FanningOut) => true,
            (FanningOut, AwaitingCompletion) => true,
            (AwaitingCompletion, Done) => true,
            (DiscoveringCount | FanningOut | AwaitingCompletion, Failed) => true,
            (Done | Failed, Idle) => true,
            _ => false,
        }
    }

    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DiscoveringCount => "discovering_count",
            Self::FanningOut => "fanning_out",
            Self::AwaitingCompletion => "awaiting_completion",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible coordinator states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::DiscoveringCount,
            Self::FanningOut,
            Self::AwaitingCompletion,
            Self::Done,
            Self::Failed,
        ]
    }
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
