//! Radius expansion state machine.
//!
//! ```text
//! idle -> searching -> complete
//!             |   \--> limitReached
//!             v
//!         expanding -> searching (radius + step, count + 1)
//! ```
//!
//! `searchUnavailable` is entered from outside (`suspend`) when every search
//! in the session failed, and left via `resume`.

use serde::Serialize;

/// Observable phase of a discovery session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadingState {
    Idle,
    Searching,
    Expanding,
    Complete,
    LimitReached,
    SearchUnavailable,
}

impl LoadingState {
    /// States a session can rest in between calls
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            LoadingState::Idle
                | LoadingState::Complete
                | LoadingState::LimitReached
                | LoadingState::SearchUnavailable
        )
    }
}

impl std::fmt::Display for LoadingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LoadingState::Idle => "idle",
            LoadingState::Searching => "searching",
            LoadingState::Expanding => "expanding",
            LoadingState::Complete => "complete",
            LoadingState::LimitReached => "limitReached",
            LoadingState::SearchUnavailable => "searchUnavailable",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionState {
    pub current_radius_meters: u32,
    pub expansion_count: u32,
    pub max_expansions: u32,
    pub step_meters: u32,
}

#[derive(Debug, Clone)]
pub struct ExpansionController {
    state: ExpansionState,
    phase: LoadingState,
}

impl ExpansionController {
    pub fn new(max_expansions: u32, step_meters: u32) -> Self {
        Self {
            state: ExpansionState {
                current_radius_meters: 0,
                expansion_count: 0,
                max_expansions,
                step_meters,
            },
            phase: LoadingState::Idle,
        }
    }

    /// Start a session's first search at `radius_meters`
    pub fn begin(&mut self, radius_meters: u32) {
        self.state.current_radius_meters = radius_meters;
        self.state.expansion_count = 0;
        self.phase = LoadingState::Searching;
    }

    /// Decide what follows a search given the compatible total so far.
    ///
    /// Returns the new phase: `Complete`, `Expanding` (call `expand` next),
    /// or `LimitReached` once the budget is spent.
    pub fn on_result(&mut self, compatible_total: usize, min_results: usize) -> LoadingState {
        self.phase = if compatible_total >= min_results {
            LoadingState::Complete
        } else if self.can_expand() {
            LoadingState::Expanding
        } else {
            LoadingState::LimitReached
        };
        self.phase
    }

    /// Spend one expansion: radius grows by exactly one step and the
    /// controller returns to `Searching`. `None` when the budget is spent.
    pub fn expand(&mut self) -> Option<u32> {
        if !self.can_expand() {
            self.phase = LoadingState::LimitReached;
            return None;
        }
        self.state.expansion_count += 1;
        self.state.current_radius_meters = self
            .state
            .current_radius_meters
            .saturating_add(self.state.step_meters);
        self.phase = LoadingState::Searching;
        Some(self.state.current_radius_meters)
    }

    pub fn can_expand(&self) -> bool {
        self.state.expansion_count < self.state.max_expansions
    }

    /// Search again at the current radius without spending budget
    pub fn resume(&mut self) {
        self.phase = LoadingState::Searching;
    }

    /// Every search failed; park the session until a retry
    pub fn suspend(&mut self) {
        self.phase = LoadingState::SearchUnavailable;
    }

    /// Mark the session complete without a new decision
    pub fn settle_complete(&mut self) {
        self.phase = LoadingState::Complete;
    }

    pub fn declare_limit(&mut self) {
        self.phase = LoadingState::LimitReached;
    }

    pub fn reset(&mut self) {
        self.state.current_radius_meters = 0;
        self.state.expansion_count = 0;
        self.phase = LoadingState::Idle;
    }

    pub fn phase(&self) -> LoadingState {
        self.phase
    }

    pub fn state(&self) -> ExpansionState {
        self.state
    }

    pub fn current_radius(&self) -> u32 {
        self.state.current_radius_meters
    }

    pub fn expansion_count(&self) -> u32 {
        self.state.expansion_count
    }
}
