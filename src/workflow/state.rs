//! Upload workflow states

use super::progress::Progress;
use std::fmt;

/// Stage of the upload → analysis → results pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// Upload form visible
    #[default]
    Idle,
    Validating,
    Submitting,
    /// Request in flight, progress indicator running
    AwaitingResponse,
    /// Results dashboard visible
    Displaying,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Validating => "validating",
            WorkflowState::Submitting => "submitting",
            WorkflowState::AwaitingResponse => "awaiting_response",
            WorkflowState::Displaying => "displaying",
        };
        f.write_str(name)
    }
}

/// What a rendering layer needs to draw the upload area
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    /// Progress indicator, `None` when hidden
    pub progress: Option<Progress>,
}

impl WorkflowSnapshot {
    /// The upload form is shown only while idle
    pub fn form_visible(&self) -> bool {
        self.state == WorkflowState::Idle
    }

    pub fn results_visible(&self) -> bool {
        self.state == WorkflowState::Displaying
    }
}
