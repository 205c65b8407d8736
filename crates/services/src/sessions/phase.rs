use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a quiz run currently stands.
///
/// Open-recall items go `Answering -> AwaitingSelfAssessment -> Answering`;
/// multiple-choice items go `Answering -> ShowingAnswer -> Answering`. The
/// last item of a session leads to `Finished` instead of `Answering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session is active; categories are being chosen.
    SelectingCategory,
    /// Question shown, answer hidden.
    Answering,
    /// Multiple-choice pick graded and the correct answer shown.
    ShowingAnswer,
    /// Open-recall answer shown, waiting for the user's self-assessment.
    AwaitingSelfAssessment,
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::SelectingCategory => "selecting categories",
            SessionPhase::Answering => "answering",
            SessionPhase::ShowingAnswer => "showing the answer",
            SessionPhase::AwaitingSelfAssessment => "awaiting self-assessment",
            SessionPhase::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Name of a session input, used to report rejected transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    Reveal,
    Assess,
    SelectOption,
    Confirm,
    Advance,
    Retry,
    Finalize,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionEvent::Reveal => "reveal",
            SessionEvent::Assess => "assess",
            SessionEvent::SelectOption => "select option",
            SessionEvent::Confirm => "confirm",
            SessionEvent::Advance => "advance",
            SessionEvent::Retry => "retry",
            SessionEvent::Finalize => "finalize",
        };
        f.write_str(label)
    }
}
