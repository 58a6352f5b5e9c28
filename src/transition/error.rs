use serde::Serialize;
use std::fmt;

/// The suspension points of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    UpdateCallbackDone,
    Finished,
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Checkpoint::UpdateCallbackDone => "update_callback_done",
            Checkpoint::Finished => "finished",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// A lifecycle signal rejected; cleanup already ran
    #[error("transition rejected at {checkpoint}: {reason}")]
    Rejected { checkpoint: Checkpoint, reason: String },
    /// Another session still owns the document
    #[error("a transition session is already active")]
    SessionActive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_names_the_awaited_checkpoint() {
        let err = TransitionError::Rejected {
            checkpoint: Checkpoint::UpdateCallbackDone,
            reason: "aborted".to_string(),
        };
        assert_eq!(err.to_string(), "transition rejected at update_callback_done: aborted");
        assert_eq!(serde_json::to_string(&Checkpoint::Finished).unwrap(), "\"finished\"");
    }
}
