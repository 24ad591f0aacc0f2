//! Per-submission lifecycle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IwaError, IwaResult};

/// Stage of one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    Acquired,
    Dispatching,
    Rendered,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquired => "acquired",
            Self::Dispatching => "dispatching",
            Self::Rendered => "rendered",
        }
    }

    /// Transitions only move forward, one stage at a time.
    pub fn can_transition_to(&self, to: &Self) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Acquired)
                | (Self::Acquired, Self::Dispatching)
                | (Self::Dispatching, Self::Rendered)
        )
    }
}

/// Tracks a submission from acquisition to render.
#[derive(Debug, Default)]
pub struct Lifecycle {
    stage: Stage,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn acquired(&mut self) -> IwaResult<()> {
        self.advance(Stage::Acquired)
    }

    pub fn dispatching(&mut self) -> IwaResult<()> {
        self.advance(Stage::Dispatching)
    }

    pub fn rendered(&mut self) -> IwaResult<()> {
        self.advance(Stage::Rendered)
    }

    /// Start over for the next submission.
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
    }

    fn advance(&mut self, to: Stage) -> IwaResult<()> {
        if !self.stage.can_transition_to(&to) {
            return Err(IwaError::InvalidStateTransition {
                from: self.stage.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        debug!(from = self.stage.as_str(), to = to.as_str(), "Submission stage");
        self.stage = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_progression() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.stage(), Stage::Idle);

        lifecycle.acquired().unwrap();
        lifecycle.dispatching().unwrap();
        lifecycle.rendered().unwrap();
        assert_eq!(lifecycle.stage(), Stage::Rendered);

        lifecycle.reset();
        assert_eq!(lifecycle.stage(), Stage::Idle);
        lifecycle.acquired().unwrap();
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.dispatching().is_err());
        assert!(lifecycle.rendered().is_err());

        lifecycle.acquired().unwrap();
        lifecycle.dispatching().unwrap();
        let err = lifecycle.acquired().unwrap_err();
        assert!(matches!(
            err,
            IwaError::InvalidStateTransition { ref from, ref to } if from == "dispatching" && to == "acquired"
        ));
        assert_eq!(lifecycle.stage(), Stage::Dispatching);
    }
}
