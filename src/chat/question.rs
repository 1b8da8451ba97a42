//! Client-side record of an in-flight question.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::QuestionId;

/// Lifecycle of a question.
///
/// `Submitting -> AwaitingAnswer -> Answered | Failed | TimedOut`, plus
/// `Submitting -> Failed` when the submission itself fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    Submitting,
    AwaitingAnswer,
    Answered,
    Failed,
    TimedOut,
}

impl QuestionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            QuestionState::Answered | QuestionState::Failed | QuestionState::TimedOut
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: QuestionState) -> bool {
        use QuestionState::*;
        matches!(
            (self, next),
            (Submitting, AwaitingAnswer)
                | (Submitting, Failed)
                | (AwaitingAnswer, Answered)
                | (AwaitingAnswer, Failed)
                | (AwaitingAnswer, TimedOut)
        )
    }
}

/// A question the orchestrator is tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuestion {
    /// Assigned locally at creation, before the backend knows about it.
    pub local_id: Uuid,
    /// Backend id, known once the submission succeeded.
    pub id: Option<QuestionId>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub state: QuestionState,
}

impl PendingQuestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            id: None,
            text: text.into(),
            created_at: Utc::now(),
            submitted_at: None,
            state: QuestionState::Submitting,
        }
    }

    /// Move to `next` if the transition is legal. Returns whether it happened.
    pub fn advance(&mut self, next: QuestionState) -> bool {
        if !self.state.can_transition_to(next) {
            return false;
        }
        self.state = next;
        true
    }

    /// Record a successful submission.
    pub fn mark_submitted(&mut self, id: QuestionId) -> bool {
        if !self.advance(QuestionState::AwaitingAnswer) {
            return false;
        }
        self.id = Some(id);
        self.submitted_at = Some(Utc::now());
        true
    }
}
