//! Submit-then-poll chat orchestration.
//!
//! Each question gets a driver task that submits it and then polls for the
//! answer, plus a separate deadline task. Both hold child tokens of the
//! orchestrator's root token, stored in the question record, so one question
//! can be stopped without touching the others and teardown stops everything.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::ChatEvent;
use super::question::{PendingQuestion, QuestionState};
use crate::error::HaiError;
use crate::models::{AnswerStatus, QuestionId};
use crate::traits::QuestionApi;

/// Default delay between answer polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default time allowed for an answer after submission.
pub const DEFAULT_ANSWER_TIMEOUT: Duration = Duration::from_secs(120);

/// Shortest poll interval the orchestrator will use.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polling cadence and deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between polls. The first poll happens one interval after submission.
    pub interval: Duration,
    /// Measured from a successful submission.
    pub timeout: Duration,
}

impl PollPolicy {
    /// The same policy with `interval` raised to [`MIN_POLL_INTERVAL`].
    pub fn clamped(self) -> Self {
        Self {
            interval: self.interval.max(MIN_POLL_INTERVAL),
            ..self
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_ANSWER_TIMEOUT,
        }
    }
}

struct TrackedQuestion {
    question: PendingQuestion,
    poll: CancellationToken,
    deadline: CancellationToken,
}

impl TrackedQuestion {
    fn cancel(&self) {
        self.poll.cancel();
        self.deadline.cancel();
    }
}

/// State shared between the orchestrator and its tasks.
struct Shared {
    api: Arc<dyn QuestionApi>,
    policy: PollPolicy,
    root: CancellationToken,
    events: mpsc::UnboundedSender<ChatEvent>,
    questions: Mutex<HashMap<Uuid, TrackedQuestion>>,
}

impl Shared {
    fn questions(&self) -> MutexGuard<'_, HashMap<Uuid, TrackedQuestion>> {
        self.questions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: ChatEvent) {
        if self.events.send(event).is_err() {
            debug!("Chat event receiver dropped");
        }
    }

    /// `Submitting -> AwaitingAnswer` and emit `Sent`.
    ///
    /// Returns false if the question is no longer tracked.
    fn mark_submitted(&self, local_id: Uuid, question_id: &QuestionId) -> bool {
        let mut questions = self.questions();
        if self.root.is_cancelled() {
            return false;
        }
        let Some(tracked) = questions.get_mut(&local_id) else {
            return false;
        };
        if !tracked.question.mark_submitted(question_id.clone()) {
            return false;
        }
        self.emit(ChatEvent::Sent {
            local_id,
            question_id: question_id.clone(),
        });
        true
    }

    /// Move a question to a terminal state, stop its tasks and emit `event`.
    ///
    /// The record is removed under the lock, so whichever task gets here
    /// first wins and every later caller finds nothing to do.
    fn finish(&self, local_id: Uuid, state: QuestionState, event: ChatEvent) -> bool {
        let mut questions = self.questions();
        if self.root.is_cancelled() {
            return false;
        }
        let legal = questions
            .get(&local_id)
            .is_some_and(|tracked| tracked.question.state.can_transition_to(state));
        if !legal {
            return false;
        }
        if let Some(tracked) = questions.remove(&local_id) {
            tracked.cancel();
        }
        self.emit(event);
        true
    }
}

/// Drives questions from submission to a terminal event.
///
/// Events are delivered on the receiver returned by [`ChatOrchestrator::new`].
/// Dropping the orchestrator tears everything down.
pub struct ChatOrchestrator {
    shared: Arc<Shared>,
}

impl ChatOrchestrator {
    pub fn new(
        api: Arc<dyn QuestionApi>,
        policy: PollPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        if policy.interval < MIN_POLL_INTERVAL {
            warn!(
                interval_ms = policy.interval.as_millis() as u64,
                "Poll interval too short, using {:?}", MIN_POLL_INTERVAL
            );
        }
        let shared = Arc::new(Shared {
            api,
            policy: policy.clamped(),
            root: CancellationToken::new(),
            events,
            questions: Mutex::new(HashMap::new()),
        });
        (Self { shared }, rx)
    }

    pub fn policy(&self) -> PollPolicy {
        self.shared.policy
    }

    /// Submit a question and track it until a terminal event.
    ///
    /// Returns the local id immediately; progress arrives as events. Must be
    /// called from within a tokio runtime. After [`shutdown`](Self::shutdown)
    /// the id is still returned but nothing is tracked or emitted.
    pub fn send_message(&self, text: impl Into<String>) -> Uuid {
        let question = PendingQuestion::new(text);
        let local_id = question.local_id;
        let text = question.text.clone();

        let poll = self.shared.root.child_token();
        let deadline = self.shared.root.child_token();
        {
            let mut questions = self.shared.questions();
            if self.shared.root.is_cancelled() {
                debug!(%local_id, "Orchestrator shut down, dropping question");
                return local_id;
            }
            questions.insert(
                local_id,
                TrackedQuestion {
                    question,
                    poll: poll.clone(),
                    deadline: deadline.clone(),
                },
            );
        }

        info!(%local_id, "Submitting question");
        tokio::spawn(drive_question(
            self.shared.clone(),
            local_id,
            text,
            poll,
            deadline,
        ));
        local_id
    }

    /// Snapshot of questions still waiting for a terminal event, oldest first.
    pub fn pending(&self) -> Vec<PendingQuestion> {
        let mut pending: Vec<_> = self
            .shared
            .questions()
            .values()
            .map(|tracked| tracked.question.clone())
            .collect();
        pending.sort_by_key(|q| q.created_at);
        pending
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.root.is_cancelled()
    }

    /// Stop every poll loop, deadline and in-flight submission.
    ///
    /// Idempotent. Once this returns no further events are emitted.
    pub fn shutdown(&self) {
        let mut questions = self.shared.questions();
        if self.shared.root.is_cancelled() {
            return;
        }
        self.shared.root.cancel();
        let dropped = questions.len();
        questions.clear();
        info!(dropped, "Chat orchestrator shut down");
    }
}

impl Drop for ChatOrchestrator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Submit, then poll until answered, failed or cancelled.
async fn drive_question(
    shared: Arc<Shared>,
    local_id: Uuid,
    text: String,
    poll: CancellationToken,
    deadline: CancellationToken,
) {
    let submitted = tokio::select! {
        _ = poll.cancelled() => return,
        result = shared.api.submit_question(&text) => result,
    };

    let question_id = match submitted {
        Ok(question_id) => question_id,
        Err(error) => {
            warn!(%local_id, error_code = error.error_code(), "Question submission failed: {}", error);
            shared.finish(
                local_id,
                QuestionState::Failed,
                ChatEvent::Error {
                    local_id,
                    question_id: None,
                    error,
                },
            );
            return;
        }
    };

    let submitted_at = Instant::now();
    if !shared.mark_submitted(local_id, &question_id) {
        return;
    }
    info!(%local_id, %question_id, "Question sent, waiting for answer");

    tokio::spawn(run_deadline(
        shared.clone(),
        local_id,
        question_id.clone(),
        submitted_at + shared.policy.timeout,
        deadline,
    ));

    poll_answer(&shared, local_id, &question_id, submitted_at, &poll).await;
}

async fn poll_answer(
    shared: &Shared,
    local_id: Uuid,
    question_id: &QuestionId,
    submitted_at: Instant,
    poll: &CancellationToken,
) {
    let interval = shared.policy.interval;
    let mut ticker = tokio::time::interval_at(submitted_at + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = poll.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = poll.cancelled() => break,
            result = shared.api.fetch_answer(question_id) => result,
        };

        match result {
            Ok(AnswerStatus::Answered(text)) => {
                let event = ChatEvent::Answer {
                    local_id,
                    question_id: question_id.clone(),
                    text,
                };
                if shared.finish(local_id, QuestionState::Answered, event) {
                    info!(%question_id, "Answer received");
                }
                break;
            }
            Ok(AnswerStatus::Pending) => {
                debug!(%question_id, "Answer pending");
            }
            Err(error) if error.requires_reauth() => {
                warn!(%question_id, "Session rejected while polling: {}", error);
                shared.finish(
                    local_id,
                    QuestionState::Failed,
                    ChatEvent::Error {
                        local_id,
                        question_id: Some(question_id.clone()),
                        error,
                    },
                );
                break;
            }
            Err(error) => {
                // Keep polling; only the deadline gives up on a question.
                if error.is_retryable() {
                    debug!(%question_id, error_code = error.error_code(), "Poll failed: {}", error);
                } else {
                    warn!(%question_id, error_code = error.error_code(), "Poll failed: {}", error);
                }
            }
        }
    }

    debug!(%question_id, "Poll loop stopped");
}

async fn run_deadline(
    shared: Arc<Shared>,
    local_id: Uuid,
    question_id: QuestionId,
    at: Instant,
    deadline: CancellationToken,
) {
    tokio::select! {
        _ = deadline.cancelled() => {}
        _ = tokio::time::sleep_until(at) => {
            let after_secs = shared.policy.timeout.as_secs();
            let event = ChatEvent::Timeout {
                local_id,
                question_id: question_id.clone(),
            };
            if shared.finish(local_id, QuestionState::TimedOut, event) {
                let error = HaiError::Timeout {
                    question_id: question_id.to_string(),
                    after_secs,
                };
                warn!(error_code = error.error_code(), "{}", error);
            }
        }
    }
}
