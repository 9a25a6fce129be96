//! Session controller — owns one `Session` and drives the
//! question → answer → feedback → next-question cycle.
//!
//! The controller runs as a single task. Front-end commands, countdown ticks and
//! service results all arrive on one unbounded inbox, so every mutation of the
//! session is serialised. Service calls run on spawned tasks that post their
//! result back to the inbox tagged with the epoch (bumped on start/end) and the
//! cycle (bumped per loaded question); anything whose tag is out of date is
//! dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api_client::{InterviewApi, ServiceError};
use crate::feedback::{Feedback, FEEDBACK_ERROR, NO_FEEDBACK};
use crate::models::Category;
use crate::session::countdown::Countdown;
use crate::session::phase::{Phase, Signal};
use crate::session::{
    HistoryEntry, Session, SessionError, SessionEvent, SubmitSource, DEFAULT_ROLE,
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug)]
enum Message {
    Start { role: String, category: Category },
    EditAnswer(String),
    AppendAnswer(String),
    Submit,
    End,
    Tick { epoch: u64, cycle: u64 },
    QuestionLoaded {
        epoch: u64,
        result: Result<String, ServiceError>,
    },
    FeedbackReady {
        epoch: u64,
        cycle: u64,
        feedback: Feedback,
    },
}

/// Question and answer captured at the moment of submission.
#[derive(Debug)]
struct Submission {
    question: String,
    answer: String,
    source: SubmitSource,
    submitted_at: DateTime<Utc>,
}

pub struct SessionController {
    api: Arc<dyn InterviewApi>,
    time_limit: u32,
    session: Session,
    session_id: Uuid,
    epoch: u64,
    cycle: u64,
    submission: Option<Submission>,
    countdown: Countdown,
    inbox: mpsc::WeakUnboundedSender<Message>,
    events: broadcast::Sender<SessionEvent>,
    state: watch::Sender<Session>,
}

/// Cloneable front-end handle. The controller task stops once every handle is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Message>,
    events: broadcast::Sender<SessionEvent>,
    state: watch::Receiver<Session>,
}

impl SessionHandle {
    /// Starts a new interview, ending the current one first if needed.
    /// An empty role falls back to `DEFAULT_ROLE`; no category means `Technical`.
    pub fn start(&self, role: &str, category: Option<Category>) -> Result<(), SessionError> {
        self.send(Message::Start {
            role: role.to_string(),
            category: category.unwrap_or_default(),
        })
    }

    /// Replaces the answer draft.
    pub fn edit_answer(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Message::EditAnswer(text.into()))
    }

    /// Adds a line to the answer draft.
    pub fn append_answer(&self, line: impl Into<String>) -> Result<(), SessionError> {
        self.send(Message::AppendAnswer(line.into()))
    }

    /// Submits the current draft. Ignored unless a question is active and
    /// nothing is already being submitted.
    pub fn submit(&self) -> Result<(), SessionError> {
        self.send(Message::Submit)
    }

    /// Ends the interview and clears everything. Idempotent.
    pub fn end(&self) -> Result<(), SessionError> {
        self.send(Message::End)
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    #[cfg(test)]
    pub fn watch(&self) -> watch::Receiver<Session> {
        self.state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn send(&self, message: Message) -> Result<(), SessionError> {
        self.tx.send(message).map_err(|_| SessionError::Closed)
    }
}

impl SessionController {
    /// Spawns a controller task for one independent session.
    pub fn spawn(api: Arc<dyn InterviewApi>, time_limit: u32) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (state, state_rx) = watch::channel(Session::new(time_limit));

        let controller = Self::new(api, time_limit, tx.downgrade(), events.clone(), state);
        tokio::spawn(controller.run(rx));

        SessionHandle {
            tx,
            events,
            state: state_rx,
        }
    }

    fn new(
        api: Arc<dyn InterviewApi>,
        time_limit: u32,
        inbox: mpsc::WeakUnboundedSender<Message>,
        events: broadcast::Sender<SessionEvent>,
        state: watch::Sender<Session>,
    ) -> Self {
        Self {
            api,
            time_limit,
            session: Session::new(time_limit),
            session_id: Uuid::new_v4(),
            epoch: 0,
            cycle: 0,
            submission: None,
            countdown: Countdown::new(),
            inbox,
            events,
            state,
        }
    }

    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Message>) {
        while let Some(message) = inbox.recv().await {
            self.handle(message);
        }
        self.countdown.stop();
        debug!(session = %self.session_id, "Session controller stopped");
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Start { role, category } => self.start(role, category),
            Message::EditAnswer(text) => self.session.answer_draft = text,
            Message::AppendAnswer(line) => {
                if !self.session.answer_draft.is_empty() {
                    self.session.answer_draft.push('\n');
                }
                self.session.answer_draft.push_str(&line);
            }
            Message::Submit => self.submit(SubmitSource::Manual),
            Message::End => self.end(),
            Message::Tick { epoch, cycle } => self.on_tick(epoch, cycle),
            Message::QuestionLoaded { epoch, result } => self.on_question_loaded(epoch, result),
            Message::FeedbackReady {
                epoch,
                cycle,
                feedback,
            } => self.on_feedback_ready(epoch, cycle, feedback),
        }
        self.state.send_replace(self.session.clone());
    }

    // ────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ────────────────────────────────────────────────────────────────────────

    fn start(&mut self, role: String, category: Category) {
        if self.session.is_started() {
            self.end();
        }

        let role = match role.trim() {
            "" => DEFAULT_ROLE.to_string(),
            trimmed => trimmed.to_string(),
        };

        self.epoch += 1;
        self.session_id = Uuid::new_v4();
        self.submission = None;
        self.session = Session {
            role,
            category,
            ..Session::new(self.time_limit)
        };

        info!(
            session = %self.session_id,
            role = %self.session.role,
            %category,
            "Interview started"
        );
        self.advance(Signal::Start);
        self.request_question();
    }

    fn end(&mut self) {
        let had_state = self.session.is_started() || !self.session.history.is_empty();

        self.countdown.stop();
        self.advance(Signal::End);
        self.epoch += 1;
        self.submission = None;

        let role = std::mem::take(&mut self.session.role);
        let category = self.session.category;
        self.session = Session {
            role,
            category,
            ..Session::new(self.time_limit)
        };

        if had_state {
            info!(session = %self.session_id, "Interview ended");
            self.emit(SessionEvent::Ended);
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Question loading
    // ────────────────────────────────────────────────────────────────────────

    fn request_question(&self) {
        let api = self.api.clone();
        let inbox = self.inbox.clone();
        let epoch = self.epoch;
        let role = self.session.role.clone();
        let category = self.session.category;

        tokio::spawn(async move {
            let result = api.fetch_question(&role, category).await;
            post_back(&inbox, Message::QuestionLoaded { epoch, result });
        });
    }

    fn on_question_loaded(&mut self, epoch: u64, result: Result<String, ServiceError>) {
        if epoch != self.epoch || self.session.phase != Phase::QuestionLoading {
            debug!(session = %self.session_id, "Dropping stale question response");
            return;
        }

        match result {
            Ok(question) => {
                self.advance(Signal::QuestionLoaded);
                self.cycle += 1;
                self.session.current_question = Some(question.clone());
                self.session.answer_draft.clear();
                self.session.time_remaining = self.time_limit;
                self.start_countdown();

                info!(session = %self.session_id, cycle = self.cycle, "Question loaded");
                self.emit(SessionEvent::QuestionLoaded {
                    question,
                    time_limit: self.time_limit,
                });
            }
            Err(e) => {
                warn!(session = %self.session_id, "Question request failed: {e}");
                self.advance(Signal::QuestionFailed);
                self.session.current_question = None;
                self.session.answer_draft.clear();
                self.session.time_remaining = self.time_limit;
                self.emit(SessionEvent::Failed(classify_question_error(e)));
            }
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Countdown
    // ────────────────────────────────────────────────────────────────────────

    fn start_countdown(&mut self) {
        let inbox = self.inbox.clone();
        let (epoch, cycle) = (self.epoch, self.cycle);

        self.countdown.start(move || match inbox.upgrade() {
            Some(tx) => tx.send(Message::Tick { epoch, cycle }).is_ok(),
            None => false,
        });
    }

    fn on_tick(&mut self, epoch: u64, cycle: u64) {
        if epoch != self.epoch
            || cycle != self.cycle
            || self.session.phase != Phase::QuestionActive
        {
            return;
        }

        self.session.time_remaining = self.session.time_remaining.saturating_sub(1);
        self.emit(SessionEvent::Tick {
            remaining: self.session.time_remaining,
        });

        if self.session.time_remaining == 0 {
            self.countdown.stop();
            self.submit(SubmitSource::Timeout);
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Submission
    // ────────────────────────────────────────────────────────────────────────

    fn submit(&mut self, source: SubmitSource) {
        let Some(question) = self.session.current_question.clone() else {
            debug!(session = %self.session_id, ?source, "No active question; submit ignored");
            return;
        };
        if !self.advance(Signal::Submit) {
            return;
        }

        self.countdown.stop();
        let answer = self.session.answer_draft.clone();
        info!(session = %self.session_id, cycle = self.cycle, ?source, "Submitting answer");

        let api = self.api.clone();
        let inbox = self.inbox.clone();
        let (epoch, cycle) = (self.epoch, self.cycle);
        let session_id = self.session_id;
        let (q, a) = (question.clone(), answer.clone());

        tokio::spawn(async move {
            let feedback = match api.fetch_feedback(&q, &a).await {
                Ok(text) => Feedback::from_text(text),
                Err(e) if e.is_transport() => {
                    warn!(session = %session_id, "Feedback request failed: {e}");
                    Feedback::placeholder(FEEDBACK_ERROR)
                }
                Err(e) => {
                    warn!(session = %session_id, "Feedback unavailable: {e}");
                    Feedback::placeholder(NO_FEEDBACK)
                }
            };
            post_back(&inbox, Message::FeedbackReady { epoch, cycle, feedback });
        });

        self.submission = Some(Submission {
            question,
            answer,
            source,
            submitted_at: Utc::now(),
        });
        self.emit(SessionEvent::Submitted { source });
    }

    fn on_feedback_ready(&mut self, epoch: u64, cycle: u64, feedback: Feedback) {
        if epoch != self.epoch || cycle != self.cycle || self.session.phase != Phase::Submitting {
            debug!(session = %self.session_id, "Dropping stale feedback response");
            return;
        }
        let Some(submission) = self.submission.take() else {
            return;
        };

        let entry = HistoryEntry {
            question: submission.question,
            answer: submission.answer,
            feedback,
            source: submission.source,
            submitted_at: submission.submitted_at,
        };
        self.session.history.push(entry.clone());
        let index = self.session.history.len() - 1;
        self.emit(SessionEvent::FeedbackRecorded { index, entry });

        self.advance(Signal::FeedbackDone);
        self.session.current_question = None;
        self.session.answer_draft.clear();
        self.request_question();
    }

    // ────────────────────────────────────────────────────────────────────────
    // Helpers
    // ────────────────────────────────────────────────────────────────────────

    /// Applies `signal` through the transition table. Returns false if it was not accepted.
    fn advance(&mut self, signal: Signal) -> bool {
        let from = self.session.phase;
        match from.on(signal) {
            Some(to) => {
                debug!(session = %self.session_id, ?from, ?to, ?signal, "Phase change");
                self.session.phase = to;
                true
            }
            None => {
                debug!(session = %self.session_id, ?from, ?signal, "Signal ignored");
                false
            }
        }
    }

    /// Publishes the snapshot before the event, so a subscriber that reads
    /// `snapshot()` on receipt never sees an older state.
    fn emit(&self, event: SessionEvent) {
        self.state.send_replace(self.session.clone());
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn post_back(inbox: &mpsc::WeakUnboundedSender<Message>, message: Message) {
    if let Some(tx) = inbox.upgrade() {
        let _ = tx.send(message);
    }
}

fn classify_question_error(error: ServiceError) -> SessionError {
    match error {
        ServiceError::Rejected {
            status: 400,
            message,
        } => SessionError::Validation(message),
        ServiceError::Rejected { message, .. } => SessionError::Upstream(message),
        ServiceError::Http(_) => {
            SessionError::Upstream("Could not reach the interview service.".to_string())
        }
        other @ (ServiceError::Unreadable { .. } | ServiceError::MissingField(_)) => {
            SessionError::Upstream(other.to_string())
        }
    }
}
