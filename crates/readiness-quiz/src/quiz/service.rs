use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{AnswerRecord, AnswerValue, QuestionId, SessionId, ValidationError};
use super::lead::{LeadForm, LeadRecord};
use super::questions::{self, Question, TOTAL_QUESTIONS};
use super::score::{Score, ScoreDenominator};
use super::session::QuizSession;
use super::settings::QuizSettings;
use super::sink::{AnalyticsPublisher, LeadSink, SessionStore, SessionStoreError};
use super::tiers::TierResult;

const SCHEDULED_MESSAGE: &str = "Your AI Readiness Session has been scheduled. Our experts will contact you within 24 hours to confirm your appointment and discuss next steps for your infrastructure.";

/// Service driving quiz attempts from inbound presentation events.
pub struct QuizService<S, L, A> {
    store: Arc<S>,
    leads: Arc<L>,
    analytics: Arc<A>,
    settings: QuizSettings,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("quiz-{id:06}"))
}

impl<S, L, A> QuizService<S, L, A>
where
    S: SessionStore + 'static,
    L: LeadSink + 'static,
    A: AnalyticsPublisher + 'static,
{
    pub fn new(store: Arc<S>, leads: Arc<L>, analytics: Arc<A>, settings: QuizSettings) -> Self {
        Self {
            store,
            leads,
            analytics,
            settings,
        }
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Opens a fresh attempt on question one.
    pub fn start(&self) -> Result<SessionSnapshot, QuizServiceError> {
        let session = QuizSession::new(next_session_id(), Utc::now());
        let stored = self.store.insert(session)?;
        info!(session_id = %stored.id(), "quiz session started");
        Ok(SessionSnapshot::from_session(&stored))
    }

    pub fn snapshot(&self, id: &SessionId) -> Result<SessionSnapshot, QuizServiceError> {
        let session = self.load(id)?;
        Ok(SessionSnapshot::from_session(&session))
    }

    /// Records an answer immediately and tells the caller which view swap to play.
    pub fn answer(
        &self,
        id: &SessionId,
        question_id: &str,
        value: i64,
    ) -> Result<AnswerOutcome, QuizServiceError> {
        let value = AnswerValue::new(value)?;
        let question_id = QuestionId::new(question_id);

        let outcome = self.store.modify(id, |session| -> Result<_, QuizServiceError> {
            if session.is_complete() {
                return Err(QuizServiceError::AlreadyComplete);
            }

            let answered_current = session
                .current()
                .is_some_and(|question| question.id == question_id.as_str());
            session.record_answer(question_id.clone(), value)?;

            let transition = if answered_current {
                self.transition_from(session.current_question())
            } else {
                Transition::Stay
            };
            Ok(AnswerOutcome {
                session: SessionSnapshot::from_session(session),
                transition,
            })
        })?;

        debug!(
            session_id = %id,
            question = %question_id,
            value = value.get(),
            "answer recorded"
        );
        Ok(outcome)
    }

    /// Deferred half of an answer: swaps the view once the transition has played.
    pub fn complete_transition(
        &self,
        id: &SessionId,
        from: u8,
    ) -> Result<SessionSnapshot, QuizServiceError> {
        self.store.modify(id, |session| {
            let before = session.current_question();
            let after = session.advance_from(from);
            if before == after {
                debug!(session_id = %id, from, current = after, "stale transition ignored");
            }
            Ok(SessionSnapshot::from_session(session))
        })
    }

    /// Unconditional advance for explicit "next" requests.
    pub fn advance(&self, id: &SessionId) -> Result<SessionSnapshot, QuizServiceError> {
        self.store.modify(id, |session| {
            session.advance();
            Ok(SessionSnapshot::from_session(session))
        })
    }

    pub fn results(&self, id: &SessionId) -> Result<QuizResults, QuizServiceError> {
        let session = self.load(id)?;
        if !session.is_complete() {
            return Err(QuizServiceError::Incomplete {
                current_question: session.current_question(),
            });
        }

        let denominator = self.settings.score_denominator;
        let score = session.score(denominator);
        Ok(QuizResults {
            session_id: session.id().clone(),
            score,
            denominator,
            result: TierResult::for_score(score),
            answers: session.answers().clone(),
        })
    }

    /// Builds the lead from a finished session and hands it to the CRM sink after the
    /// simulated submission delay.
    pub async fn submit_lead(
        &self,
        id: &SessionId,
        form: LeadForm,
    ) -> Result<SubmissionStatus, QuizServiceError> {
        let session = self.load(id)?;
        if !session.is_complete() {
            return Err(QuizServiceError::Incomplete {
                current_question: session.current_question(),
            });
        }

        let contact = form.validate()?;
        let score = session.score(self.settings.score_denominator);
        let lead = LeadRecord::capture(contact, score, session.answers().clone(), Utc::now());

        tokio::time::sleep(self.settings.lead_submit_delay()).await;

        let status = match self.leads.submit_lead(&lead) {
            Ok(receipt) => {
                info!(session_id = %id, reference = %receipt.reference, "lead submitted");
                SubmissionStatus::Scheduled {
                    reference: receipt.reference,
                    message: SCHEDULED_MESSAGE.to_string(),
                }
            }
            Err(err) => {
                warn!(session_id = %id, error = %err, "lead submission failed");
                SubmissionStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };

        if let Err(err) = self.analytics.publish(lead.analytics_event()) {
            warn!(session_id = %id, error = %err, "analytics event dropped");
        }

        Ok(status)
    }

    fn load(&self, id: &SessionId) -> Result<QuizSession, QuizServiceError> {
        let session = self.store.fetch(id)?.ok_or(SessionStoreError::NotFound)?;
        Ok(session)
    }

    fn transition_from(&self, from: u8) -> Transition {
        let delay_ms = self.settings.advance_delay_ms;
        let fade_ms = self.settings.transition_ms;
        if from < TOTAL_QUESTIONS {
            Transition::NextQuestion {
                from,
                to: from + 1,
                delay_ms,
                fade_ms,
            }
        } else {
            Transition::ShowResults {
                from,
                delay_ms,
                fade_ms,
            }
        }
    }
}

/// Presentation instruction returned alongside an applied answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    NextQuestion {
        from: u8,
        to: u8,
        delay_ms: u64,
        fade_ms: u64,
    },
    ShowResults {
        from: u8,
        delay_ms: u64,
        fade_ms: u64,
    },
    /// An earlier question was re-answered; the view stays put.
    Stay,
}

impl Transition {
    /// Question number to pass back to [`QuizService::complete_transition`].
    pub fn from_question(&self) -> Option<u8> {
        match self {
            Transition::NextQuestion { from, .. } | Transition::ShowResults { from, .. } => {
                Some(*from)
            }
            Transition::Stay => None,
        }
    }
}

/// Progress view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub current_question: u8,
    pub total_questions: u8,
    pub progress_fraction: f32,
    pub progress_label: String,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<Question>,
    pub answers: AnswerRecord,
}

impl SessionSnapshot {
    pub fn from_session(session: &QuizSession) -> Self {
        Self {
            session_id: session.id().clone(),
            current_question: session.current_question(),
            total_questions: TOTAL_QUESTIONS,
            progress_fraction: session.progress_fraction(),
            progress_label: session.progress_label(),
            complete: session.is_complete(),
            question: questions::question(session.current_question()).copied(),
            answers: session.answers().clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    pub session: SessionSnapshot,
    pub transition: Transition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizResults {
    pub session_id: SessionId,
    pub score: Score,
    pub denominator: ScoreDenominator,
    pub result: TierResult,
    pub answers: AnswerRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionStatus {
    Scheduled { reference: String, message: String },
    Failed { reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
    #[error("quiz is not finished (currently on question {current_question})")]
    Incomplete { current_question: u8 },
    #[error("quiz is already finished")]
    AlreadyComplete,
}
