//! AI infrastructure readiness assessment: session progress, scoring, tier resolution,
//! and lead capture.
//!
//! [`session::QuizSession`] owns the per-attempt state; [`score::compute_score`] and
//! [`tiers::resolve_tier`] are pure. [`service::QuizService`] wires them to the outbound
//! store and sink traits for the HTTP and terminal front ends.

pub mod domain;
pub mod lead;
pub mod questions;
pub mod router;
pub mod score;
pub mod service;
pub mod session;
pub mod settings;
pub mod sink;
pub mod tiers;

#[cfg(test)]
mod tests;

pub use domain::{AnswerRecord, AnswerValue, QuestionId, SessionId, ValidationError};
pub use lead::{AnalyticsEvent, ContactDetails, LeadForm, LeadRecord};
pub use questions::{catalog, AnswerOption, Question, TOTAL_QUESTIONS};
pub use router::quiz_router;
pub use score::{compute_score, Score, ScoreDenominator};
pub use service::{
    AnswerOutcome, QuizResults, QuizService, QuizServiceError, SessionSnapshot, SubmissionStatus,
    Transition,
};
pub use session::QuizSession;
pub use settings::QuizSettings;
pub use sink::{
    AnalyticsPublisher, LeadSink, LoggingAnalytics, LoggingLeadSink, SessionStore,
    SessionStoreError, SinkError, SubmissionReceipt,
};
pub use tiers::{resolve_benchmark_narrative, resolve_tier, ResultTier, TierResult};
