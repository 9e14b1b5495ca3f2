use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::info;

use super::domain::SessionId;
use super::lead::{AnalyticsEvent, LeadRecord};
use super::session::QuizSession;

/// Storage for in-flight quiz attempts.
pub trait SessionStore: Send + Sync {
    fn insert(&self, session: QuizSession) -> Result<QuizSession, SessionStoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<QuizSession>, SessionStoreError>;

    /// Applies `change` to the stored session as one atomic step. The session is only
    /// written back when `change` succeeds; concurrent calls for the same id are serialized.
    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut QuizSession) -> Result<T, E>,
        E: From<SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook handing captured leads to a CRM.
pub trait LeadSink: Send + Sync {
    fn submit_lead(&self, lead: &LeadRecord) -> Result<SubmissionReceipt, SinkError>;
}

/// Outbound hook for conversion analytics.
pub trait AnalyticsPublisher: Send + Sync {
    fn publish(&self, event: AnalyticsEvent) -> Result<(), SinkError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub reference: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink transport unavailable: {0}")]
    Transport(String),
    #[error("sink rejected payload: {0}")]
    Rejected(String),
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Sink that only logs the CRM payload; no network integration exists yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingLeadSink;

impl LeadSink for LoggingLeadSink {
    fn submit_lead(&self, lead: &LeadRecord) -> Result<SubmissionReceipt, SinkError> {
        let reference = format!("lead-{:06}", LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed));
        let fields = lead.crm_fields();
        info!(
            %reference,
            company = %lead.contact.company,
            score = %lead.score,
            tier = lead.tier.category(),
            ?fields,
            "lead ready for CRM"
        );
        Ok(SubmissionReceipt { reference })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAnalytics;

impl AnalyticsPublisher for LoggingAnalytics {
    fn publish(&self, event: AnalyticsEvent) -> Result<(), SinkError> {
        info!(
            event = %event.name,
            category = %event.category,
            label = %event.label,
            value = event.value,
            score_category = %event.score_category,
            "analytics event"
        );
        Ok(())
    }
}
