use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::quiz::domain::{AnswerRecord, AnswerValue, QuestionId, SessionId};
use crate::quiz::lead::{AnalyticsEvent, LeadForm, LeadRecord};
use crate::quiz::questions::catalog;
use crate::quiz::service::QuizService;
use crate::quiz::session::QuizSession;
use crate::quiz::settings::QuizSettings;
use crate::quiz::sink::{
    AnalyticsPublisher, LeadSink, SessionStore, SessionStoreError, SinkError, SubmissionReceipt,
};

pub(super) type TestService = QuizService<MemoryStore, RecordingLeadSink, RecordingAnalytics>;

pub(super) fn build_service(
    settings: QuizSettings,
) -> (
    TestService,
    Arc<MemoryStore>,
    Arc<RecordingLeadSink>,
    Arc<RecordingAnalytics>,
) {
    let store = Arc::new(MemoryStore::default());
    let leads = Arc::new(RecordingLeadSink::default());
    let analytics = Arc::new(RecordingAnalytics::default());
    let service = QuizService::new(store.clone(), leads.clone(), analytics.clone(), settings);
    (service, store, leads, analytics)
}

pub(super) fn fresh_session() -> QuizSession {
    QuizSession::new(SessionId("quiz-test".to_string()), Utc::now())
}

/// Answer record with one value per catalog question, in catalog order.
pub(super) fn answers_from(values: [i64; 6]) -> AnswerRecord {
    let mut record = AnswerRecord::new();
    for (question, value) in catalog().iter().zip(values) {
        record.upsert(
            QuestionId::from(question.id),
            AnswerValue::new(value).expect("fixture values are on the scale"),
        );
    }
    record
}

/// Drives a session through every question, completing each scheduled transition.
pub(super) fn complete_quiz(service: &TestService, values: [i64; 6]) -> SessionId {
    let snapshot = service.start().expect("session starts");
    let id = snapshot.session_id;
    for (question, value) in catalog().iter().zip(values) {
        let outcome = service
            .answer(&id, question.id, value)
            .expect("answer accepted");
        let from = outcome
            .transition
            .from_question()
            .expect("answering the current question schedules a transition");
        service
            .complete_transition(&id, from)
            .expect("transition completes");
    }
    id
}

pub(super) fn lead_form() -> LeadForm {
    LeadForm {
        first_name: "  Dana ".to_string(),
        last_name: "Okafor".to_string(),
        email: "dana.okafor@example.com".to_string(),
        company: "Northwind Logistics".to_string(),
        job_title: "VP Infrastructure".to_string(),
        phone: "+1 (515) 555-0142".to_string(),
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) sessions: Mutex<HashMap<SessionId, QuizSession>>,
}

impl SessionStore for MemoryStore {
    fn insert(&self, session: QuizSession) -> Result<QuizSession, SessionStoreError> {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        if guard.contains_key(session.id()) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(session.id().clone(), session.clone());
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<QuizSession>, SessionStoreError> {
        let guard = self.sessions.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut QuizSession) -> Result<T, E>,
        E: From<SessionStoreError>,
    {
        let mut guard = self.sessions.lock().expect("store mutex poisoned");
        let stored = guard.get_mut(id).ok_or(SessionStoreError::NotFound)?;
        let mut draft = stored.clone();
        let value = change(&mut draft)?;
        *stored = draft;
        Ok(value)
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _session: QuizSession) -> Result<QuizSession, SessionStoreError> {
        Err(SessionStoreError::Unavailable("maintenance".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<QuizSession>, SessionStoreError> {
        Err(SessionStoreError::Unavailable("maintenance".to_string()))
    }

    fn modify<T, E, F>(&self, _id: &SessionId, _change: F) -> Result<T, E>
    where
        F: FnOnce(&mut QuizSession) -> Result<T, E>,
        E: From<SessionStoreError>,
    {
        Err(SessionStoreError::Unavailable("maintenance".to_string()).into())
    }
}

#[derive(Default)]
pub(super) struct RecordingLeadSink {
    leads: Mutex<Vec<LeadRecord>>,
}

impl RecordingLeadSink {
    pub(super) fn leads(&self) -> Vec<LeadRecord> {
        self.leads.lock().expect("lead mutex poisoned").clone()
    }
}

impl LeadSink for RecordingLeadSink {
    fn submit_lead(&self, lead: &LeadRecord) -> Result<SubmissionReceipt, SinkError> {
        let mut guard = self.leads.lock().expect("lead mutex poisoned");
        guard.push(lead.clone());
        Ok(SubmissionReceipt {
            reference: format!("crm-{}", guard.len()),
        })
    }
}

pub(super) struct FailingLeadSink;

impl LeadSink for FailingLeadSink {
    fn submit_lead(&self, _lead: &LeadRecord) -> Result<SubmissionReceipt, SinkError> {
        Err(SinkError::Transport("connection refused".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    pub(super) fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().expect("analytics mutex poisoned").clone()
    }
}

impl AnalyticsPublisher for RecordingAnalytics {
    fn publish(&self, event: AnalyticsEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .expect("analytics mutex poisoned")
            .push(event);
        Ok(())
    }
}
