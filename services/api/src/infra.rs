use metrics_exporter_prometheus::PrometheusHandle;
use readiness_quiz::quiz::{
    LoggingAnalytics, LoggingLeadSink, QuizService, QuizSession, QuizSettings, SessionId,
    SessionStore, SessionStoreError, TOTAL_QUESTIONS,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

pub(crate) type QuizApiService =
    QuizService<InMemorySessionStore, LoggingLeadSink, LoggingAnalytics>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session storage; attempts do not survive a restart. Entries idle for
/// the TTL are treated as gone and swept on insert or by [`InMemorySessionStore::evict_idle`].
#[derive(Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, StoredSession>>>,
    ttl: Duration,
}

struct StoredSession {
    session: QuizSession,
    touched: Instant,
}

impl StoredSession {
    fn fresh(session: QuizSession, now: Instant) -> Self {
        Self {
            session,
            touched: now,
        }
    }

    fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.touched) >= ttl
    }
}

fn poisoned<T>(_: PoisonError<T>) -> SessionStoreError {
    SessionStoreError::Unavailable("session store mutex poisoned".to_string())
}

impl InMemorySessionStore {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.lock().map_err(poisoned)?.len())
    }

    /// Drops every session that has been idle for at least the TTL as of `now`.
    pub(crate) fn evict_idle(&self, now: Instant) -> Result<usize, SessionStoreError> {
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        Ok(self.evict_locked(&mut guard, now))
    }

    fn evict_locked(
        &self,
        sessions: &mut HashMap<SessionId, StoredSession>,
        now: Instant,
    ) -> usize {
        let before = sessions.len();
        sessions.retain(|_, stored| !stored.is_idle(now, self.ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "idle quiz sessions evicted");
        }
        evicted
    }

    fn live_entry<'m>(
        &self,
        sessions: &'m mut HashMap<SessionId, StoredSession>,
        id: &SessionId,
        now: Instant,
    ) -> Option<&'m mut StoredSession> {
        if sessions
            .get(id)
            .is_some_and(|stored| stored.is_idle(now, self.ttl))
        {
            sessions.remove(id);
            debug!(session_id = %id, "idle quiz session expired");
            return None;
        }
        sessions.get_mut(id)
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, session: QuizSession) -> Result<QuizSession, SessionStoreError> {
        let now = Instant::now();
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        self.evict_locked(&mut guard, now);
        if guard.contains_key(session.id()) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(session.id().clone(), StoredSession::fresh(session.clone(), now));
        Ok(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<QuizSession>, SessionStoreError> {
        let now = Instant::now();
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        Ok(self.live_entry(&mut guard, id, now).map(|stored| {
            stored.touched = now;
            stored.session.clone()
        }))
    }

    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut QuizSession) -> Result<T, E>,
        E: From<SessionStoreError>,
    {
        let now = Instant::now();
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        let stored = self
            .live_entry(&mut guard, id, now)
            .ok_or(SessionStoreError::NotFound)?;
        let mut draft = stored.session.clone();
        let value = change(&mut draft)?;
        *stored = StoredSession::fresh(draft, now);
        Ok(value)
    }
}

pub(crate) fn build_service(settings: QuizSettings) -> Arc<QuizApiService> {
    let store = InMemorySessionStore::new(settings.session_ttl());
    service_with_store(store, settings)
}

pub(crate) fn service_with_store(
    store: InMemorySessionStore,
    settings: QuizSettings,
) -> Arc<QuizApiService> {
    Arc::new(QuizService::new(
        Arc::new(store),
        Arc::new(LoggingLeadSink),
        Arc::new(LoggingAnalytics),
        settings,
    ))
}

/// One rating per question, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AnswerList(Vec<i64>);

impl AnswerList {
    pub(crate) fn values(&self) -> &[i64] {
        &self.0
    }
}

pub(crate) fn parse_answer_list(raw: &str) -> Result<AnswerList, String> {
    let values = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|err| format!("failed to parse '{part}' as a rating ({err})"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() || values.len() > usize::from(TOTAL_QUESTIONS) {
        return Err(format!(
            "expected between 1 and {TOTAL_QUESTIONS} comma-separated ratings, found {}",
            values.len()
        ));
    }
    Ok(AnswerList(values))
}

pub(crate) fn parse_score(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a score ({err})"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("score '{raw}' must be a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn answer_lists_accept_spaces_and_partial_runs() {
        let parsed = parse_answer_list(" 5, 4,3 ").expect("parses");
        assert_eq!(parsed.values(), &[5, 4, 3]);
    }

    #[test]
    fn answer_lists_reject_garbage_and_overflow() {
        assert!(parse_answer_list("5,four").is_err());
        assert!(parse_answer_list("").is_err());
        assert!(parse_answer_list("1,2,3,4,5,1,2").is_err());
    }

    #[test]
    fn scores_must_be_finite() {
        assert_eq!(parse_score("3.5"), Ok(3.5));
        assert!(parse_score("NaN").is_err());
        assert!(parse_score("inf").is_err());
        assert!(parse_score("soon").is_err());
    }

    fn session(id: &str) -> QuizSession {
        QuizSession::new(SessionId(id.to_string()), Utc::now())
    }

    #[test]
    fn store_modifies_only_known_sessions() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let id = SessionId("quiz-ghost".to_string());

        let missing: Result<u8, SessionStoreError> =
            store.modify(&id, |session| Ok(session.advance()));
        assert!(matches!(missing, Err(SessionStoreError::NotFound)));

        store.insert(session("quiz-ghost")).expect("insert");
        assert!(matches!(
            store.insert(session("quiz-ghost")),
            Err(SessionStoreError::Conflict)
        ));
        let current: Result<u8, SessionStoreError> =
            store.modify(&id, |session| Ok(session.advance()));
        assert_eq!(current.expect("modify"), 2);
    }

    #[test]
    fn failed_modifications_leave_the_session_untouched() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let id = SessionId("quiz-steady".to_string());
        store.insert(session("quiz-steady")).expect("insert");

        let result: Result<(), SessionStoreError> = store.modify(&id, |session| {
            session.advance();
            Err(SessionStoreError::Unavailable("rolled back".to_string()))
        });

        assert!(result.is_err());
        let stored = store.fetch(&id).expect("fetch").expect("present");
        assert_eq!(stored.current_question(), 1);
    }

    #[test]
    fn idle_sessions_are_evicted_after_the_ttl() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        store.insert(session("quiz-idle")).expect("insert");
        store.insert(session("quiz-busy")).expect("insert");

        assert_eq!(store.evict_idle(Instant::now()).expect("evict"), 0);

        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(store.evict_idle(later).expect("evict"), 2);
        assert_eq!(store.len().expect("len"), 0);
    }

    #[test]
    fn expired_sessions_are_not_found() {
        let store = InMemorySessionStore::new(Duration::ZERO);
        let id = SessionId("quiz-expired".to_string());
        store.insert(session("quiz-expired")).expect("insert");

        assert!(store.fetch(&id).expect("fetch").is_none());
        assert_eq!(store.len().expect("len"), 0);
    }
}
