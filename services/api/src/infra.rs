use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_ai::workflows::assessment::{
    AssessmentOrchestrator, AssessmentService, CandidateId, CandidateRef, CandidateRoster,
    CultureProfile, RosterError, RubricScorer, SessionState, SessionStore, StaticQuestionCatalog,
    StoreError,
};

pub(crate) type ApiAssessmentService =
    AssessmentService<StaticQuestionCatalog, RubricScorer, InMemorySessionStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<CandidateId, SessionState>>>,
}

impl InMemorySessionStore {
    fn poisoned() -> StoreError {
        StoreError::Unavailable("session store mutex poisoned".to_string())
    }
}

impl SessionStore for InMemorySessionStore {
    fn fetch(&self, candidate: CandidateId) -> Result<Option<SessionState>, StoreError> {
        let guard = self.sessions.lock().map_err(|_| Self::poisoned())?;
        Ok(guard.get(&candidate).cloned())
    }

    fn save(&self, session: SessionState) -> Result<(), StoreError> {
        let mut guard = self.sessions.lock().map_err(|_| Self::poisoned())?;
        guard.insert(session.candidate().id, session);
        Ok(())
    }

    fn remove(&self, candidate: CandidateId) -> Result<Option<SessionState>, StoreError> {
        let mut guard = self.sessions.lock().map_err(|_| Self::poisoned())?;
        Ok(guard.remove(&candidate))
    }

    fn update<R>(
        &self,
        candidate: CandidateId,
        change: impl FnOnce(SessionState) -> (Option<SessionState>, R),
    ) -> Result<R, StoreError> {
        let mut guard = self.sessions.lock().map_err(|_| Self::poisoned())?;
        let current = guard.get(&candidate).cloned().ok_or(StoreError::NotFound)?;
        let (next, reply) = change(current);
        if let Some(next) = next {
            guard.insert(candidate, next);
        }
        Ok(reply)
    }
}

/// Roster seeded with the demo candidates.
#[derive(Debug, Clone)]
pub(crate) struct StaticRoster {
    candidates: Vec<CandidateRef>,
}

impl StaticRoster {
    pub(crate) fn seeded() -> Self {
        Self {
            candidates: demo_candidates(),
        }
    }
}

#[async_trait]
impl CandidateRoster for StaticRoster {
    async fn list_candidates(&self) -> Result<Vec<CandidateRef>, RosterError> {
        Ok(self.candidates.clone())
    }
}

pub(crate) fn demo_candidates() -> Vec<CandidateRef> {
    [
        (1, "Sarah Johnson", "Senior Frontend Developer"),
        (2, "Marcus Chen", "Product Manager"),
        (3, "Priya Patel", "Data Scientist"),
    ]
    .into_iter()
    .map(|(id, name, position)| CandidateRef {
        id: CandidateId(id),
        display_name: name.to_string(),
        position_applied: Some(position.to_string()),
    })
    .collect()
}

/// Wire the in-process catalog and scorer behind an in-memory session store.
pub(crate) fn assessment_service(
    catalog: StaticQuestionCatalog,
    culture: CultureProfile,
) -> Arc<ApiAssessmentService> {
    let bank = Arc::new(catalog);
    let scorer = Arc::new(RubricScorer::new(Arc::clone(&bank)));
    let orchestrator = Arc::new(AssessmentOrchestrator::new(bank, scorer, culture));
    Arc::new(AssessmentService::new(
        orchestrator,
        Arc::new(InMemorySessionStore::default()),
    ))
}
