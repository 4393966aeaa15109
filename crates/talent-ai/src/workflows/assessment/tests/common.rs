use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::clients::{
    CandidateRoster, RosterError, ScoringError, ScoringRequest, ScoringService,
};
use crate::workflows::assessment::domain::{
    Answer, AnswerChoice, CandidateId, CandidateRef, CultureProfile, ModuleId, Question,
    QuestionKind,
};
use crate::workflows::assessment::navigator;
use crate::workflows::assessment::profile::PersonalityProfile;
use crate::workflows::assessment::repository::{SessionStore, StoreError};
use crate::workflows::assessment::session::{CatalogLoad, SessionState};
use crate::workflows::assessment::{
    AssessmentOrchestrator, AssessmentService, RubricScorer, StaticQuestionCatalog,
};

pub(super) fn candidate() -> CandidateRef {
    CandidateRef {
        id: CandidateId(42),
        display_name: "Avery Quinn".to_string(),
        position_applied: Some("Product Designer".to_string()),
    }
}

/// Two MBTI questions followed by a single Big Five question.
pub(super) fn compact_catalog() -> StaticQuestionCatalog {
    let mut questions = BTreeMap::new();
    questions.insert(
        ModuleId::Mbti,
        vec![
            Question::choice(
                "mbti_a",
                ModuleId::Mbti,
                "I recharge by...",
                vec![
                    AnswerChoice::new("Being with people", &[("E", 3.0)]),
                    AnswerChoice::new("Spending time alone", &[("I", 3.0)]),
                ],
            ),
            Question::choice(
                "mbti_b",
                ModuleId::Mbti,
                "I trust...",
                vec![
                    AnswerChoice::new("Facts", &[("S", 3.0), ("T", 2.0)]),
                    AnswerChoice::new("Hunches", &[("N", 3.0), ("F", 2.0)]),
                ],
            ),
        ],
    );
    questions.insert(
        ModuleId::BigFive,
        vec![Question::scale(
            "bf_a",
            ModuleId::BigFive,
            "I see myself as someone who does a thorough job",
            1.0,
            5.0,
        )
        .with_dimension("conscientiousness")],
    );
    StaticQuestionCatalog::from_questions(questions)
}

/// Joined catalog results for the session's current selection.
pub(super) fn load_from(session: &SessionState, catalog: &StaticQuestionCatalog) -> CatalogLoad {
    let request = session.catalog_request().expect("catalog request");
    CatalogLoad {
        run_id: request.run_id,
        results: request
            .modules
            .iter()
            .map(|module| (*module, Ok(catalog.questions(*module).to_vec())))
            .collect(),
    }
}

/// A session already in the questions stage for `modules`.
pub(super) fn questions_session(
    catalog: &StaticQuestionCatalog,
    modules: &[ModuleId],
) -> SessionState {
    let session = SessionState::new(candidate())
        .select_modules(modules)
        .expect("selection stage");
    session
        .apply_catalog(load_from(&session, catalog))
        .expect("catalog applies")
}

/// A valid answer for any question: the first option or the top of the scale.
pub(super) fn sample_answer(question: &Question) -> Answer {
    match question.kind {
        QuestionKind::Choice { .. } => Answer::Choice(0),
        QuestionKind::Scale { max, .. } => Answer::Scale(max),
    }
}

/// Record and advance until the questions stage is left.
pub(super) fn answer_everything(mut session: SessionState) -> SessionState {
    while let Some(question) = navigator::current_question(&session).cloned() {
        session = session
            .record(&question.id, sample_answer(&question))
            .expect("answer records");
        session = navigator::advance(&session);
    }
    session
}

pub(super) fn processing_session(modules: &[ModuleId]) -> SessionState {
    let catalog = StaticQuestionCatalog::standard();
    answer_everything(questions_session(&catalog, modules))
}

pub(super) fn profile_with(modules: &[ModuleId]) -> PersonalityProfile {
    let catalog = StaticQuestionCatalog::standard();
    let session = processing_session(modules);
    let (_, request) = session
        .begin_submission(CultureProfile::default())
        .expect("awaiting submission");
    RubricScorer::new(Arc::new(catalog))
        .score(&request)
        .expect("rubric scores")
}

pub(super) enum Reply {
    Rubric,
    Fixed(PersonalityProfile),
    Fail(ScoringError),
}

type Hook = Box<dyn FnOnce() + Send>;

/// Scoring double that counts requests and can run a hook before replying.
pub(super) struct ScriptedScorer {
    reply: Reply,
    rubric: RubricScorer,
    calls: AtomicUsize,
    requests: Mutex<Vec<ScoringRequest>>,
    before_reply: Mutex<Option<Hook>>,
}

impl ScriptedScorer {
    pub(super) fn new(reply: Reply) -> Self {
        Self {
            reply,
            rubric: RubricScorer::new(Arc::new(StaticQuestionCatalog::standard())),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            before_reply: Mutex::new(None),
        }
    }

    pub(super) fn rubric() -> Self {
        Self::new(Reply::Rubric)
    }

    pub(super) fn failing(error: ScoringError) -> Self {
        Self::new(Reply::Fail(error))
    }

    pub(super) fn on_score(&self, hook: impl FnOnce() + Send + 'static) {
        *self.before_reply.lock().unwrap() = Some(Box::new(hook));
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn requests(&self) -> Vec<ScoringRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScoringService for ScriptedScorer {
    async fn score_assessment(
        &self,
        request: ScoringRequest,
    ) -> Result<PersonalityProfile, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let hook = self.before_reply.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }

        match &self.reply {
            Reply::Rubric => self.rubric.score(&request),
            Reply::Fixed(profile) => Ok(profile.clone()),
            Reply::Fail(error) => Err(error.clone()),
        }
    }
}

#[derive(Default)]
pub(super) struct MemorySessionStore {
    sessions: Mutex<BTreeMap<CandidateId, SessionState>>,
}

impl SessionStore for MemorySessionStore {
    fn fetch(&self, candidate: CandidateId) -> Result<Option<SessionState>, StoreError> {
        Ok(self.sessions.lock().unwrap().get(&candidate).cloned())
    }

    fn save(&self, session: SessionState) -> Result<(), StoreError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.candidate().id, session);
        Ok(())
    }

    fn remove(&self, candidate: CandidateId) -> Result<Option<SessionState>, StoreError> {
        Ok(self.sessions.lock().unwrap().remove(&candidate))
    }

    fn update<R>(
        &self,
        candidate: CandidateId,
        change: impl FnOnce(SessionState) -> (Option<SessionState>, R),
    ) -> Result<R, StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        let current = sessions
            .get(&candidate)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        let (next, reply) = change(current);
        if let Some(next) = next {
            sessions.insert(candidate, next);
        }
        Ok(reply)
    }
}

/// Store whose updates wait for each other at a barrier, so concurrent callers are in flight
/// together before either commits.
pub(super) struct RendezvousStore {
    inner: MemorySessionStore,
    gate: Barrier,
}

impl RendezvousStore {
    pub(super) fn new(session: SessionState, parties: usize) -> Self {
        let inner = MemorySessionStore::default();
        inner.save(session).expect("seed session");
        Self {
            inner,
            gate: Barrier::new(parties),
        }
    }
}

impl SessionStore for RendezvousStore {
    fn fetch(&self, candidate: CandidateId) -> Result<Option<SessionState>, StoreError> {
        self.inner.fetch(candidate)
    }

    fn save(&self, session: SessionState) -> Result<(), StoreError> {
        self.inner.save(session)
    }

    fn remove(&self, candidate: CandidateId) -> Result<Option<SessionState>, StoreError> {
        self.inner.remove(candidate)
    }

    fn update<R>(
        &self,
        candidate: CandidateId,
        change: impl FnOnce(SessionState) -> (Option<SessionState>, R),
    ) -> Result<R, StoreError> {
        self.gate.wait();
        self.inner.update(candidate, change)
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn fetch(&self, _candidate: CandidateId) -> Result<Option<SessionState>, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn save(&self, _session: SessionState) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn remove(&self, _candidate: CandidateId) -> Result<Option<SessionState>, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }

    fn update<R>(
        &self,
        _candidate: CandidateId,
        _change: impl FnOnce(SessionState) -> (Option<SessionState>, R),
    ) -> Result<R, StoreError> {
        Err(StoreError::Unavailable("cache offline".to_string()))
    }
}

pub(super) struct OfflineRoster;

#[async_trait]
impl CandidateRoster for OfflineRoster {
    async fn list_candidates(&self) -> Result<Vec<CandidateRef>, RosterError> {
        Err(RosterError::Unavailable("directory timeout".to_string()))
    }
}

pub(super) struct FixedRoster(pub(super) Vec<CandidateRef>);

#[async_trait]
impl CandidateRoster for FixedRoster {
    async fn list_candidates(&self) -> Result<Vec<CandidateRef>, RosterError> {
        Ok(self.0.clone())
    }
}

pub(super) type TestService =
    AssessmentService<StaticQuestionCatalog, ScriptedScorer, MemorySessionStore>;

pub(super) fn build_service(
    catalog: StaticQuestionCatalog,
    scorer: ScriptedScorer,
) -> (TestService, Arc<ScriptedScorer>, Arc<MemorySessionStore>) {
    let scorer = Arc::new(scorer);
    let store = Arc::new(MemorySessionStore::default());
    let service = service_over(catalog, Arc::clone(&scorer), Arc::clone(&store));
    (service, scorer, store)
}

pub(super) fn service_over<T: SessionStore + 'static>(
    catalog: StaticQuestionCatalog,
    scorer: Arc<ScriptedScorer>,
    store: Arc<T>,
) -> AssessmentService<StaticQuestionCatalog, ScriptedScorer, T> {
    let orchestrator =
        AssessmentOrchestrator::new(Arc::new(catalog), scorer, CultureProfile::default());
    AssessmentService::new(Arc::new(orchestrator), store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
