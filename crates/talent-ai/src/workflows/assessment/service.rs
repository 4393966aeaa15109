use std::sync::Arc;

use tracing::{info, warn};

use super::clients::{QuestionCatalog, ScoringService};
use super::domain::{Answer, CandidateId, CandidateRef, ModuleId, QuestionId};
use super::error::{AssessmentError, Rejected};
use super::navigator;
use super::orchestrator::{log_catalog_outcome, log_submission_outcome, AssessmentOrchestrator};
use super::repository::{SessionStore, StoreError};
use super::session::{SessionState, Stage};

/// Facade threading stored sessions through the orchestrator. Every read-modify-write goes through
/// `SessionStore::update`, so overlapping requests for one candidate never overwrite each other.
/// Nothing is held across an await: after each collaborator call the result is applied to the
/// session stored at that moment through the run-id guard, so a reset or abandon during the call
/// discards the late result.
pub struct AssessmentService<C, S, T> {
    orchestrator: Arc<AssessmentOrchestrator<C, S>>,
    store: Arc<T>,
}

impl<C, S, T> AssessmentService<C, S, T>
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
    T: SessionStore + 'static,
{
    pub fn new(orchestrator: Arc<AssessmentOrchestrator<C, S>>, store: Arc<T>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }

    /// Start a fresh run for the candidate, discarding any run already in progress.
    pub fn start(&self, candidate: CandidateRef) -> Result<SessionState, AssessmentServiceError> {
        let session = self.orchestrator.start_run(candidate);
        self.store.save(session.clone())?;
        Ok(session)
    }

    pub fn get(&self, candidate: CandidateId) -> Result<SessionState, AssessmentServiceError> {
        let session = self.store.fetch(candidate)?.ok_or(StoreError::NotFound)?;
        Ok(session)
    }

    pub fn select_modules(
        &self,
        candidate: CandidateId,
        modules: &[ModuleId],
    ) -> Result<SessionState, AssessmentServiceError> {
        self.transition(candidate, |session| session.select_modules(modules))
    }

    pub fn toggle_module(
        &self,
        candidate: CandidateId,
        module: ModuleId,
    ) -> Result<SessionState, AssessmentServiceError> {
        self.transition(candidate, |session| session.toggle_module(module))
    }

    /// Load every selected module's questions and enter the questions stage.
    pub async fn begin_questions(
        &self,
        candidate: CandidateId,
    ) -> Result<SessionState, AssessmentServiceError> {
        let request = self.get(candidate)?.catalog_request()?;
        let load = self.orchestrator.load_catalog(request).await;

        self.settle(candidate, |latest| {
            let outcome = latest.apply_catalog(load);
            log_catalog_outcome(&outcome);
            outcome
        })
    }

    pub fn record(
        &self,
        candidate: CandidateId,
        question_id: &QuestionId,
        answer: Answer,
    ) -> Result<SessionState, AssessmentServiceError> {
        self.transition(candidate, |session| session.record(question_id, answer))
    }

    /// Advance past the current question and submit once every question is answered.
    pub async fn advance(
        &self,
        candidate: CandidateId,
    ) -> Result<SessionState, AssessmentServiceError> {
        let (next, moved) = self.store.update(candidate, |session| {
            let next = navigator::advance(&session);
            if next == session {
                (None, (next, false))
            } else {
                (Some(next.clone()), (next, true))
            }
        })?;

        if moved && next.stage() == Stage::Processing {
            return self.submit(candidate).await;
        }
        Ok(next)
    }

    /// Submit a run awaiting scoring. Repeated calls issue no further requests.
    pub async fn submit(
        &self,
        candidate: CandidateId,
    ) -> Result<SessionState, AssessmentServiceError> {
        let submissions = self.orchestrator.submissions();
        let claim = self
            .store
            .update(candidate, |session| match submissions.prepare(&session) {
                Some((pending, request)) => {
                    let run_id = pending.run_id();
                    (Some(pending), Ok((run_id, request)))
                }
                None => (None, Err(session)),
            })?;
        let (run_id, request) = match claim {
            Ok(claim) => claim,
            Err(unchanged) => return Ok(unchanged),
        };

        let outcome = submissions.dispatch(request).await;

        self.settle(candidate, |latest| {
            let next = latest.complete_submission(run_id, outcome);
            log_submission_outcome(&next);
            next
        })
    }

    pub fn reset(&self, candidate: CandidateId) -> Result<SessionState, AssessmentServiceError> {
        let next = self.store.update(candidate, |previous| {
            let next = previous.reset();
            info!(
                previous_run = %previous.run_id(),
                run = %next.run_id(),
                "assessment run reset to selection"
            );
            (Some(next.clone()), next)
        })?;
        Ok(next)
    }

    pub fn abandon(&self, candidate: CandidateId) -> Result<SessionState, AssessmentServiceError> {
        let removed = self.store.remove(candidate)?.ok_or(StoreError::NotFound)?;
        info!(run = %removed.run_id(), "assessment run abandoned");
        Ok(removed)
    }

    fn transition(
        &self,
        candidate: CandidateId,
        change: impl FnOnce(&SessionState) -> Result<SessionState, AssessmentError>,
    ) -> Result<SessionState, AssessmentServiceError> {
        self.store.update(candidate, |session| match change(&session) {
            Ok(next) => (Some(next.clone()), Ok(next)),
            Err(error) => (None, Err(AssessmentServiceError::from(error))),
        })?
    }

    /// Apply a collaborator result to the session stored now, not the one the call started from.
    fn settle(
        &self,
        candidate: CandidateId,
        apply: impl FnOnce(&SessionState) -> Result<SessionState, Rejected>,
    ) -> Result<SessionState, AssessmentServiceError> {
        self.store.update(candidate, |latest| match apply(&latest) {
            Ok(session) => (Some(session.clone()), Ok(session)),
            Err(Rejected { session, error }) => {
                if let AssessmentError::StaleResult { run } = &error {
                    warn!(%run, active_run = %session.run_id(), "discarding stale result");
                    (None, Err(AssessmentServiceError::from(error)))
                } else {
                    (Some(session), Err(AssessmentServiceError::from(error)))
                }
            }
        })?
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
