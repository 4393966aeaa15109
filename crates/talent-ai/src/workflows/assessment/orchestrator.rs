use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use super::clients::{QuestionCatalog, ScoringService};
use super::domain::{CandidateRef, CultureProfile};
use super::error::Rejected;
use super::navigator;
use super::session::{CatalogLoad, CatalogRequest, SessionState, Stage};
use super::submission::SubmissionCoordinator;

/// Drives runs through selection, questions, processing, and results against the external
/// catalog and scoring collaborators.
pub struct AssessmentOrchestrator<C, S> {
    catalog: Arc<C>,
    submissions: SubmissionCoordinator<S>,
}

impl<C, S> AssessmentOrchestrator<C, S>
where
    C: QuestionCatalog + 'static,
    S: ScoringService + 'static,
{
    pub fn new(catalog: Arc<C>, scorer: Arc<S>, culture: CultureProfile) -> Self {
        Self {
            catalog,
            submissions: SubmissionCoordinator::new(scorer, culture),
        }
    }

    pub fn submissions(&self) -> &SubmissionCoordinator<S> {
        &self.submissions
    }

    pub fn start_run(&self, candidate: CandidateRef) -> SessionState {
        let session = SessionState::new(candidate);
        info!(
            run = %session.run_id(),
            candidate = %session.candidate().id,
            "assessment run started"
        );
        session
    }

    /// Fetch every requested module concurrently. Results are only visible once all have resolved.
    pub async fn load_catalog(&self, request: CatalogRequest) -> CatalogLoad {
        let fetches = request.modules.iter().map(|module| {
            let catalog = Arc::clone(&self.catalog);
            let module = *module;
            async move { (module, catalog.list_questions(module).await) }
        });
        let results = join_all(fetches).await;

        CatalogLoad {
            run_id: request.run_id,
            results,
        }
    }

    /// Load question lists for the selection and enter the questions stage.
    pub async fn enter_questions(&self, session: &SessionState) -> Result<SessionState, Rejected> {
        let request = session
            .catalog_request()
            .map_err(|error| Rejected::new(session.clone(), error))?;
        let load = self.load_catalog(request).await;
        let next = session.apply_catalog(load);
        log_catalog_outcome(&next);
        next
    }

    /// Advance past the current question, submitting the run once the stream is exhausted.
    pub async fn advance(&self, session: &SessionState) -> Result<SessionState, Rejected> {
        let next = navigator::advance(session);
        if next.stage() == Stage::Processing {
            return self.submit(&next).await;
        }
        Ok(next)
    }

    pub async fn submit(&self, session: &SessionState) -> Result<SessionState, Rejected> {
        let next = self.submissions.submit(session).await;
        log_submission_outcome(&next);
        next
    }
}

pub(crate) fn log_catalog_outcome(outcome: &Result<SessionState, Rejected>) {
    match outcome {
        Ok(session) => info!(
            run = %session.run_id(),
            modules = session.selected_modules().len(),
            questions = session.total_questions(),
            "questions stage entered"
        ),
        Err(rejected) => warn!(
            run = %rejected.session.run_id(),
            classification = rejected.error.classification(),
            error = %rejected.error,
            "questions stage not entered"
        ),
    }
}

pub(crate) fn log_submission_outcome(outcome: &Result<SessionState, Rejected>) {
    match outcome {
        Ok(session) if session.stage() == Stage::Results => {
            info!(run = %session.run_id(), "assessment results accepted")
        }
        Ok(_) => {}
        Err(rejected) => warn!(
            run = %rejected.session.run_id(),
            classification = rejected.error.classification(),
            error = %rejected.error,
            "assessment run failed"
        ),
    }
}
