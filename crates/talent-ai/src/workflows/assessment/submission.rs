use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use super::clients::{ScoringError, ScoringRequest, ScoringService};
use super::domain::CultureProfile;
use super::error::Rejected;
use super::profile::PersonalityProfile;
use super::session::{RunId, SessionState};

/// Run ids remembered by the claim ledger. Older claims are forgotten first; the stored session's
/// submission flag still blocks a repeat send for those runs.
const CLAIM_HISTORY: usize = 4096;

/// Issues exactly one scoring request per run, however many copies of a session exist.
pub struct SubmissionCoordinator<S> {
    scorer: Arc<S>,
    culture: CultureProfile,
    claimed: Mutex<BTreeSet<RunId>>,
    history: usize,
}

impl<S> SubmissionCoordinator<S>
where
    S: ScoringService + 'static,
{
    pub fn new(scorer: Arc<S>, culture: CultureProfile) -> Self {
        Self {
            scorer,
            culture,
            claimed: Mutex::new(BTreeSet::new()),
            history: CLAIM_HISTORY,
        }
    }

    /// Keep at most `history` claimed run ids.
    pub fn with_claim_history(mut self, history: usize) -> Self {
        self.history = history.max(1);
        self
    }

    /// Claim the run and build its request. `None` means there is nothing to send.
    pub fn prepare(&self, session: &SessionState) -> Option<(SessionState, ScoringRequest)> {
        let (pending, request) = session.begin_submission(self.culture)?;

        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        if !claimed.insert(pending.run_id()) {
            debug!(run = %pending.run_id(), "submission already issued for run");
            return None;
        }
        while claimed.len() > self.history {
            claimed.pop_first();
        }

        Some((pending, request))
    }

    #[cfg(test)]
    pub(crate) fn claimed_runs(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub async fn dispatch(
        &self,
        request: ScoringRequest,
    ) -> Result<PersonalityProfile, ScoringError> {
        info!(
            candidate = %request.candidate_id,
            modules = request.modules.len(),
            responses = request.responses.len(),
            "submitting assessment for scoring"
        );
        let outcome = self.scorer.score_assessment(request).await;
        if let Err(err) = &outcome {
            warn!(error = %err, "scoring request failed");
        }
        outcome
    }

    /// Submit a session awaiting scoring. Sessions not awaiting submission come back unchanged.
    pub async fn submit(&self, session: &SessionState) -> Result<SessionState, Rejected> {
        let Some((pending, request)) = self.prepare(session) else {
            return Ok(session.clone());
        };

        let outcome = self.dispatch(request).await;
        pending.complete_submission(pending.run_id(), outcome)
    }
}
