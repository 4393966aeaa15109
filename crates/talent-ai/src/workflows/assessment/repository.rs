use super::domain::CandidateId;
use super::session::SessionState;

/// Holds the single active run per candidate for an embedding UI.
pub trait SessionStore: Send + Sync {
    fn fetch(&self, candidate: CandidateId) -> Result<Option<SessionState>, StoreError>;
    fn save(&self, session: SessionState) -> Result<(), StoreError>;
    fn remove(&self, candidate: CandidateId) -> Result<Option<SessionState>, StoreError>;

    /// Read, transform and write back the candidate's session as one step. No other update or
    /// save for the candidate may interleave. `change` returns the session to store, or `None`
    /// to leave the stored session untouched, alongside the caller's reply.
    fn update<R>(
        &self,
        candidate: CandidateId,
        change: impl FnOnce(SessionState) -> (Option<SessionState>, R),
    ) -> Result<R, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no active assessment run")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
