use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Answer, CandidateId, CandidateRef, CultureProfile, ModuleId, Question, QuestionId};
use super::profile::PersonalityProfile;

/// Per-module question lookup owned by an external catalog service.
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    async fn list_questions(&self, module: ModuleId) -> Result<Vec<Question>, CatalogError>;
}

/// Aggregate scoring of a completed run.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn score_assessment(
        &self,
        request: ScoringRequest,
    ) -> Result<PersonalityProfile, ScoringError>;
}

/// Source of candidates for the selection stage.
#[async_trait]
pub trait CandidateRoster: Send + Sync {
    async fn list_candidates(&self) -> Result<Vec<CandidateRef>, RosterError>;
}

/// The single atomic payload sent to the scoring service for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub candidate_id: CandidateId,
    pub modules: Vec<ModuleId>,
    pub responses: BTreeMap<QuestionId, Answer>,
    pub company_culture: CultureProfile,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("module {0} is not published by the catalog")]
    UnknownModule(ModuleId),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("scoring transport failed: {0}")]
    Unavailable(String),
    #[error("scoring input rejected: {0}")]
    Rejected(String),
    #[error("scoring payload malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("candidate roster unavailable: {0}")]
    Unavailable(String),
}
