//! Multi-module candidate assessment runs: module selection, question navigation, response
//! capture, a single scoring submission per run, and results presentation.

pub mod clients;
pub mod domain;
pub mod error;
pub mod navigator;
pub mod orchestrator;
pub mod presenter;
pub mod profile;
pub mod repository;
pub mod responses;
pub mod rubric;
pub mod router;
pub mod service;
pub mod session;
pub mod submission;

#[cfg(test)]
mod tests;

pub use clients::{
    CandidateRoster, CatalogError, QuestionCatalog, RosterError, ScoringError, ScoringRequest,
    ScoringService,
};
pub use domain::{
    module_catalog, Answer, AnswerChoice, AssessmentModule, CandidateId, CandidateRef,
    CultureProfile, ModuleId, Question, QuestionId, QuestionKind, UnknownCulture, UnknownModule,
};
pub use error::{AssessmentError, Rejected};
pub use navigator::Progress;
pub use orchestrator::AssessmentOrchestrator;
pub use presenter::{QuestionView, ResultsView, SessionView};
pub use profile::PersonalityProfile;
pub use repository::{SessionStore, StoreError};
pub use responses::{AnswerRejection, ResponseStore};
pub use rubric::{RubricScorer, StaticQuestionCatalog};
pub use router::{assessment_router, candidate_router};
pub use service::{AssessmentService, AssessmentServiceError};
pub use session::{RunFailure, RunId, SessionState, Stage};
pub use submission::SubmissionCoordinator;
