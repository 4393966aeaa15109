use super::domain::{ModuleId, QuestionId};
use super::responses::AnswerRejection;
use super::session::{RunId, SessionState, Stage};

/// Failure taxonomy surfaced to the embedding UI. None of these abort the host process.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    #[error("select at least one assessment module before starting")]
    NoModulesSelected,
    #[error("questions for {module} could not be loaded: {reason}")]
    CatalogUnavailable { module: ModuleId, reason: String },
    #[error("question id {question} is published by both {first} and {second}")]
    DuplicateQuestionId {
        question: QuestionId,
        first: ModuleId,
        second: ModuleId,
    },
    #[error(transparent)]
    InvalidAnswer(#[from] AnswerRejection),
    #[error("scoring service unavailable: {0}")]
    ScoringUnavailable(String),
    #[error("scoring service rejected the submission: {0}")]
    ScoringRejected(String),
    #[error("scoring service returned an unusable profile: {0}")]
    MalformedProfile(String),
    #[error("{action} is not permitted during the {} stage", .stage.label())]
    InvalidStage { stage: Stage, action: &'static str },
    #[error("result for run {run} no longer matches the active session")]
    StaleResult { run: RunId },
}

impl AssessmentError {
    /// Stable machine-readable classification for API payloads and failure screens.
    pub const fn classification(&self) -> &'static str {
        match self {
            AssessmentError::NoModulesSelected => "no_modules_selected",
            AssessmentError::CatalogUnavailable { .. } => "catalog_unavailable",
            AssessmentError::DuplicateQuestionId { .. } => "duplicate_question_id",
            AssessmentError::InvalidAnswer(_) => "invalid_answer",
            AssessmentError::ScoringUnavailable(_) => "scoring_unavailable",
            AssessmentError::ScoringRejected(_) => "scoring_rejected",
            AssessmentError::MalformedProfile(_) => "malformed_profile",
            AssessmentError::InvalidStage { .. } => "invalid_stage",
            AssessmentError::StaleResult { .. } => "stale_result",
        }
    }

    /// Whether the error ended the run in the failed stage.
    pub const fn is_run_failure(&self) -> bool {
        matches!(
            self,
            AssessmentError::ScoringUnavailable(_)
                | AssessmentError::ScoringRejected(_)
                | AssessmentError::MalformedProfile(_)
        )
    }
}

/// A transition that could not complete, paired with the session the caller should continue from.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error}")]
pub struct Rejected {
    pub session: SessionState,
    pub error: AssessmentError,
}

impl Rejected {
    pub(crate) fn new(session: SessionState, error: AssessmentError) -> Self {
        Self { session, error }
    }
}
