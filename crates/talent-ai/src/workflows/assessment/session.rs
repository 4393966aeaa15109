use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clients::{CatalogError, ScoringError, ScoringRequest};
use super::domain::{Answer, CandidateRef, CultureProfile, ModuleId, Question, QuestionId};
use super::error::{AssessmentError, Rejected};
use super::profile::PersonalityProfile;
use super::responses::{AnswerRejection, ResponseStore};

/// Identifies one run. Late results are matched against it, never against object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{:06}", self.0)
    }
}

static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_run_id() -> RunId {
    RunId(RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Macro-stages of a run. `Results` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Selection,
    Questions,
    Processing,
    Results,
    Failed,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Selection => "selection",
            Stage::Questions => "questions",
            Stage::Processing => "processing",
            Stage::Results => "results",
            Stage::Failed => "failed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Stage::Results | Stage::Failed)
    }
}

/// Why a run ended in the failed stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunFailure {
    pub classification: &'static str,
    pub message: String,
}

/// Modules whose question lists must be fetched before the questions stage can begin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub run_id: RunId,
    pub modules: Vec<ModuleId>,
}

/// Joined catalog results for a request, in the request's module order.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub run_id: RunId,
    pub results: Vec<(ModuleId, Result<Vec<Question>, CatalogError>)>,
}

/// The state of one candidate's run. Transitions never mutate the receiver; each returns a new state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(super) run_id: RunId,
    pub(super) candidate: CandidateRef,
    pub(super) stage: Stage,
    pub(super) selected_modules: Vec<ModuleId>,
    pub(super) questions_by_module: BTreeMap<ModuleId, Vec<Question>>,
    pub(super) module_cursor: usize,
    pub(super) question_cursor: usize,
    pub(super) total_questions: usize,
    pub(super) responses: ResponseStore,
    pub(super) submission_issued: bool,
    pub(super) result: Option<PersonalityProfile>,
    pub(super) failure: Option<RunFailure>,
    pub(super) notice: Option<String>,
}

impl SessionState {
    pub fn new(candidate: CandidateRef) -> Self {
        Self {
            run_id: next_run_id(),
            candidate,
            stage: Stage::Selection,
            selected_modules: Vec::new(),
            questions_by_module: BTreeMap::new(),
            module_cursor: 0,
            question_cursor: 0,
            total_questions: 0,
            responses: ResponseStore::default(),
            submission_issued: false,
            result: None,
            failure: None,
            notice: None,
        }
    }

    /// Start over from selection for the same candidate under a fresh run id.
    pub fn reset(&self) -> Self {
        Self::new(self.candidate.clone())
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn candidate(&self) -> &CandidateRef {
        &self.candidate
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selected_modules(&self) -> &[ModuleId] {
        &self.selected_modules
    }

    pub fn questions_for(&self, module: ModuleId) -> &[Question] {
        self.questions_by_module
            .get(&module)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn responses(&self) -> &ResponseStore {
        &self.responses
    }

    /// Denominator fixed when the questions stage begins.
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// `(module index, question index)` of the current question.
    pub fn cursor(&self) -> (usize, usize) {
        (self.module_cursor, self.question_cursor)
    }

    pub fn submission_issued(&self) -> bool {
        self.submission_issued
    }

    pub fn result(&self) -> Option<&PersonalityProfile> {
        self.result.as_ref()
    }

    pub fn failure(&self) -> Option<&RunFailure> {
        self.failure.as_ref()
    }

    /// Actionable message left by the last rejected selection.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn ensure_stage(&self, expected: Stage, action: &'static str) -> Result<(), AssessmentError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(AssessmentError::InvalidStage {
                stage: self.stage,
                action,
            })
        }
    }

    /// Add a module to the selection, or remove it if already selected.
    pub fn toggle_module(&self, module: ModuleId) -> Result<Self, AssessmentError> {
        self.ensure_stage(Stage::Selection, "changing the module selection")?;

        let mut next = self.clone();
        if let Some(position) = next.selected_modules.iter().position(|m| *m == module) {
            next.selected_modules.remove(position);
        } else {
            next.selected_modules.push(module);
        }
        next.notice = None;
        Ok(next)
    }

    /// Replace the selection, keeping first-seen order and dropping repeats.
    pub fn select_modules(&self, modules: &[ModuleId]) -> Result<Self, AssessmentError> {
        self.ensure_stage(Stage::Selection, "changing the module selection")?;

        let mut seen = BTreeSet::new();
        let mut next = self.clone();
        next.selected_modules = modules
            .iter()
            .copied()
            .filter(|module| seen.insert(*module))
            .collect();
        next.notice = None;
        Ok(next)
    }

    /// Describe the catalog fetches needed to enter the questions stage.
    pub fn catalog_request(&self) -> Result<CatalogRequest, AssessmentError> {
        self.ensure_stage(Stage::Selection, "loading questions")?;
        if self.selected_modules.is_empty() {
            return Err(AssessmentError::NoModulesSelected);
        }

        Ok(CatalogRequest {
            run_id: self.run_id,
            modules: self.selected_modules.clone(),
        })
    }

    /// Enter the questions stage from a joined catalog load, or fall back to selection with the
    /// failing modules deselected. Nothing is partially entered.
    pub fn apply_catalog(&self, load: CatalogLoad) -> Result<Self, Rejected> {
        if load.run_id != self.run_id {
            return Err(Rejected::new(
                self.clone(),
                AssessmentError::StaleResult { run: load.run_id },
            ));
        }
        if let Err(error) = self.ensure_stage(Stage::Selection, "entering questions") {
            return Err(Rejected::new(self.clone(), error));
        }
        let loaded_modules: Vec<ModuleId> = load.results.iter().map(|(m, _)| *m).collect();
        if loaded_modules != self.selected_modules {
            return Err(Rejected::new(
                self.clone(),
                AssessmentError::StaleResult { run: load.run_id },
            ));
        }

        let mut questions_by_module = BTreeMap::new();
        let mut owners: BTreeMap<QuestionId, ModuleId> = BTreeMap::new();
        let mut failures: Vec<(ModuleId, AssessmentError)> = Vec::new();

        for (module, result) in load.results {
            let questions = match result {
                Ok(questions) => questions,
                Err(err) => {
                    failures.push((
                        module,
                        AssessmentError::CatalogUnavailable {
                            module,
                            reason: err.to_string(),
                        },
                    ));
                    continue;
                }
            };

            match check_module_questions(module, &questions, &owners) {
                Ok(()) => {
                    for question in &questions {
                        owners.insert(question.id.clone(), module);
                    }
                    questions_by_module.insert(module, questions);
                }
                Err(error) => failures.push((module, error)),
            }
        }

        if let Some((_, first_error)) = failures.first() {
            let error = first_error.clone();
            let mut next = self.clone();
            next.selected_modules
                .retain(|module| !failures.iter().any(|(failed, _)| failed == module));
            let removed: Vec<&str> = failures.iter().map(|(m, _)| m.as_str()).collect();
            next.notice = Some(format!(
                "Removed {} from the selection: {}. Adjust the selection and start again.",
                removed.join(", "),
                error
            ));
            return Err(Rejected::new(next, error));
        }

        let mut next = self.clone();
        next.total_questions = questions_by_module.values().map(Vec::len).sum();
        next.questions_by_module = questions_by_module;
        next.module_cursor = 0;
        next.question_cursor = 0;
        next.stage = Stage::Questions;
        next.notice = None;
        Ok(next)
    }

    /// Position of a loaded question as `(module index, question index)`.
    pub(super) fn locate(&self, id: &QuestionId) -> Option<(usize, usize, &Question)> {
        self.selected_modules
            .iter()
            .enumerate()
            .find_map(|(module_index, module)| {
                self.questions_for(*module)
                    .iter()
                    .enumerate()
                    .find(|(_, question)| question.id == *id)
                    .map(|(question_index, question)| (module_index, question_index, question))
            })
    }

    /// Record an answer for the current question or one already presented. Never advances.
    pub fn record(&self, question_id: &QuestionId, answer: Answer) -> Result<Self, AssessmentError> {
        self.ensure_stage(Stage::Questions, "recording answers")?;

        let (module_index, question_index, question) = self
            .locate(question_id)
            .ok_or_else(|| AnswerRejection::UnknownQuestion(question_id.clone()))?;
        if (module_index, question_index) > (self.module_cursor, self.question_cursor) {
            return Err(AnswerRejection::NotYetPresented(question_id.clone()).into());
        }

        let mut next = self.clone();
        next.responses.record(question, answer)?;
        Ok(next)
    }

    /// Claim the run's single submission. `None` when the session is not awaiting one.
    pub fn begin_submission(&self, culture: CultureProfile) -> Option<(Self, ScoringRequest)> {
        if self.stage != Stage::Processing || self.submission_issued {
            return None;
        }

        let request = ScoringRequest {
            candidate_id: self.candidate.id,
            modules: self.selected_modules.clone(),
            responses: self.responses.to_map(),
            company_culture: culture,
            submitted_at: Utc::now(),
        };
        let mut next = self.clone();
        next.submission_issued = true;
        Some((next, request))
    }

    /// Apply the scoring outcome for `run_id`. The profile is accepted whole or not at all.
    pub fn complete_submission(
        &self,
        run_id: RunId,
        outcome: Result<PersonalityProfile, ScoringError>,
    ) -> Result<Self, Rejected> {
        if run_id != self.run_id {
            return Err(Rejected::new(
                self.clone(),
                AssessmentError::StaleResult { run: run_id },
            ));
        }
        if self.stage != Stage::Processing || !self.submission_issued {
            return Err(Rejected::new(
                self.clone(),
                AssessmentError::InvalidStage {
                    stage: self.stage,
                    action: "accepting a scoring result",
                },
            ));
        }

        let error = match outcome {
            Ok(profile) => match profile.validate_for(self.candidate.id, &self.selected_modules) {
                Ok(()) => {
                    let mut next = self.clone();
                    next.result = Some(profile);
                    next.stage = Stage::Results;
                    return Ok(next);
                }
                Err(violation) => AssessmentError::MalformedProfile(violation.to_string()),
            },
            Err(ScoringError::Unavailable(reason)) => AssessmentError::ScoringUnavailable(reason),
            Err(ScoringError::Rejected(reason)) => AssessmentError::ScoringRejected(reason),
            Err(ScoringError::Malformed(reason)) => AssessmentError::MalformedProfile(reason),
        };

        let mut next = self.clone();
        next.stage = Stage::Failed;
        next.failure = Some(RunFailure {
            classification: error.classification(),
            message: error.to_string(),
        });
        Err(Rejected::new(next, error))
    }
}

fn check_module_questions(
    module: ModuleId,
    questions: &[Question],
    owners: &BTreeMap<QuestionId, ModuleId>,
) -> Result<(), AssessmentError> {
    if questions.is_empty() {
        return Err(AssessmentError::CatalogUnavailable {
            module,
            reason: "no questions published".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    for question in questions {
        if question.module != module {
            return Err(AssessmentError::CatalogUnavailable {
                module,
                reason: format!(
                    "question {} is tagged for {}",
                    question.id, question.module
                ),
            });
        }
        if let Some(first) = owners.get(&question.id) {
            return Err(AssessmentError::DuplicateQuestionId {
                question: question.id.clone(),
                first: *first,
                second: module,
            });
        }
        if !seen.insert(&question.id) {
            return Err(AssessmentError::DuplicateQuestionId {
                question: question.id.clone(),
                first: module,
                second: module,
            });
        }
    }

    Ok(())
}
