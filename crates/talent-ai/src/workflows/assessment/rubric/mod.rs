//! Deterministic in-process scoring over the built-in question bank.

mod bank;
mod facets;
mod insights;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::clients::{ScoringError, ScoringRequest, ScoringService};
use super::domain::ModuleId;
use super::profile::PersonalityProfile;
use super::responses::ResponseStore;

pub use bank::StaticQuestionCatalog;

use facets::Scored;

/// Scores runs against the rubric weights carried by the bank's questions.
#[derive(Debug, Clone)]
pub struct RubricScorer {
    bank: Arc<StaticQuestionCatalog>,
}

impl RubricScorer {
    pub fn new(bank: Arc<StaticQuestionCatalog>) -> Self {
        Self { bank }
    }

    pub fn score(&self, request: &ScoringRequest) -> Result<PersonalityProfile, ScoringError> {
        if request.modules.is_empty() {
            return Err(ScoringError::Rejected(
                "no assessment modules were submitted".to_string(),
            ));
        }

        let mut by_module: BTreeMap<ModuleId, Vec<Scored<'_>>> = request
            .modules
            .iter()
            .map(|module| (*module, Vec::new()))
            .collect();

        for (question_id, answer) in &request.responses {
            let question = self.bank.question(question_id).ok_or_else(|| {
                ScoringError::Rejected(format!("unknown question {question_id}"))
            })?;
            ResponseStore::validate(question, answer)
                .map_err(|rejection| ScoringError::Rejected(rejection.to_string()))?;
            let Some(answers) = by_module.get_mut(&question.module) else {
                return Err(ScoringError::Rejected(format!(
                    "question {question_id} belongs to unsubmitted module {}",
                    question.module
                )));
            };
            answers.push((question, *answer));
        }

        if let Some((module, _)) = by_module.iter().find(|(_, answers)| answers.is_empty()) {
            return Err(ScoringError::Rejected(format!(
                "module {module} has no responses"
            )));
        }

        let mut profile = PersonalityProfile::new(request.candidate_id, Utc::now());
        for (module, answers) in &by_module {
            debug!(%module, responses = answers.len(), "scoring module");
            match module {
                ModuleId::Mbti => profile.mbti = Some(facets::mbti(answers)),
                ModuleId::BigFive => profile.big_five = Some(facets::big_five(answers)),
                ModuleId::Disc => profile.disc = Some(facets::disc(answers)),
                ModuleId::CulturalFit => {
                    profile.cultural_fit =
                        Some(facets::cultural_fit(answers, request.company_culture))
                }
                ModuleId::TeamCompatibility => {
                    profile.team_compatibility = Some(facets::team_compatibility(answers))
                }
                ModuleId::Leadership => profile.leadership = Some(facets::leadership(answers)),
                ModuleId::EmotionalIntelligence => {
                    profile.emotional_intelligence = Some(facets::emotional_intelligence(answers))
                }
            }
        }

        profile.overall_insights = insights::overall_insights(&profile);
        profile.recommendations = insights::recommendations(&profile);
        Ok(profile)
    }
}

#[async_trait]
impl ScoringService for RubricScorer {
    async fn score_assessment(
        &self,
        request: ScoringRequest,
    ) -> Result<PersonalityProfile, ScoringError> {
        self.score(&request)
    }
}
