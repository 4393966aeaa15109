use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Answer, CandidateId, CandidateRef, ModuleId, QuestionId, QuestionKind};
use super::navigator::{self, Progress};
use super::profile::{OverallInsights, PersonalityProfile};
use super::session::{RunFailure, RunId, SessionState, Stage};

/// Everything the embedding UI needs to render the current stage of a run.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub run_id: RunId,
    pub candidate: CandidateRef,
    pub stage: Stage,
    pub selected_modules: Vec<ModuleId>,
    pub progress: Progress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<RunFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SessionView {
    pub fn from_session(session: &SessionState) -> Self {
        let current_question = if session.stage() == Stage::Questions {
            QuestionView::current(session)
        } else {
            None
        };

        Self {
            run_id: session.run_id(),
            candidate: session.candidate().clone(),
            stage: session.stage(),
            selected_modules: session.selected_modules().to_vec(),
            progress: navigator::progress(session),
            current_question,
            results: session
                .result()
                .map(|profile| ResultsView::from_profile(profile, session.selected_modules())),
            failure: session.failure().cloned(),
            notice: session.notice().map(str::to_string),
        }
    }
}

/// The current question without scoring weights.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub module: ModuleId,
    pub module_name: &'static str,
    /// One-based position within the module.
    pub position: usize,
    pub module_total: usize,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub format: AnswerFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_answer: Option<Answer>,
}

impl QuestionView {
    fn current(session: &SessionState) -> Option<Self> {
        let question = navigator::current_question(session)?;
        let (_, question_index) = session.cursor();
        let format = match &question.kind {
            QuestionKind::Choice { choices } => AnswerFormat::Choice {
                options: choices.iter().map(|choice| choice.text.clone()).collect(),
            },
            QuestionKind::Scale { min, max, .. } => AnswerFormat::Scale {
                min: *min,
                max: *max,
            },
        };

        Some(Self {
            id: question.id.clone(),
            module: question.module,
            module_name: question.module.descriptor().display_name,
            position: question_index + 1,
            module_total: session.questions_for(question.module).len(),
            prompt: question.prompt.clone(),
            category: question.category.clone(),
            format,
            recorded_answer: session.responses().get(&question.id).copied(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerFormat {
    Choice { options: Vec<String> },
    Scale { min: f64, max: f64 },
}

/// Composite profile fanned out into one section per present facet.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub candidate_id: CandidateId,
    pub assessed_at: DateTime<Utc>,
    pub sections: Vec<FacetSection>,
    pub overall_insights: OverallInsights,
    pub recommendations: Vec<String>,
}

impl ResultsView {
    /// Sections follow `order`; facets absent from the profile are simply skipped.
    pub fn from_profile(profile: &PersonalityProfile, order: &[ModuleId]) -> Self {
        let mut modules: Vec<ModuleId> = order.to_vec();
        for module in profile.present_facets() {
            if !modules.contains(&module) {
                modules.push(module);
            }
        }

        Self {
            candidate_id: profile.candidate_id,
            assessed_at: profile.assessed_at,
            sections: modules
                .into_iter()
                .filter_map(|module| facet_section(profile, module))
                .collect(),
            overall_insights: profile.overall_insights.clone(),
            recommendations: profile.recommendations.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetSection {
    pub module: ModuleId,
    pub title: &'static str,
    pub headline: String,
    pub highlights: Vec<String>,
}

fn facet_section(profile: &PersonalityProfile, module: ModuleId) -> Option<FacetSection> {
    let title = module.descriptor().display_name;
    let (headline, highlights) = match module {
        ModuleId::Mbti => {
            let facet = profile.mbti.as_ref()?;
            (
                format!("Type {}", facet.type_code),
                vec![
                    format!("Team role: {}", facet.team_role),
                    format!("Communication: {}", facet.communication_style),
                ],
            )
        }
        ModuleId::BigFive => {
            let facet = profile.big_five.as_ref()?;
            let traits = facet
                .scores
                .iter()
                .map(|(name, score)| {
                    format!("{name}: {:.1} ({})", score.score, score.level.label())
                })
                .collect();
            (facet.profile_summary.clone(), traits)
        }
        ModuleId::Disc => {
            let facet = profile.disc.as_ref()?;
            let scores = facet
                .scores
                .iter()
                .map(|(style, score)| format!("{style}: {score:.1}"))
                .collect();
            (format!("Primary style: {}", facet.primary_style), scores)
        }
        ModuleId::CulturalFit => {
            let facet = profile.cultural_fit.as_ref()?;
            let highlights = facet
                .potential_challenges
                .iter()
                .chain(facet.adaptation_recommendations.iter())
                .cloned()
                .collect();
            (
                format!(
                    "{:.0}/100 cultural fit ({})",
                    facet.overall_fit_score,
                    facet.fit_level.label()
                ),
                highlights,
            )
        }
        ModuleId::TeamCompatibility => {
            let facet = profile.team_compatibility.as_ref()?;
            let headline = match facet.preferred_team_roles.first() {
                Some(role) => format!("Preferred role: {}", role.role),
                None => "No dominant team role".to_string(),
            };
            let mut highlights: Vec<String> = facet
                .preferred_team_roles
                .iter()
                .map(|role| format!("{} ({:.0}): {}", role.role, role.score, role.description))
                .collect();
            highlights.push(format!("Collaboration: {}", facet.collaboration_style));
            (headline, highlights)
        }
        ModuleId::Leadership => {
            let facet = profile.leadership.as_ref()?;
            (
                format!(
                    "Dominant style: {} (potential {:.0}/100)",
                    facet.dominant_style, facet.leadership_potential_score
                ),
                facet.development_recommendations.clone(),
            )
        }
        ModuleId::EmotionalIntelligence => {
            let facet = profile.emotional_intelligence.as_ref()?;
            let mut highlights: Vec<String> = facet
                .eq_strengths
                .iter()
                .map(|domain| format!("Strength: {domain}"))
                .collect();
            highlights.extend(
                facet
                    .development_areas
                    .iter()
                    .map(|domain| format!("Develop: {domain}")),
            );
            (format!("EQ score {:.1}", facet.overall_eq_score), highlights)
        }
    };

    Some(FacetSection {
        module,
        title,
        headline,
        highlights,
    })
}
