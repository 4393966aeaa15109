use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, ModuleId};

/// Composite scoring result. A facet is present only when its module was part of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub candidate_id: CandidateId,
    pub assessed_at: DateTime<Utc>,
    #[serde(rename = "mbti_profile", default, skip_serializing_if = "Option::is_none")]
    pub mbti: Option<MbtiFacet>,
    #[serde(
        rename = "big_five_profile",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub big_five: Option<BigFiveFacet>,
    #[serde(rename = "disc_profile", default, skip_serializing_if = "Option::is_none")]
    pub disc: Option<DiscFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_fit: Option<CulturalFitFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_compatibility: Option<TeamCompatibilityFacet>,
    #[serde(
        rename = "leadership_assessment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub leadership: Option<LeadershipFacet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_intelligence: Option<EmotionalIntelligenceFacet>,
    pub overall_insights: OverallInsights,
    pub recommendations: Vec<String>,
}

impl PersonalityProfile {
    /// Empty profile for a candidate; facets are filled in by the scorer.
    pub fn new(candidate_id: CandidateId, assessed_at: DateTime<Utc>) -> Self {
        Self {
            candidate_id,
            assessed_at,
            mbti: None,
            big_five: None,
            disc: None,
            cultural_fit: None,
            team_compatibility: None,
            leadership: None,
            emotional_intelligence: None,
            overall_insights: OverallInsights::default(),
            recommendations: Vec::new(),
        }
    }

    pub fn has_facet(&self, module: ModuleId) -> bool {
        match module {
            ModuleId::Mbti => self.mbti.is_some(),
            ModuleId::BigFive => self.big_five.is_some(),
            ModuleId::Disc => self.disc.is_some(),
            ModuleId::CulturalFit => self.cultural_fit.is_some(),
            ModuleId::TeamCompatibility => self.team_compatibility.is_some(),
            ModuleId::Leadership => self.leadership.is_some(),
            ModuleId::EmotionalIntelligence => self.emotional_intelligence.is_some(),
        }
    }

    /// Modules whose facet is present, in catalog order.
    pub fn present_facets(&self) -> Vec<ModuleId> {
        ModuleId::ALL
            .into_iter()
            .filter(|module| self.has_facet(*module))
            .collect()
    }

    /// Enforce the results contract before the profile reaches the results stage.
    pub fn validate_for(
        &self,
        candidate: CandidateId,
        selected: &[ModuleId],
    ) -> Result<(), ProfileViolation> {
        if self.candidate_id != candidate {
            return Err(ProfileViolation::CandidateMismatch {
                expected: candidate,
                received: self.candidate_id,
            });
        }

        let unexpected: Vec<ModuleId> = self
            .present_facets()
            .into_iter()
            .filter(|module| !selected.contains(module))
            .collect();
        if !unexpected.is_empty() {
            return Err(ProfileViolation::UnselectedFacets(unexpected));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileViolation {
    #[error("profile belongs to candidate {received}, expected {expected}")]
    CandidateMismatch {
        expected: CandidateId,
        received: CandidateId,
    },
    #[error("profile carries facets for modules that were not selected: {0:?}")]
    UnselectedFacets(Vec<ModuleId>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MbtiFacet {
    #[serde(rename = "type")]
    pub type_code: String,
    pub dimensions: BTreeMap<String, f64>,
    pub confidence_scores: BTreeMap<String, f64>,
    pub team_role: String,
    pub communication_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigFiveFacet {
    pub scores: BTreeMap<String, TraitScore>,
    pub profile_summary: String,
    pub strengths: Vec<String>,
    pub development_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitScore {
    /// Normalized to 0-100.
    pub score: f64,
    pub level: TraitLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraitLevel {
    Low,
    Medium,
    High,
}

impl TraitLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 37.5 {
            TraitLevel::Low
        } else if score > 62.5 {
            TraitLevel::High
        } else {
            TraitLevel::Medium
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TraitLevel::Low => "low",
            TraitLevel::Medium => "medium",
            TraitLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscFacet {
    pub scores: BTreeMap<String, f64>,
    pub primary_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalFitFacet {
    pub overall_fit_score: f64,
    pub fit_level: FitLevel,
    pub value_alignment: BTreeMap<String, f64>,
    pub potential_challenges: Vec<String>,
    pub adaptation_recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitLevel {
    Low,
    Medium,
    High,
}

impl FitLevel {
    pub fn from_score(score: f64) -> Self {
        if score > 75.0 {
            FitLevel::High
        } else if score > 50.0 {
            FitLevel::Medium
        } else {
            FitLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FitLevel::Low => "low",
            FitLevel::Medium => "medium",
            FitLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCompatibilityFacet {
    pub preferred_team_roles: Vec<TeamRoleScore>,
    pub collaboration_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoleScore {
    pub role: String,
    pub score: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadershipFacet {
    pub leadership_potential_score: f64,
    pub leadership_styles: BTreeMap<String, f64>,
    pub dominant_style: String,
    pub development_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalIntelligenceFacet {
    pub overall_eq_score: f64,
    pub domain_scores: BTreeMap<String, f64>,
    pub eq_strengths: Vec<String>,
    pub development_areas: Vec<String>,
}

/// Cross-module narrative. Always present on an accepted profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallInsights {
    pub personality_overview: String,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default)]
    pub potential_challenges: Vec<String>,
    #[serde(default)]
    pub career_recommendations: Vec<String>,
    #[serde(default)]
    pub development_priorities: Vec<String>,
}
