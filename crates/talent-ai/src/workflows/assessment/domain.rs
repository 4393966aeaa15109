use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Independently selectable assessment modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    Mbti,
    BigFive,
    Disc,
    CulturalFit,
    TeamCompatibility,
    Leadership,
    EmotionalIntelligence,
}

impl ModuleId {
    pub const ALL: [ModuleId; 7] = [
        ModuleId::Mbti,
        ModuleId::BigFive,
        ModuleId::Disc,
        ModuleId::CulturalFit,
        ModuleId::TeamCompatibility,
        ModuleId::Leadership,
        ModuleId::EmotionalIntelligence,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ModuleId::Mbti => "mbti",
            ModuleId::BigFive => "big_five",
            ModuleId::Disc => "disc",
            ModuleId::CulturalFit => "cultural_fit",
            ModuleId::TeamCompatibility => "team_compatibility",
            ModuleId::Leadership => "leadership",
            ModuleId::EmotionalIntelligence => "emotional_intelligence",
        }
    }

    pub const fn descriptor(self) -> AssessmentModule {
        match self {
            ModuleId::Mbti => AssessmentModule {
                id: self,
                display_name: "MBTI Assessment",
                description: "Understand personality type and cognitive preferences",
                estimated_minutes: 18,
            },
            ModuleId::BigFive => AssessmentModule {
                id: self,
                display_name: "Big Five Personality",
                description: "Comprehensive personality trait analysis",
                estimated_minutes: 12,
            },
            ModuleId::Disc => AssessmentModule {
                id: self,
                display_name: "DISC Behavioral Style",
                description: "Identify dominant behavioral and communication style",
                estimated_minutes: 8,
            },
            ModuleId::CulturalFit => AssessmentModule {
                id: self,
                display_name: "Cultural Fit Analysis",
                description: "Assess alignment with company culture and values",
                estimated_minutes: 11,
            },
            ModuleId::TeamCompatibility => AssessmentModule {
                id: self,
                display_name: "Team Compatibility",
                description: "Analyze team role preferences and collaboration style",
                estimated_minutes: 9,
            },
            ModuleId::Leadership => AssessmentModule {
                id: self,
                display_name: "Leadership Assessment",
                description: "Evaluate leadership potential and style",
                estimated_minutes: 14,
            },
            ModuleId::EmotionalIntelligence => AssessmentModule {
                id: self,
                display_name: "Emotional Intelligence",
                description: "Measure emotional awareness and social skills",
                estimated_minutes: 11,
            },
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleId {
    type Err = UnknownModule;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ModuleId::ALL
            .into_iter()
            .find(|module| module.as_str() == normalized)
            .ok_or_else(|| UnknownModule(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown assessment module '{0}'")]
pub struct UnknownModule(pub String);

/// Static catalog entry describing a selectable module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssessmentModule {
    pub id: ModuleId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub estimated_minutes: u16,
}

/// All modules in display order.
pub fn module_catalog() -> Vec<AssessmentModule> {
    ModuleId::ALL.into_iter().map(ModuleId::descriptor).collect()
}

/// Identifier wrapper for catalog questions. Assumed unique across every module in a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single catalog question as supplied by the question catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub module: ModuleId,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Trait or dimension a scale answer contributes to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    pub kind: QuestionKind,
}

impl Question {
    pub fn choice(
        id: &str,
        module: ModuleId,
        prompt: &str,
        choices: Vec<AnswerChoice>,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            module,
            prompt: prompt.to_string(),
            category: None,
            dimension: None,
            kind: QuestionKind::Choice { choices },
        }
    }

    pub fn scale(id: &str, module: ModuleId, prompt: &str, min: f64, max: f64) -> Self {
        Self {
            id: QuestionId::new(id),
            module,
            prompt: prompt.to_string(),
            category: None,
            dimension: None,
            kind: QuestionKind::Scale {
                min,
                max,
                reverse_scored: false,
            },
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_dimension(mut self, dimension: &str) -> Self {
        self.dimension = Some(dimension.to_string());
        self
    }

    pub fn reverse_scored(mut self) -> Self {
        if let QuestionKind::Scale { reverse_scored, .. } = &mut self.kind {
            *reverse_scored = true;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Choice {
        choices: Vec<AnswerChoice>,
    },
    Scale {
        min: f64,
        max: f64,
        #[serde(default)]
        reverse_scored: bool,
    },
}

impl QuestionKind {
    pub const fn label(&self) -> &'static str {
        match self {
            QuestionKind::Choice { .. } => "choice",
            QuestionKind::Scale { .. } => "scale",
        }
    }
}

/// One selectable option with the scoring weights it contributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerChoice {
    pub text: String,
    pub weights: BTreeMap<String, f64>,
}

impl AnswerChoice {
    pub fn new(text: &str, weights: &[(&str, f64)]) -> Self {
        Self {
            text: text.to_string(),
            weights: weights
                .iter()
                .map(|(key, weight)| (key.to_string(), *weight))
                .collect(),
        }
    }
}

/// A recorded answer: a zero-based choice index or a numeric scale value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Choice(usize),
    Scale(f64),
}

/// Roster identifier for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subject of an assessment run as exposed by the candidate roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRef {
    pub id: CandidateId,
    pub display_name: String,
    #[serde(default)]
    pub position_applied: Option<String>,
}

/// Target organizational culture used when scoring cultural fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultureProfile {
    #[default]
    InnovativeStartup,
    EnterpriseCorporate,
    CreativeAgency,
}

impl CultureProfile {
    pub const fn as_str(self) -> &'static str {
        match self {
            CultureProfile::InnovativeStartup => "innovative_startup",
            CultureProfile::EnterpriseCorporate => "enterprise_corporate",
            CultureProfile::CreativeAgency => "creative_agency",
        }
    }

    /// Values the culture rewards, matched against cultural-fit answer weights.
    pub const fn values(self) -> &'static [&'static str] {
        match self {
            CultureProfile::InnovativeStartup => {
                &["innovation", "agility", "risk_tolerance", "collaboration"]
            }
            CultureProfile::EnterpriseCorporate => {
                &["stability", "process", "excellence", "results"]
            }
            CultureProfile::CreativeAgency => {
                &["innovation", "originality", "client_focus", "collaboration"]
            }
        }
    }
}

impl FromStr for CultureProfile {
    type Err = UnknownCulture;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "innovative_startup" | "startup" => Ok(Self::InnovativeStartup),
            "enterprise_corporate" | "enterprise" => Ok(Self::EnterpriseCorporate),
            "creative_agency" | "agency" => Ok(Self::CreativeAgency),
            _ => Err(UnknownCulture(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown company culture '{0}'")]
pub struct UnknownCulture(pub String);
