use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use super::super::clients::{CatalogError, QuestionCatalog};
use super::super::domain::{AnswerChoice, ModuleId, Question, QuestionId};

const LIKERT_MIN: f64 = 1.0;
const LIKERT_MAX: f64 = 5.0;

/// In-process question catalog backed by the built-in question bank.
#[derive(Debug, Clone)]
pub struct StaticQuestionCatalog {
    questions: BTreeMap<ModuleId, Vec<Question>>,
    withheld: BTreeSet<ModuleId>,
}

impl StaticQuestionCatalog {
    pub fn standard() -> Self {
        let questions = ModuleId::ALL
            .into_iter()
            .map(|module| (module, standard_questions(module)))
            .collect();

        Self {
            questions,
            withheld: BTreeSet::new(),
        }
    }

    pub fn from_questions(questions: BTreeMap<ModuleId, Vec<Question>>) -> Self {
        Self {
            questions,
            withheld: BTreeSet::new(),
        }
    }

    /// Report the module as unavailable, as a catalog outage would.
    pub fn withholding(mut self, module: ModuleId) -> Self {
        self.withheld.insert(module);
        self
    }

    pub fn questions(&self, module: ModuleId) -> &[Question] {
        self.questions
            .get(&module)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions
            .values()
            .flat_map(|questions| questions.iter())
            .find(|question| question.id == *id)
    }
}

impl Default for StaticQuestionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[async_trait]
impl QuestionCatalog for StaticQuestionCatalog {
    async fn list_questions(&self, module: ModuleId) -> Result<Vec<Question>, CatalogError> {
        if self.withheld.contains(&module) {
            return Err(CatalogError::Unavailable(format!(
                "{module} question service is offline"
            )));
        }

        self.questions
            .get(&module)
            .cloned()
            .ok_or(CatalogError::UnknownModule(module))
    }
}

fn standard_questions(module: ModuleId) -> Vec<Question> {
    match module {
        ModuleId::Mbti => mbti_questions(),
        ModuleId::BigFive => big_five_questions(),
        ModuleId::Disc => disc_questions(),
        ModuleId::CulturalFit => cultural_fit_questions(),
        ModuleId::TeamCompatibility => team_questions(),
        ModuleId::Leadership => leadership_questions(),
        ModuleId::EmotionalIntelligence => eq_questions(),
    }
}

fn mbti_questions() -> Vec<Question> {
    vec![
        Question::choice(
            "mbti_1",
            ModuleId::Mbti,
            "In group settings, I typically...",
            vec![
                AnswerChoice::new(
                    "Take charge and guide the discussion",
                    &[("E", 3.0), ("T", 2.0), ("J", 2.0)],
                ),
                AnswerChoice::new("Contribute ideas when asked", &[("I", 2.0), ("F", 1.0)]),
                AnswerChoice::new("Listen and observe before speaking", &[("I", 3.0), ("S", 1.0)]),
                AnswerChoice::new("Generate creative possibilities", &[("E", 1.0), ("N", 3.0)]),
            ],
        )
        .with_category("Social Interaction"),
        Question::choice(
            "mbti_2",
            ModuleId::Mbti,
            "When making important decisions, I rely most on...",
            vec![
                AnswerChoice::new(
                    "Logical analysis and objective criteria",
                    &[("T", 3.0), ("J", 1.0)],
                ),
                AnswerChoice::new("How it will affect people involved", &[("F", 3.0), ("I", 1.0)]),
                AnswerChoice::new("Past experience and proven methods", &[("S", 3.0), ("J", 2.0)]),
                AnswerChoice::new("Future possibilities and potential", &[("N", 3.0), ("P", 1.0)]),
            ],
        )
        .with_category("Decision Making"),
        Question::choice(
            "mbti_3",
            ModuleId::Mbti,
            "My ideal work environment is...",
            vec![
                AnswerChoice::new("Structured with clear expectations", &[("J", 3.0), ("S", 1.0)]),
                AnswerChoice::new("Flexible and adaptable", &[("P", 3.0), ("N", 1.0)]),
                AnswerChoice::new("Collaborative and people-focused", &[("F", 2.0), ("E", 2.0)]),
                AnswerChoice::new(
                    "Independent with minimal interruptions",
                    &[("I", 3.0), ("T", 1.0)],
                ),
            ],
        )
        .with_category("Work Style"),
    ]
}

fn big_five_questions() -> Vec<Question> {
    let likert = |id: &str, prompt: &str, dimension: &str| {
        Question::scale(id, ModuleId::BigFive, prompt, LIKERT_MIN, LIKERT_MAX)
            .with_dimension(dimension)
    };

    vec![
        likert(
            "bf_1",
            "I see myself as someone who is outgoing, sociable",
            "extraversion",
        ),
        likert(
            "bf_2",
            "I see myself as someone who tends to find fault with others",
            "agreeableness",
        )
        .reverse_scored(),
        likert(
            "bf_3",
            "I see myself as someone who does a thorough job",
            "conscientiousness",
        ),
        likert(
            "bf_4",
            "I see myself as someone who gets nervous easily",
            "neuroticism",
        ),
        likert(
            "bf_5",
            "I see myself as someone who has an active imagination",
            "openness",
        ),
    ]
}

fn disc_questions() -> Vec<Question> {
    vec![
        Question::choice(
            "disc_1",
            ModuleId::Disc,
            "When a project stalls, I usually...",
            vec![
                AnswerChoice::new("Make a call and push it forward", &[("D", 3.0)]),
                AnswerChoice::new("Rally people with a new pitch", &[("I", 3.0)]),
                AnswerChoice::new("Check in with each person involved", &[("S", 3.0)]),
                AnswerChoice::new("Dig into the data to find the blocker", &[("C", 3.0)]),
            ],
        )
        .with_category("Problem Solving"),
        Question::choice(
            "disc_2",
            ModuleId::Disc,
            "Colleagues would describe me as...",
            vec![
                AnswerChoice::new("Decisive and direct", &[("D", 2.0), ("C", 1.0)]),
                AnswerChoice::new("Energetic and persuasive", &[("I", 2.0), ("D", 1.0)]),
                AnswerChoice::new("Patient and dependable", &[("S", 2.0), ("I", 1.0)]),
                AnswerChoice::new("Precise and methodical", &[("C", 2.0), ("S", 1.0)]),
            ],
        )
        .with_category("Reputation"),
    ]
}

fn cultural_fit_questions() -> Vec<Question> {
    vec![
        Question::scale(
            "cf_1",
            ModuleId::CulturalFit,
            "How important is work-life balance to you?",
            LIKERT_MIN,
            LIKERT_MAX,
        )
        .with_dimension("work_life_balance"),
        Question::choice(
            "cf_2",
            ModuleId::CulturalFit,
            "I prefer working in environments that are...",
            vec![
                AnswerChoice::new(
                    "Highly competitive and results-driven",
                    &[("competition", 5.0), ("results", 4.0)],
                ),
                AnswerChoice::new(
                    "Collaborative and team-oriented",
                    &[("collaboration", 5.0), ("teamwork", 4.0)],
                ),
                AnswerChoice::new(
                    "Innovative and risk-taking",
                    &[("innovation", 5.0), ("risk_tolerance", 4.0)],
                ),
                AnswerChoice::new(
                    "Stable and process-oriented",
                    &[("stability", 5.0), ("process", 4.0)],
                ),
            ],
        )
        .with_category("Work Environment"),
        Question::choice(
            "cf_3",
            ModuleId::CulturalFit,
            "When priorities change overnight, I...",
            vec![
                AnswerChoice::new("Re-plan quickly and keep moving", &[("agility", 5.0)]),
                AnswerChoice::new(
                    "Want the change documented before acting",
                    &[("process", 4.0), ("excellence", 3.0)],
                ),
                AnswerChoice::new(
                    "Look for the original angle in the new direction",
                    &[("originality", 5.0), ("innovation", 2.0)],
                ),
                AnswerChoice::new(
                    "Check how it affects the client first",
                    &[("client_focus", 5.0), ("collaboration", 2.0)],
                ),
            ],
        )
        .with_category("Adaptability"),
    ]
}

fn team_questions() -> Vec<Question> {
    vec![
        Question::choice(
            "team_1",
            ModuleId::TeamCompatibility,
            "In a new team, the role I naturally take is...",
            vec![
                AnswerChoice::new(
                    "Proposing unconventional ideas",
                    &[("plant", 3.0), ("resource_investigator", 1.0)],
                ),
                AnswerChoice::new(
                    "Clarifying goals and delegating",
                    &[("coordinator", 3.0), ("shaper", 1.0)],
                ),
                AnswerChoice::new(
                    "Turning plans into concrete steps",
                    &[("implementer", 3.0), ("completer_finisher", 1.0)],
                ),
                AnswerChoice::new(
                    "Keeping the group working well together",
                    &[("teamworker", 3.0), ("coordinator", 1.0)],
                ),
            ],
        )
        .with_category("Team Roles"),
        Question::choice(
            "team_2",
            ModuleId::TeamCompatibility,
            "Before a deadline, I am most useful when...",
            vec![
                AnswerChoice::new(
                    "Checking every detail for errors",
                    &[("completer_finisher", 3.0), ("specialist", 1.0)],
                ),
                AnswerChoice::new(
                    "Weighing the options objectively",
                    &[("monitor_evaluator", 3.0)],
                ),
                AnswerChoice::new(
                    "Pushing the team through obstacles",
                    &[("shaper", 3.0), ("implementer", 1.0)],
                ),
                AnswerChoice::new(
                    "Finding outside help and resources",
                    &[("resource_investigator", 3.0), ("teamworker", 1.0)],
                ),
            ],
        )
        .with_category("Delivery"),
    ]
}

fn leadership_questions() -> Vec<Question> {
    vec![
        Question::choice(
            "lead_1",
            ModuleId::Leadership,
            "When leading a team through change, I focus on...",
            vec![
                AnswerChoice::new(
                    "Painting a clear picture of where we are going",
                    &[("visionary", 3.0), ("democratic", 1.0)],
                ),
                AnswerChoice::new(
                    "Helping each person grow into the new work",
                    &[("coaching", 3.0), ("affiliative", 1.0)],
                ),
                AnswerChoice::new(
                    "Setting a high bar by example",
                    &[("pacesetting", 3.0)],
                ),
                AnswerChoice::new(
                    "Giving firm direction and expecting compliance",
                    &[("commanding", 3.0)],
                ),
            ],
        )
        .with_category("Change Leadership"),
        Question::choice(
            "lead_2",
            ModuleId::Leadership,
            "When the team disagrees, I usually...",
            vec![
                AnswerChoice::new(
                    "Ask for input and build consensus",
                    &[("democratic", 3.0), ("affiliative", 1.0)],
                ),
                AnswerChoice::new(
                    "Repair relationships before the decision",
                    &[("affiliative", 3.0)],
                ),
                AnswerChoice::new(
                    "Connect the choice back to our long-term goal",
                    &[("visionary", 2.0), ("coaching", 1.0)],
                ),
                AnswerChoice::new(
                    "Decide quickly and move on",
                    &[("commanding", 2.0), ("pacesetting", 1.0)],
                ),
            ],
        )
        .with_category("Conflict"),
    ]
}

fn eq_questions() -> Vec<Question> {
    vec![
        Question::choice(
            "eq_1",
            ModuleId::EmotionalIntelligence,
            "When I'm feeling stressed, I...",
            vec![
                AnswerChoice::new(
                    "Take time to understand my emotions",
                    &[("self_awareness", 3.0)],
                ),
                AnswerChoice::new(
                    "Focus on controlling my reactions",
                    &[("self_regulation", 3.0)],
                ),
                AnswerChoice::new("Seek support from others", &[("social_awareness", 2.0)]),
                AnswerChoice::new(
                    "Channel the energy into productive action",
                    &[("motivation", 3.0)],
                ),
            ],
        )
        .with_category("Self-Management"),
        Question::choice(
            "eq_2",
            ModuleId::EmotionalIntelligence,
            "When a colleague seems upset after a meeting, I...",
            vec![
                AnswerChoice::new(
                    "Notice it and check in privately",
                    &[("social_awareness", 2.0), ("relationship_management", 2.0)],
                ),
                AnswerChoice::new(
                    "Reflect on whether I contributed to it",
                    &[("self_awareness", 2.0)],
                ),
                AnswerChoice::new(
                    "Give them space and keep my own reaction steady",
                    &[("self_regulation", 2.0)],
                ),
                AnswerChoice::new(
                    "Propose a follow-up to resolve the issue together",
                    &[("relationship_management", 3.0)],
                ),
            ],
        )
        .with_category("Relationships"),
    ]
}
