use std::collections::BTreeMap;

use super::super::domain::{Answer, CultureProfile, Question, QuestionKind};
use super::super::profile::{
    BigFiveFacet, CulturalFitFacet, DiscFacet, EmotionalIntelligenceFacet, FitLevel,
    LeadershipFacet, MbtiFacet, TeamCompatibilityFacet, TeamRoleScore, TraitLevel, TraitScore,
};

/// A question paired with the answer recorded for it.
pub(crate) type Scored<'a> = (&'a Question, Answer);

const MBTI_AXES: [(&str, &str); 4] = [("E", "I"), ("S", "N"), ("T", "F"), ("J", "P")];
const BIG_FIVE_TRAITS: [&str; 5] = [
    "openness",
    "conscientiousness",
    "extraversion",
    "agreeableness",
    "neuroticism",
];
const DISC_STYLES: [(&str, &str); 4] = [
    ("D", "Dominance"),
    ("I", "Influence"),
    ("S", "Steadiness"),
    ("C", "Conscientiousness"),
];
const BELBIN_ROLES: [(&str, &str); 9] = [
    ("plant", "Creative problem solver who generates ideas"),
    ("resource_investigator", "Outgoing explorer of opportunities and contacts"),
    ("coordinator", "Natural leader who clarifies goals and coordinates team efforts"),
    ("shaper", "Challenging and dynamic, thrives on pressure"),
    ("monitor_evaluator", "Strategic and discerning, weighs all options"),
    ("teamworker", "Co-operative and diplomatic, keeps the team cohesive"),
    ("implementer", "Disciplined and reliable, turns ideas into action"),
    ("completer_finisher", "Painstaking and conscientious, polishes the output"),
    ("specialist", "Single-minded expert who provides rare knowledge"),
];
const LEADERSHIP_STYLES: [&str; 6] = [
    "visionary",
    "coaching",
    "affiliative",
    "democratic",
    "pacesetting",
    "commanding",
];
const EQ_DOMAINS: [&str; 4] = [
    "self_awareness",
    "self_regulation",
    "social_awareness",
    "relationship_management",
];

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sum the weights of every chosen option into the given keys. Unlisted keys are ignored.
fn tally_choices(answers: &[Scored<'_>], keys: &[&str]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> =
        keys.iter().map(|key| (key.to_string(), 0.0)).collect();

    for (question, answer) in answers {
        let (QuestionKind::Choice { choices }, Answer::Choice(index)) = (&question.kind, answer)
        else {
            continue;
        };
        let Some(choice) = choices.get(*index) else {
            continue;
        };
        for (key, weight) in &choice.weights {
            if let Some(total) = totals.get_mut(key) {
                *total += weight;
            }
        }
    }

    totals
}

/// Scale answer normalized to 0-100, honoring reverse scoring.
fn normalized_scale(question: &Question, answer: &Answer) -> Option<f64> {
    let (
        QuestionKind::Scale {
            min,
            max,
            reverse_scored,
        },
        Answer::Scale(value),
    ) = (&question.kind, answer)
    else {
        return None;
    };
    if max <= min {
        return None;
    }
    let value = if *reverse_scored { min + max - value } else { *value };
    Some((value - min) / (max - min) * 100.0)
}

/// Key with the highest value; ties go to the earliest key in `order`.
fn dominant<'a>(scores: &BTreeMap<String, f64>, order: &[&'a str]) -> &'a str {
    let mut best = order[0];
    let mut best_score = f64::MIN;
    for key in order.iter().copied() {
        let score = scores.get(key).copied().unwrap_or(0.0);
        if score > best_score {
            best = key;
            best_score = score;
        }
    }
    best
}

pub(crate) fn mbti(answers: &[Scored<'_>]) -> MbtiFacet {
    let letters: Vec<&str> = MBTI_AXES.iter().flat_map(|(a, b)| [*a, *b]).collect();
    let dimensions = tally_choices(answers, &letters);
    let score = |key: &str| dimensions.get(key).copied().unwrap_or(0.0);

    let mut type_code = String::new();
    let mut confidence_scores = BTreeMap::new();
    for (first, second) in MBTI_AXES {
        let (a, b) = (score(first), score(second));
        type_code.push_str(if a > b { first } else { second });
        let confidence = if a + b > 0.0 { (a - b).abs() / (a + b) } else { 0.0 };
        confidence_scores.insert(format!("{first}_{second}"), round1(confidence * 100.0) / 100.0);
    }

    MbtiFacet {
        team_role: mbti_team_role(&type_code).to_string(),
        communication_style: mbti_communication_style(&type_code).to_string(),
        type_code,
        dimensions,
        confidence_scores,
    }
}

/// Keirsey temperament for a four-letter type.
pub(crate) fn temperament(type_code: &str) -> &'static str {
    let bytes = type_code.as_bytes();
    match (bytes.get(1), bytes.get(2), bytes.get(3)) {
        (Some(b'N'), Some(b'T'), _) => "rational",
        (Some(b'N'), Some(b'F'), _) => "idealist",
        (Some(b'S'), _, Some(b'J')) => "guardian",
        _ => "artisan",
    }
}

fn mbti_team_role(type_code: &str) -> &'static str {
    match temperament(type_code) {
        "rational" => "Strategist",
        "idealist" => "Catalyst",
        "guardian" => "Stabilizer",
        _ => "Troubleshooter",
    }
}

fn mbti_communication_style(type_code: &str) -> &'static str {
    match (type_code.starts_with('E'), type_code.contains('T')) {
        (true, true) => "Direct and logic-first",
        (true, false) => "Expressive and people-first",
        (false, true) => "Concise and written-first",
        (false, false) => "Reflective and supportive",
    }
}

pub(crate) fn big_five(answers: &[Scored<'_>]) -> BigFiveFacet {
    let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (question, answer) in answers {
        let Some(dimension) = question.dimension.as_deref() else {
            continue;
        };
        let Some(trait_name) = BIG_FIVE_TRAITS.iter().find(|name| **name == dimension) else {
            continue;
        };
        if let Some(value) = normalized_scale(question, answer) {
            samples.entry(*trait_name).or_default().push(value);
        }
    }

    let scores: BTreeMap<String, TraitScore> = samples
        .into_iter()
        .map(|(name, values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let score = round1(mean);
            (
                name.to_string(),
                TraitScore {
                    score,
                    level: TraitLevel::from_score(score),
                },
            )
        })
        .collect();

    let mut strengths = Vec::new();
    let mut development_areas = Vec::new();
    for (name, trait_score) in &scores {
        match (name.as_str(), trait_score.level) {
            ("neuroticism", TraitLevel::Low) => strengths.push("emotional_stability".to_string()),
            ("neuroticism", TraitLevel::High) => {
                development_areas.push("stress_management".to_string())
            }
            ("neuroticism", TraitLevel::Medium) => {}
            (_, TraitLevel::High) => strengths.push(name.clone()),
            (_, TraitLevel::Low) => development_areas.push(name.clone()),
            (_, TraitLevel::Medium) => {}
        }
    }

    let highest = scores
        .iter()
        .filter(|(name, _)| name.as_str() != "neuroticism")
        .max_by(|a, b| a.1.score.total_cmp(&b.1.score));
    let profile_summary = match highest {
        Some((name, score)) => format!(
            "Most pronounced trait is {name} ({:.1}/100) across {} measured traits",
            score.score,
            scores.len()
        ),
        None => "Trait profile is balanced across measured dimensions".to_string(),
    };

    BigFiveFacet {
        scores,
        profile_summary,
        strengths,
        development_areas,
    }
}

pub(crate) fn disc(answers: &[Scored<'_>]) -> DiscFacet {
    let keys: Vec<&str> = DISC_STYLES.iter().map(|(key, _)| *key).collect();
    let scores = tally_choices(answers, &keys);
    let primary = dominant(&scores, &keys);
    let primary_style = DISC_STYLES
        .iter()
        .find(|(key, _)| *key == primary)
        .map(|(_, name)| *name)
        .unwrap_or(primary)
        .to_string();

    DiscFacet {
        scores,
        primary_style,
    }
}

pub(crate) fn cultural_fit(answers: &[Scored<'_>], culture: CultureProfile) -> CulturalFitFacet {
    let mut dimensions: BTreeMap<String, f64> = BTreeMap::new();
    for (question, answer) in answers {
        match (&question.kind, answer) {
            (QuestionKind::Choice { choices }, Answer::Choice(index)) => {
                if let Some(choice) = choices.get(*index) {
                    for (key, weight) in &choice.weights {
                        *dimensions.entry(key.clone()).or_default() += weight;
                    }
                }
            }
            (QuestionKind::Scale { .. }, _) => {
                if let (Some(dimension), Some(value)) =
                    (question.dimension.as_ref(), normalized_scale(question, answer))
                {
                    // 0-100 onto the 0-5 weight range used by choice options.
                    *dimensions.entry(dimension.clone()).or_default() += value / 20.0;
                }
            }
            _ => {}
        }
    }

    let value_alignment: BTreeMap<String, f64> = culture
        .values()
        .iter()
        .map(|value| {
            let raw = dimensions.get(*value).copied().unwrap_or(0.0);
            (value.to_string(), round1((raw / 5.0 * 100.0).min(100.0)))
        })
        .collect();
    let overall_fit_score = if value_alignment.is_empty() {
        0.0
    } else {
        round1(value_alignment.values().sum::<f64>() / value_alignment.len() as f64)
    };

    let mut potential_challenges = Vec::new();
    let mut adaptation_recommendations = Vec::new();
    for (value, alignment) in &value_alignment {
        if *alignment < 40.0 {
            potential_challenges.push(format!("Limited alignment with {value}"));
            adaptation_recommendations
                .push(format!("Pair with a mentor who models {value} day to day"));
        }
    }
    let balance = dimensions.get("work_life_balance").copied().unwrap_or(0.0);
    if balance >= 4.0 && culture == CultureProfile::InnovativeStartup {
        potential_challenges
            .push("Strong work-life balance expectations in a fast-paced environment".to_string());
        adaptation_recommendations
            .push("Agree on working-hour boundaries during onboarding".to_string());
    }

    CulturalFitFacet {
        overall_fit_score,
        fit_level: FitLevel::from_score(overall_fit_score),
        value_alignment,
        potential_challenges,
        adaptation_recommendations,
    }
}

pub(crate) fn team_compatibility(answers: &[Scored<'_>]) -> TeamCompatibilityFacet {
    let keys: Vec<&str> = BELBIN_ROLES.iter().map(|(key, _)| *key).collect();
    let scores = tally_choices(answers, &keys);

    let mut ranked: Vec<(&str, &str, f64)> = BELBIN_ROLES
        .iter()
        .map(|(role, description)| (*role, *description, scores.get(*role).copied().unwrap_or(0.0)))
        .filter(|(_, _, score)| *score > 0.0)
        .collect();
    ranked.sort_by(|a, b| b.2.total_cmp(&a.2));
    ranked.truncate(3);

    let collaboration_style = match ranked.first().map(|(role, _, _)| *role) {
        Some("coordinator" | "teamworker" | "resource_investigator") => "People-oriented collaborator",
        Some("plant" | "monitor_evaluator" | "specialist") => "Thought-oriented contributor",
        Some(_) => "Action-oriented executor",
        None => "Undetermined",
    }
    .to_string();

    TeamCompatibilityFacet {
        preferred_team_roles: ranked
            .into_iter()
            .map(|(role, description, score)| TeamRoleScore {
                role: role.to_string(),
                score,
                description: description.to_string(),
            })
            .collect(),
        collaboration_style,
    }
}

pub(crate) fn leadership(answers: &[Scored<'_>]) -> LeadershipFacet {
    let styles = tally_choices(answers, &LEADERSHIP_STYLES);
    let dominant_style = dominant(&styles, &LEADERSHIP_STYLES).to_string();

    let answered = answers.len().max(1) as f64;
    let total: f64 = styles.values().sum();
    // Each answer carries up to four points; three is a committed, consistent response.
    let leadership_potential_score = round1((total / (answered * 3.0) * 100.0).min(100.0));

    let mut development_recommendations: Vec<String> = ["visionary", "coaching", "democratic"]
        .iter()
        .filter(|style| styles.get(**style).copied().unwrap_or(0.0) == 0.0)
        .map(|style| format!("Build {style} leadership habits through a stretch assignment"))
        .collect();
    if matches!(dominant_style.as_str(), "pacesetting" | "commanding") {
        development_recommendations
            .push("Balance directive habits with regular coaching conversations".to_string());
    }

    LeadershipFacet {
        leadership_potential_score,
        leadership_styles: styles,
        dominant_style,
        development_recommendations,
    }
}

pub(crate) fn emotional_intelligence(answers: &[Scored<'_>]) -> EmotionalIntelligenceFacet {
    let domain_scores = tally_choices(answers, &EQ_DOMAINS);
    let total: f64 = domain_scores.values().sum();
    let mean = total / EQ_DOMAINS.len() as f64;
    let answered = answers.len().max(1) as f64;

    let eq_strengths = domain_scores
        .iter()
        .filter(|(_, score)| **score > mean)
        .map(|(domain, _)| domain.clone())
        .collect();
    let development_areas = domain_scores
        .iter()
        .filter(|(_, score)| **score < mean)
        .map(|(domain, _)| domain.clone())
        .collect();

    EmotionalIntelligenceFacet {
        overall_eq_score: round1((total / (answered * 3.0) * 100.0).min(100.0)),
        domain_scores,
        eq_strengths,
        development_areas,
    }
}
