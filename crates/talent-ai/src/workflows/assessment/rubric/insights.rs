use super::super::profile::{OverallInsights, PersonalityProfile, TraitLevel};
use super::facets::temperament;

pub(crate) fn overall_insights(profile: &PersonalityProfile) -> OverallInsights {
    let mut overview = Vec::new();
    let mut key_strengths = Vec::new();
    let mut potential_challenges = Vec::new();
    let mut career_recommendations = Vec::new();
    let mut development_priorities = Vec::new();

    if let Some(mbti) = &profile.mbti {
        overview.push(format!(
            "{} type with a {} temperament",
            mbti.type_code,
            temperament(&mbti.type_code)
        ));
        career_recommendations.push(mbti_career_hint(&mbti.type_code).to_string());
    }

    if let Some(big_five) = &profile.big_five {
        key_strengths.extend(big_five.strengths.iter().cloned());
        development_priorities.extend(big_five.development_areas.iter().cloned());
        if let Some(score) = big_five.scores.get("conscientiousness") {
            if score.level == TraitLevel::High {
                career_recommendations
                    .push("Roles with ownership of delivery and quality".to_string());
            }
        }
    }

    if let Some(disc) = &profile.disc {
        overview.push(format!("{} oriented working style", disc.primary_style));
    }

    if let Some(fit) = &profile.cultural_fit {
        potential_challenges.extend(fit.potential_challenges.iter().cloned());
    }

    if let Some(team) = &profile.team_compatibility {
        if let Some(role) = team.preferred_team_roles.first() {
            key_strengths.push(format!("natural {} in team settings", role.role));
        }
    }

    if let Some(leadership) = &profile.leadership {
        if leadership.leadership_potential_score > 70.0 {
            key_strengths.push(format!("{} leadership", leadership.dominant_style));
        }
    }

    if let Some(eq) = &profile.emotional_intelligence {
        key_strengths.extend(eq.eq_strengths.iter().cloned());
        development_priorities.extend(eq.development_areas.iter().cloned());
    }

    let personality_overview = if overview.is_empty() {
        "Profile built from the selected assessment modules".to_string()
    } else {
        overview.join("; ")
    };

    OverallInsights {
        personality_overview,
        key_strengths,
        potential_challenges,
        career_recommendations,
        development_priorities,
    }
}

pub(crate) fn recommendations(profile: &PersonalityProfile) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(mbti) = &profile.mbti {
        let hint = match temperament(&mbti.type_code) {
            "rational" => "Give early exposure to strategic planning work",
            "idealist" => "Match with mission-driven projects and mentoring duties",
            "guardian" => "Provide clear processes and defined responsibilities",
            _ => "Offer hands-on, fast-moving assignments",
        };
        recommendations.push(hint.to_string());
    }

    if let Some(fit) = &profile.cultural_fit {
        if fit.overall_fit_score < 60.0 {
            recommendations.push(
                "Consider additional cultural onboarding and a dedicated buddy".to_string(),
            );
        }
    }

    if let Some(leadership) = &profile.leadership {
        if leadership.leadership_potential_score > 70.0 {
            recommendations.push("Consider for the leadership development track".to_string());
        }
    }

    if let Some(eq) = &profile.emotional_intelligence {
        if eq.overall_eq_score < 60.0 {
            recommendations
                .push("Offer emotional intelligence coaching during the first quarter".to_string());
        }
    }

    recommendations
}

fn mbti_career_hint(type_code: &str) -> &'static str {
    match temperament(type_code) {
        "rational" => "Architecture, strategy, or analytical leadership roles",
        "idealist" => "People development, advocacy, or product discovery roles",
        "guardian" => "Operations, compliance, or program management roles",
        _ => "Sales, incident response, or hands-on delivery roles",
    }
}
