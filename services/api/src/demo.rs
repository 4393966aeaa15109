use crate::infra::{assessment_service, demo_candidates};
use clap::Args;
use talent_ai::config::AppConfig;
use talent_ai::error::AppError;
use talent_ai::workflows::assessment::{
    module_catalog, navigator, Answer, AssessmentError, CultureProfile, ModuleId, Question,
    QuestionKind, ResultsView, Stage, StaticQuestionCatalog,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Comma separated modules to run, in order
    #[arg(long, value_delimiter = ',', default_value = "mbti,big_five,cultural_fit")]
    pub(crate) modules: Vec<ModuleId>,
    /// Company culture used for cultural-fit scoring (defaults to APP_COMPANY_CULTURE)
    #[arg(long)]
    pub(crate) culture: Option<CultureProfile>,
    /// Roster id of the demo candidate
    #[arg(long, default_value_t = 1)]
    pub(crate) candidate: u64,
    /// Simulate a catalog outage for one module
    #[arg(long)]
    pub(crate) withhold: Option<ModuleId>,
    /// Print the results payload as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn list_modules() {
    println!("Assessment modules");
    for module in module_catalog() {
        println!(
            "- {:<24} {} (~{} min): {}",
            module.id.as_str(),
            module.display_name,
            module.estimated_minutes,
            module.description
        );
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        modules,
        culture,
        candidate,
        withhold,
        json,
    } = args;

    let culture = demo_culture(culture)?;
    let catalog = match withhold {
        Some(module) => StaticQuestionCatalog::standard().withholding(module),
        None => StaticQuestionCatalog::standard(),
    };
    let service = assessment_service(catalog, culture);

    let roster = demo_candidates();
    let Some(candidate) = roster
        .iter()
        .find(|entry| entry.id.0 == candidate)
        .or_else(|| roster.first())
        .cloned()
    else {
        println!("No demo candidates available");
        return Ok(());
    };
    let id = candidate.id;

    println!(
        "Assessment demo for {} ({}) against a {} culture",
        candidate.display_name,
        candidate.position_applied.as_deref().unwrap_or("open application"),
        culture.as_str()
    );

    service.start(candidate)?;
    service.select_modules(id, &modules)?;

    let mut session = match service.begin_questions(id).await {
        Ok(session) => session,
        Err(err) => {
            println!("  Questions unavailable: {err}");
            let current = service.get(id)?;
            if let Some(notice) = current.notice() {
                println!("  {notice}");
            }
            if current.selected_modules().is_empty() {
                return Err(err.into());
            }
            let remaining: Vec<&str> = current
                .selected_modules()
                .iter()
                .map(|module| module.as_str())
                .collect();
            println!("  Continuing with {}", remaining.join(", "));
            service.begin_questions(id).await?
        }
    };

    let mut position = 0usize;
    while session.stage() == Stage::Questions {
        let Some(question) = navigator::current_question(&session).cloned() else {
            break;
        };
        let answer = scripted_answer(&question, position);
        session = service.record(id, &question.id, answer)?;
        let progress = navigator::progress(&session);
        println!(
            "  [{}/{}] {}: {} -> {}",
            progress.completed,
            progress.total,
            question.module.descriptor().display_name,
            question.prompt,
            describe_answer(&question, answer)
        );

        session = match service.advance(id).await {
            Ok(session) => session,
            Err(err) => {
                println!("  Scoring failed: {err}");
                return Err(err.into());
            }
        };
        position += 1;
    }

    let Some(profile) = session.result() else {
        println!("  Run ended in the {} stage", session.stage().label());
        return Err(AssessmentError::InvalidStage {
            stage: session.stage(),
            action: "presenting results",
        }
        .into());
    };
    let view = ResultsView::from_profile(profile, session.selected_modules());

    if json {
        match serde_json::to_string_pretty(&view) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("  Results payload unavailable: {err}"),
        }
        return Ok(());
    }

    println!("\nResults for run {}", session.run_id());
    println!("Overview: {}", view.overall_insights.personality_overview);
    for section in &view.sections {
        println!("\n{}: {}", section.title, section.headline);
        for highlight in &section.highlights {
            println!("  - {highlight}");
        }
    }
    if !view.overall_insights.key_strengths.is_empty() {
        println!(
            "\nKey strengths: {}",
            view.overall_insights.key_strengths.join(", ")
        );
    }
    if !view.recommendations.is_empty() {
        println!("Recommendations:");
        for recommendation in &view.recommendations {
            println!("  - {recommendation}");
        }
    }

    Ok(())
}

/// An explicit `--culture` wins over the configured company culture.
fn demo_culture(requested: Option<CultureProfile>) -> Result<CultureProfile, AppError> {
    match requested {
        Some(culture) => Ok(culture),
        None => Ok(AppConfig::load()?.assessment.company_culture),
    }
}

/// Deterministic answers so demo output is reproducible.
fn scripted_answer(question: &Question, position: usize) -> Answer {
    match &question.kind {
        QuestionKind::Choice { choices } => Answer::Choice(position % choices.len().max(1)),
        QuestionKind::Scale { min, max, .. } => {
            if position % 2 == 0 {
                Answer::Scale(*max)
            } else {
                Answer::Scale(((min + max) / 2.0).round())
            }
        }
    }
}

fn describe_answer(question: &Question, answer: Answer) -> String {
    match (&question.kind, answer) {
        (QuestionKind::Choice { choices }, Answer::Choice(index)) => choices
            .get(index)
            .map(|choice| choice.text.clone())
            .unwrap_or_else(|| format!("option {index}")),
        (_, Answer::Scale(value)) => format!("{value}"),
        (_, Answer::Choice(index)) => format!("option {index}"),
    }
}
