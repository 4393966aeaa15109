use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use talent_ai::workflows::assessment::{
    navigator,
    profile::{BigFiveFacet, OverallInsights, TraitLevel, TraitScore},
    presenter::ResultsView,
    Answer, AnswerChoice, AssessmentError, AssessmentOrchestrator, CandidateId, CandidateRef,
    CultureProfile, ModuleId, PersonalityProfile, Question, QuestionId, RubricScorer,
    ScoringError, ScoringRequest, ScoringService, SessionState, Stage, StaticQuestionCatalog,
};

fn candidate() -> CandidateRef {
    CandidateRef {
        id: CandidateId(1001),
        display_name: "Jordan Lee".to_string(),
        position_applied: Some("Engineering Manager".to_string()),
    }
}

fn two_plus_one_catalog() -> StaticQuestionCatalog {
    let mut questions = BTreeMap::new();
    questions.insert(
        ModuleId::Mbti,
        vec![
            Question::choice(
                "q1",
                ModuleId::Mbti,
                "At a conference I...",
                vec![
                    AnswerChoice::new("Work the room", &[("E", 3.0), ("N", 1.0)]),
                    AnswerChoice::new("Find a quiet corner", &[("I", 3.0), ("S", 1.0)]),
                ],
            ),
            Question::choice(
                "q2",
                ModuleId::Mbti,
                "Deadlines are...",
                vec![
                    AnswerChoice::new("Commitments", &[("J", 3.0), ("T", 1.0)]),
                    AnswerChoice::new("Suggestions", &[("P", 3.0), ("F", 1.0)]),
                ],
            ),
        ],
    );
    questions.insert(
        ModuleId::BigFive,
        vec![Question::scale("q3", ModuleId::BigFive, "I am curious", 1.0, 5.0)
            .with_dimension("openness")],
    );
    StaticQuestionCatalog::from_questions(questions)
}

/// Counts requests and delegates to an inner scorer.
struct CountingScorer<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S> CountingScorer<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: ScoringService> ScoringService for CountingScorer<S> {
    async fn score_assessment(
        &self,
        request: ScoringRequest,
    ) -> Result<PersonalityProfile, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.score_assessment(request).await
    }
}

/// Returns a profile carrying only the Big Five facet and the overall insights.
struct BigFiveOnlyScorer;

#[async_trait]
impl ScoringService for BigFiveOnlyScorer {
    async fn score_assessment(
        &self,
        request: ScoringRequest,
    ) -> Result<PersonalityProfile, ScoringError> {
        let mut scores = BTreeMap::new();
        scores.insert(
            "openness".to_string(),
            TraitScore {
                score: 75.0,
                level: TraitLevel::High,
            },
        );
        let mut profile = PersonalityProfile::new(request.candidate_id, Utc::now());
        profile.big_five = Some(BigFiveFacet {
            scores,
            profile_summary: "Curious and open to new experiences".to_string(),
            strengths: vec!["openness".to_string()],
            development_areas: Vec::new(),
        });
        profile.overall_insights = OverallInsights {
            personality_overview: "Exploratory thinker".to_string(),
            ..OverallInsights::default()
        };
        Ok(profile)
    }
}

fn orchestrator_with<S: ScoringService + 'static>(
    catalog: StaticQuestionCatalog,
    scorer: Arc<S>,
) -> AssessmentOrchestrator<StaticQuestionCatalog, S> {
    AssessmentOrchestrator::new(Arc::new(catalog), scorer, CultureProfile::default())
}

fn answer_current(session: &SessionState, answer: Answer) -> SessionState {
    let question = navigator::current_question(session).expect("question presented");
    session
        .record(&question.id, answer)
        .expect("answer accepted")
}

#[tokio::test]
async fn two_modules_are_walked_in_order_and_scored_once() {
    let catalog = two_plus_one_catalog();
    let scorer = Arc::new(CountingScorer::new(RubricScorer::new(Arc::new(
        catalog.clone(),
    ))));
    let orchestrator = orchestrator_with(catalog, Arc::clone(&scorer));

    let session = orchestrator
        .start_run(candidate())
        .select_modules(&[ModuleId::Mbti, ModuleId::BigFive])
        .expect("selection stage");
    let mut session = orchestrator
        .enter_questions(&session)
        .await
        .expect("questions stage");
    assert_eq!(navigator::progress(&session).total, 3);

    for (expected_id, expected_module, answer) in [
        ("q1", ModuleId::Mbti, Answer::Choice(0)),
        ("q2", ModuleId::Mbti, Answer::Choice(0)),
        ("q3", ModuleId::BigFive, Answer::Scale(4.0)),
    ] {
        let current = navigator::current_question(&session).expect("question presented");
        assert_eq!(current.id, QuestionId::new(expected_id));
        assert_eq!(current.module, expected_module);

        session = answer_current(&session, answer);
        let progress = navigator::progress(&session);
        assert!(progress.completed <= progress.total);
        assert_eq!(
            navigator::current_question(&session).map(|q| q.id.clone()),
            Some(QuestionId::new(expected_id)),
            "recording never advances"
        );

        session = orchestrator.advance(&session).await.expect("advances");
    }

    assert_eq!(session.stage(), Stage::Results);
    assert_eq!(scorer.calls(), 1);
    let profile = session.result().expect("profile accepted");
    assert!(profile.mbti.is_some());
    assert!(profile.big_five.is_some());
    assert!(profile.leadership.is_none());
}

#[tokio::test]
async fn leadership_outage_keeps_selection_stage_active() {
    let catalog = StaticQuestionCatalog::standard().withholding(ModuleId::Leadership);
    let orchestrator = orchestrator_with(
        catalog.clone(),
        Arc::new(RubricScorer::new(Arc::new(catalog))),
    );

    let session = orchestrator
        .start_run(candidate())
        .select_modules(&[ModuleId::Mbti, ModuleId::Leadership, ModuleId::EmotionalIntelligence])
        .expect("selection stage");
    let rejected = orchestrator
        .enter_questions(&session)
        .await
        .expect_err("leadership unavailable");

    assert!(matches!(
        rejected.error,
        AssessmentError::CatalogUnavailable {
            module: ModuleId::Leadership,
            ..
        }
    ));
    assert_eq!(rejected.session.stage(), Stage::Selection);
    assert_eq!(
        rejected.session.selected_modules(),
        &[ModuleId::Mbti, ModuleId::EmotionalIntelligence]
    );

    let retried = orchestrator
        .enter_questions(&rejected.session)
        .await
        .expect("remaining modules load");
    assert_eq!(retried.stage(), Stage::Questions);
}

#[tokio::test]
async fn big_five_only_profile_is_accepted_and_presented() {
    let orchestrator =
        orchestrator_with(StaticQuestionCatalog::standard(), Arc::new(BigFiveOnlyScorer));

    let session = orchestrator
        .start_run(candidate())
        .select_modules(&[ModuleId::BigFive])
        .expect("selection stage");
    let mut session = orchestrator
        .enter_questions(&session)
        .await
        .expect("questions stage");
    while session.stage() == Stage::Questions {
        session = answer_current(&session, Answer::Scale(3.0));
        session = orchestrator.advance(&session).await.expect("advances");
    }

    assert_eq!(session.stage(), Stage::Results);
    let profile = session.result().expect("profile accepted");
    let view = ResultsView::from_profile(profile, session.selected_modules());
    assert_eq!(view.sections.len(), 1);
    assert_eq!(view.sections[0].module, ModuleId::BigFive);
    assert_eq!(view.overall_insights.personality_overview, "Exploratory thinker");
}

#[tokio::test]
async fn submitting_the_same_session_twice_sends_one_request() {
    let catalog = StaticQuestionCatalog::standard();
    let scorer = Arc::new(CountingScorer::new(RubricScorer::new(Arc::new(
        catalog.clone(),
    ))));
    let orchestrator = orchestrator_with(catalog, Arc::clone(&scorer));

    let session = orchestrator
        .start_run(candidate())
        .select_modules(&[ModuleId::Disc])
        .expect("selection stage");
    let mut session = orchestrator
        .enter_questions(&session)
        .await
        .expect("questions stage");
    while session.stage() == Stage::Questions {
        session = answer_current(&session, Answer::Choice(3));
        session = navigator::advance(&session);
    }
    assert_eq!(session.stage(), Stage::Processing);

    let (first, second) = tokio::join!(orchestrator.submit(&session), orchestrator.submit(&session));

    assert_eq!(scorer.calls(), 1);
    let stages = [first.expect("scored").stage(), second.expect("no-op").stage()];
    assert!(stages.contains(&Stage::Results));
    assert!(stages.contains(&Stage::Processing));
}

#[tokio::test]
async fn reset_after_results_starts_a_clean_run() {
    let catalog = StaticQuestionCatalog::standard();
    let orchestrator = orchestrator_with(
        catalog.clone(),
        Arc::new(RubricScorer::new(Arc::new(catalog))),
    );

    let session = orchestrator
        .start_run(candidate())
        .select_modules(&[ModuleId::EmotionalIntelligence])
        .expect("selection stage");
    let mut session = orchestrator
        .enter_questions(&session)
        .await
        .expect("questions stage");
    while session.stage() == Stage::Questions {
        session = answer_current(&session, Answer::Choice(0));
        session = orchestrator.advance(&session).await.expect("advances");
    }
    assert_eq!(session.stage(), Stage::Results);

    let fresh = session.reset();

    assert_eq!(fresh.stage(), Stage::Selection);
    assert_ne!(fresh.run_id(), session.run_id());
    assert!(fresh.selected_modules().is_empty());
    assert!(fresh.responses().is_empty());
    assert!(fresh.result().is_none());
}

#[tokio::test]
async fn late_scoring_result_cannot_touch_a_reset_run() {
    let catalog = StaticQuestionCatalog::standard();
    let scorer = RubricScorer::new(Arc::new(catalog.clone()));
    let orchestrator = orchestrator_with(catalog, Arc::new(scorer.clone()));

    let session = orchestrator
        .start_run(candidate())
        .select_modules(&[ModuleId::Disc])
        .expect("selection stage");
    let mut session = orchestrator
        .enter_questions(&session)
        .await
        .expect("questions stage");
    while session.stage() == Stage::Questions {
        session = answer_current(&session, Answer::Choice(1));
        session = navigator::advance(&session);
    }

    let (pending, request) = orchestrator
        .submissions()
        .prepare(&session)
        .expect("awaiting submission");
    let restarted = pending.reset();
    let late = scorer.score_assessment(request).await;

    let rejected = restarted
        .complete_submission(pending.run_id(), late)
        .expect_err("stale result");
    assert!(matches!(rejected.error, AssessmentError::StaleResult { .. }));
    assert_eq!(rejected.session, restarted);
}
