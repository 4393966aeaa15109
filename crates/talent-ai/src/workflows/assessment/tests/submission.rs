use std::sync::Arc;

use super::common::*;

use crate::workflows::assessment::clients::ScoringError;
use crate::workflows::assessment::domain::{CultureProfile, ModuleId};
use crate::workflows::assessment::session::Stage;
use crate::workflows::assessment::submission::SubmissionCoordinator;
use crate::workflows::assessment::StaticQuestionCatalog;

fn coordinator(scorer: ScriptedScorer) -> (SubmissionCoordinator<ScriptedScorer>, Arc<ScriptedScorer>) {
    let scorer = Arc::new(scorer);
    (
        SubmissionCoordinator::new(Arc::clone(&scorer), CultureProfile::EnterpriseCorporate),
        scorer,
    )
}

#[test]
fn nothing_to_prepare_before_processing() {
    let catalog = StaticQuestionCatalog::standard();
    let (coordinator, _) = coordinator(ScriptedScorer::rubric());
    let session = questions_session(&catalog, &[ModuleId::Disc]);

    assert!(coordinator.prepare(&session).is_none());
}

#[test]
fn request_carries_every_response_and_the_configured_culture() {
    let (coordinator, _) = coordinator(ScriptedScorer::rubric());
    let session = processing_session(&[ModuleId::Mbti, ModuleId::CulturalFit]);

    let (pending, request) = coordinator.prepare(&session).expect("awaiting submission");

    assert!(pending.submission_issued());
    assert_eq!(request.candidate_id, candidate().id);
    assert_eq!(request.modules, vec![ModuleId::Mbti, ModuleId::CulturalFit]);
    assert_eq!(request.responses, session.responses().to_map());
    assert_eq!(request.company_culture, CultureProfile::EnterpriseCorporate);
}

#[tokio::test]
async fn submitting_twice_issues_one_request() {
    let (coordinator, scorer) = coordinator(ScriptedScorer::rubric());
    let session = processing_session(&[ModuleId::BigFive]);

    let first = coordinator.submit(&session).await.expect("scored");
    let second = coordinator.submit(&session).await.expect("no-op");

    assert_eq!(scorer.calls(), 1);
    assert_eq!(first.stage(), Stage::Results);
    assert_eq!(second.stage(), Stage::Processing, "stale copy left untouched");
    assert_eq!(second, session);
}

#[test]
fn claim_ledger_keeps_only_recent_runs() {
    let (coordinator, _) = coordinator(ScriptedScorer::rubric());
    let coordinator = coordinator.with_claim_history(2);
    let runs: Vec<_> = (0..3)
        .map(|_| processing_session(&[ModuleId::Disc]))
        .collect();

    for session in &runs {
        assert!(coordinator.prepare(session).is_some());
    }

    assert_eq!(coordinator.claimed_runs(), 2);
    assert!(coordinator.prepare(&runs[2]).is_none(), "latest run still claimed");
}

#[tokio::test]
async fn results_stage_is_never_resubmitted() {
    let (coordinator, scorer) = coordinator(ScriptedScorer::rubric());
    let session = processing_session(&[ModuleId::Disc]);

    let finished = coordinator.submit(&session).await.expect("scored");
    let again = coordinator.submit(&finished).await.expect("no-op");

    assert_eq!(scorer.calls(), 1);
    assert_eq!(again, finished);
}

#[tokio::test]
async fn scoring_failure_moves_run_to_failed() {
    let (coordinator, scorer) = coordinator(ScriptedScorer::failing(ScoringError::Rejected(
        "missing responses".to_string(),
    )));
    let session = processing_session(&[ModuleId::Leadership]);

    let rejected = coordinator.submit(&session).await.expect_err("rejected");

    assert_eq!(scorer.calls(), 1);
    assert_eq!(rejected.error.classification(), "scoring_rejected");
    assert_eq!(rejected.session.stage(), Stage::Failed);
}
