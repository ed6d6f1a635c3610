// E2E Test 3: Slow and flaky providers
// Timeouts degrade to the pattern score; transient errors are retried

mod e2e;

use comment_guard::classifier::RetryPolicy;
use comment_guard::detector::DecisionStage;
use e2e::helpers::{TestEnv, CASINO_TEXT};
use e2e::stub_provider::{StubProvider, StubReply};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_e2e_3_timeout_falls_back_to_pattern_score() {
    let env = TestEnv::seeded().await;
    let stub = StubProvider::answering(StubReply::Slow(
        Duration::from_secs(10),
        "score: 95\nresult: spam".to_string(),
    ))
    .await;
    let detector = env.detector_with(&stub, "lmstudio", Duration::from_millis(300), RetryPolicy::default());

    let start = Instant::now();
    let evaluation = detector.evaluate(CASINO_TEXT).await;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert!(evaluation.is_spam);
    assert_eq!(evaluation.stage, DecisionStage::ClassifierUnavailable);
    assert!(!evaluation.learned);
    assert_eq!(env.store.len().await, 2);
}

#[tokio::test]
async fn test_e2e_3_transient_error_is_retried() {
    let env = TestEnv::seeded().await;
    let stub = StubProvider::start(vec![
        StubReply::Status(503, "overloaded".to_string()),
        StubReply::Completion("score: 70\nresult: spam\nreason: casino promotion".to_string()),
    ])
    .await;
    let detector = env.detector_with(
        &stub,
        "lmstudio",
        Duration::from_secs(5),
        RetryPolicy::new(2, Duration::from_millis(10)),
    );

    let evaluation = detector.evaluate(CASINO_TEXT).await;

    assert_eq!(stub.hits(), 2);
    assert!(evaluation.is_spam);
    assert_eq!(evaluation.stage, DecisionStage::Classifier);
    assert_eq!(evaluation.verdict.map(|v| v.confidence), Some(70));
}

#[tokio::test]
async fn test_e2e_3_retries_are_bounded() {
    let env = TestEnv::seeded().await;
    let stub = StubProvider::answering(StubReply::Status(500, "boom".to_string())).await;
    let detector = env.detector_with(
        &stub,
        "lmstudio",
        Duration::from_secs(5),
        RetryPolicy::new(2, Duration::from_millis(10)),
    );

    let evaluation = detector.evaluate(CASINO_TEXT).await;

    assert_eq!(stub.hits(), 3);
    assert_eq!(evaluation.stage, DecisionStage::ClassifierUnavailable);
    assert!(evaluation.is_spam);
}
