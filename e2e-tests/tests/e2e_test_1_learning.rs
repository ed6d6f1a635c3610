// E2E Test 1: Confident detection is learned
// detector → HTTP classifier → stub provider → pattern store on disk

mod e2e;

use comment_guard::detector::DecisionStage;
use comment_guard::patterns::PatternCategory;
use e2e::helpers::{TestEnv, CASINO_TEXT};
use e2e::stub_provider::{StubProvider, StubReply};

#[tokio::test]
async fn test_e2e_1_confident_spam_is_learned() {
    let env = TestEnv::seeded().await;
    let stub = StubProvider::answering(StubReply::Completion(
        "score: 92\nresult: spam\nreason: promotes an online casino".to_string(),
    ))
    .await;
    let detector = env.detector(&stub, "openai");

    let evaluation = detector.evaluate(CASINO_TEXT).await;

    assert!(evaluation.is_spam);
    assert_eq!(evaluation.score.total_score, 5);
    assert_eq!(evaluation.stage, DecisionStage::Classifier);
    assert!(evaluation.learned);
    let verdict = evaluation.verdict.expect("classifier answered");
    assert_eq!(verdict.confidence, 92);
    assert_eq!(verdict.rationale.as_deref(), Some("promotes an online casino"));

    // Persisted verbatim, as a generic pattern
    let file = env.stored_file();
    assert!(file.contains(CASINO_TEXT));
    assert!(file.contains("\"type\": \"gambling\""));
    let stored = env.store.list().await;
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[2].category, PatternCategory::Generic);

    // Same text again: still spam, nothing new learned
    let again = detector.evaluate(CASINO_TEXT).await;
    assert!(again.is_spam);
    assert!(!again.learned);
    assert_eq!(env.store.len().await, 3);
    assert_eq!(stub.hits(), 2);
}

#[tokio::test]
async fn test_e2e_1_request_carries_prompt_and_credentials() {
    let env = TestEnv::seeded().await;
    let stub = StubProvider::answering(StubReply::Completion("score: 10\nresult: not spam".to_string())).await;
    let detector = env.detector(&stub, "openai");

    assert!(!detector.is_spam(CASINO_TEXT).await);

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/v1/chat/completions");
    assert_eq!(request.authorization.as_deref(), Some("Bearer sk-test"));
    assert_eq!(request.body["model"], "gpt-3.5-turbo");
    assert_eq!(request.body["messages"][0]["role"], "system");
    let user = request.body["messages"][1]["content"].as_str().expect("user content");
    assert!(user.ends_with(CASINO_TEXT));
}

#[tokio::test]
async fn test_e2e_1_benign_comment_never_reaches_provider() {
    let env = TestEnv::seeded().await;
    let stub = StubProvider::answering(StubReply::Completion("score: 99\nresult: spam".to_string())).await;
    let detector = env.detector(&stub, "openai");

    assert!(!detector.is_spam("Hello, great video!").await);
    assert_eq!(stub.hits(), 0);
}
