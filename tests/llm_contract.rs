//! OpenAI-compatible oracle contract tests.
//!
//! These tests verify the HTTP contract of the LLM-backed oracles against a
//! mock server:
//! - Request format (model, temperature, JSON mode, auth header)
//! - Response parsing, including fenced JSON replies
//! - Error responses mapped onto `ServiceError`

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use skillsense::config::ChatModelConfig;
use skillsense::llm::{
    LlmIntentOracle, LlmJudgmentOracle, LlmNarrativeOracle, OpenAiClient, OpenAiEmbedder,
};
use skillsense_search::{
    Candidate, Embedder, IntentOracle, JudgmentOracle, NarrativeOracle, ScoredCandidate,
    ServiceError,
};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Arc<OpenAiClient> {
    Arc::new(
        OpenAiClient::new(
            server.uri(),
            Some("test-key".into()),
            None,
            Duration::from_secs(5),
        )
        .expect("client"),
    )
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Intent
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn intent_request_uses_json_mode_and_parses_fenced_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.0,
            "response_format": { "type": "json_object" }
        })))
        .and(body_string_contains("Senior Python developer with Django"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "```json\n{\"semantic_query\": \"senior python backend developer\", \
             \"required_skills\": [\"Python\", \"Django\"], \
             \"nice_to_have_skills\": [\"AWS\"], \"experience_years\": 5}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let oracle = LlmIntentOracle::new(client(&server), ChatModelConfig::new("gpt-4o-mini", 0.0));
    let payload = oracle
        .infer_intent("Senior Python developer with Django, 5+ years")
        .await
        .expect("intent");

    assert_eq!(payload.semantic_query, "senior python backend developer");
    assert_eq!(payload.required_skills, vec!["Python", "Django"]);
    assert_eq!(payload.nice_to_have_skills, vec!["AWS"]);
    assert_eq!(payload.experience_years, Some(5));
}

#[tokio::test]
async fn intent_reply_that_is_not_json_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Sure! Here is the breakdown.")),
        )
        .mount(&server)
        .await;

    let oracle = LlmIntentOracle::new(client(&server), ChatModelConfig::new("gpt-4o-mini", 0.0));
    let err = oracle.infer_intent("rust developer").await.unwrap_err();
    assert!(matches!(err, ServiceError::Malformed(_)), "got {err:?}");
}

#[tokio::test]
async fn intent_reply_with_loose_types_keeps_its_skills() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"semantic_query": "python backend developer",
                "required_skills": ["Python", "Django"],
                "nice_to_have_skills": null,
                "experience_years": 5.0}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let oracle = LlmIntentOracle::new(client(&server), ChatModelConfig::new("gpt-4o-mini", 0.0));
    let intent = oracle
        .infer_intent("Senior Python developer with Django, 5+ years")
        .await
        .expect("intent")
        .validate()
        .expect("valid intent");

    assert_eq!(intent.semantic_query, "python backend developer");
    assert_eq!(
        intent.required_skills.iter().collect::<Vec<_>>(),
        vec!["Python", "Django"]
    );
    assert!(intent.optional_skills.is_empty());
    assert_eq!(intent.min_experience_years, Some(5));
}

// ────────────────────────────────────────────────────────────────────────────
// Judgment
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn judgment_sends_profile_and_parses_score() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o", "temperature": 0.1 })))
        .and(body_string_contains("Skills: Python, Django"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"score": 87, "reasoning": "Six years of Django."}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let oracle = LlmJudgmentOracle::new(client(&server), ChatModelConfig::new("gpt-4o", 0.1));
    let payload = oracle
        .judge(
            "python developer",
            "Summary: Backend dev\nSkills: Python, Django\nExperience: none",
        )
        .await
        .expect("judgment");

    assert_eq!(payload.score, Some(87.0));
    assert_eq!(payload.reasoning.as_deref(), Some("Six years of Django."));
}

#[tokio::test]
async fn judgment_without_score_fails_validation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(r#"{"reasoning": "unsure"}"#)),
        )
        .mount(&server)
        .await;

    let oracle = LlmJudgmentOracle::new(client(&server), ChatModelConfig::new("gpt-4o", 0.1));
    let payload = oracle.judge("q", "Summary: none").await.expect("payload");
    assert!(payload.score.is_none());
    assert!(payload.validate().is_err());
}

#[tokio::test]
async fn judgment_score_sent_as_string_is_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"score": "85", "reasoning": "Solid Django background."}"#,
        )))
        .mount(&server)
        .await;

    let oracle = LlmJudgmentOracle::new(client(&server), ChatModelConfig::new("gpt-4o", 0.1));
    let judgment = oracle
        .judge("python developer", "Summary: Backend dev")
        .await
        .expect("payload")
        .validate()
        .expect("valid judgment");
    assert_eq!(judgment.score, 85.0);
}

// ────────────────────────────────────────────────────────────────────────────
// Narrative
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn narrative_lists_candidates_and_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "model": "gpt-4o", "temperature": 0.3 })))
        .and(body_string_contains("Candidate: Ada Lovelace"))
        .and(body_string_contains("Match: 92%"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("  Ada is the strongest match.  ")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut ada = Candidate::new(1);
    ada.name = Some("Ada".into());
    ada.surname = Some("Lovelace".into());
    let top = vec![ScoredCandidate {
        candidate: ada,
        match_score: 91.6,
        reasoning: "Strong Python".into(),
    }];

    let oracle = LlmNarrativeOracle::new(client(&server), ChatModelConfig::new("gpt-4o", 0.3));
    let text = oracle.narrate("python developer", &top).await.expect("narrative");
    assert_eq!(text, "Ada is the strongest match.");
}

// ────────────────────────────────────────────────────────────────────────────
// Embeddings
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn embedder_returns_first_vector() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_partial_json(json!({
            "model": "text-embedding-ada-002",
            "input": "python backend"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{ "object": "embedding", "index": 0, "embedding": [0.25, -0.5, 1.0] }],
            "model": "text-embedding-ada-002"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedder::new(client(&server), "text-embedding-ada-002");
    let embedding = embedder.embed("python backend").await.expect("embedding");
    assert_eq!(embedding, vec![0.25, -0.5, 1.0]);
}

#[tokio::test]
async fn empty_embedding_list_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let embedder = OpenAiEmbedder::new(client(&server), "text-embedding-ada-002");
    let err = embedder.embed("anything").await.unwrap_err();
    assert!(matches!(err, ServiceError::Malformed(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Error Mapping
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_maps_to_unavailable_with_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let oracle = LlmIntentOracle::new(client(&server), ChatModelConfig::new("gpt-4o-mini", 0.0));
    let err = oracle.infer_intent("rust developer").await.unwrap_err();
    match err {
        ServiceError::Unavailable(message) => {
            assert!(message.contains("authentication failed"));
            assert!(message.contains("Incorrect API key provided"));
        }
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_maps_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let oracle = LlmJudgmentOracle::new(client(&server), ChatModelConfig::new("gpt-4o", 0.1));
    let err = oracle.judge("q", "Summary: none").await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Unavailable("rate limited: slow down".into())
    );
}

#[tokio::test]
async fn slow_provider_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [{ "embedding": [1.0] }] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = Arc::new(
        OpenAiClient::new(server.uri(), None, None, Duration::from_millis(200)).expect("client"),
    );
    let embedder = OpenAiEmbedder::new(client, "text-embedding-ada-002");
    let err = embedder.embed("anything").await.unwrap_err();
    assert!(matches!(err, ServiceError::Timeout(_)), "got {err:?}");
}
