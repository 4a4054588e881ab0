use biaslens_llm::ollama::OllamaClient;
use biaslens_llm::openai::OpenAiClient;
use biaslens_llm::traits::{LlmClient, LlmRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn openai_reads_output_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "gpt-4.1-mini", "temperature": 0.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4.1-mini",
            "output": [
                { "type": "message", "content": [{ "type": "output_text", "text": "[]" }] }
            ],
            "usage": { "total_tokens": 42 }
        })))
        .mount(&server)
        .await;

    let client =
        OpenAiClient::with_endpoint("sk-test".into(), "gpt-4.1-mini".into(), &server.uri())
            .unwrap();
    let resp = client
        .generate(LlmRequest::new("{}").with_system("system").deterministic())
        .await
        .unwrap();
    assert_eq!(resp.text, "[]");
    assert_eq!(resp.tokens_used, Some(42));
}

#[tokio::test]
async fn openai_error_maps_to_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "bad key" } })),
        )
        .mount(&server)
        .await;

    let client =
        OpenAiClient::with_endpoint("sk-bad".into(), "gpt-4.1-mini".into(), &server.uri())
            .unwrap();
    let err = client.generate(LlmRequest::new("x")).await.unwrap_err();
    assert_eq!(err.kind(), "remote");
    assert!(err.to_string().contains("bad key"));
}

#[tokio::test]
async fn ollama_sends_system_prompt_separately() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "llama3", "system": "be terse", "stream": false })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": "ok", "eval_count": 3 })),
        )
        .mount(&server)
        .await;

    let client = OllamaClient::unchecked(&server.uri(), "llama3".into()).unwrap();
    let resp = client
        .generate(
            LlmRequest::new("hi")
                .with_system("be terse")
                .with_max_tokens(Some(8))
                .deterministic(),
        )
        .await
        .unwrap();
    assert_eq!(resp.text, "ok");
    assert_eq!(resp.tokens_used, Some(3));
}

#[tokio::test]
async fn ollama_health_check_reports_unreachable_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = OllamaClient::unchecked(&server.uri(), "llama3".into()).unwrap();
    assert!(!client.health_check().await.unwrap());
}

#[tokio::test]
#[ignore]
async fn openai_live_smoketest() {
    let Ok(key) = std::env::var("OPENAI_API_KEY") else {
        return;
    };
    let client = OpenAiClient::new(key, "gpt-4.1-mini".into()).unwrap();
    let resp = client
        .generate(LlmRequest::new("Say Ok").with_max_tokens(Some(16)))
        .await
        .unwrap();
    assert!(!resp.text.trim().is_empty());
}
