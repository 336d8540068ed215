//! Integration tests for chatlog-reply: remote responder against a mock
//! server, and the runner's send/reply cycle.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use chatlog_core::Role;
use chatlog_reply::{
    ChatRunner, ElizaResponder, LlmProvider, ModelConfig, OpenAiCompatResponder, ReplyConfig,
    ReplyError, ReplyMode, ReplySource, ERROR_PREFIX,
};
use chatlog_session::{MemoryStore, SessionManager};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn model_for(server: &MockServer, provider: LlmProvider) -> ModelConfig {
    ModelConfig {
        provider,
        api_key: "test-api-key-12345".to_string(),
        api_base_url: Some(server.uri()),
        ..ModelConfig::default()
    }
}

fn runner_with(source: Box<dyn ReplySource>) -> ChatRunner {
    ChatRunner::new(
        SessionManager::with_store(Box::new(MemoryStore::new())),
        source,
    )
}

/// Source that always fails with the given kind and counts calls.
struct FailingSource {
    kind: fn() -> ReplyError,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ReplySource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn reply(&self, _text: &str) -> Result<String, ReplyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.kind)())
    }
}

// --- OpenAiCompatResponder ---

#[tokio::test]
async fn test_mocked_completion_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-api-key-12345"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "messages": [{"role": "user", "content": "Hello AI"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "This is a mocked AI response for testing purposes."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let responder = OpenAiCompatResponder::new(model_for(&server, LlmProvider::Groq));
    let reply = responder.reply("Hello AI").await.unwrap();
    assert_eq!(reply, "This is a mocked AI response for testing purposes.");
}

#[tokio::test]
async fn test_openrouter_sends_attribution_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("x-title", "chatlog"))
        .and(body_partial_json(json!({"model": "openai/gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "routed"}}]
        })))
        .mount(&server)
        .await;

    let responder = OpenAiCompatResponder::new(model_for(&server, LlmProvider::OpenRouter));
    assert_eq!(responder.reply("hi").await.unwrap(), "routed");
    assert_eq!(responder.name(), "openrouter");
}

#[tokio::test]
async fn test_malformed_json_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{invalid json"))
        .mount(&server)
        .await;

    let responder = OpenAiCompatResponder::new(model_for(&server, LlmProvider::Groq));
    let err = responder.reply("hi").await.unwrap_err();
    assert!(matches!(err, ReplyError::Network { .. }));
    assert_eq!(err.user_text(), "LLM error:Network Error");
}

#[tokio::test]
async fn test_missing_content_is_a_bad_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API Key"}
        })))
        .mount(&server)
        .await;

    let responder = OpenAiCompatResponder::new(model_for(&server, LlmProvider::Groq));
    let err = responder.reply("hi").await.unwrap_err();
    assert_eq!(err.user_text(), "LLM error:Bad response format.");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_network_error() {
    let responder = OpenAiCompatResponder::new(ModelConfig {
        api_key: "key".to_string(),
        api_base_url: Some("http://127.0.0.1:1".to_string()),
        ..ModelConfig::default()
    });
    let err = responder.reply("hi").await.unwrap_err();
    assert!(matches!(err, ReplyError::Network { .. }));
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = model_for(&server, LlmProvider::Groq);
    config.api_key = "   ".to_string();
    let err = OpenAiCompatResponder::new(config)
        .reply("hello")
        .await
        .unwrap_err();
    assert!(matches!(err, ReplyError::MissingCredential));
}

// --- ChatRunner ---

#[tokio::test]
async fn test_send_appends_user_then_bot() {
    let mut runner = runner_with(Box::new(ElizaResponder::with_seed(1)));
    let exchange = runner.send("  Hello  ").await.unwrap();

    assert_eq!(exchange.user.text, "Hello");
    assert_eq!(exchange.user.role, Role::User);
    assert_eq!(exchange.bot.role, Role::Bot);

    let messages = runner.session().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, exchange.user.id);
    assert_eq!(messages[1].id, exchange.bot.id);
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut runner = runner_with(Box::new(FailingSource {
        kind: || ReplyError::MissingCredential,
        calls: Arc::clone(&calls),
    }));
    assert!(runner.send("   ").await.is_none());
    assert!(runner.session().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failures_become_bot_messages() {
    let cases: [(fn() -> ReplyError, &str); 3] = [
        (|| ReplyError::MissingCredential, "LLM error:No API key found."),
        (|| ReplyError::network("reset"), "LLM error:Network Error"),
        (|| ReplyError::bad_response("empty"), "LLM error:Bad response format."),
    ];

    for (kind, expected) in cases {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut runner = runner_with(Box::new(FailingSource {
            kind,
            calls: Arc::clone(&calls),
        }));
        let exchange = runner.send("hello").await.unwrap();
        assert_eq!(exchange.bot.text, expected);
        assert!(exchange.bot.text.starts_with(ERROR_PREFIX));
        assert_eq!(runner.session().len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn test_llm_mode_without_key_reports_missing_credential() {
    let config = ReplyConfig {
        mode: ReplyMode::Llm,
        ..ReplyConfig::default()
    };
    let mut runner = runner_with(chatlog_reply::build_source(&config));
    let exchange = runner.send("hello").await.unwrap();
    assert_eq!(exchange.bot.text, "LLM error:No API key found.");
}

#[tokio::test]
async fn test_subscriber_sees_both_appends() {
    let mut runner = runner_with(Box::new(ElizaResponder::with_seed(2)));
    let counts = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&counts);
    runner.subscribe(move |state| sink.lock().push(state.len()));

    runner.send("hi").await;
    runner.send("yes").await;
    assert_eq!(*counts.lock(), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_crud_pass_through_and_source_switch() {
    let mut runner = runner_with(Box::new(ElizaResponder::with_seed(3)));
    let exchange = runner.send("I am tired").await.unwrap();

    assert!(runner.edit(&exchange.user.id, "I am rested"));
    assert!(runner.session().messages()[0].edited);
    assert!(runner.delete(&exchange.bot.id));
    assert!(!runner.delete(&exchange.bot.id));

    let exported = runner.export();
    runner.clear();
    assert!(runner.session().is_empty());
    assert!(runner.import(&exported));
    assert_eq!(runner.session().len(), 1);

    runner.set_source(Box::new(FailingSource {
        kind: || ReplyError::network("down"),
        calls: Arc::new(AtomicUsize::new(0)),
    }));
    assert_eq!(runner.source_name(), "failing");
    let exchange = runner.send("again").await.unwrap();
    assert_eq!(exchange.bot.text, "LLM error:Network Error");
    assert_eq!(runner.session().len(), 3);
}

#[test]
fn test_reply_config_from_toml() {
    let config: ReplyConfig = toml::from_str(
        r#"
        mode = "llm"

        [model]
        provider = "openrouter"
        api_key = "sk-test"
        system_prompt = "You are concise."
        "#,
    )
    .unwrap();
    assert_eq!(config.mode, ReplyMode::Llm);
    assert_eq!(config.model.provider, LlmProvider::OpenRouter);
    assert_eq!(config.model.model(), "openai/gpt-4o-mini");
    assert_eq!(config.model.system_prompt.as_deref(), Some("You are concise."));
}
