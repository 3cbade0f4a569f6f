//! E2E tests: remote reply strategies against the mock provider.

use std::sync::Arc;

use botnest_lib::config::{ChatCompletionSettings, TextGenerationSettings};
use botnest_lib::db::MemoryStore;
use botnest_lib::services::ScriptFlavor;
use botnest_lib::services::reply::{
    CHAT_FAILURE_REPLY, ChatCompletionReply, EMPTY_REPLY, INFERENCE_FAILURE_REPLY,
    TextGenerationReply, build_prompt,
};
use secrecy::SecretString;
use serde_json::json;

use super::mock_provider::MockProvider;
use super::test_helpers::*;

fn chat_settings(base_url: &str) -> ChatCompletionSettings {
    ChatCompletionSettings {
        api_key: SecretString::from("test-router-key"),
        base_url: base_url.to_string(),
        model: "gpt-5".to_string(),
        referer: "https://bots.example.com".to_string(),
        title: "Overpowered Bot".to_string(),
    }
}

fn inference_settings(base_url: &str) -> TextGenerationSettings {
    TextGenerationSettings {
        token: SecretString::from("test-hf-token"),
        base_url: format!("{}/models", base_url),
        model: "gpt2".to_string(),
    }
}

fn chat_app_service(mock: &MockProvider) -> botnest_lib::services::BotService {
    let reply = ChatCompletionReply::new(&chat_settings(&mock.base_url)).unwrap();
    service_with(
        Arc::new(MemoryStore::new()),
        Some(Arc::new(reply)),
        ScriptFlavor::Minimal,
    )
}

fn inference_app_service(mock: &MockProvider) -> botnest_lib::services::BotService {
    let reply = TextGenerationReply::new(&inference_settings(&mock.base_url)).unwrap();
    service_with(
        Arc::new(MemoryStore::new()),
        Some(Arc::new(reply)),
        ScriptFlavor::Minimal,
    )
}

/// Chat provider answer is trimmed and merged.
#[actix_rt::test]
async fn test_chat_reply_merged() {
    let mock = MockProvider::start(
        200,
        json!({ "choices": [{ "message": { "role": "assistant", "content": "  Ahoy there!  " } }] })
            .to_string(),
    )
    .await;
    let app = create_test_app(chat_app_service(&mock)).await;
    let (hash, _) = create_bot(&app, "A pirate").await;

    let (status, body) = get_json(&app, &getbot_uri(&hash, Some("Hi"))).await;

    assert_eq!(status, 200);
    assert_eq!(body["reply"], "Ahoy there!");

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/chat/completions");
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer test-router-key"));
    assert_eq!(calls[0].title.as_deref(), Some("Overpowered Bot"));
    assert_eq!(calls[0].body["model"], "gpt-5");
    assert_eq!(calls[0].body["messages"][0]["role"], "user");
    assert_eq!(
        calls[0].body["messages"][0]["content"],
        build_prompt("A pirate", "Hi")
    );
}

/// (F) Provider failure still answers 200 with the sentinel.
#[actix_rt::test]
async fn test_chat_failure_yields_sentinel() {
    let mock = MockProvider::start(500, json!({ "error": "upstream down" }).to_string()).await;
    let app = create_test_app(chat_app_service(&mock)).await;
    let (hash, _) = create_bot(&app, "A pirate").await;

    let (status, body) = get_json(&app, &getbot_uri(&hash, Some("Hi"))).await;

    assert_eq!(status, 200);
    assert_eq!(body["reply"], CHAT_FAILURE_REPLY);
    assert_eq!(body["hash"], hash);
}

#[actix_rt::test]
async fn test_chat_without_choices_yields_empty_reply() {
    let mock = MockProvider::start(200, json!({ "choices": [] }).to_string()).await;
    let app = create_test_app(chat_app_service(&mock)).await;
    let (hash, _) = create_bot(&app, "A pirate").await;

    let (_, body) = get_json(&app, &getbot_uri(&hash, Some("Hi"))).await;

    assert_eq!(body["reply"], EMPTY_REPLY);
}

/// No message, no provider call.
#[actix_rt::test]
async fn test_chat_not_called_without_message() {
    let mock = MockProvider::start(200, json!({ "choices": [] }).to_string()).await;
    let app = create_test_app(chat_app_service(&mock)).await;
    let (hash, _) = create_bot(&app, "A pirate").await;

    let (status, body) = get_json(&app, &getbot_uri(&hash, None)).await;

    assert_eq!(status, 200);
    assert!(body.get("reply").is_none());
    assert!(mock.calls().is_empty());
}

/// Remote strategies generate a script without the local responder.
#[actix_rt::test]
async fn test_remote_strategy_uses_minimal_script() {
    let mock = MockProvider::start(200, json!({ "choices": [] }).to_string()).await;
    let app = create_test_app(chat_app_service(&mock)).await;
    let (hash, api_key) = create_bot(&app, "A pirate").await;

    let (_, body) = get_json(&app, &getbot_uri(&hash, None)).await;
    let script = body["files"]["bot.js"].as_str().unwrap();

    assert!(script.contains(&api_key));
    assert!(!script.contains("You said"));
}

/// Echoed prompt is stripped from generated text.
#[actix_rt::test]
async fn test_inference_reply_strips_prompt() {
    let prompt = build_prompt("A poet", "Hello");
    let mock = MockProvider::start(
        200,
        json!([{ "generated_text": format!("{} Roses are red.", prompt) }]).to_string(),
    )
    .await;
    let app = create_test_app(inference_app_service(&mock)).await;
    let (hash, _) = create_bot(&app, "A poet").await;

    let (status, body) = get_json(&app, &getbot_uri(&hash, Some("Hello"))).await;

    assert_eq!(status, 200);
    assert_eq!(body["reply"], "Roses are red.");

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/models/gpt2");
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer test-hf-token"));
    assert_eq!(calls[0].body, json!({ "inputs": prompt }));
}

/// An `error` field yields the inference sentinel.
#[actix_rt::test]
async fn test_inference_error_yields_sentinel() {
    let mock = MockProvider::start(
        503,
        json!({ "error": "Model gpt2 is currently loading" }).to_string(),
    )
    .await;
    let app = create_test_app(inference_app_service(&mock)).await;
    let (hash, _) = create_bot(&app, "A poet").await;

    let (status, body) = get_json(&app, &getbot_uri(&hash, Some("Hello"))).await;

    assert_eq!(status, 200);
    assert_eq!(body["reply"], INFERENCE_FAILURE_REPLY);
}
