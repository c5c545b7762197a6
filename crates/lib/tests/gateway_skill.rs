//! Integration tests: start the gateway on a free port and drive the skill
//! endpoint over HTTP. No OpenAI key is required: chat paths point the client
//! at an unreachable base URL so they resolve to the fallback text.

use lib::config::Config;
use lib::gateway;
use serde_json::json;
use std::time::Duration;

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

/// Spawn a gateway on a free port and wait until the health probe answers.
/// The base URL points at a closed port so chat never reaches a real backend.
async fn start_gateway() -> u16 {
    let port = free_port();
    let mut config = Config::default();
    config.gateway.port = port;
    config.gateway.bind = "127.0.0.1".to_string();
    config.openai.base_url = Some("http://127.0.0.1:9/v1".to_string());

    tokio::spawn(async move {
        let _ = gateway::run_gateway(config).await;
    });

    let url = format!("http://127.0.0.1:{}/", port);
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return port;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("gateway on port {} did not become healthy within 5s", port);
}

async fn post_skill(port: u16, body: serde_json::Value) -> (u16, serde_json::Value) {
    let url = format!("http://127.0.0.1:{}/alexa", port);
    let res = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .expect("post skill request");
    let status = res.status().as_u16();
    let json = res.json().await.expect("parse response JSON");
    (status, json)
}

#[tokio::test]
async fn health_reports_running() {
    let port = start_gateway().await;
    let url = format!("http://127.0.0.1:{}/", port);
    let json: serde_json::Value = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .expect("get health")
        .json()
        .await
        .expect("parse JSON");
    assert_eq!(json.get("runtime").and_then(|v| v.as_str()), Some("running"));
    assert_eq!(json.get("port").and_then(|v| v.as_u64()), Some(port as u64));
}

#[tokio::test]
async fn launch_request_returns_greeting() {
    let port = start_gateway().await;
    let (status, body) = post_skill(port, json!({"request": {"type": "LaunchRequest"}})).await;
    assert_eq!(status, 200);
    assert_eq!(
        body["response"]["outputSpeech"]["text"],
        json!("Hello! I'm your AI assistant. How can I help you today?")
    );
    assert_eq!(body["response"]["shouldEndSession"], json!(false));
    let reprompt = body["response"]["reprompt"]["outputSpeech"]["text"]
        .as_str()
        .expect("reprompt text");
    assert!(!reprompt.is_empty());
}

#[tokio::test]
async fn stop_intent_matches_exact_wire_shape() {
    let port = start_gateway().await;
    let (status, body) = post_skill(
        port,
        json!({"request": {"type": "IntentRequest", "intent": {"name": "AMAZON.StopIntent"}}}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "version": "1.0",
            "response": {
                "outputSpeech": {"type": "PlainText", "text": "Goodbye!"},
                "shouldEndSession": true
            }
        })
    );
}

#[tokio::test]
async fn session_ended_returns_empty_response() {
    let port = start_gateway().await;
    let (status, body) =
        post_skill(port, json!({"request": {"type": "SessionEndedRequest"}})).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"version": "1.0", "response": {}}));
}

#[tokio::test]
async fn chat_without_query_slot_asks_to_repeat() {
    let port = start_gateway().await;
    let (status, body) = post_skill(
        port,
        json!({"request": {"type": "IntentRequest", "intent": {"name": "ChatIntent"}}}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        body["response"]["outputSpeech"]["text"],
        json!("I didn't catch what you said. Could you repeat that?")
    );
    assert_eq!(body["response"]["shouldEndSession"], json!(false));
}

#[tokio::test]
async fn chat_with_unreachable_backend_speaks_fallback() {
    let port = start_gateway().await;
    let (status, body) = post_skill(
        port,
        json!({
            "session": {"user": {"userId": "amzn1.ask.account.TEST"}},
            "request": {"type": "IntentRequest", "intent": {"name": "ChatIntent", "slots": {
                "query": {"value": "what is rust"}
            }}}
        }),
    )
    .await;
    assert_eq!(status, 200);
    let text = body["response"]["outputSpeech"]["text"]
        .as_str()
        .expect("speech text");
    assert!(text.contains("trouble connecting"), "got: {}", text);
    assert_eq!(body["response"]["shouldEndSession"], json!(false));
}

#[tokio::test]
async fn body_without_request_field_is_rejected_with_400() {
    let port = start_gateway().await;
    let (status, body) = post_skill(port, json!({"session": {}})).await;
    assert_eq!(status, 400);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn unparseable_body_is_rejected_with_400() {
    let port = start_gateway().await;
    let url = format!("http://127.0.0.1:{}/alexa", port);
    let res = reqwest::Client::new()
        .post(&url)
        .body("not json")
        .send()
        .await
        .expect("post");
    assert_eq!(res.status().as_u16(), 400);
    let body: serde_json::Value = res.json().await.expect("parse JSON");
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn get_on_skill_endpoint_is_rejected_with_405() {
    let port = start_gateway().await;
    let url = format!("http://127.0.0.1:{}/alexa", port);
    let res = reqwest::Client::new().get(&url).send().await.expect("get");
    assert_eq!(res.status().as_u16(), 405);
    let body: serde_json::Value = res.json().await.expect("parse JSON");
    assert_eq!(body, json!({"error": "Method not allowed"}));
}
