//! Multi-turn conversation tests against both the in-memory API and a mock server.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{model_text, FakeSessionApi, APP, USER};
use trip_planner::client::{SessionApi, SessionClient};
use trip_planner::config::ClientConfig;
use trip_planner::conversation::Conversation;
use trip_planner::error::ClientError;
use trip_planner::session::ResolveStrategy;
use trip_planner::types::Session;

#[tokio::test]
async fn turns_share_one_session() {
    let api = FakeSessionApi::new();
    api.queue_reply(vec![model_text("Paris in December is festive.")]);
    api.queue_reply(vec![model_text("Try Le Meurice."), model_text("Or Hotel Lutetia.")]);

    let mut conversation = Conversation::open(&api, APP, USER, &ResolveStrategy::Fresh)
        .await
        .unwrap();
    let first = conversation
        .send("I want to plan a trip to Paris for 5 days in December.")
        .await
        .unwrap();
    let second = conversation
        .send("Can you suggest some hotels?")
        .await
        .unwrap();

    assert_eq!(first.fragments, vec!["Paris in December is festive."]);
    assert_eq!(second.text(), "Try Le Meurice.\n\nOr Hotel Lutetia.");
    assert_eq!(conversation.turns(), 2);
    assert_eq!(api.create_calls(), 1);

    let session_id = conversation.session_id().to_string();
    let sent = api.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|(id, _)| *id == session_id));
    assert_eq!(sent[1].1, "Can you suggest some hotels?");
}

#[tokio::test]
async fn failed_turn_does_not_count() {
    let api = FakeSessionApi::with_sessions(&["s-1"]);
    let mut conversation = Conversation::open(
        &api,
        APP,
        USER,
        &ResolveStrategy::Explicit("s-1".into()),
    )
    .await
    .unwrap();

    api.go_offline();
    let err = conversation.send("hello").await.unwrap_err();

    assert!(matches!(err, ClientError::Connection(_)));
    assert_eq!(conversation.turns(), 0);
}

#[tokio::test]
async fn open_with_missing_explicit_session_fails() {
    let api = FakeSessionApi::new();

    let err = Conversation::open(&api, APP, USER, &ResolveStrategy::Explicit("gone".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::SessionNotFound { .. }));
    assert_eq!(api.create_calls(), 0);
}

#[tokio::test]
async fn reply_without_text_is_not_an_error() {
    let api = FakeSessionApi::with_sessions(&["s-1"]);
    api.queue_reply(Vec::new());
    let mut conversation = Conversation::new(&api, APP, USER, Session::new("s-1"));

    let reply = conversation.send("anything?").await.unwrap();

    assert!(!reply.has_text());
    assert_eq!(conversation.turns(), 1);
}

#[tokio::test]
async fn conversation_over_http_creates_once_and_runs_twice() {
    let server = MockServer::start().await;
    let sessions = "/apps/trip-planner/users/test-user/sessions";

    Mock::given(method("POST"))
        .and(path(sessions))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "paris-trip" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{sessions}/paris-trip")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "paris-trip" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/run"))
        .and(body_partial_json(json!({ "sessionId": "paris-trip" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "author": "trip_planner", "content": { "role": "model", "parts": [{ "text": "Noted." }] } }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let client =
        SessionClient::new(ClientConfig::builder().base_url(server.uri()).build()).unwrap();
    let api: &dyn SessionApi = &client;
    let mut conversation =
        Conversation::open(api, client.app_name(), client.user_id(), &ResolveStrategy::Fresh)
            .await
            .unwrap();

    assert_eq!(conversation.session_id(), "paris-trip");
    conversation.send("Plan Paris for 5 days.").await.unwrap();
    let reply = conversation.send("Add a day trip.").await.unwrap();

    assert_eq!(reply.text(), "Noted.");
    assert_eq!(conversation.turns(), 2);
}

#[tokio::test]
async fn streaming_conversation_sends_streaming_flag_to_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run"))
        .and(body_partial_json(json!({ "sessionId": "s-1", "streaming": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "content": { "role": "model", "parts": [{ "text": "Streaming reply." }] } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        SessionClient::new(ClientConfig::builder().base_url(server.uri()).build()).unwrap();
    let mut conversation =
        Conversation::new(&client, APP, USER, Session::new("s-1")).with_streaming(true);

    let reply = conversation.send("Plan Kyoto in April.").await.unwrap();

    assert_eq!(reply.text(), "Streaming reply.");
}
