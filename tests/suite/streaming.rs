//! Integration tests for streamed replies through `ChatSession::send`.

use pollen_engine::{ChatError, Role};
use tempfile::tempdir;
use wiremock::MockServer;

use crate::common::{
    mount_catalog, mount_chat_failure, open_session, ready_session, sample_catalog,
    spawn_truncating_chat,
};

/// Each fragment produces exactly one update carrying the text so far.
#[tokio::test]
async fn fragments_accumulate_into_one_reply() {
    let dir = tempdir().unwrap();
    let (_server, mut session) = ready_session(dir.path(), &["Hel", "lo, ", "world"]).await;

    let mut updates = Vec::new();
    let outcome = session
        .send("Say hello", |text| updates.push(text.to_string()))
        .await
        .unwrap();

    assert_eq!(updates, vec!["Hel", "Hello, ", "Hello, world"]);
    assert_eq!(outcome.reply.as_deref(), Some("Hello, world"));
    assert!(outcome.interrupted.is_none());

    let messages = session.conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content(), "Say hello");
    assert_eq!(messages[1].role(), Role::Assistant);
    assert_eq!(messages[1].content(), "Hello, world");
    assert_eq!(session.transcript().last_response(), Some("Hello, world"));
}

/// History sent on the second turn includes the first exchange.
#[tokio::test]
async fn second_turn_carries_history() {
    let dir = tempdir().unwrap();
    let (server, mut session) = ready_session(dir.path(), &["ok"]).await;

    session.send("first", |_| {}).await.unwrap();
    session.send("second", |_| {}).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let chats: Vec<serde_json::Value> = requests
        .iter()
        .filter(|r| r.url.path() == "/openai")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(chats.len(), 2);

    let roles: Vec<&str> = chats[1]["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "assistant", "user"]);
    assert_eq!(chats[1]["stream"], true);
    assert_eq!(chats[1]["model"], "openai");
    assert_eq!(session.conversation().len(), 4);
}

/// A failure before any text leaves an error line and no assistant message.
#[tokio::test]
async fn http_failure_before_text_records_error_entry() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_catalog(&server, sample_catalog()).await;
    mount_chat_failure(&server, 500, "upstream exploded").await;
    let mut session = open_session(dir.path(), &server.uri());
    session.load_models().await;

    let mut updates = 0;
    let err = session.send("hello", |_| updates += 1).await.unwrap_err();

    assert!(matches!(err, ChatError::Network(_)));
    assert_eq!(updates, 0);
    assert!(session.conversation().is_empty());

    let entries = session.transcript().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].role, Role::User);
    assert_eq!(entries[1].role, Role::Error);
    assert!(entries[1].text.starts_with("Error sending message: "));
    assert!(session.transcript().last_response().is_none());
    assert!(session.view().status_is_error);
}

/// A body cut off before any fragment is an interruption with no reply.
#[tokio::test]
async fn truncated_stream_without_text_is_interrupted() {
    let dir = tempdir().unwrap();
    let uri = spawn_truncating_chat(": keep-alive\n").await;
    let mut session = open_session(dir.path(), &uri);
    session.select_model("openai").unwrap();

    let err = session.send("hello", |_| {}).await.unwrap_err();

    assert!(matches!(err, ChatError::StreamInterrupted(_)));
    assert!(session.conversation().is_empty());
    let last = session.transcript().entries().last().unwrap();
    assert_eq!(last.role, Role::Error);
}

/// A body cut off after some text keeps the partial reply.
#[tokio::test]
async fn truncated_stream_after_text_keeps_partial_reply() {
    let dir = tempdir().unwrap();
    let uri =
        spawn_truncating_chat("data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n").await;
    let mut session = open_session(dir.path(), &uri);
    session.select_model("openai").unwrap();

    let outcome = session.send("hello", |_| {}).await.unwrap();

    assert_eq!(outcome.reply.as_deref(), Some("Hel"));
    assert!(outcome.interrupted.is_some());
    assert_eq!(session.conversation().len(), 2);
    assert_eq!(session.transcript().last_response(), Some("Hel"));
}
