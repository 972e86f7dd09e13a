//! Integration tests for what survives closing and reopening a session.

use pollen_engine::{ClearConfirmation, Language, Role, Theme};
use tempfile::tempdir;

use crate::common::{open_session, ready_session};

#[tokio::test]
async fn chat_is_restored_on_reopen() {
    let dir = tempdir().unwrap();
    let (server, mut session) = ready_session(dir.path(), &["Hi", "!"]).await;
    session.send("hello", |_| {}).await.unwrap();
    let conversation = session.conversation().clone();
    let transcript = session.transcript().clone();
    drop(session);

    let reopened = open_session(dir.path(), &server.uri());

    assert_eq!(reopened.conversation(), &conversation);
    assert_eq!(reopened.transcript(), &transcript);
    assert_eq!(reopened.transcript().last_response(), Some("Hi!"));
}

#[tokio::test]
async fn cleared_chat_stays_cleared() {
    let dir = tempdir().unwrap();
    let (server, mut session) = ready_session(dir.path(), &["ok"]).await;
    session.send("one", |_| {}).await.unwrap();
    session.send("two", |_| {}).await.unwrap();

    session.clear(ClearConfirmation::confirmed()).unwrap();
    drop(session);

    let reopened = open_session(dir.path(), &server.uri());
    assert!(reopened.conversation().is_empty());
    assert!(reopened.transcript().is_empty());
}

/// Settings apply without a restart and are read back on reopen.
#[tokio::test]
async fn settings_round_trip() {
    let dir = tempdir().unwrap();
    let (server, mut session) = ready_session(dir.path(), &["ok"]).await;
    session.set_theme(Theme::Green);
    session.set_temperature(1.4);
    session.set_private(false);
    session.set_language(Language::Ru);
    session.select_model("mistral").unwrap();
    drop(session);

    let mut reopened = open_session(dir.path(), &server.uri());
    let settings = reopened.settings();
    assert_eq!(settings.theme, Theme::Green);
    assert!((settings.temperature.value() - 1.4).abs() < 1e-6);
    assert!(!settings.private);
    assert_eq!(settings.language, Language::Ru);

    reopened.load_models().await;
    assert_eq!(reopened.selected_model(), Some("mistral"));
    assert_eq!(reopened.view().status, "Модели загружены");
    assert!(dir.path().join("language.json").exists());
}

/// An error line survives reopen but adds nothing to the model history.
#[tokio::test]
async fn error_entries_are_kept_out_of_history() {
    let dir = tempdir().unwrap();
    let mut session = open_session(dir.path(), "http://127.0.0.1:9");
    session.select_model("openai").unwrap();
    assert!(session.send("anyone there?", |_| {}).await.is_err());
    drop(session);

    let reopened = open_session(dir.path(), "http://127.0.0.1:9");
    let roles: Vec<Role> = reopened
        .transcript()
        .entries()
        .iter()
        .map(|e| e.role)
        .collect();
    assert_eq!(roles, vec![Role::User, Role::Error]);
    assert!(reopened.conversation().is_empty());
}

#[tokio::test]
async fn saved_transcript_labels_each_entry() {
    let dir = tempdir().unwrap();
    let (_server, mut session) = ready_session(dir.path(), &["Paris."]).await;
    session.send("Capital of France?", |_| {}).await.unwrap();

    let path = session.save_transcript(dir.path()).await.unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("polination-chat-"));
    assert!(name.ends_with(".txt"));
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("Polination AI Chat - "));
    assert!(contents.contains("User: Capital of France?\n\n"));
    assert!(contents.contains("AI: Paris.\n\n"));
    assert_eq!(session.view().status, "Chat saved");
}

#[tokio::test]
async fn copy_hands_over_last_reply() {
    let dir = tempdir().unwrap();
    let (_server, mut session) = ready_session(dir.path(), &["first"]).await;
    session.send("q", |_| {}).await.unwrap();

    let mut clipboard = String::new();
    let copied = session.copy_last_response(|text| {
        clipboard = text.to_string();
        Ok::<(), String>(())
    });

    assert!(copied);
    assert_eq!(clipboard, "first");
    assert!(!session.view().status_is_error);
}
