//! Integration tests for model catalog loading and the timeout prompt.

use std::time::Duration;

use pollen_engine::{CatalogSource, CatalogState, SessionError, TimeoutChoice};
use serde_json::json;
use tempfile::tempdir;
use wiremock::MockServer;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{mount_catalog, mount_slow_catalog, open_session, sample_catalog};

const SLOW: Duration = Duration::from_secs(3);

#[tokio::test]
async fn remote_catalog_is_grouped_for_display() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_catalog(&server, sample_catalog()).await;
    let mut session = open_session(dir.path(), &server.uri());

    let state = session.load_models().await;

    assert_eq!(state, CatalogState::Loaded(CatalogSource::Remote));
    let view = session.view();
    let groups: Vec<(&str, Vec<&str>)> = view
        .model_groups
        .iter()
        .map(|g| {
            (
                g.label.as_str(),
                g.models.iter().map(|m| m.name.as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(
        groups,
        vec![
            ("Recommended", vec!["openai"]),
            ("Text Only", vec!["deepseek-reasoning", "mistral"]),
            ("Audio", vec!["openai-audio"]),
        ]
    );
    assert_eq!(view.selected_model, Some("openai"));
    assert!(view.timeout_prompt.is_none());
}

/// A stored model the catalog no longer lists falls back to the default.
#[tokio::test]
async fn stale_stored_model_falls_back_to_default() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_catalog(&server, sample_catalog()).await;

    let mut session = open_session(dir.path(), &server.uri());
    session.load_models().await;
    session.select_model("mistral").unwrap();
    drop(session);

    let trimmed = MockServer::start().await;
    mount_catalog(&trimmed, json!([{"name": "openai"}, {"name": "llama"}])).await;
    let mut session = open_session(dir.path(), &trimmed.uri());
    session.load_models().await;

    assert_eq!(session.selected_model(), Some("openai"));
}

#[tokio::test]
async fn timeout_shows_prompt_once_and_cancel_installs_fallback() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_slow_catalog(&server, SLOW, 1).await;
    let mut session = open_session(dir.path(), &server.uri());

    let state = session.load_models().await;

    assert_eq!(state, CatalogState::AwaitingTimeoutChoice);
    assert!(session.catalog().models().is_empty());
    let prompt = session.view().timeout_prompt.unwrap();
    assert_eq!(prompt.title, "Models Loading Timeout");

    let state = session.resolve_timeout(TimeoutChoice::Cancel).await.unwrap();

    assert_eq!(state, CatalogState::Loaded(CatalogSource::Fallback));
    let names: Vec<&str> = session
        .catalog()
        .models()
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["openai", "claude-hybridspace", "openai-large"]);
    assert!(session.view().timeout_prompt.is_none());
    assert_eq!(
        session.resolve_timeout(TimeoutChoice::Cancel).await,
        Err(SessionError::NoPendingPrompt)
    );
}

#[tokio::test]
async fn dismissing_the_prompt_behaves_like_cancel() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_slow_catalog(&server, SLOW, 1).await;
    let mut session = open_session(dir.path(), &server.uri());
    session.load_models().await;

    let state = session.resolve_timeout(TimeoutChoice::Dismiss).await.unwrap();

    assert_eq!(state, CatalogState::Loaded(CatalogSource::Fallback));
    assert_eq!(session.catalog().models().len(), 3);
    assert_eq!(session.selected_model(), Some("openai"));
}

/// Retry starts a fresh fetch with the same deadline.
#[tokio::test]
async fn retry_refetches_catalog() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_slow_catalog(&server, SLOW, 1).await;
    mount_catalog(&server, sample_catalog()).await;
    let mut session = open_session(dir.path(), &server.uri());
    assert_eq!(
        session.load_models().await,
        CatalogState::AwaitingTimeoutChoice
    );

    let state = session.resolve_timeout(TimeoutChoice::Retry).await.unwrap();

    assert_eq!(state, CatalogState::Loaded(CatalogSource::Remote));
    assert_eq!(session.catalog().models().len(), 4);
    let fetches = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/models")
        .count();
    assert_eq!(fetches, 2);
}

/// A retry that times out again asks again.
#[tokio::test]
async fn retry_that_times_out_prompts_again() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    mount_slow_catalog(&server, SLOW, 2).await;
    let mut session = open_session(dir.path(), &server.uri());
    session.load_models().await;

    let state = session.resolve_timeout(TimeoutChoice::Retry).await.unwrap();

    assert_eq!(state, CatalogState::AwaitingTimeoutChoice);
    assert!(session.view().timeout_prompt.is_some());
}

/// A failed fetch goes straight to the fallback without a prompt.
#[tokio::test]
async fn network_error_skips_prompt() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let mut session = open_session(dir.path(), &server.uri());

    let state = session.load_models().await;

    assert_eq!(state, CatalogState::Loaded(CatalogSource::Fallback));
    assert!(session.view().timeout_prompt.is_none());
    assert_eq!(session.view().status, "Error loading models");
}
