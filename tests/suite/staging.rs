//! Integration tests for staged attachments.

use std::fs;

use pollen_engine::{AttachmentKind, FileRef, MAX_FILE_BYTES, MAX_STAGED_FILES, StageError};
use tempfile::tempdir;

use crate::common::{open_session, ready_session};

#[tokio::test]
async fn eleventh_file_is_rejected_and_order_kept() {
    let dir = tempdir().unwrap();
    let mut session = open_session(dir.path(), "http://127.0.0.1:9");

    for i in 0..MAX_STAGED_FILES {
        session
            .stage_file(FileRef::from_bytes(format!("f{i}.txt"), "text/plain", vec![b'x']))
            .unwrap();
    }
    let err = session
        .stage_file(FileRef::from_bytes("extra.txt", "text/plain", vec![b'x']))
        .unwrap_err();

    assert_eq!(err, StageError::TooManyFiles);
    assert_eq!(session.view().status, "Maximum 10 files at once");
    let names: Vec<&str> = session.staged_files().iter().map(FileRef::name).collect();
    assert_eq!(names.len(), MAX_STAGED_FILES);
    assert_eq!(names[0], "f0.txt");
    assert_eq!(names[9], "f9.txt");
}

#[tokio::test]
async fn oversized_file_is_rejected_by_name() {
    let dir = tempdir().unwrap();
    let mut session = open_session(dir.path(), "http://127.0.0.1:9");

    let err = session
        .stage_file(FileRef::from_path("/data/huge.iso", MAX_FILE_BYTES + 1))
        .unwrap_err();

    assert!(matches!(err, StageError::FileTooLarge { ref name, .. } if name == "huge.iso"));
    assert_eq!(
        session.view().status,
        "File huge.iso is too large (maximum 10MB)"
    );
    assert!(session.staged_files().is_empty());
}

#[tokio::test]
async fn remove_shifts_later_files_down() {
    let dir = tempdir().unwrap();
    let mut session = open_session(dir.path(), "http://127.0.0.1:9");
    for name in ["a.txt", "b.txt", "c.txt"] {
        session
            .stage_file(FileRef::from_bytes(name, "text/plain", b"-".to_vec()))
            .unwrap();
    }

    let removed = session.remove_staged(1).unwrap();

    assert_eq!(removed.name(), "b.txt");
    let view = session.view();
    let staged: Vec<(usize, &str)> = view
        .staged
        .iter()
        .map(|f| (f.index, f.display_name.as_str()))
        .collect();
    assert_eq!(staged.len(), 2);
    assert_eq!(staged[1].0, 1);
    assert!(staged[1].1.contains("c.txt"));
    assert!(session.remove_staged(5).is_none());
}

/// Files from disk are inlined when text and summarized when not.
#[tokio::test]
async fn staged_paths_are_composed_into_the_message() {
    let dir = tempdir().unwrap();
    let notes = dir.path().join("notes.md");
    let photo = dir.path().join("cat.png");
    fs::write(&notes, "- buy milk").unwrap();
    fs::write(&photo, [0x89, b'P', b'N', b'G']).unwrap();

    let (_server, mut session) = ready_session(dir.path(), &["noted"]).await;
    session.stage_path(&notes).unwrap();
    session.stage_path(&photo).unwrap();
    assert!(session.stage_path(dir.path()).is_err());

    session.send("remember this", |_| {}).await.unwrap();

    assert!(session.staged_files().is_empty());
    let sent = session.conversation().messages()[0].content().to_string();
    assert_eq!(
        sent,
        "remember this\n\nFile content notes.md:\n\n- buy milk\n\n[Image: cat.png]"
    );

    let entry = &session.transcript().entries()[0];
    assert_eq!(entry.text, "remember this");
    let kinds: Vec<AttachmentKind> = entry.attachments.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AttachmentKind::Text, AttachmentKind::Image]);
}

/// Files alone are enough to send.
#[tokio::test]
async fn file_only_message_is_sent() {
    let dir = tempdir().unwrap();
    let (_server, mut session) = ready_session(dir.path(), &["got it"]).await;
    session
        .stage_file(FileRef::from_bytes("todo.txt", "text/plain", b"ship it".to_vec()))
        .unwrap();

    let outcome = session.send("   ", |_| {}).await.unwrap();

    assert_eq!(outcome.reply.as_deref(), Some("got it"));
    assert_eq!(
        session.conversation().messages()[0].content(),
        "File content todo.txt:\n\nship it"
    );
}
