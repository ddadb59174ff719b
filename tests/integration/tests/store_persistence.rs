//! File-backed session store persistence tests.
//!
//! These verify that sessions and messages written by one store instance
//! are fully readable by a fresh instance over the same directory.

use coachd_core::{ChatMessage, OwnerId, Role};
use coachd_store::{FileSessionStore, SessionStore, StoreError};
use tempfile::TempDir;

#[tokio::test]
async fn test_history_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let session = {
        let store = FileSessionStore::new(dir.path()).unwrap();
        let session = store
            .create_session(&OwnerId::new("u1"), "Leg day")
            .await
            .unwrap();
        store
            .append_message(ChatMessage::user(session.id.clone(), "logged my squats"))
            .await
            .unwrap();
        store
            .append_message(ChatMessage::assistant(
                session.id.clone(),
                "Nice, that's three sessions this week.",
            ))
            .await
            .unwrap();
        session
    };

    let store = FileSessionStore::new(dir.path()).unwrap();
    let reloaded = store.get_session(&session.id).await.unwrap().unwrap();
    assert_eq!(reloaded.title, "Leg day");
    assert_eq!(reloaded.owner_id, session.owner_id);

    let history = store.load_history(&session.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "logged my squats");
    assert_eq!(history[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_appends_across_instances_keep_order() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path()).unwrap();
    let session = store
        .create_session(&OwnerId::new("u1"), "Chat")
        .await
        .unwrap();

    for i in 0..5 {
        store
            .append_message(ChatMessage::user(session.id.clone(), format!("msg {}", i)))
            .await
            .unwrap();
    }

    // A second instance appends to the same log.
    let other = FileSessionStore::new(dir.path()).unwrap();
    other
        .append_message(ChatMessage::user(session.id.clone(), "msg 5"))
        .await
        .unwrap();

    let history = other.load_history(&session.id).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["msg 0", "msg 1", "msg 2", "msg 3", "msg 4", "msg 5"]
    );
}

#[tokio::test]
async fn test_append_to_unknown_session_fails() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path()).unwrap();

    let msg = ChatMessage::user("missing".into(), "hello?");
    let err = store.append_message(msg).await.unwrap_err();
    assert!(matches!(err, StoreError::SessionNotFound(_)));
}

#[tokio::test]
async fn test_corrupt_log_line_reported() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path()).unwrap();
    let session = store
        .create_session(&OwnerId::new("u1"), "Chat")
        .await
        .unwrap();
    store
        .append_message(ChatMessage::user(session.id.clone(), "fine"))
        .await
        .unwrap();

    // Garbage appended out-of-band.
    let log = dir
        .path()
        .join(session.id.as_str())
        .join("messages.jsonl");
    use std::io::Write;
    let mut f = std::fs::OpenOptions::new().append(true).open(log).unwrap();
    writeln!(f, "not json").unwrap();

    let err = store.load_history(&session.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let dir = TempDir::new().unwrap();
    let store = FileSessionStore::new(dir.path()).unwrap();

    let a = store
        .create_session(&OwnerId::new("u1"), "A")
        .await
        .unwrap();
    let b = store
        .create_session(&OwnerId::new("u2"), "B")
        .await
        .unwrap();

    store
        .append_message(ChatMessage::user(a.id.clone(), "for a"))
        .await
        .unwrap();
    store
        .append_message(ChatMessage::user(b.id.clone(), "for b"))
        .await
        .unwrap();

    assert_eq!(store.load_history(&a.id).await.unwrap().len(), 1);
    let b_history = store.load_history(&b.id).await.unwrap();
    assert_eq!(b_history.len(), 1);
    assert_eq!(b_history[0].content, "for b");
}
