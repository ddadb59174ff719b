//! End-to-end agent turn tests over the in-memory store.
//!
//! These drive full turns through `AgentLoop` with a scripted completion
//! client and assert on the event stream and the persisted history.

use coachd_agent::{LoopConfig, TurnRequest};
use coachd_core::{OwnerId, Role, Session, ToolCallKind, ToolCallRequest, TurnEvent};
use coachd_integration_tests::{
    agent_with, agent_with_shared, collect_events, event_types, ScriptedClient,
};
use coachd_providers::Decision;
use coachd_store::{MemorySessionStore, SessionStore};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn turn(session: &Session, message: &str) -> TurnRequest {
    TurnRequest {
        session: session.clone(),
        message: message.to_string(),
        synthetic: false,
    }
}

#[tokio::test]
async fn test_stream_starts_with_session_and_ends_with_done() {
    let store = Arc::new(MemorySessionStore::new());
    let agent = agent_with(store.clone(), ScriptedClient::answering("Nice work today!"));
    let session = store
        .create_session(&OwnerId::new("u1"), "Chat")
        .await
        .unwrap();

    let rx = agent.run_turn(
        turn(&session, "hello"),
        LoopConfig::assistant(),
        CancellationToken::new(),
    );
    let events = collect_events(rx).await;

    let types = event_types(&events);
    assert_eq!(types.first(), Some(&"session"));
    assert_eq!(types.last(), Some(&"done"));
    match &events[0] {
        TurnEvent::Session { session_id } => assert_eq!(session_id, &session.id),
        other => panic!("Expected Session, got {:?}", other),
    }

    let content: String = events
        .iter()
        .filter_map(|e| match e {
            TurnEvent::Content { delta } => Some(delta.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(content, "Nice work today!");
}

#[tokio::test]
async fn test_tool_events_pair_in_request_order() {
    let store = Arc::new(MemorySessionStore::new());
    let client = ScriptedClient::new(
        vec![
            Decision::ToolCalls {
                content: String::new(),
                requests: vec![
                    ToolCallRequest::function("call_a", "get_streak", json!({})),
                    ToolCallRequest::function("call_b", "get_workout_history", json!({})),
                    ToolCallRequest::function("call_c", "get_profile", json!({})),
                ],
            },
            Decision::Answer {
                content: String::new(),
            },
        ],
        "Here's where you stand.",
    );
    let agent = agent_with(store.clone(), client);
    let session = store
        .create_session(&OwnerId::new("u1"), "Status")
        .await
        .unwrap();

    let rx = agent.run_turn(
        turn(&session, "how am I doing?"),
        LoopConfig::assistant(),
        CancellationToken::new(),
    );
    let events = collect_events(rx).await;

    let starts: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            TurnEvent::ToolStart { id, .. } => Some(id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(starts, vec!["call_a", "call_b", "call_c"]);

    // Each start is immediately followed by its matching end.
    let types = event_types(&events);
    for (i, t) in types.iter().enumerate() {
        if *t == "tool_start" {
            assert_eq!(types[i + 1], "tool_end");
            let (start_id, end_id) = match (&events[i], &events[i + 1]) {
                (TurnEvent::ToolStart { id: s, .. }, TurnEvent::ToolEnd { id: e, .. }) => (s, e),
                other => panic!("Expected start/end pair, got {:?}", other),
            };
            assert_eq!(start_id, end_id);
        }
    }
}

#[tokio::test]
async fn test_tool_failure_is_isolated() {
    let store = Arc::new(MemorySessionStore::new());
    let client = ScriptedClient::new(
        vec![
            Decision::ToolCalls {
                content: String::new(),
                requests: vec![
                    // No profile exists yet, so this fails.
                    ToolCallRequest::function("call_1", "get_profile", json!({})),
                    // Unknown tool.
                    ToolCallRequest::function("call_2", "teleport", json!({})),
                    // This one succeeds.
                    ToolCallRequest::function("call_3", "get_streak", json!({})),
                ],
            },
            Decision::Answer {
                content: String::new(),
            },
        ],
        "Let's set up your profile first.",
    );
    let agent = agent_with(store.clone(), client);
    let session = store
        .create_session(&OwnerId::new("u1"), "First chat")
        .await
        .unwrap();

    let rx = agent.run_turn(
        turn(&session, "what's my plan?"),
        LoopConfig::assistant(),
        CancellationToken::new(),
    );
    let events = collect_events(rx).await;

    let ends: Vec<(&str, bool)> = events
        .iter()
        .filter_map(|e| match e {
            TurnEvent::ToolEnd { id, is_error } => Some((id.as_str(), *is_error)),
            _ => None,
        })
        .collect();
    assert_eq!(
        ends,
        vec![("call_1", true), ("call_2", true), ("call_3", false)]
    );

    // Failures never abort the turn.
    let types = event_types(&events);
    assert!(types.contains(&"done"));
    assert!(!types.contains(&"error"));
}

#[tokio::test]
async fn test_unsupported_call_kind_becomes_error_outcome() {
    let store = Arc::new(MemorySessionStore::new());
    let mut request = ToolCallRequest::function("call_1", "get_streak", json!({}));
    request.kind = ToolCallKind::Other("retrieval".to_string());

    let client = ScriptedClient::new(
        vec![
            Decision::ToolCalls {
                content: String::new(),
                requests: vec![request],
            },
            Decision::Answer {
                content: String::new(),
            },
        ],
        "Hmm, let me try that differently.",
    );
    let agent = agent_with(store.clone(), client);
    let session = store
        .create_session(&OwnerId::new("u1"), "Odd call")
        .await
        .unwrap();

    let rx = agent.run_turn(
        turn(&session, "go"),
        LoopConfig::assistant(),
        CancellationToken::new(),
    );
    let events = collect_events(rx).await;

    match events
        .iter()
        .find(|e| matches!(e, TurnEvent::ToolEnd { .. }))
    {
        Some(TurnEvent::ToolEnd { is_error, .. }) => assert!(*is_error),
        other => panic!("Expected ToolEnd, got {:?}", other),
    }
    assert!(event_types(&events).contains(&"done"));
}

#[tokio::test]
async fn test_iteration_cap_fails_turn_without_final_message() {
    let store = Arc::new(MemorySessionStore::new());
    let tool_round = || Decision::ToolCalls {
        content: String::new(),
        requests: vec![ToolCallRequest::function("call_x", "get_streak", json!({}))],
    };
    let client = ScriptedClient::new((0..10).map(|_| tool_round()).collect(), "never streamed");
    let agent = agent_with(store.clone(), client);
    let session = store
        .create_session(&OwnerId::new("u1"), "Runaway")
        .await
        .unwrap();

    let rx = agent.run_turn(
        turn(&session, "loop forever"),
        LoopConfig::assistant().with_max_iterations(3),
        CancellationToken::new(),
    );
    let events = collect_events(rx).await;

    let types = event_types(&events);
    assert_eq!(types.last(), Some(&"error"));
    assert!(!types.contains(&"content"));
    assert!(!types.contains(&"done"));
    match events.last() {
        Some(TurnEvent::Error { message }) => {
            assert!(message.contains("Iteration limit"), "got: {}", message)
        }
        other => panic!("Expected Error, got {:?}", other),
    }

    // The user message and the executed tool rounds are persisted, but no
    // final assistant answer is.
    let history = store.load_history(&session.id).await.unwrap();
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history.len(), 4);
    for msg in &history[1..] {
        assert!(msg.has_tool_calls());
    }
}

#[tokio::test]
async fn test_iteration_cap_bounds_decision_steps() {
    let store = Arc::new(MemorySessionStore::new());
    let tool_round = || Decision::ToolCalls {
        content: String::new(),
        requests: vec![ToolCallRequest::function("call_x", "get_streak", json!({}))],
    };
    // A model that would answer right after the cap is still cut off: the
    // cap bounds how many times it is asked at all.
    let client = Arc::new(ScriptedClient::new(
        vec![
            tool_round(),
            tool_round(),
            Decision::Answer {
                content: "all done".to_string(),
            },
        ],
        "never streamed",
    ));
    let agent = agent_with_shared(store.clone(), client.clone());
    let session = store
        .create_session(&OwnerId::new("u1"), "Runaway")
        .await
        .unwrap();

    let rx = agent.run_turn(
        turn(&session, "loop forever"),
        LoopConfig::assistant().with_max_iterations(2),
        CancellationToken::new(),
    );
    let events = collect_events(rx).await;

    let types = event_types(&events);
    assert_eq!(types.last(), Some(&"error"));
    assert!(!types.contains(&"content"));
    assert!(!types.contains(&"done"));

    assert_eq!(client.decide_calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_tool_call_list_ends_loop_normally() {
    let store = Arc::new(MemorySessionStore::new());
    let client = ScriptedClient::new(
        vec![Decision::ToolCalls {
            content: String::new(),
            requests: Vec::new(),
        }],
        "Just a regular answer.",
    );
    let agent = agent_with(store.clone(), client);
    let session = store
        .create_session(&OwnerId::new("u1"), "Quiet")
        .await
        .unwrap();

    let rx = agent.run_turn(
        turn(&session, "hi"),
        LoopConfig::assistant(),
        CancellationToken::new(),
    );
    let events = collect_events(rx).await;

    assert_eq!(
        event_types(&events),
        vec!["session", "content", "content", "done"]
    );
}

#[tokio::test]
async fn test_history_accumulates_across_turns() {
    let store = Arc::new(MemorySessionStore::new());
    let session = store
        .create_session(&OwnerId::new("u1"), "Ongoing")
        .await
        .unwrap();

    let agent = agent_with(store.clone(), ScriptedClient::answering("First answer."));
    collect_events(agent.run_turn(
        turn(&session, "first question"),
        LoopConfig::assistant(),
        CancellationToken::new(),
    ))
    .await;

    let client = ScriptedClient::answering("Second answer.");
    let agent = agent_with(store.clone(), client);
    let rx = agent.run_turn(
        turn(&session, "second question"),
        LoopConfig::assistant(),
        CancellationToken::new(),
    );
    collect_events(rx).await;

    let history = store.load_history(&session.id).await.unwrap();
    let roles: Vec<Role> = history.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert_eq!(history[1].content, "First answer.");
    assert_eq!(history[3].content, "Second answer.");

    // Tool and system messages never reach the store.
    assert!(history.iter().all(|m| m.role != Role::Tool));
    assert!(history.iter().all(|m| m.role != Role::System));
}

#[tokio::test]
async fn test_intake_milestone_emitted_after_done() {
    let store = Arc::new(MemorySessionStore::new());
    let client = ScriptedClient::new(
        vec![
            Decision::ToolCalls {
                content: String::new(),
                requests: vec![ToolCallRequest::function(
                    "call_1",
                    "update_profile",
                    json!({"goals": "run a 10k", "days_per_week": 4}),
                )],
            },
            Decision::ToolCalls {
                content: String::new(),
                requests: vec![ToolCallRequest::function(
                    "call_2",
                    "complete_intake",
                    json!({"summary": "Intermediate runner, 4 days/week, 10k goal"}),
                )],
            },
            Decision::Answer {
                content: String::new(),
            },
        ],
        "You're all set. Let's get to work!",
    );
    let agent = agent_with(store.clone(), client);
    let session = store
        .create_session(&OwnerId::new("u1"), "Getting started")
        .await
        .unwrap();

    let rx = agent.run_turn(
        TurnRequest {
            session: session.clone(),
            message: "start my intake".to_string(),
            synthetic: true,
        },
        LoopConfig::guided_intake(),
        CancellationToken::new(),
    );
    let events = collect_events(rx).await;

    let types = event_types(&events);
    let done_at = types.iter().position(|t| *t == "done").unwrap();
    let milestone_at = types.iter().position(|t| *t == "milestone").unwrap();
    assert!(milestone_at > done_at);
    assert_eq!(types.iter().filter(|t| **t == "milestone").count(), 1);

    // The synthetic kickoff is absent; the persisted history starts with
    // the first tool-call turn.
    let history = store.load_history(&session.id).await.unwrap();
    assert!(history.iter().all(|m| m.role != Role::User));
    let final_msg = history.last().unwrap();
    assert_eq!(final_msg.role, Role::Assistant);
    assert_eq!(final_msg.tool_calls.as_ref().unwrap().len(), 2);
}

#[tokio::test]
async fn test_decide_sees_system_prompt_and_tool_results() {
    let store = Arc::new(MemorySessionStore::new());
    let client = Arc::new(ScriptedClient::new(
        vec![
            Decision::ToolCalls {
                content: String::new(),
                requests: vec![ToolCallRequest::function("call_1", "get_streak", json!({}))],
            },
            Decision::Answer {
                content: String::new(),
            },
        ],
        "Zero days so far.",
    ));
    let agent = agent_with_shared(store.clone(), client.clone());
    let session = store
        .create_session(&OwnerId::new("u1"), "Streak")
        .await
        .unwrap();

    let rx = agent.run_turn(
        turn(&session, "streak?"),
        LoopConfig::assistant(),
        CancellationToken::new(),
    );
    collect_events(rx).await;

    let calls = client.decide_calls.lock().unwrap();
    assert_eq!(calls.len(), 2);

    // First decision: system prompt then the user message.
    assert_eq!(calls[0][0].role, Role::System);
    assert_eq!(calls[0].last().unwrap().role, Role::User);

    // Second decision additionally sees the assistant tool-call turn and
    // the tool result, in that order.
    let second = &calls[1];
    assert_eq!(second.len(), calls[0].len() + 2);
    let assistant = &second[second.len() - 2];
    assert!(assistant.has_tool_calls());
    let tool_msg = second.last().unwrap();
    assert_eq!(tool_msg.role, Role::Tool);
    assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));

    // The tool result itself stays out of the store.
    let history = store.load_history(&session.id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert!(history[1].has_tool_calls());
    assert_eq!(history[2].content, "Zero days so far.");
}
