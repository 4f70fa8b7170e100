//! Gateway integration tests
//!
//! Each test starts an in-process gateway on an ephemeral port and drives it
//! with real WebSocket clients.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::time::Duration;

use integration_tests::{chat_message, history, room_list, unique_nickname, RoomEntry, TestServer};
use serde_json::json;

const QUIET: Duration = Duration::from_millis(300);

// ============================================================================
// HTTP
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_rooms_endpoint_lists_default_room() {
    let server = TestServer::start().await.unwrap();
    let rooms: Vec<RoomEntry> = server.get("/rooms").await.unwrap().json().await.unwrap();

    assert_eq!(rooms, vec![RoomEntry::new("general", 0)]);
}

// ============================================================================
// Protocol
// ============================================================================

#[tokio::test]
async fn test_hello_then_room_list() {
    let server = TestServer::start_with(&[("GATEWAY_HEARTBEAT_INTERVAL_MS", "30000")])
        .await
        .unwrap();
    let mut client = server.connect().await.unwrap();

    assert_eq!(client.hello["heartbeat_interval"], 30000);

    let frame = client.next_frame().await.unwrap();
    assert_eq!(frame["op"], 0);
    assert_eq!(frame["t"], "roomList");
    assert_eq!(frame["s"], 1);
    assert_eq!(room_list(&frame["d"]), vec![RoomEntry::new("general", 0)]);
}

#[tokio::test]
async fn test_heartbeat_is_acked() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.heartbeat(None).await.unwrap();

    loop {
        let frame = client.next_frame().await.unwrap();
        if frame["op"] == 11 {
            break;
        }
    }
}

#[tokio::test]
async fn test_undecodable_frame_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_raw("not json").await.unwrap();
    assert_eq!(client.wait_closed().await.unwrap(), Some(4002));
}

#[tokio::test]
async fn test_server_op_from_client_closes_with_unknown_opcode() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_raw(r#"{"op":10}"#).await.unwrap();
    assert_eq!(client.wait_closed().await.unwrap(), Some(4001));
}

#[tokio::test]
async fn test_unknown_event_keeps_connection_open() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client.send_event("dance", json!({})).await.unwrap();
    client.join(&unique_nickname("u"), "general").await.unwrap();
}

#[tokio::test]
async fn test_oversized_frame_is_rejected_before_the_coordinator() {
    let server = TestServer::start_with(&[("CHAT_MAX_PAYLOAD_BYTES", "1024")])
        .await
        .unwrap();
    let mut alice = server.connect().await.unwrap();
    let mut bob = server.connect().await.unwrap();
    alice.join("alice", "general").await.unwrap();
    bob.join("bob", "general").await.unwrap();

    alice
        .send_event("chatMessage", json!({"message": "x".repeat(4096)}))
        .await
        .unwrap();
    alice.wait_closed().await.unwrap();

    // Bob never sees the oversized message, only alice leaving
    let notice = bob
        .next_event_where("message", |d| d["nickname"] == "System")
        .await
        .unwrap();
    assert_eq!(notice["message"], "alice left the chat.");
}

// ============================================================================
// Nicknames
// ============================================================================

#[tokio::test]
async fn test_duplicate_nickname_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let mut first = server.connect().await.unwrap();
    let mut second = server.connect().await.unwrap();

    first.join("alice", "general").await.unwrap();

    second
        .send_event("joinRoom", json!({"nickname": "alice", "room": "general"}))
        .await
        .unwrap();
    let reason = second.next_event("nicknameError").await.unwrap();
    assert!(reason.as_str().unwrap().contains("already in use"));

    // The rejected connection can try again
    second.join("alice2", "general").await.unwrap();
}

#[tokio::test]
async fn test_long_nickname_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client
        .send_event(
            "joinRoom",
            json!({"nickname": "abcdefghijklmnopq", "room": "general"}),
        )
        .await
        .unwrap();

    let reason = client.next_event("nicknameError").await.unwrap();
    assert_eq!(reason, "Nickname cannot exceed 16 characters.");

    let rooms: Vec<RoomEntry> = server.get("/rooms").await.unwrap().json().await.unwrap();
    assert_eq!(rooms, vec![RoomEntry::new("general", 0)]);
}

#[tokio::test]
async fn test_nickname_is_released_on_disconnect() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.connect().await.unwrap();
    let mut watcher = server.connect().await.unwrap();
    alice.join("alice", "general").await.unwrap();
    watcher.join("watcher", "general").await.unwrap();

    alice.close().await.unwrap();
    watcher
        .next_event_where("message", |d| d["message"] == "alice left the chat.")
        .await
        .unwrap();

    let mut again = server.connect().await.unwrap();
    again.join("alice", "general").await.unwrap();
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_events_before_join_are_ignored() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    client
        .send_event("chatMessage", json!({"message": "too early"}))
        .await
        .unwrap();
    client.send_event("typing", json!({})).await.unwrap();
    client.join("alice", "general").await.unwrap();

    let replay = client.next_event("messageHistory").await.unwrap();
    assert!(history(&replay).is_empty());
}

#[tokio::test]
async fn test_chat_message_reaches_room_including_sender() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.connect().await.unwrap();
    let mut bob = server.connect().await.unwrap();
    let mut carol = server.connect().await.unwrap();
    alice.join("alice", "general").await.unwrap();
    bob.join("bob", "general").await.unwrap();
    carol.join("carol", "dev").await.unwrap();

    alice
        .send_event("chatMessage", json!({"message": "hi"}))
        .await
        .unwrap();

    for client in [&mut alice, &mut bob] {
        let payload = client
            .next_event_where("message", |d| d["nickname"] == "alice")
            .await
            .unwrap();
        let message = chat_message(&payload).unwrap();
        assert_eq!(message.id.as_deref(), Some("msg-0"));
        assert_eq!(message.message.as_deref(), Some("hi"));
        assert!(message.image.is_none());
        assert_eq!(message.time.len(), 5);
        assert_eq!(message.reactions, Some(Default::default()));
    }

    carol
        .assert_no_event("message", QUIET)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_typing_excludes_sender() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.connect().await.unwrap();
    let mut bob = server.connect().await.unwrap();
    alice.join("alice", "general").await.unwrap();
    bob.join("bob", "general").await.unwrap();

    alice.send_event("typing", json!({})).await.unwrap();

    let typing = bob.next_event("typing").await.unwrap();
    assert_eq!(typing, json!({"nickname": "alice"}));
    alice.assert_no_event("typing", QUIET).await.unwrap();
}

#[tokio::test]
async fn test_history_is_bounded_and_replayed() {
    let server = TestServer::start_with(&[("CHAT_HISTORY_LIMIT", "3")])
        .await
        .unwrap();
    let mut alice = server.connect().await.unwrap();
    alice.join("alice", "general").await.unwrap();

    for n in 0..4 {
        alice
            .send_event("chatMessage", json!({"message": n.to_string()}))
            .await
            .unwrap();
        alice
            .next_event_where("message", |d| d["message"] == n.to_string())
            .await
            .unwrap();
    }

    let mut bob = server.connect().await.unwrap();
    bob.join("bob", "general").await.unwrap();
    let replay = history(&bob.next_event("messageHistory").await.unwrap());

    let texts: Vec<_> = replay.iter().filter_map(|m| m.message.as_deref()).collect();
    assert_eq!(texts, vec!["1", "2", "3"]);
    assert_eq!(replay[0].id.as_deref(), Some("msg-1"));
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reaction_supersession() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.connect().await.unwrap();
    let mut bob = server.connect().await.unwrap();
    alice.join("alice", "general").await.unwrap();
    bob.join("bob", "general").await.unwrap();

    alice
        .send_event("chatMessage", json!({"message": "vote"}))
        .await
        .unwrap();
    let posted = alice
        .next_event_where("message", |d| d["nickname"] == "alice")
        .await
        .unwrap();
    let id = posted["id"].as_str().unwrap().to_string();

    bob.send_event("reaction", json!({"messageId": id, "reaction": "👍"}))
        .await
        .unwrap();
    let added = alice.next_event("reaction").await.unwrap();
    assert_eq!(added, json!({"messageId": id, "reaction": "👍"}));

    bob.send_event("reaction", json!({"messageId": id, "reaction": "❤️"}))
        .await
        .unwrap();
    let removed = alice.next_event("reactionRemoved").await.unwrap();
    assert_eq!(removed, json!({"messageId": id, "reaction": "👍"}));
    let added = alice.next_event("reaction").await.unwrap();
    assert_eq!(added, json!({"messageId": id, "reaction": "❤️"}));

    let mut carol = server.connect().await.unwrap();
    carol.join("carol", "general").await.unwrap();
    let replay = history(&carol.next_event("messageHistory").await.unwrap());
    let reactions = replay[0].reactions.clone().unwrap();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions["❤️"].len(), 1);
}

#[tokio::test]
async fn test_reaction_on_unknown_message_is_dropped() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.connect().await.unwrap();
    alice.join("alice", "general").await.unwrap();

    alice
        .send_event("reaction", json!({"messageId": "msg-42", "reaction": "👍"}))
        .await
        .unwrap();
    alice.assert_no_event("reaction", QUIET).await.unwrap();
}

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn test_room_switch_creates_and_prunes_rooms() {
    let server = TestServer::start().await.unwrap();
    let mut alice = server.connect().await.unwrap();
    let mut bob = server.connect().await.unwrap();
    alice.join("alice", "general").await.unwrap();
    bob.join("bob", "general").await.unwrap();

    alice
        .send_event("changeRoom", json!({"newRoom": "dev", "oldRoom": "general"}))
        .await
        .unwrap();

    let notice = bob
        .next_event_where("message", |d| d["nickname"] == "System")
        .await
        .unwrap();
    assert_eq!(notice["message"], "alice left the room.");

    let with_dev = bob
        .next_event_where("roomList", |d| room_list(d).iter().any(|r| r.name == "dev"))
        .await
        .unwrap();
    assert_eq!(
        room_list(&with_dev),
        vec![RoomEntry::new("general", 1), RoomEntry::new("dev", 1)]
    );

    let rooms: Vec<RoomEntry> = server.get("/rooms").await.unwrap().json().await.unwrap();
    assert_eq!(rooms, vec![RoomEntry::new("general", 1), RoomEntry::new("dev", 1)]);

    alice.close().await.unwrap();

    let without_dev = bob
        .next_event_where("roomList", |d| room_list(d).iter().all(|r| r.name != "dev"))
        .await
        .unwrap();
    assert_eq!(room_list(&without_dev), vec![RoomEntry::new("general", 1)]);
}

#[tokio::test]
async fn test_room_switch_replays_target_history() {
    let server = TestServer::start().await.unwrap();
    let mut carol = server.connect().await.unwrap();
    let mut alice = server.connect().await.unwrap();
    carol.join("carol", "dev").await.unwrap();
    alice.join("alice", "general").await.unwrap();

    carol
        .send_event("chatMessage", json!({"message": "welcome"}))
        .await
        .unwrap();
    carol
        .next_event_where("message", |d| d["message"] == "welcome")
        .await
        .unwrap();

    alice
        .send_event("changeRoom", json!({"newRoom": "dev"}))
        .await
        .unwrap();

    let replay = history(
        &alice
            .next_event_where("messageHistory", |d| d.as_array().is_some_and(|a| !a.is_empty()))
            .await
            .unwrap(),
    );
    assert_eq!(replay.len(), 1);
    assert_eq!(replay[0].message.as_deref(), Some("welcome"));

    let notice = carol
        .next_event_where("message", |d| d["nickname"] == "System")
        .await
        .unwrap();
    assert_eq!(notice["message"], "alice joined the room.");
}
