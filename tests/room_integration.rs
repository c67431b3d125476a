//! End-to-end coverage of the room actor through its public application
//! use cases: join quorum, match start, chat relay, disconnect/reconnect,
//! and host force-end, exercised the way a real duplex client would drive
//! them (no direct poking of actor internals).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use uuid::Uuid;

use guandan_server::api::proto::ServerMessage;
use guandan_server::application::room::{ForceEnd, JoinRoom, JoinRoomInput, LeaveRoom, SendChat, SetReady};
use guandan_server::domain::entities::RoomPhase;
use guandan_server::infrastructure::bot::HeuristicBot;
use guandan_server::infrastructure::config::Config;
use guandan_server::infrastructure::registry::RoomRegistry;

fn new_registry() -> Arc<RoomRegistry> {
    Arc::new(RoomRegistry::new(Config::default(), Arc::new(HeuristicBot::new())))
}

async fn join_via(registry: &Arc<RoomRegistry>, room_id: Uuid, name: &str) -> (guandan_server::infrastructure::actor::room_actor::RoomHandle, u8, mpsc::UnboundedReceiver<ServerMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let join_room = JoinRoom::new(registry.clone());
    let out = join_room
        .execute(JoinRoomInput { room_id, name: name.to_string(), outbox: tx })
        .await
        .expect("join should succeed");
    (out.handle, out.seat, rx)
}

async fn drain(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(Some(msg)) = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await {
        out.push(msg);
    }
    out
}

#[tokio::test]
async fn four_joins_and_all_ready_starts_the_match() {
    let registry = new_registry();
    let room_id = Uuid::new_v4();

    let (h0, s0, mut r0) = join_via(&registry, room_id, "alice").await;
    let (h1, s1, mut r1) = join_via(&registry, room_id, "bob").await;
    let (h2, s2, mut r2) = join_via(&registry, room_id, "carol").await;
    let (h3, s3, mut r3) = join_via(&registry, room_id, "dave").await;
    assert_eq!([s0, s1, s2, s3], [0, 1, 2, 3]);

    SetReady.execute(&h0, s0).await.unwrap();
    SetReady.execute(&h1, s1).await.unwrap();
    SetReady.execute(&h2, s2).await.unwrap();
    SetReady.execute(&h3, s3).await.unwrap();

    let msgs0 = drain(&mut r0).await;
    let room_states: Vec<_> = msgs0
        .iter()
        .filter_map(|m| if let ServerMessage::RoomState(v) = m { Some(v) } else { None })
        .collect();
    assert!(room_states.iter().any(|v| v.phase == RoomPhase::InMatch));

    let game_states: Vec<_> = msgs0
        .iter()
        .filter_map(|m| if let ServerMessage::GameState(v) = m { Some(v) } else { None })
        .collect();
    let dealt = game_states.last().expect("at least one game state broadcast");
    assert_eq!(dealt.hands.len(), 4);

    drop((r1, r2, r3));
}

#[tokio::test]
async fn disconnect_in_lobby_frees_the_seat_for_a_new_name() {
    let registry = new_registry();
    let room_id = Uuid::new_v4();

    let (h0, s0, _r0) = join_via(&registry, room_id, "alice").await;
    let (_h1, s1, _r1) = join_via(&registry, room_id, "bob").await;
    assert_eq!((s0, s1), (0, 1));

    LeaveRoom.execute(&h0, s0);
    tokio::time::sleep(Duration::from_millis(50)).await;

    // A third newcomer takes the freed seat 0, not seat 2.
    let (_h2, s2, _r2) = join_via(&registry, room_id, "erin").await;
    assert_eq!(s2, 0);
}

#[tokio::test]
async fn reconnect_by_name_reclaims_a_disconnected_in_match_seat() {
    let registry = new_registry();
    let room_id = Uuid::new_v4();

    let (h0, s0, _r0) = join_via(&registry, room_id, "alice").await;
    let (h1, s1, _r1) = join_via(&registry, room_id, "bob").await;
    let (h2, s2, _r2) = join_via(&registry, room_id, "carol").await;
    let (h3, s3, _r3) = join_via(&registry, room_id, "dave").await;
    SetReady.execute(&h0, s0).await.unwrap();
    SetReady.execute(&h1, s1).await.unwrap();
    SetReady.execute(&h2, s2).await.unwrap();
    SetReady.execute(&h3, s3).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    LeaveRoom.execute(&h1, s1);
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (_h1b, seat_back, _r1b) = join_via(&registry, room_id, "bob").await;
    assert_eq!(seat_back, 1);
}

#[tokio::test]
async fn host_force_end_returns_the_room_to_lobby() {
    let registry = new_registry();
    let room_id = Uuid::new_v4();

    let (h0, s0, mut r0) = join_via(&registry, room_id, "alice").await;
    let (h1, s1, _r1) = join_via(&registry, room_id, "bob").await;
    let (h2, s2, _r2) = join_via(&registry, room_id, "carol").await;
    let (h3, s3, _r3) = join_via(&registry, room_id, "dave").await;
    SetReady.execute(&h0, s0).await.unwrap();
    SetReady.execute(&h1, s1).await.unwrap();
    SetReady.execute(&h2, s2).await.unwrap();
    SetReady.execute(&h3, s3).await.unwrap();
    let _ = drain(&mut r0).await;

    ForceEnd.execute(&h0, s0).await.unwrap();
    let msgs = drain(&mut r0).await;
    let room_states: Vec<_> = msgs
        .iter()
        .filter_map(|m| if let ServerMessage::RoomState(v) = m { Some(v) } else { None })
        .collect();
    assert!(room_states.iter().any(|v| v.phase == RoomPhase::Lobby));

    // Non-host cannot force-end.
    let registry2 = new_registry();
    let room_id2 = Uuid::new_v4();
    let (h0b, s0b, _) = join_via(&registry2, room_id2, "alice").await;
    let (h1b, s1b, _) = join_via(&registry2, room_id2, "bob").await;
    let _ = s0b;
    assert!(ForceEnd.execute(&h1b, s1b).await.is_err());
    drop(h0b);
}

#[tokio::test]
async fn chat_is_relayed_to_every_seat() {
    let registry = new_registry();
    let room_id = Uuid::new_v4();

    let (h0, s0, mut r0) = join_via(&registry, room_id, "alice").await;
    let (_h1, _s1, mut r1) = join_via(&registry, room_id, "bob").await;
    let _ = drain(&mut r0).await;
    let _ = drain(&mut r1).await;

    SendChat.execute(&h0, s0, "hello table".to_string());

    let msgs1 = drain(&mut r1).await;
    assert!(msgs1.iter().any(|m| matches!(
        m,
        ServerMessage::ChatMessage { text, seat: 0, .. } if text == "hello table"
    )));
}
