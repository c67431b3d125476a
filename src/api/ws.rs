//! The duplex transport (§4.5, §6). A single axum WebSocket upgrade binds
//! one connection to one seat in one room; inbound frames are decoded as
//! `ClientMessage` and routed through the room application use cases,
//! outbound `ServerMessage` frames are relayed from the actor's per-seat
//! outbox.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::proto::{ClientMessage, ServerMessage};
use crate::application::game::{PassTurn, PlayHand, SubmitReturnTribute, SubmitTribute};
use crate::application::room::{
    ForceEnd, JoinRoom, JoinRoomInput, LeaveRoom, SendChat, SetMode, SetReady, StartMatch, SwitchSeat,
};
use crate::domain::entities::Seat;
use crate::infrastructure::actor::room_actor::{RoomError, RoomHandle};
use crate::infrastructure::app_state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let Some((handle, seat)) = await_join(&mut stream, &state, outbox_tx.clone()).await else {
        let _ = sink.send(Message::Close(None)).await;
        return;
    };

    let forward = tokio::spawn(async move {
        while let Some(msg) = outbox_rx.recv().await {
            let Ok(text) = serde_json::to_string(&msg) else { continue };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(frame)) = stream.next().await {
        let text = match frame {
            Message::Text(t) => t,
            Message::Close(_) => break,
            _ => continue,
        };
        let client_msg: ClientMessage = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(e) => {
                let _ = outbox_tx.send(ServerMessage::Error { message: format!("bad message: {e}") });
                continue;
            }
        };
        if let Err(err) = dispatch(&handle, seat, client_msg).await {
            let _ = outbox_tx.send(ServerMessage::Error { message: err.to_string() });
        }
    }

    LeaveRoom.execute(&handle, seat);
    forward.abort();
}

/// Blocks until the connection's opening frame is a valid `join`, binding it
/// to a seat. Any other first frame, or a closed socket, ends the connection.
async fn await_join(
    stream: &mut (impl futures::Stream<Item = Result<Message, axum::Error>> + Unpin),
    state: &AppState,
    outbox_tx: mpsc::UnboundedSender<ServerMessage>,
) -> Option<(RoomHandle, Seat)> {
    while let Some(Ok(frame)) = stream.next().await {
        let text = match frame {
            Message::Text(t) => t,
            Message::Close(_) => return None,
            _ => continue,
        };
        let ClientMessage::Join { name, room_id } = serde_json::from_str(&text).ok()? else {
            let _ = outbox_tx.send(ServerMessage::Error { message: "first message must be join".into() });
            continue;
        };
        let room_id = Uuid::parse_str(&room_id).unwrap_or_else(|_| Uuid::new_v4());
        let join_room = JoinRoom::new(state.rooms.clone());
        let input = JoinRoomInput { room_id, name, outbox: outbox_tx.clone() };
        return match join_room.execute(input).await {
            Ok(out) => Some((out.handle, out.seat)),
            Err(e) => {
                let _ = outbox_tx.send(ServerMessage::Error { message: e.to_string() });
                None
            }
        };
    }
    None
}

async fn dispatch(handle: &RoomHandle, seat: Seat, msg: ClientMessage) -> Result<(), RoomError> {
    match msg {
        ClientMessage::Join { .. } => Ok(()),
        ClientMessage::Ready => SetReady.execute(handle, seat).await,
        ClientMessage::Start => StartMatch.execute(handle, seat).await,
        ClientMessage::Pass => PassTurn.execute(handle, seat).await,
        ClientMessage::ForceEnd => ForceEnd.execute(handle, seat).await,
        ClientMessage::PlayHand { cards } => PlayHand.execute(handle, seat, cards).await,
        ClientMessage::Tribute { card } => SubmitTribute.execute(handle, seat, card).await,
        ClientMessage::ReturnTribute { card } => SubmitReturnTribute.execute(handle, seat, card).await,
        ClientMessage::SwitchSeat { target } => SwitchSeat.execute(handle, seat, target).await,
        ClientMessage::SetMode { mode } => SetMode.execute(handle, seat, mode).await,
        ClientMessage::Chat { text } => {
            SendChat.execute(handle, seat, text);
            Ok(())
        }
    }
}
