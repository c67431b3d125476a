//! Wire protocol (§6 External Interfaces). Every message is a tagged
//! record `{event, payload}` over the duplex WebSocket channel.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Phase, RoomPhase, RoundAction, Seat};
use crate::domain::value_objects::{Card, CardId, Classification};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ClientMessage {
    Join { name: String, room_id: String },
    Ready,
    Start,
    Pass,
    ForceEnd,
    PlayHand { cards: Vec<CardId> },
    Tribute { card: CardId },
    ReturnTribute { card: CardId },
    SwitchSeat { target: Seat },
    SetMode { mode: ModeWire },
    Chat { text: String },
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum ModeWire {
    Normal,
    Skill,
}

/// A seat's hand as seen by a given recipient: full cards for themselves,
/// just a count for everyone else (§6 outbound `gameState`).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HandView {
    Owned(Vec<Card>),
    Count(usize),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub phase: Phase,
    pub level: u8,
    pub current_turn: Seat,
    pub hands: [HandView; 4],
    pub last_hand: Option<Classification>,
    pub round_actions: [Option<RoundAction>; 4],
    pub winners: Vec<Seat>,
    pub team_levels: [u8; 2],
    pub active_team: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStateView {
    pub room_id: String,
    pub phase: RoomPhase,
    pub seats: [SeatView; 4],
    pub host: Seat,
    pub mode: ModeWire,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SeatView {
    Empty,
    Bot,
    Human { name: String, connected: bool, ready: bool },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ServerMessage {
    RoomState(RoomStateView),
    GameState(GameStateView),
    Error { message: String },
    GameOver { winners: [Seat; 4] },
    MatchOver { team: u8, levels: [u8; 2] },
    ChatMessage { sender: String, text: String, seat: Seat, time: String },
}
