//! Room/session state (§3 Room state, §4.5 Room & Session Management).
//!
//! Seat identity is the player's display name — the wire protocol's
//! `join` carries `{name, roomId}` and nothing else, so reconnect is
//! resolved by matching a disconnected seat's stored name.

use serde::Serialize;
use uuid::Uuid;

use super::deal::DealState;
use super::match_state::MatchState;
use super::seat::Seat;

/// Room-level mode flag (§4.6 `setMode`). `Skill` refers to the skill-card
/// mini-expansion, which is out of scope (§1) — the deal engine plays
/// identically under both modes; the flag is stored and echoed back only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Normal,
    Skill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatOccupant {
    Empty,
    Human { name: String, connected: bool },
    Bot,
}

impl SeatOccupant {
    pub fn is_empty(&self) -> bool {
        matches!(self, SeatOccupant::Empty)
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, SeatOccupant::Bot)
    }

    pub fn is_human(&self) -> bool {
        matches!(self, SeatOccupant::Human { .. })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SeatOccupant::Human { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub seat: Seat,
    pub text: String,
}

/// A bounded ring buffer: the newest `CAPACITY` messages only. Not
/// persisted; §1 non-goals exclude chat history storage.
#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    capacity: usize,
}

impl ChatLog {
    pub fn new(capacity: usize) -> Self {
        Self { messages: Vec::with_capacity(capacity), capacity }
    }

    pub fn push(&mut self, msg: ChatMessage) {
        if self.messages.len() == self.capacity {
            self.messages.remove(0);
        }
        self.messages.push(msg);
    }

    pub fn recent(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RoomPhase {
    Lobby,
    InMatch,
    Ended,
}

pub struct RoomState {
    pub id: Uuid,
    pub seats: [SeatOccupant; 4],
    pub ready: [bool; 4],
    pub host: Seat,
    pub mode: GameMode,
    pub phase: RoomPhase,
    pub match_state: Option<MatchState>,
    pub deal: Option<DealState>,
    pub chat: ChatLog,
    /// Bumped every time `deal` is replaced or cleared, so timers scheduled
    /// against a prior deal can detect staleness and no-op (§9).
    pub deal_epoch: u64,
}

impl RoomState {
    pub fn new(id: Uuid, host_name: String) -> Self {
        let seats = [
            SeatOccupant::Human { name: host_name, connected: true },
            SeatOccupant::Empty,
            SeatOccupant::Empty,
            SeatOccupant::Empty,
        ];
        Self {
            id,
            seats,
            ready: [false; 4],
            host: 0,
            mode: GameMode::Normal,
            phase: RoomPhase::Lobby,
            match_state: None,
            deal: None,
            chat: ChatLog::new(50),
            deal_epoch: 0,
        }
    }

    pub fn empty_seats(&self) -> Vec<Seat> {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_empty())
            .map(|(i, _)| i as Seat)
            .collect()
    }

    pub fn seat_of_name(&self, name: &str) -> Option<Seat> {
        self.seats.iter().position(|s| s.name() == Some(name)).map(|i| i as Seat)
    }

    pub fn disconnected_seat_with_name(&self, name: &str) -> Option<Seat> {
        self.seats.iter().position(|s| matches!(s, SeatOccupant::Human { name: n, connected: false } if n == name)).map(|i| i as Seat)
    }

    pub fn all_ready_to_start(&self) -> bool {
        self.seats.iter().all(|s| !s.is_empty())
    }

    /// True once every seat is held by a connected human and every one
    /// of them has called ready; the condition that auto-starts a match.
    pub fn all_seats_ready(&self) -> bool {
        self.seats.iter().all(|s| s.is_human()) && self.ready.iter().all(|&r| r)
    }

    pub fn fill_remaining_with_bots(&mut self) {
        for seat in self.seats.iter_mut() {
            if seat.is_empty() {
                *seat = SeatOccupant::Bot;
            }
        }
    }

    pub fn is_bot(&self, seat: Seat) -> bool {
        self.seats[seat as usize].is_bot()
    }

    pub fn bump_deal_epoch(&mut self) -> u64 {
        self.deal_epoch += 1;
        self.deal_epoch
    }
}
