//! Per-deal mutable state (§3 Deal state, §4.3 Deal Engine).

use serde::{Deserialize, Serialize};

use super::seat::Seat;
use crate::domain::value_objects::{Card, CardId, Classification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Waiting,
    Dealing,
    Tribute,
    ReturnTribute,
    Playing,
    Score,
}

/// `{playerIndex, handClassification}` or null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastPlay {
    pub player: Seat,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundAction {
    Played,
    Passed,
}

/// One tribute payment owed: `from` pays `to` their largest card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TributeEdge {
    pub from: Seat,
    pub to: Seat,
    pub card: Option<CardId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TributeState {
    /// Pending tribute payments (payer -> recipient), collected one at a time.
    pub pending: Vec<TributeEdge>,
    /// Collected payments, kept to compute the next-start seat.
    pub collected: Vec<TributeEdge>,
    /// Pending returns during ReturnTribute (recipient -> original payer).
    pub pending_returns: Vec<TributeEdge>,
    /// Seat to lead Playing with once return-tribute completes.
    pub next_start_seat: Option<Seat>,
    /// Payers in tie-break priority order (worst finisher first), independent
    /// of the order in which they actually pay.
    pub payer_priority: Vec<Seat>,
}

impl TributeState {
    pub fn is_collection_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_return_done(&self) -> bool {
        self.pending_returns.is_empty()
    }
}

/// Per-deal mutable record (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealState {
    pub phase: Phase,
    pub level: u8,
    pub hands: [Vec<Card>; 4],
    pub current_turn: Seat,
    pub last_play: Option<LastPlay>,
    pub round_actions: [Option<RoundAction>; 4],
    pub winners: Vec<Seat>,
    pub tribute: Option<TributeState>,
}

impl DealState {
    pub fn new(level: u8, starting_seat: Seat) -> Self {
        Self {
            phase: Phase::Waiting,
            level,
            hands: Default::default(),
            current_turn: starting_seat,
            last_play: None,
            round_actions: Default::default(),
            winners: Vec::new(),
            tribute: None,
        }
    }

    pub fn hand_len(&self, seat: Seat) -> usize {
        self.hands[seat as usize].len()
    }

    pub fn is_finished(&self, seat: Seat) -> bool {
        self.hands[seat as usize].is_empty()
    }

    pub fn clear_round(&mut self) {
        self.last_play = None;
        self.round_actions = Default::default();
    }
}
