//! Hand classification result type.

use serde::{Deserialize, Serialize};

use super::card::Card;

/// Hand type as classified by the rules engine (C2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandType {
    Single,
    Pair,
    Trips,
    TripsWithPair,
    Straight,
    Tube,
    Plate,
    Bomb,
    StraightFlush,
    FourKings,
}

impl HandType {
    /// Whether this type belongs to the bomb ladder (beats any non-bomb
    /// hand regardless of type/length).
    pub fn is_bomb_family(self) -> bool {
        matches!(self, HandType::Bomb | HandType::StraightFlush | HandType::FourKings)
    }
}

/// The result of classifying a candidate multiset of cards: its type,
/// the cards themselves, the defining logic value, and (bomb family
/// only) the bomb ladder rung.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub hand_type: HandType,
    pub cards: Vec<Card>,
    pub value: u8,
    /// Set only for Bomb/StraightFlush. Bomb count, or 6 (Straight
    /// Flush scores 5.5 in the bomb ladder and is represented as a
    /// distinct ladder step via `bomb_ladder_rank`, not via this field).
    pub bomb_count: Option<u8>,
}

impl Classification {
    pub fn new(hand_type: HandType, cards: Vec<Card>, value: u8, bomb_count: Option<u8>) -> Self {
        Self {
            hand_type,
            cards,
            value,
            bomb_count,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Score on the bomb ladder: FourKings is unbeatable (represented as
    /// `f32::INFINITY`), a plain N-bomb scores `N`, and a StraightFlush
    /// scores 5.5 — strictly between a 5-bomb and a 6-bomb, as specified
    /// in §4.2 rule 3. Returns `None` for non-bomb-family hands.
    pub fn bomb_ladder_score(&self) -> Option<f32> {
        match self.hand_type {
            HandType::FourKings => Some(f32::INFINITY),
            HandType::StraightFlush => Some(5.5),
            HandType::Bomb => Some(self.bomb_count.unwrap_or(4) as f32),
            _ => None,
        }
    }
}
