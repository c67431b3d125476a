//! Bot strategy collaborator (C6). Pure function of (hand, level,
//! optional target classification) → play multiset or pass. The actual
//! heuristic lives in `infrastructure::bot` (an external collaborator
//! behind this interface, out of scope for the core per spec §1).

use crate::domain::value_objects::{Card, CardId, Classification};

/// What a bot chose to do on its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotDecision {
    Play(Vec<CardId>),
    Pass,
}

pub trait BotStrategy: Send + Sync {
    /// Decide a play (or pass) given the bot's current hand, the deal's
    /// active level, and the hand it must beat (`None` on a free lead).
    fn decide(&self, hand: &[Card], level: u8, target: Option<&Classification>) -> BotDecision;

    /// Tribute payment: which card to pay. Per spec §4.3.2, a bot payer
    /// gives the card with the strictly largest logic value.
    fn choose_tribute_card(&self, hand: &[Card], level: u8) -> CardId {
        hand.iter()
            .max_by_key(|c| c.logic_value(level))
            .map(|c| c.id)
            .unwrap_or(hand[0].id)
    }

    /// Return-tribute: bots return their lowest-logic-value card.
    fn choose_return_card(&self, hand: &[Card], level: u8) -> CardId {
        hand.iter()
            .min_by_key(|c| c.logic_value(level))
            .map(|c| c.id)
            .unwrap_or(hand[0].id)
    }
}
