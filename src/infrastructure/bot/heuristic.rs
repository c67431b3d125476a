//! Heuristic bot strategy (C6 collaborator). Builds candidate plays by
//! grouping the hand by logic value, then accepts whichever candidate the
//! rules engine (C2) confirms beats the target — reusing the classifier
//! and comparator rather than re-deriving hand legality here.

use std::collections::HashMap;

use crate::domain::repositories::{BotDecision, BotStrategy};
use crate::domain::services::{classify, compare_hands};
use crate::domain::value_objects::{Card, Classification, Rank};

#[derive(Debug, Default)]
pub struct HeuristicBot;

impl HeuristicBot {
    pub fn new() -> Self {
        Self
    }
}

impl BotStrategy for HeuristicBot {
    fn decide(&self, hand: &[Card], level: u8, target: Option<&Classification>) -> BotDecision {
        let mut candidates = candidate_plays(hand, level);
        candidates.sort_by_key(|c| (c.len(), c.iter().map(|card| card.logic_value(level)).sum::<u32>()));

        for candidate in candidates {
            let Ok(classification) = classify(&candidate, level) else { continue };
            let beats_target = match target {
                None => true,
                Some(t) => compare_hands(&classification, t) > 0,
            };
            if beats_target {
                return BotDecision::Play(candidate.iter().map(|c| c.id).collect());
            }
        }
        BotDecision::Pass
    }
}

/// Singles, pairs, trips, and bombs drawn from same-logic-value groups,
/// plus FourKings when the hand holds all four jokers.
fn candidate_plays(hand: &[Card], level: u8) -> Vec<Vec<Card>> {
    let mut groups: HashMap<u8, Vec<Card>> = HashMap::new();
    for &card in hand {
        groups.entry(card.logic_value(level)).or_default().push(card);
    }

    let mut candidates = Vec::new();
    for cards in groups.values() {
        if !cards.is_empty() {
            candidates.push(vec![cards[0]]);
        }
        if cards.len() >= 2 {
            candidates.push(cards[..2].to_vec());
        }
        if cards.len() >= 3 {
            candidates.push(cards[..3].to_vec());
        }
        if cards.len() >= 4 {
            candidates.push(cards.clone());
        }
    }

    let small = hand.iter().filter(|c| c.rank == Rank::SmallJoker).count();
    let big = hand.iter().filter(|c| c.rank == Rank::BigJoker).count();
    if small >= 2 && big >= 2 {
        let kings: Vec<Card> = hand
            .iter()
            .filter(|c| c.rank == Rank::SmallJoker || c.rank == Rank::BigJoker)
            .take(4)
            .copied()
            .collect();
        candidates.push(kings);
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CardId, Suit};

    fn card(id: u8, suit: Suit, rank: Rank) -> Card {
        Card { id: CardId(id), suit, rank }
    }

    #[test]
    fn free_lead_plays_a_single() {
        let bot = HeuristicBot::new();
        let hand = vec![card(0, Suit::Spades, Rank::Three), card(1, Suit::Clubs, Rank::Nine)];
        let decision = bot.decide(&hand, 2, None);
        assert!(matches!(decision, BotDecision::Play(cards) if cards.len() == 1));
    }

    #[test]
    fn passes_when_nothing_beats_the_target() {
        let bot = HeuristicBot::new();
        let hand = vec![card(0, Suit::Spades, Rank::Three)];
        let target_cards = vec![card(10, Suit::Hearts, Rank::Ace)];
        let target = classify(&target_cards, 2).unwrap();
        let decision = bot.decide(&hand, 2, Some(&target));
        assert_eq!(decision, BotDecision::Pass);
    }
}
