//! Card identity, suits, ranks, and the two-deck stack.

use serde::{Deserialize, Serialize};

/// Card suit. Jokers carry no conventional suit but are represented here
/// so a `Card` stays a flat struct rather than an enum-of-enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
    Joker,
}

/// Card rank. `Level` is resolved at classification time from the active
/// team's level, not stored on the card itself — what's stored is the
/// natural rank, 2..Ace plus the two joker ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    SmallJoker,
    BigJoker,
}

impl Rank {
    pub const NATURAL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Base logic value ignoring level promotion: standard ranks 2..14,
    /// SmallJoker = 20, BigJoker = 21. The level-card value of 19 is a
    /// property of the *deal*, not the rank, and is applied by
    /// `Card::logic_value`.
    pub fn base_value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
            Rank::SmallJoker => 20,
            Rank::BigJoker => 21,
        }
    }

    pub fn is_joker(self) -> bool {
        matches!(self, Rank::SmallJoker | Rank::BigJoker)
    }

    /// Rank-from-level-card-rank: used to convert a configured `level`
    /// (2..14) to the `Rank` whose cards are promoted this deal.
    pub fn from_level(level: u8) -> Option<Rank> {
        Rank::NATURAL.get((level as usize).checked_sub(2)?).copied()
    }
}

/// Logic value used throughout comparison and classification. Level card
/// = 19, SmallJoker = 20, BigJoker = 21, standard ranks 2..14.
pub const LEVEL_CARD_VALUE: u8 = 19;

/// A single physical card out of the 108-card two-deck stack. `id` is the
/// stable identity tag (`suit-rank-copy`) that survives shuffle and deal
/// unchanged; it is the sole key plays are validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
}

/// Stable identity tag, unique across all 108 cards (two copies of each
/// of the 52-card pack, plus two pairs of jokers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u8);

impl Card {
    /// Logic value for comparison purposes, given the deal's active
    /// level. Level card (rank == level) scores 19 regardless of suit.
    pub fn logic_value(&self, level: u8) -> u8 {
        if self.is_level_card(level) {
            LEVEL_CARD_VALUE
        } else {
            self.rank.base_value()
        }
    }

    /// A card is a level card if its rank equals the active team's
    /// current level.
    pub fn is_level_card(&self, level: u8) -> bool {
        !self.rank.is_joker() && Rank::from_level(level) == Some(self.rank)
    }

    /// Wild iff level card AND suit is Hearts.
    pub fn is_wild(&self, level: u8) -> bool {
        self.is_level_card(level) && self.suit == Suit::Hearts
    }
}

/// Build the 108-card two-deck stack: two copies of a 52-card pack plus
/// two pairs of jokers. Identity tags are `suit-rank-copy` encoded as a
/// dense `CardId` (0..108).
pub fn make_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(108);
    let mut next_id = 0u8;

    for copy in 0..2u8 {
        for &suit in &[Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds] {
            for &rank in &Rank::NATURAL {
                let _ = copy;
                cards.push(Card {
                    id: CardId(next_id),
                    suit,
                    rank,
                });
                next_id += 1;
            }
        }
        cards.push(Card {
            id: CardId(next_id),
            suit: Suit::Joker,
            rank: Rank::SmallJoker,
        });
        next_id += 1;
        cards.push(Card {
            id: CardId(next_id),
            suit: Suit::Joker,
            rank: Rank::BigJoker,
        });
        next_id += 1;
    }

    debug_assert_eq!(cards.len(), 108);
    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_deck_has_108_unique_ids() {
        let deck = make_deck();
        assert_eq!(deck.len(), 108);
        let mut ids: Vec<u8> = deck.iter().map(|c| c.id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 108);
    }

    #[test]
    fn make_deck_has_four_jokers() {
        let deck = make_deck();
        let small = deck.iter().filter(|c| c.rank == Rank::SmallJoker).count();
        let big = deck.iter().filter(|c| c.rank == Rank::BigJoker).count();
        assert_eq!(small, 2);
        assert_eq!(big, 2);
    }

    #[test]
    fn level_card_value_is_19() {
        let card = Card {
            id: CardId(0),
            suit: Suit::Spades,
            rank: Rank::Two,
        };
        assert_eq!(card.logic_value(2), 19);
        assert_eq!(card.logic_value(3), 2);
    }

    #[test]
    fn heart_level_card_is_wild() {
        let card = Card {
            id: CardId(1),
            suit: Suit::Hearts,
            rank: Rank::Five,
        };
        assert!(card.is_level_card(5));
        assert!(card.is_wild(5));

        let spade = Card {
            id: CardId(2),
            suit: Suit::Spades,
            rank: Rank::Five,
        };
        assert!(spade.is_level_card(5));
        assert!(!spade.is_wild(5));
    }

    #[test]
    fn joker_never_a_level_card() {
        let joker = Card {
            id: CardId(3),
            suit: Suit::Joker,
            rank: Rank::SmallJoker,
        };
        for level in 2..=14 {
            assert!(!joker.is_level_card(level));
        }
        assert_eq!(joker.logic_value(2), 20);
    }
}
