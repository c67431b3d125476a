//! C3 — per-deal state machine: dealing, tribute, return-tribute, playing,
//! scoring. Operates on a `DealState` the same way `game_service` operates
//! on a `GameState`: free functions taking `&mut DealState`.

use crate::domain::entities::{
    next_seats, partner_of, team_of, DealState, LastPlay, Phase, RoundAction, Seat, TributeEdge,
    TributeState,
};
use crate::domain::repositories::{BotStrategy, RandomSource};
use crate::domain::services::deck::{deal_round_robin, make_shuffled_deck, sort_descending};
use crate::domain::services::rules::{self, ClassifyError};
use crate::domain::value_objects::{Card, CardId};

pub const CARDS_PER_SEAT: usize = 27;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DealError {
    #[error("wrong phase for this action")]
    WrongPhase,
    #[error("not your turn")]
    NotYourTurn,
    #[error("invalid hand")]
    InvalidHand,
    #[error("play does not beat the last hand")]
    NotBigEnough,
    #[error("one or more cards are not in hand")]
    MissingCard,
    #[error("cannot pass on a free lead")]
    CannotPassOnFreeLead,
    #[error("seat does not owe a tribute card")]
    NotAPayer,
    #[error("tribute card must be the strictly largest card in hand")]
    WrongTributeCard,
    #[error("seat does not owe a return-tribute card")]
    NotARecipient,
}

/// Start a fresh deal. `previous_winners` is the prior deal's full
/// finishing order `[p1, p2, p3, p4]`; `None` for the match's first deal.
/// `active_team` decides the deliberate starting-seat convention for a
/// fresh match: seat `active_team.index()` leads (documented in DESIGN.md
/// per the spec's open question on first-deal starting seat).
pub fn start_deal(
    level: u8,
    active_team_seat: Seat,
    previous_winners: Option<[Seat; 4]>,
    rng: &mut dyn RandomSource,
) -> DealState {
    let mut deal = DealState::new(level, active_team_seat);
    deal.phase = Phase::Dealing;

    let mut deck = make_shuffled_deck(rng);
    let hands = deal_round_robin(&mut deck, CARDS_PER_SEAT);
    for (seat, hand) in deal.hands.iter_mut().zip(hands.into_iter()) {
        *seat = sort_descending(hand, level);
    }

    match previous_winners {
        None => {
            deal.phase = Phase::Playing;
            deal.current_turn = active_team_seat;
        }
        Some(order) => enter_tribute(&mut deal, order),
    }

    deal
}

/// Tribute edges per §4.3.2: double-win, single-win, or tie (no tribute).
/// Returns `(payer, recipient)` pairs.
fn tribute_edges(order: [Seat; 4]) -> Vec<(Seat, Seat)> {
    let [p1, p2, p3, p4] = order;
    if team_of(p1) == team_of(p2) {
        vec![(p4, p1), (p3, p2)]
    } else if team_of(p1) == team_of(p3) {
        vec![(p4, p1)]
    } else {
        Vec::new()
    }
}

fn enter_tribute(deal: &mut DealState, order: [Seat; 4]) {
    let edges = tribute_edges(order);
    if edges.is_empty() {
        deal.phase = Phase::Playing;
        deal.current_turn = order[0];
        return;
    }

    let payers: Vec<Seat> = edges.iter().map(|(from, _)| *from).collect();
    if has_resistance(deal, &payers) {
        deal.phase = Phase::Playing;
        deal.current_turn = order[0];
        return;
    }

    deal.phase = Phase::Tribute;
    deal.tribute = Some(TributeState {
        pending: edges.into_iter().map(|(from, to)| TributeEdge { from, to, card: None }).collect(),
        collected: Vec::new(),
        payer_priority: payers,
        pending_returns: Vec::new(),
        next_start_seat: None,
    });
}

/// Anti-tribute ("resistance"): payers collectively hold two BigJokers.
fn has_resistance(deal: &DealState, payers: &[Seat]) -> bool {
    use crate::domain::value_objects::Rank;
    let big_jokers: usize = payers
        .iter()
        .map(|&s| deal.hands[s as usize].iter().filter(|c| c.rank == Rank::BigJoker).count())
        .sum();
    big_jokers >= 2
}

/// Bots pay tribute automatically at phase entry (§4.3.2). Call once right
/// after a deal transitions into `Phase::Tribute`.
pub fn auto_pay_bot_tributes(
    deal: &mut DealState,
    is_bot: impl Fn(Seat) -> bool,
    strategy: &dyn BotStrategy,
) {
    if deal.phase != Phase::Tribute {
        return;
    }
    let payers: Vec<Seat> = deal
        .tribute
        .as_ref()
        .map(|t| t.pending.iter().map(|e| e.from).collect())
        .unwrap_or_default();
    for seat in payers {
        if is_bot(seat) {
            let card = strategy.choose_tribute_card(&deal.hands[seat as usize], deal.level);
            let _ = submit_tribute(deal, seat, card);
        }
    }
}

/// A payer submits their tribute card.
pub fn submit_tribute(deal: &mut DealState, seat: Seat, card: CardId) -> Result<(), DealError> {
    if deal.phase != Phase::Tribute {
        return Err(DealError::WrongPhase);
    }
    let edge_idx = deal
        .tribute
        .as_ref()
        .and_then(|t| t.pending.iter().position(|e| e.from == seat))
        .ok_or(DealError::NotAPayer)?;

    let largest = rules::largest_card(&deal.hands[seat as usize], deal.level)
        .map(|c| c.id)
        .ok_or(DealError::NotAPayer)?;
    if card != largest {
        return Err(DealError::WrongTributeCard);
    }

    let mut edge = deal.tribute.as_mut().unwrap().pending.remove(edge_idx);
    let moved = take_card(&mut deal.hands[seat as usize], card).ok_or(DealError::MissingCard)?;
    deal.hands[edge.to as usize].push(moved);
    deal.hands[edge.to as usize] = sort_descending(std::mem::take(&mut deal.hands[edge.to as usize]), deal.level);
    edge.card = Some(card);

    let tribute = deal.tribute.as_mut().unwrap();
    tribute.collected.push(edge);

    if tribute.is_collection_done() {
        finish_tribute_collection(deal);
    }
    Ok(())
}

fn finish_tribute_collection(deal: &mut DealState) {
    let level = deal.level;

    // next-start seat: the payer whose tribute card has the largest logic
    // value; ties favour the worse-finishing payer (p4 over p3), so payers
    // are walked in `payer_priority` order and only a strictly larger value
    // displaces the current best.
    let tribute_ref = deal.tribute.as_ref().unwrap();
    let collected = tribute_ref.collected.clone();
    let priority = tribute_ref.payer_priority.clone();
    let mut best_seat = priority[0];
    let mut best_value: i32 = -1;
    for payer in &priority {
        let Some(edge) = collected.iter().find(|e| e.from == *payer) else { continue };
        if let Some(card_id) = edge.card {
            let value = card_logic_value_in(deal, edge.to, card_id, level);
            if value > best_value {
                best_value = value;
                best_seat = edge.from;
            }
        }
    }

    let tribute = deal.tribute.as_mut().unwrap();
    tribute.next_start_seat = Some(best_seat);
    tribute.pending_returns =
        tribute.collected.iter().map(|e| TributeEdge { from: e.to, to: e.from, card: None }).collect();
    deal.phase = Phase::ReturnTribute;
}

fn card_logic_value_in(deal: &DealState, seat: Seat, card_id: CardId, level: u8) -> i32 {
    deal.hands[seat as usize]
        .iter()
        .find(|c| c.id == card_id)
        .map(|c| c.logic_value(level) as i32)
        .unwrap_or(-1)
}

/// Bots return automatically: lowest-value card, chosen and applied right
/// after entering `Phase::ReturnTribute`.
pub fn auto_return_bot_tributes(
    deal: &mut DealState,
    is_bot: impl Fn(Seat) -> bool,
    strategy: &dyn BotStrategy,
) {
    if deal.phase != Phase::ReturnTribute {
        return;
    }
    let recipients: Vec<Seat> = deal
        .tribute
        .as_ref()
        .map(|t| t.pending_returns.iter().map(|e| e.from).collect())
        .unwrap_or_default();
    for seat in recipients {
        if is_bot(seat) {
            let card = strategy.choose_return_card(&deal.hands[seat as usize], deal.level);
            let _ = submit_return(deal, seat, card);
        }
    }
}

/// A recipient returns a card to its original payer.
pub fn submit_return(deal: &mut DealState, seat: Seat, card: CardId) -> Result<(), DealError> {
    if deal.phase != Phase::ReturnTribute {
        return Err(DealError::WrongPhase);
    }
    let edge_idx = deal
        .tribute
        .as_ref()
        .and_then(|t| t.pending_returns.iter().position(|e| e.from == seat))
        .ok_or(DealError::NotARecipient)?;

    let mut edge = deal.tribute.as_mut().unwrap().pending_returns.remove(edge_idx);
    let moved = take_card(&mut deal.hands[seat as usize], card).ok_or(DealError::MissingCard)?;
    deal.hands[edge.to as usize].push(moved);
    deal.hands[edge.to as usize] = sort_descending(std::mem::take(&mut deal.hands[edge.to as usize]), deal.level);
    edge.card = Some(card);

    let tribute = deal.tribute.as_mut().unwrap();
    if tribute.is_return_done() {
        deal.phase = Phase::Playing;
        deal.current_turn = tribute.next_start_seat.unwrap_or(deal.current_turn);
    }
    Ok(())
}

fn take_card(hand: &mut Vec<Card>, id: CardId) -> Option<Card> {
    let pos = hand.iter().position(|c| c.id == id)?;
    Some(hand.remove(pos))
}

/// Outcome of an accepted play, for the caller to broadcast / schedule bots on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Accepted,
    SeatFinished,
    DealEnded,
}

/// Seat `seat` attempts to play `cards` (identity tags). §4.3.3.
pub fn play(deal: &mut DealState, seat: Seat, cards: &[CardId]) -> Result<PlayOutcome, DealError> {
    if deal.phase != Phase::Playing || deal.current_turn != seat {
        return Err(DealError::WrongPhase);
    }

    let picked = resolve_cards(&deal.hands[seat as usize], cards).ok_or(DealError::MissingCard)?;
    let classification = rules::classify(&picked, deal.level).map_err(|e| match e {
        ClassifyError::NotALegalHand => DealError::InvalidHand,
    })?;

    if let Some(last) = &deal.last_play {
        if last.player != seat && rules::compare_hands(&classification, &last.classification) <= 0 {
            return Err(DealError::NotBigEnough);
        }
    }

    remove_cards(&mut deal.hands[seat as usize], cards);
    deal.last_play = Some(LastPlay { player: seat, classification });
    deal.round_actions = Default::default();
    deal.round_actions[seat as usize] = Some(RoundAction::Played);

    let mut outcome = PlayOutcome::Accepted;
    if deal.is_finished(seat) {
        deal.winners.push(seat);
        outcome = PlayOutcome::SeatFinished;
        if check_termination(deal) {
            return Ok(PlayOutcome::DealEnded);
        }
    }

    advance_turn(deal, seat);
    Ok(outcome)
}

/// Seat `seat` passes. §4.3.3.
pub fn pass(deal: &mut DealState, seat: Seat) -> Result<(), DealError> {
    if deal.phase != Phase::Playing || deal.current_turn != seat {
        return Err(DealError::WrongPhase);
    }
    match &deal.last_play {
        None => return Err(DealError::CannotPassOnFreeLead),
        Some(last) if last.player == seat => return Err(DealError::CannotPassOnFreeLead),
        _ => {}
    }
    deal.round_actions[seat as usize] = Some(RoundAction::Passed);
    advance_turn(deal, seat);
    Ok(())
}

fn resolve_cards(hand: &[Card], ids: &[CardId]) -> Option<Vec<Card>> {
    let mut picked = Vec::with_capacity(ids.len());
    for &id in ids {
        picked.push(*hand.iter().find(|c| c.id == id)?);
    }
    Some(picked)
}

fn remove_cards(hand: &mut Vec<Card>, ids: &[CardId]) {
    hand.retain(|c| !ids.contains(&c.id));
}

/// §4.3.4 turn advancement: scan clockwise from `from`, skipping empty
/// hands, stopping at the aggressor to end the trick.
fn advance_turn(deal: &mut DealState, from: Seat) {
    let aggressor = deal.last_play.as_ref().map(|p| p.player);
    for candidate in next_seats(from) {
        if aggressor == Some(candidate) {
            end_of_trick(deal, candidate);
            return;
        }
        if deal.is_finished(candidate) {
            continue;
        }
        deal.current_turn = candidate;
        return;
    }
    // Every other seat is empty; the trick necessarily ends with the
    // aggressor since no one else can act.
    if let Some(a) = aggressor {
        end_of_trick(deal, a);
    }
}

fn end_of_trick(deal: &mut DealState, aggressor: Seat) {
    deal.clear_round();
    deal.current_turn = resolve_next_leader(deal, aggressor);
}

/// Jiefeng (carry-the-wind): leadership stays with the aggressor unless
/// they've finished, in which case it passes to their partner, then to
/// the next non-empty opponent clockwise.
fn resolve_next_leader(deal: &DealState, aggressor: Seat) -> Seat {
    if !deal.is_finished(aggressor) {
        return aggressor;
    }
    let partner = partner_of(aggressor);
    if !deal.is_finished(partner) {
        return partner;
    }
    for candidate in next_seats(aggressor) {
        if !deal.is_finished(candidate) {
            return candidate;
        }
    }
    aggressor
}

/// Checks the double-win / triple-finish termination rules and, if met,
/// completes the winners array and moves to `Phase::Score`.
fn check_termination(deal: &mut DealState) -> bool {
    if deal.winners.len() >= 2 {
        let (a, b) = (deal.winners[0], deal.winners[1]);
        if team_of(a) == team_of(b) {
            finish_deal(deal);
            return true;
        }
    }
    if deal.winners.len() == 3 {
        finish_deal(deal);
        return true;
    }
    false
}

fn finish_deal(deal: &mut DealState) {
    for seat in 0..4u8 {
        if !deal.winners.contains(&seat) {
            deal.winners.push(seat);
        }
    }
    deal.phase = Phase::Score;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Rank, Suit};
    use crate::infrastructure::random::SeededRandomSource;

    fn card(id: u8, suit: Suit, rank: Rank) -> Card {
        Card { id: CardId(id), suit, rank }
    }

    #[test]
    fn tribute_edges_cover_double_single_and_tie() {
        assert_eq!(tribute_edges([0, 2, 1, 3]), vec![(3, 0), (1, 2)]);
        assert_eq!(tribute_edges([0, 1, 2, 3]), vec![(3, 0)]);
        assert_eq!(tribute_edges([0, 1, 3, 2]), Vec::<(Seat, Seat)>::new());
    }

    #[test]
    fn tribute_tie_break_favours_the_last_place_payer() {
        let mut deal = DealState::new(2, 0);
        deal.hands = [
            vec![card(0, Suit::Spades, Rank::King)],
            vec![card(1, Suit::Clubs, Rank::Ace)],
            vec![card(2, Suit::Hearts, Rank::Queen)],
            vec![card(3, Suit::Diamonds, Rank::Ace)],
        ];
        enter_tribute(&mut deal, [0, 2, 1, 3]);
        assert_eq!(deal.phase, Phase::Tribute);

        submit_tribute(&mut deal, 1, CardId(1)).unwrap();
        submit_tribute(&mut deal, 3, CardId(3)).unwrap();

        assert_eq!(deal.phase, Phase::ReturnTribute);
        assert_eq!(deal.tribute.as_ref().unwrap().next_start_seat, Some(3));
    }

    #[test]
    fn fresh_match_deals_27_cards_each_and_opens_playing() {
        let mut rng = SeededRandomSource::new(7);
        let deal = start_deal(2, 0, None, &mut rng);
        assert_eq!(deal.phase, Phase::Playing);
        assert_eq!(deal.current_turn, 0);
        for hand in &deal.hands {
            assert_eq!(hand.len(), CARDS_PER_SEAT);
        }
    }

    #[test]
    fn pass_cycle_clears_last_play_and_returns_lead() {
        let mut deal = DealState::new(2, 0);
        deal.phase = Phase::Playing;
        deal.hands = [
            vec![card(0, Suit::Spades, Rank::King)],
            vec![card(1, Suit::Clubs, Rank::Two)],
            vec![card(2, Suit::Clubs, Rank::Three)],
            vec![card(3, Suit::Clubs, Rank::Four)],
        ];
        deal.current_turn = 0;
        play(&mut deal, 0, &[CardId(0)]).unwrap();
        assert_eq!(deal.current_turn, 1);

        pass(&mut deal, 1).unwrap();
        pass(&mut deal, 2).unwrap();
        pass(&mut deal, 3).unwrap();
        assert!(deal.last_play.is_none());
        assert_eq!(deal.current_turn, 0);
    }

    #[test]
    fn double_win_ends_deal_and_fills_winners() {
        let mut deal = DealState::new(2, 0);
        deal.phase = Phase::Playing;
        deal.hands = [
            vec![card(0, Suit::Spades, Rank::Three)],
            vec![card(1, Suit::Spades, Rank::King), card(10, Suit::Clubs, Rank::King)],
            vec![card(2, Suit::Spades, Rank::Four)],
            vec![card(3, Suit::Spades, Rank::Five)],
        ];
        deal.current_turn = 0;
        play(&mut deal, 0, &[CardId(0)]).unwrap();
        pass(&mut deal, 1).unwrap();
        pass(&mut deal, 2).unwrap();
        pass(&mut deal, 3).unwrap();
        assert_eq!(deal.current_turn, 0);

        deal.current_turn = 2;
        let outcome = play(&mut deal, 2, &[CardId(2)]).unwrap();
        assert_eq!(outcome, PlayOutcome::DealEnded);
        assert_eq!(deal.phase, Phase::Score);
        assert_eq!(deal.winners[0], 0);
        assert_eq!(deal.winners[1], 2);
        assert_eq!(deal.winners.len(), 4);
    }

    #[test]
    fn jiefeng_transfers_lead_to_partner_when_aggressor_finished() {
        let mut deal = DealState::new(2, 0);
        deal.phase = Phase::Playing;
        deal.hands = [
            vec![card(0, Suit::Spades, Rank::Three)],
            vec![card(1, Suit::Clubs, Rank::Four)],
            vec![card(2, Suit::Clubs, Rank::Five)],
            vec![card(3, Suit::Clubs, Rank::Six)],
        ];
        deal.current_turn = 0;
        play(&mut deal, 0, &[CardId(0)]).unwrap();
        assert!(deal.is_finished(0));
        pass(&mut deal, 1).unwrap();
        pass(&mut deal, 2).unwrap();
        pass(&mut deal, 3).unwrap();
        // Seat 0 finished; lead transfers to partner (seat 2).
        assert_eq!(deal.current_turn, 2);
    }
}
